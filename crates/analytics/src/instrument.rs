use serde::Serialize;

/// Standard lot for currency pairs, in base-currency units.
pub const FOREX_CONTRACT_SIZE: f64 = 100_000.0;
/// Standard lot for spot gold, in troy ounces.
pub const GOLD_CONTRACT_SIZE: f64 = 100.0;

/// How an instrument's price movement converts to USD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InstrumentClass {
    /// Spot gold (`XAU/USD`).
    Metal,
    /// Indices, single stocks and commodities quoted without a slash, e.g. `US30`.
    /// Also covers slash instruments with no quote currency.
    NonPair,
    /// USD is the quote currency, e.g. `EUR/USD`, `BTC/USD`.
    UsdQuote,
    /// USD is the base currency, e.g. `USD/JPY`. P/L accrues in the quote
    /// currency and is converted back at the exit price.
    UsdBase,
    /// Neither side is USD, e.g. `EUR/JPY`. Priced like `UsdQuote`; this is an
    /// approximation, as the exact figure needs a third conversion rate.
    Cross,
}

impl InstrumentClass {
    /// Units traded per 1.0 lot.
    pub fn contract_size(&self) -> f64 {
        match self {
            InstrumentClass::Metal => GOLD_CONTRACT_SIZE,
            InstrumentClass::NonPair => 1.0,
            InstrumentClass::UsdQuote | InstrumentClass::UsdBase | InstrumentClass::Cross => {
                FOREX_CONTRACT_SIZE
            }
        }
    }
}

/// Drops any descriptive suffix after the first space: `"XAU/USD (Gold)"` -> `"XAU/USD"`.
pub fn clean_symbol(instrument: &str) -> &str {
    instrument.split(' ').next().unwrap_or_default()
}

/// Classifies a free-form instrument string. Never fails; unknown shapes fall
/// through to the lot-multiplier-only rule.
pub fn classify(instrument: &str) -> InstrumentClass {
    let symbol = clean_symbol(instrument);

    if symbol.eq_ignore_ascii_case("XAU/USD") {
        return InstrumentClass::Metal;
    }

    let mut parts = symbol.split('/');
    let base = parts.next().unwrap_or_default();
    let Some(quote) = parts.next() else {
        return InstrumentClass::NonPair;
    };

    if quote.is_empty() {
        InstrumentClass::NonPair
    } else if quote.eq_ignore_ascii_case("USD") {
        InstrumentClass::UsdQuote
    } else if base.eq_ignore_ascii_case("USD") {
        InstrumentClass::UsdBase
    } else {
        InstrumentClass::Cross
    }
}
