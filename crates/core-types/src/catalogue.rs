use serde::Serialize;

/// A named group of instrument suggestions offered by the trade-entry form.
/// Any other instrument string is still accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InstrumentGroup {
    pub name: &'static str,
    pub instruments: &'static [&'static str],
}

pub const INSTRUMENT_GROUPS: &[InstrumentGroup] = &[
    InstrumentGroup {
        name: "Forex Majors",
        instruments: &["EUR/USD", "USD/JPY", "GBP/USD", "USD/CHF", "AUD/USD", "USD/CAD", "NZD/USD"],
    },
    InstrumentGroup {
        name: "Forex Minors",
        instruments: &[
            "EUR/GBP", "EUR/AUD", "GBP/JPY", "CHF/JPY", "NZD/JPY", "GBP/CAD", "EUR/JPY", "AUD/JPY",
            "CAD/JPY",
        ],
    },
    InstrumentGroup {
        name: "Indices",
        instruments: &["US30", "SPX500", "NAS100", "UK100", "GER30", "FRA40", "JPN225", "AUS200"],
    },
    InstrumentGroup {
        name: "Commodities",
        instruments: &["XAU/USD (Gold)", "XAG/USD (Silver)", "USOIL (WTI)", "UKOIL (Brent)"],
    },
    InstrumentGroup {
        name: "Popular Stocks",
        instruments: &["AAPL", "GOOGL", "MSFT", "AMZN", "TSLA", "NVDA", "META", "JPM"],
    },
    InstrumentGroup {
        name: "Crypto",
        instruments: &[
            "BTC/USD", "ETH/USD", "XRP/USD", "LTC/USD", "BCH/USD", "ADA/USD", "DOGE/USD", "SOL/USD",
        ],
    },
];
