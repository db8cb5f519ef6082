use crate::instrument::{InstrumentClass, classify};
use core_types::Side;

/// Signed price movement in the trader's favour.
pub fn price_delta(entry_price: f64, exit_price: f64, position: Side) -> f64 {
    match position {
        Side::Long => exit_price - entry_price,
        Side::Short => entry_price - exit_price,
    }
}

/// Computes the USD profit or loss of closing `lot_size` lots of `instrument`
/// at `exit_price` after opening at `entry_price`.
///
/// Inputs that cannot be priced yet (non-positive or non-finite prices or lot
/// size, empty instrument) yield `0.0`, so the function can back a live preview
/// of a half-filled form.
///
/// Cross pairs use the direct-USD formula. This ignores the conversion from the
/// quote currency to USD and is only an approximation.
pub fn compute_pnl(
    entry_price: f64,
    exit_price: f64,
    position: Side,
    lot_size: f64,
    instrument: &str,
) -> f64 {
    let computable = entry_price > 0.0
        && exit_price > 0.0
        && lot_size > 0.0
        && entry_price.is_finite()
        && exit_price.is_finite()
        && lot_size.is_finite()
        && !instrument.is_empty();
    if !computable {
        return 0.0;
    }

    let class = classify(instrument);
    let movement = price_delta(entry_price, exit_price, position) * lot_size * class.contract_size();

    match class {
        InstrumentClass::UsdBase => movement / exit_price,
        InstrumentClass::Metal
        | InstrumentClass::NonPair
        | InstrumentClass::UsdQuote
        | InstrumentClass::Cross => movement,
    }
}
