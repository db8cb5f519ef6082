use crate::error::AnalyticsError;
use crate::pnl::compute_pnl;
use core_types::{Trade, TradeDraft, TradeOutcome};
use serde::{Deserialize, Serialize};

/// The live figures shown while a trade is being entered.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PnlPreview {
    /// P/L if the take-profit is hit.
    pub potential_profit: f64,
    /// P/L if the stop-loss is hit.
    pub potential_loss: f64,
    /// The figure that would be committed for the selected outcome, 0 when none is selected.
    pub pnl: f64,
}

/// The price a trade with the given outcome closed at.
pub fn exit_price_for(draft: &TradeDraft, outcome: TradeOutcome) -> f64 {
    match outcome {
        TradeOutcome::Win => draft.take_profit,
        TradeOutcome::Loss => draft.stop_loss,
    }
}

pub fn preview(draft: &TradeDraft) -> PnlPreview {
    let at = |exit| {
        compute_pnl(draft.entry_price, exit, draft.position, draft.lot_size, &draft.instrument)
    };
    let potential_profit = at(draft.take_profit);
    let potential_loss = at(draft.stop_loss);
    let pnl = match draft.outcome {
        Some(TradeOutcome::Win) => potential_profit,
        Some(TradeOutcome::Loss) => potential_loss,
        None => 0.0,
    };
    PnlPreview {
        potential_profit,
        potential_loss,
        pnl,
    }
}

/// Commits a draft into a trade. The exit price and P/L follow from the
/// declared outcome, never from an arbitrary exit.
pub fn finalize(
    draft: TradeDraft,
    id: String,
    account_id: String,
) -> Result<Trade, AnalyticsError> {
    let outcome = draft.outcome.ok_or(AnalyticsError::MissingOutcome)?;

    if draft.instrument.trim().is_empty() {
        return Err(AnalyticsError::InvalidInput(
            "instrument".to_string(),
            "an instrument is required".to_string(),
        ));
    }
    if !draft.lot_size.is_finite() || draft.lot_size <= 0.0 {
        return Err(AnalyticsError::InvalidInput(
            "lotSize".to_string(),
            format!("must be greater than zero, got {}", draft.lot_size),
        ));
    }

    let mut draft = draft;
    draft.instrument = draft.instrument.trim().to_string();

    let pnl = preview(&draft).pnl;
    let exit_price = exit_price_for(&draft, outcome);

    Ok(Trade {
        id,
        account_id,
        instrument: draft.instrument,
        position: draft.position,
        lot_size: draft.lot_size,
        entry_price: draft.entry_price,
        exit_price,
        stop_loss: draft.stop_loss,
        take_profit: draft.take_profit,
        pnl,
        outcome,
        trade_date: draft.trade_date,
        strategy: draft.strategy,
        notes: draft.notes,
        screenshot: draft.screenshot.filter(|s| !s.is_empty()),
    })
}
