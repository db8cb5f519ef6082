use chrono::NaiveDate;
use core_types::Account;
use serde::{Deserialize, Serialize};

/// Headline figures for an account's dashboard cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountStats {
    pub total_pnl: f64,
    /// Percentage of trades with a positive P/L, 0-100.
    pub win_rate: f64,
    /// Total P/L as a percentage of the initial balance.
    pub account_growth: f64,
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
}

impl AccountStats {
    /// Creates zeroed-out stats, the result for an account with no trades.
    pub fn new() -> Self {
        Self {
            total_pnl: 0.0,
            win_rate: 0.0,
            account_growth: 0.0,
            total_trades: 0,
            winning_trades: 0,
            losing_trades: 0,
        }
    }
}

impl Default for AccountStats {
    fn default() -> Self {
        Self::new()
    }
}

/// One point of the running balance. The first point of a curve is the
/// unmodified initial balance labelled "Start" and has no date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquityPoint {
    pub label: String,
    pub balance: f64,
    pub trade_date: Option<NaiveDate>,
}

/// Everything the dashboard renders for one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountReport {
    pub account: Account,
    pub current_balance: f64,
    pub stats: AccountStats,
    pub equity_curve: Vec<EquityPoint>,
}
