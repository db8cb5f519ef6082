use crate::dates::parse_trade_date;
use crate::report::{AccountReport, AccountStats, EquityPoint};
use core_types::{Account, Trade};

pub const START_LABEL: &str = "Start";

/// A stateless calculator for deriving account performance from journaled trades.
#[derive(Debug, Default)]
pub struct StatsEngine {}

impl StatsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregates the trades of one account.
    ///
    /// # Arguments
    ///
    /// * `trades` - Every trade of the account, in any order.
    /// * `initial_balance` - The balance the account was opened with.
    ///
    /// An empty slice gives zeroed stats, and growth is 0 when the initial
    /// balance is not positive.
    pub fn compute_stats(&self, trades: &[Trade], initial_balance: f64) -> AccountStats {
        let mut stats = AccountStats::new();

        if trades.is_empty() {
            return stats;
        }

        stats.total_trades = trades.len();
        for trade in trades {
            stats.total_pnl += trade.pnl;
            if trade.pnl > 0.0 {
                stats.winning_trades += 1;
            } else if trade.pnl < 0.0 {
                stats.losing_trades += 1;
            }
        }

        stats.win_rate = (stats.winning_trades as f64 / stats.total_trades as f64) * 100.0;

        if initial_balance > 0.0 {
            stats.account_growth = (stats.total_pnl / initial_balance) * 100.0;
        }

        stats
    }

    /// Builds the running balance over time.
    ///
    /// Trades are ordered by trade date, oldest first. Trades whose date is
    /// missing or unparseable are left out of the curve entirely; trades sharing
    /// a date keep their input order.
    pub fn compute_equity_curve(&self, trades: &[Trade], initial_balance: f64) -> Vec<EquityPoint> {
        let mut dated: Vec<_> = trades
            .iter()
            .filter_map(|trade| parse_trade_date(&trade.trade_date).map(|date| (date, trade)))
            .collect();
        dated.sort_by_key(|(date, _)| *date);

        let skipped = trades.len() - dated.len();
        if skipped > 0 {
            tracing::debug!(skipped, "Trades without a usable date left out of the equity curve.");
        }

        let mut curve = Vec::with_capacity(dated.len() + 1);
        curve.push(EquityPoint {
            label: START_LABEL.to_string(),
            balance: initial_balance,
            trade_date: None,
        });

        let mut running_balance = initial_balance;
        for (index, (date, trade)) in dated.into_iter().enumerate() {
            running_balance += trade.pnl;
            curve.push(EquityPoint {
                label: format!("Trade {}", index + 1),
                balance: running_balance,
                trade_date: Some(date.date()),
            });
        }

        curve
    }

    /// Initial balance plus the P/L of every trade, dated or not.
    pub fn current_balance(&self, trades: &[Trade], initial_balance: f64) -> f64 {
        initial_balance + trades.iter().map(|trade| trade.pnl).sum::<f64>()
    }

    /// Assembles the full dashboard for `account` from its trades.
    pub fn report(&self, account: &Account, trades: &[Trade]) -> AccountReport {
        AccountReport {
            account: account.clone(),
            current_balance: self.current_balance(trades, account.initial_balance),
            stats: self.compute_stats(trades, account.initial_balance),
            equity_curve: self.compute_equity_curve(trades, account.initial_balance),
        }
    }
}
