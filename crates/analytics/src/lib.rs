//! # Journal Analytics
//!
//! The arithmetic behind the trade journal: turning a trade's prices into a
//! USD profit or loss, and turning an account's trades into dashboard figures.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** This crate has no knowledge of storage, HTTP or the AI
//!   service. It depends only on `core-types`.
//! - **Never Fails on Numbers:** Inputs that cannot be priced yet produce `0.0`,
//!   and an empty trade list produces zeroed stats. Only committing a trade
//!   draft can fail, when required fields are missing.
//!
//! ## Public API
//!
//! - `compute_pnl`: P/L for one instrument, side, lot size and price pair.
//! - `classify` / `InstrumentClass`: how an instrument string is priced.
//! - `preview` / `finalize`: the trade-entry ticket.
//! - `StatsEngine`: win rate, growth, balance and the equity curve.

pub mod dates;
pub mod engine;
pub mod error;
pub mod instrument;
pub mod pnl;
pub mod report;
pub mod ticket;

// Re-export the key components to create a clean, public-facing API.
pub use dates::{newest_first, parse_trade_date};
pub use engine::StatsEngine;
pub use error::AnalyticsError;
pub use instrument::{InstrumentClass, classify, clean_symbol};
pub use pnl::compute_pnl;
pub use report::{AccountReport, AccountStats, EquityPoint};
pub use ticket::{PnlPreview, finalize, preview};
