pub mod catalogue;
pub mod enums;
pub mod error;
pub mod money;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use catalogue::{INSTRUMENT_GROUPS, InstrumentGroup};
pub use enums::{AccountType, Impact, Side, TradeOutcome};
pub use error::CoreError;
pub use money::format_usd;
pub use structs::{
    Account, AnalysisResult, EconomicEvent, NewAccount, Trade, TradeDraft, WebSource,
};
