//! # Journal Database Crate
//!
//! This crate is the journal's "permanent archive": it loads and saves accounts,
//! trades and the active-account selection, and wraps them in an explicit store
//! object that the CLI and the web server share.
//!
//! ## Architectural Principles
//!
//! - **Injected Storage:** `JournalBackend` is the six-operation storage contract.
//!   `JsonFileBackend` keeps one JSON file per collection; `MemoryBackend` keeps
//!   nothing on disk.
//! - **Write-Through Store:** `JournalRepository` persists each mutation before
//!   applying it in memory, so the two never disagree after a failed save.
//! - **No Hidden Globals:** callers own the repository and pass it where needed.
//!
//! ## Public API
//!
//! - `connect`: opens the JSON journal in a data directory.
//! - `JournalRepository`: accounts, trades, active account and derived reports.
//! - `DbError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod persistence;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::connect;
pub use error::DbError;
pub use persistence::{JournalBackend, JsonFileBackend, MemoryBackend};
pub use repository::JournalRepository;
