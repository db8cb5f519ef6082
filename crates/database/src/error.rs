use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to access journal file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Journal file {path} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("An error occurred during JSON serialization: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid account: {0}")]
    InvalidAccount(#[from] core_types::CoreError),

    #[error("Invalid trade: {0}")]
    InvalidTrade(#[from] analytics::AnalyticsError),

    #[error("Cannot add trade: no active account.")]
    NoActiveAccount,

    #[error("The requested {0} was not found.")]
    NotFound(String),
}
