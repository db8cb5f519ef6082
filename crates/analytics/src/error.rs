use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Please select a trade outcome.")]
    MissingOutcome,

    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),
}
