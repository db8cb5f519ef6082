use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to reach the analysis service: {0}")]
    Request(#[from] reqwest::Error),

    #[error("The analysis service returned an error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),

    #[error("Invalid data format from API: {0}")]
    InvalidData(String),

    #[error("The analysis service returned no content.")]
    EmptyResponse,
}
