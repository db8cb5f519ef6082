use api_client::ApiError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use database::DbError;
use serde_json::json;
use thiserror::Error;

pub const ANALYSIS_FAILED: &str = "There was an error analyzing the trade. Please try again.";
pub const CALENDAR_FAILED: &str = "Could not load economic calendar. Please try again later.";
pub const PRICE_FAILED: &str = "Could not fetch the current price. Please enter it manually.";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),
    #[error("Market analyst error: {source}")]
    Analyst {
        #[source]
        source: ApiError,
        message: &'static str,
    },
    #[error("The market analyst is not configured.")]
    AnalystUnavailable,
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Wraps a collaborator failure with the message shown to the user.
    pub fn analyst(message: &'static str) -> impl FnOnce(ApiError) -> Self {
        move |source| AppError::Analyst { source, message }
    }
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Database(db_err) => match db_err {
                DbError::NotFound(_) => (StatusCode::NOT_FOUND, db_err.to_string()),
                DbError::NoActiveAccount => (StatusCode::CONFLICT, db_err.to_string()),
                DbError::InvalidAccount(inner) => (StatusCode::BAD_REQUEST, inner.to_string()),
                DbError::InvalidTrade(inner) => (StatusCode::BAD_REQUEST, inner.to_string()),
                other => {
                    tracing::error!(error = ?other, "Database error.");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "An internal database error occurred".to_string(),
                    )
                }
            },
            AppError::Analyst { source, message } => {
                tracing::error!(error = %source, "Market analyst error.");
                (StatusCode::BAD_GATEWAY, message.to_string())
            }
            AppError::AnalystUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "AI features are disabled: no API key is configured.".to_string(),
            ),
            AppError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
