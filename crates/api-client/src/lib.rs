use crate::responses::{ApiErrorResponse, GenerateContentRequest, GenerateContentResponse};
use async_trait::async_trait;
use chrono::Utc;
use configuration::AiSettings;
use core_types::{AnalysisResult, EconomicEvent, Trade};
use reqwest::header::{HeaderMap, HeaderValue};
use std::time::Duration;

pub mod error;
pub mod parsing;
pub mod prompts;
pub mod responses;

// --- Public API ---
pub use error::ApiError;

/// The generic, abstract interface to the market-analysis service.
/// Handlers depend on this trait, allowing the real client to be swapped for a
/// stub in tests.
///
/// Every failure is recoverable: callers show a message and let the user retry.
#[async_trait]
pub trait MarketAnalyst: Send + Sync {
    /// Commentary on a saved trade, grounded on news around its trade date.
    async fn analyze_trade(&self, trade: &Trade) -> Result<AnalysisResult, ApiError>;

    /// Today's high and medium impact events for the major currencies.
    async fn fetch_economic_calendar(&self) -> Result<Vec<EconomicEvent>, ApiError>;

    /// The latest market price of `instrument`.
    async fn fetch_current_price(&self, instrument: &str) -> Result<f64, ApiError>;
}

/// A concrete implementation of `MarketAnalyst` backed by the Gemini REST API
/// with Google Search grounding.
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    endpoint: String,
}

impl GeminiClient {
    /// Builds a client from settings.
    ///
    /// Returns `Ok(None)` when no API key is configured, allowing the
    /// application to run with the AI features disabled.
    pub fn new(settings: &AiSettings) -> Result<Option<Self>, ApiError> {
        if settings.api_key.trim().is_empty() {
            tracing::warn!("Market analyst is not configured (missing API key); AI features disabled.");
            return Ok(None);
        }

        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(settings.api_key.trim())
            .map_err(|_| ApiError::InvalidData("API key is not a valid header value".to_string()))?;
        headers.insert("x-goog-api-key", key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            settings.base_url.trim_end_matches('/'),
            settings.model
        );

        Ok(Some(Self { client, endpoint }))
    }

    async fn generate(&self, prompt: &str) -> Result<GenerateContentResponse, ApiError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&GenerateContentRequest::grounded(prompt))
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            serde_json::from_str(&text).map_err(|e| ApiError::Deserialization(e.to_string()))
        } else {
            let message = serde_json::from_str::<ApiErrorResponse>(&text)
                .map(|body| body.error.message)
                .unwrap_or(text);
            tracing::warn!(status = status.as_u16(), %message, "Analysis service request failed.");
            Err(ApiError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }

    async fn generate_text(&self, prompt: &str) -> Result<String, ApiError> {
        self.generate(prompt).await?.text().ok_or(ApiError::EmptyResponse)
    }
}

#[async_trait]
impl MarketAnalyst for GeminiClient {
    async fn analyze_trade(&self, trade: &Trade) -> Result<AnalysisResult, ApiError> {
        tracing::info!(trade_id = %trade.id, instrument = %trade.instrument, "Requesting trade analysis.");
        let response = self.generate(&prompts::trade_analysis(trade)).await?;
        let text = response.text().ok_or(ApiError::EmptyResponse)?;
        Ok(AnalysisResult {
            text,
            sources: response.sources(),
        })
    }

    async fn fetch_economic_calendar(&self) -> Result<Vec<EconomicEvent>, ApiError> {
        tracing::info!("Requesting economic calendar.");
        let text = self
            .generate_text(&prompts::economic_calendar(Utc::now().date_naive()))
            .await?;
        parsing::parse_calendar(&text)
    }

    async fn fetch_current_price(&self, instrument: &str) -> Result<f64, ApiError> {
        tracing::info!(instrument, "Requesting current price.");
        let text = self.generate_text(&prompts::current_price(instrument)).await?;
        parsing::parse_price(&text)
    }
}
