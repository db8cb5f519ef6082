use crate::error::ApiError;
use core_types::EconomicEvent;

/// Removes a surrounding markdown code fence (```` ```json ... ``` ````) if the
/// model wrapped its answer in one.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line.
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest.trim_start_matches("json"),
    };
    body.trim_end().trim_end_matches("```").trim()
}

pub fn parse_calendar(text: &str) -> Result<Vec<EconomicEvent>, ApiError> {
    serde_json::from_str(strip_code_fence(text)).map_err(|e| {
        ApiError::Deserialization(format!("economic calendar is not a JSON event array: {e}"))
    })
}

/// Reads a bare price such as `2,345.10`. Thousands separators are ignored.
pub fn parse_price(text: &str) -> Result<f64, ApiError> {
    let cleaned: String = strip_code_fence(text).chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.trim().trim_start_matches('$');
    match cleaned.parse::<f64>() {
        Ok(price) if price.is_finite() => Ok(price),
        _ => Err(ApiError::InvalidData(format!(
            "could not parse a price from model response '{}'",
            text.trim()
        ))),
    }
}
