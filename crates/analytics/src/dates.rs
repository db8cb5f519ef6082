use chrono::{DateTime, NaiveDate, NaiveDateTime};
use core_types::Trade;

/// Parses the trade date formats the journal accepts: a plain date
/// (`2024-05-01`), a local date-time (`2024-05-01T14:30[:00]`) or RFC 3339.
pub fn parse_trade_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.naive_utc());
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

/// Orders trades for the history table: most recent first, undated entries last.
pub fn newest_first(trades: &[Trade]) -> Vec<&Trade> {
    let mut ordered: Vec<(&Trade, Option<NaiveDateTime>)> = trades
        .iter()
        .map(|trade| (trade, parse_trade_date(&trade.trade_date)))
        .collect();
    // None sorts below Some, so reversing the comparison puts undated trades last.
    ordered.sort_by(|a, b| b.1.cmp(&a.1));
    ordered.into_iter().map(|(trade, _)| trade).collect()
}
