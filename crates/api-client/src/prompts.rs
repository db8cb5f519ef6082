use chrono::NaiveDate;
use core_types::{Trade, format_usd};

/// Currencies the economic calendar is restricted to.
pub const CALENDAR_CURRENCIES: &[&str] = &["USD", "EUR", "JPY", "GBP", "CHF", "CAD", "AUD", "NZD"];

pub fn trade_analysis(trade: &Trade) -> String {
    format!(
        r#"You are an expert financial analyst. Analyze the following trade based on the provided details and real-world market data from the trade date.
Use Google Search to find news, market sentiment, and major economic events that occurred around the date of the trade for the specified instrument.
Provide a concise (2-3 paragraphs) analysis covering:
1. Market Context: What were the market conditions and key drivers at the time?
2. Strategy Alignment: Was the trader's strategy suitable for the market environment?
3. Actionable Feedback: Offer constructive feedback for future trades.
Format the response as clean markdown.

Trade Details:
- Instrument: {instrument}
- Position: {position}
- Outcome: {outcome} ({pnl})
- Trade Date: {date}
- Stated Strategy: {strategy}
- Trader's Notes: "{notes}"

Provide your expert analysis based on this data and grounded in real market events."#,
        instrument = trade.instrument,
        position = trade.position,
        outcome = trade.outcome,
        pnl = format_usd(trade.pnl),
        date = trade.trade_date,
        strategy = trade.strategy,
        notes = trade.notes,
    )
}

pub fn economic_calendar(today: NaiveDate) -> String {
    format!(
        r#"Provide a list of today's ({today}) high and medium impact economic calendar events relevant to forex trading.
Include the time (in UTC), currency, impact level ('High', 'Medium', or 'Low'), event name, and the actual, forecast, and previous values.
If a value is not available, the value for that key should be null.
Focus on major currencies: {currencies}.
Return ONLY a valid JSON array of objects with the following keys: "time", "currency", "impact", "event", "actual", "forecast", "previous".
The value for "impact" must be one of 'High', 'Medium', or 'Low'.
Do not include any text or explanation outside of the JSON array."#,
        today = today.format("%Y-%m-%d"),
        currencies = CALENDAR_CURRENCIES.join(", "),
    )
}

pub fn current_price(instrument: &str) -> String {
    format!(
        "What is the current market price of {instrument}? Respond with only the numerical price, nothing else."
    )
}
