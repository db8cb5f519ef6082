use crate::enums::{AccountType, Impact, Side, TradeOutcome};
use crate::error::CoreError;
use serde::{Deserialize, Deserializer, Serialize};

/// A trading account that trades are journaled against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    pub initial_balance: f64,
    pub account_type: AccountType,
}

/// The user-supplied fields of an account, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub name: String,
    pub initial_balance: f64,
    #[serde(default)]
    pub account_type: AccountType,
}

impl NewAccount {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "name".to_string(),
                "account name must not be empty".to_string(),
            ));
        }
        if !self.initial_balance.is_finite() || self.initial_balance <= 0.0 {
            return Err(CoreError::InvalidInput(
                "initialBalance".to_string(),
                format!("must be greater than zero, got {}", self.initial_balance),
            ));
        }
        Ok(())
    }

    pub fn into_account(self, id: String) -> Account {
        Account {
            id,
            name: self.name.trim().to_string(),
            initial_balance: self.initial_balance,
            account_type: self.account_type,
        }
    }
}

/// A saved journal entry. Trades are only ever replaced wholesale, never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: String,
    pub account_id: String,
    #[serde(alias = "pair")]
    pub instrument: String,
    pub position: Side,
    pub lot_size: f64,
    pub entry_price: f64,
    pub exit_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    /// Signed profit or loss in account currency (USD).
    pub pnl: f64,
    pub outcome: TradeOutcome,
    pub trade_date: String,
    #[serde(default)]
    pub strategy: String,
    #[serde(default)]
    pub notes: String,
    /// Base64 data URL of an attached chart image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
}

/// The fields of the trade-entry form. The P/L and exit price are derived from
/// these when the draft is committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TradeDraft {
    #[serde(alias = "pair")]
    pub instrument: String,
    pub position: Side,
    pub lot_size: f64,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub outcome: Option<TradeOutcome>,
    pub trade_date: String,
    pub strategy: String,
    pub notes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
}

impl Default for TradeDraft {
    fn default() -> Self {
        Self {
            instrument: String::new(),
            position: Side::Long,
            lot_size: 0.01,
            entry_price: 0.0,
            stop_loss: 0.0,
            take_profit: 0.0,
            outcome: None,
            trade_date: String::new(),
            strategy: String::new(),
            notes: String::new(),
            screenshot: None,
        }
    }
}

impl TradeDraft {
    /// Loads a saved trade back into the form for editing.
    pub fn from_trade(trade: &Trade) -> Self {
        Self {
            instrument: trade.instrument.clone(),
            position: trade.position,
            lot_size: trade.lot_size,
            entry_price: trade.entry_price,
            stop_loss: trade.stop_loss,
            take_profit: trade.take_profit,
            outcome: Some(trade.outcome),
            trade_date: trade.trade_date.clone(),
            strategy: trade.strategy.clone(),
            notes: trade.notes.clone(),
            screenshot: trade.screenshot.clone(),
        }
    }
}

/// A source cited by the analysis service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSource {
    pub uri: String,
    pub title: String,
}

/// Commentary on a single trade, with the web pages it was grounded on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub text: String,
    pub sources: Vec<WebSource>,
}

/// One entry of the day's economic calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicEvent {
    pub time: String,
    pub currency: String,
    pub impact: Impact,
    pub event: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub actual: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub forecast: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub previous: Option<String>,
}

/// Calendar figures come back as strings ("3.2%"), bare numbers or null.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Figure {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match Option::<Figure>::deserialize(deserializer)? {
        Some(Figure::Text(s)) => Some(s),
        Some(Figure::Integer(n)) => Some(n.to_string()),
        Some(Figure::Float(n)) => Some(n.to_string()),
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_account(name: &str, balance: f64) -> NewAccount {
        NewAccount {
            name: name.to_string(),
            initial_balance: balance,
            account_type: AccountType::Funded,
        }
    }

    #[test]
    fn new_account_requires_name_and_positive_balance() {
        assert!(new_account("FTMO Challenge", 10_000.0).validate().is_ok());
        assert!(new_account("   ", 10_000.0).validate().is_err());
        assert!(new_account("Main", 0.0).validate().is_err());
        assert!(new_account("Main", -5.0).validate().is_err());
        assert!(new_account("Main", f64::NAN).validate().is_err());
    }

    #[test]
    fn into_account_trims_name() {
        let account = new_account("  Main  ", 500.0).into_account("a1".to_string());
        assert_eq!(account.name, "Main");
        assert_eq!(account.id, "a1");
        assert_eq!(account.account_type, AccountType::Funded);
    }

    #[test]
    fn trade_loads_legacy_browser_record() {
        let json = r#"{
            "id": "2024-05-01T10:00:00.000Z",
            "accountId": "acc",
            "pair": "EUR/USD",
            "position": "Long",
            "lotSize": 1,
            "entryPrice": 1.1,
            "exitPrice": 1.105,
            "stopLoss": 1.095,
            "takeProfit": 1.105,
            "pnl": 500,
            "outcome": "Win",
            "tradeDate": "2024-05-01",
            "strategy": "Breakout",
            "notes": ""
        }"#;
        let trade: Trade = serde_json::from_str(json).unwrap();
        assert_eq!(trade.instrument, "EUR/USD");
        assert_eq!(trade.account_id, "acc");
        assert_eq!(trade.screenshot, None);

        let written = serde_json::to_value(&trade).unwrap();
        assert_eq!(written["instrument"], "EUR/USD");
        assert_eq!(written["lotSize"], 1.0);
        assert!(written.get("screenshot").is_none());
    }

    #[test]
    fn draft_fills_missing_fields_with_form_defaults() {
        let draft: TradeDraft = serde_json::from_str(r#"{"instrument": "US30"}"#).unwrap();
        assert_eq!(draft.lot_size, 0.01);
        assert_eq!(draft.position, Side::Long);
        assert_eq!(draft.outcome, None);
    }

    #[test]
    fn economic_event_accepts_numeric_figures() {
        let json = r#"{
            "time": "12:30",
            "currency": "USD",
            "impact": "High",
            "event": "Non-Farm Payrolls",
            "actual": null,
            "forecast": 180,
            "previous": "175K"
        }"#;
        let event: EconomicEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.actual, None);
        assert_eq!(event.forecast.as_deref(), Some("180"));
        assert_eq!(event.previous.as_deref(), Some("175K"));
    }
}
