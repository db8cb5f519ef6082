use crate::{
    AppState,
    error::{ANALYSIS_FAILED, AppError, CALENDAR_FAILED, PRICE_FAILED},
};
use analytics::{AccountReport, PnlPreview};
use api_client::MarketAnalyst;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use core_types::{
    Account, AnalysisResult, EconomicEvent, INSTRUMENT_GROUPS, InstrumentGroup, NewAccount, Trade,
    TradeDraft,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetActiveAccount {
    pub account_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveAccount {
    pub account: Option<Account>,
    pub current_balance: f64,
}

#[derive(Debug, Deserialize)]
pub struct PriceQuery {
    #[serde(default)]
    pub instrument: String,
}

#[derive(Debug, Serialize)]
pub struct PriceQuote {
    pub instrument: String,
    pub price: f64,
}

fn analyst(state: &AppState) -> Result<Arc<dyn MarketAnalyst>, AppError> {
    state.analyst.clone().ok_or(AppError::AnalystUnavailable)
}

/// # GET /api/instruments
pub async fn list_instruments() -> Json<&'static [InstrumentGroup]> {
    Json(INSTRUMENT_GROUPS)
}

/// # GET /api/accounts
pub async fn list_accounts(State(state): State<Arc<AppState>>) -> Json<Vec<Account>> {
    let repo = state.repo.lock().await;
    Json(repo.accounts().to_vec())
}

/// # POST /api/accounts
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    Json(new_account): Json<NewAccount>,
) -> Result<(StatusCode, Json<Account>), AppError> {
    let account = state.repo.lock().await.add_account(new_account)?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// # GET /api/accounts/active
pub async fn get_active_account(State(state): State<Arc<AppState>>) -> Json<ActiveAccount> {
    let repo = state.repo.lock().await;
    Json(ActiveAccount {
        account: repo.active_account().cloned(),
        current_balance: repo.current_balance(),
    })
}

/// # PUT /api/accounts/active
pub async fn set_active_account(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SetActiveAccount>,
) -> Result<Json<Account>, AppError> {
    let mut repo = state.repo.lock().await;
    let account = repo.set_active_account(&request.account_id)?.clone();
    Ok(Json(account))
}

/// # GET /api/dashboard
/// Summary cards and equity curve of the active account.
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AccountReport>, AppError> {
    let report = state.repo.lock().await.active_report()?;
    Ok(Json(report))
}

/// # GET /api/trades
/// Trades of the active account, newest first.
pub async fn list_trades(State(state): State<Arc<AppState>>) -> Json<Vec<Trade>> {
    let trades = state.repo.lock().await.active_trades();
    Json(analytics::newest_first(&trades).into_iter().cloned().collect())
}

/// # POST /api/trades
pub async fn create_trade(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<TradeDraft>,
) -> Result<(StatusCode, Json<Trade>), AppError> {
    let trade = state.repo.lock().await.add_trade(draft)?;
    Ok((StatusCode::CREATED, Json(trade)))
}

/// # POST /api/trades/preview
/// Live P/L figures for a trade ticket that has not been saved yet.
pub async fn preview_trade(Json(draft): Json<TradeDraft>) -> Json<PnlPreview> {
    Json(analytics::preview(&draft))
}

/// # GET /api/trades/:trade_id
pub async fn get_trade(
    Path(trade_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Trade>, AppError> {
    let repo = state.repo.lock().await;
    repo.trade(&trade_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Trade '{trade_id}' does not exist.")))
}

/// # PUT /api/trades/:trade_id
pub async fn update_trade(
    Path(trade_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(draft): Json<TradeDraft>,
) -> Result<Json<Trade>, AppError> {
    let trade = state.repo.lock().await.update_trade(&trade_id, draft)?;
    Ok(Json(trade))
}

/// # DELETE /api/trades/:trade_id
pub async fn delete_trade(
    Path(trade_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, AppError> {
    state.repo.lock().await.delete_trade(&trade_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// # POST /api/trades/:trade_id/analysis
pub async fn analyze_trade(
    Path(trade_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<AnalysisResult>, AppError> {
    let analyst = analyst(&state)?;
    // The lock is released before the slow call.
    let trade = state
        .repo
        .lock()
        .await
        .trade(&trade_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Trade '{trade_id}' does not exist.")))?;

    let analysis = analyst
        .analyze_trade(&trade)
        .await
        .map_err(AppError::analyst(ANALYSIS_FAILED))?;
    Ok(Json(analysis))
}

/// # GET /api/calendar
pub async fn get_calendar(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<EconomicEvent>>, AppError> {
    let events = analyst(&state)?
        .fetch_economic_calendar()
        .await
        .map_err(AppError::analyst(CALENDAR_FAILED))?;
    Ok(Json(events))
}

/// # GET /api/price?instrument=
pub async fn get_price(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PriceQuery>,
) -> Result<Json<PriceQuote>, AppError> {
    let instrument = query.instrument.trim();
    if instrument.is_empty() {
        return Err(AppError::BadRequest(
            "Please select an instrument first.".to_string(),
        ));
    }
    let price = analyst(&state)?
        .fetch_current_price(instrument)
        .await
        .map_err(AppError::analyst(PRICE_FAILED))?;
    Ok(Json(PriceQuote {
        instrument: instrument.to_string(),
        price,
    }))
}
