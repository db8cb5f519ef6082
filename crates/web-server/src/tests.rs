use super::*;
use api_client::ApiError;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use core_types::{AnalysisResult, EconomicEvent, Impact, Trade, WebSource};
use database::MemoryBackend;
use serde_json::{Value, json};
use tower::ServiceExt;

/// Answers every call with canned data, or fails every call.
struct StubAnalyst {
    fail: bool,
}

#[async_trait]
impl MarketAnalyst for StubAnalyst {
    async fn analyze_trade(&self, trade: &Trade) -> Result<AnalysisResult, ApiError> {
        if self.fail {
            return Err(ApiError::EmptyResponse);
        }
        Ok(AnalysisResult {
            text: format!("{} moved on the ECB decision.", trade.instrument),
            sources: vec![WebSource {
                uri: "https://example.com/ecb".to_string(),
                title: "ECB".to_string(),
            }],
        })
    }

    async fn fetch_economic_calendar(&self) -> Result<Vec<EconomicEvent>, ApiError> {
        if self.fail {
            return Err(ApiError::Deserialization("not json".to_string()));
        }
        Ok(vec![EconomicEvent {
            time: "12:30".to_string(),
            currency: "USD".to_string(),
            impact: Impact::High,
            event: "CPI m/m".to_string(),
            actual: None,
            forecast: Some("0.3%".to_string()),
            previous: Some("0.4%".to_string()),
        }])
    }

    async fn fetch_current_price(&self, _instrument: &str) -> Result<f64, ApiError> {
        if self.fail {
            return Err(ApiError::InvalidData("about 1.08".to_string()));
        }
        Ok(1.0854)
    }
}

fn app_with(analyst: Option<Arc<dyn MarketAnalyst>>) -> Router {
    let repo = JournalRepository::open(MemoryBackend::new()).unwrap();
    let verifier = Arc::new(StaticCredentials::new("FX SYNDICATE", "0000"));
    router(Arc::new(AppState::new(repo, analyst, verifier)))
}

fn app() -> Router {
    app_with(Some(Arc::new(StubAnalyst { fail: false })))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn login(app: &Router) -> String {
    let response = send(
        app,
        "POST",
        "/api/login",
        None,
        Some(json!({ "username": "FX SYNDICATE", "password": "0000" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    json_body(response).await["token"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn create_account(app: &Router, token: &str, name: &str, balance: f64) -> Value {
    let response = send(
        app,
        "POST",
        "/api/accounts",
        Some(token),
        Some(json!({ "name": name, "initialBalance": balance, "accountType": "Funded" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response).await
}

fn eur_usd_draft(outcome: &str, date: &str) -> Value {
    json!({
        "instrument": "EUR/USD",
        "position": "Long",
        "lotSize": 1.0,
        "entryPrice": 1.1,
        "stopLoss": 1.095,
        "takeProfit": 1.105,
        "outcome": outcome,
        "tradeDate": date,
        "strategy": "Breakout",
        "notes": ""
    })
}

fn approx(value: &Value, expected: f64) -> bool {
    value
        .as_f64()
        .is_some_and(|actual| (actual - expected).abs() < 1e-6)
}

#[tokio::test]
async fn health_needs_no_session() {
    let response = send(&app(), "GET", "/api/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn protected_routes_require_a_session() {
    let app = app();
    let response = send(&app, "GET", "/api/accounts", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, "GET", "/api/accounts", Some("made-up"), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_credentials_are_rejected() {
    let response = send(
        &app(),
        "POST",
        "/api/login",
        None,
        Some(json!({ "username": "FX SYNDICATE", "password": "1234" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        json_body(response).await["error"],
        "Invalid username or password."
    );
}

#[tokio::test]
async fn logout_ends_the_session() {
    let app = app();
    let token = login(&app).await;
    let response = send(&app, "POST", "/api/logout", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, "GET", "/api/accounts", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn first_account_becomes_active() {
    let app = app();
    let token = login(&app).await;
    let account = create_account(&app, &token, "Prop Challenge", 10_000.0).await;
    assert_eq!(account["accountType"], "Funded");

    let active = json_body(send(&app, "GET", "/api/accounts/active", Some(&token), None).await).await;
    assert_eq!(active["account"]["id"], account["id"]);
    assert!(approx(&active["currentBalance"], 10_000.0));
}

#[tokio::test]
async fn invalid_account_is_a_bad_request() {
    let app = app();
    let token = login(&app).await;
    let response = send(
        &app,
        "POST",
        "/api/accounts",
        Some(&token),
        Some(json!({ "name": "  ", "initialBalance": 500.0 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn switching_to_unknown_account_is_not_found() {
    let app = app();
    let token = login(&app).await;
    let response = send(
        &app,
        "PUT",
        "/api/accounts/active",
        Some(&token),
        Some(json!({ "accountId": "nope" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn trade_without_active_account_conflicts() {
    let app = app();
    let token = login(&app).await;
    let response = send(
        &app,
        "POST",
        "/api/trades",
        Some(&token),
        Some(eur_usd_draft("Win", "2024-05-01")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = send(&app, "GET", "/api/dashboard", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn trade_lifecycle_updates_the_dashboard() {
    let app = app();
    let token = login(&app).await;
    create_account(&app, &token, "Main", 10_000.0).await;

    let response = send(
        &app,
        "POST",
        "/api/trades",
        Some(&token),
        Some(eur_usd_draft("Win", "2024-05-01")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let win = json_body(response).await;
    assert!(approx(&win["pnl"], 500.0));
    assert!(approx(&win["exitPrice"], 1.105));

    let loss = json_body(
        send(
            &app,
            "POST",
            "/api/trades",
            Some(&token),
            Some(eur_usd_draft("Loss", "2024-05-03")),
        )
        .await,
    )
    .await;
    assert!(approx(&loss["pnl"], -500.0));

    let trades = json_body(send(&app, "GET", "/api/trades", Some(&token), None).await).await;
    let dates: Vec<&str> = trades
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["tradeDate"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2024-05-03", "2024-05-01"]);

    let dashboard = json_body(send(&app, "GET", "/api/dashboard", Some(&token), None).await).await;
    assert_eq!(dashboard["stats"]["totalTrades"], 2);
    assert!(approx(&dashboard["stats"]["winRate"], 50.0));
    assert!(approx(&dashboard["currentBalance"], 10_000.0));
    let curve = dashboard["equityCurve"].as_array().unwrap();
    assert_eq!(curve.len(), 3);
    assert_eq!(curve[0]["label"], "Start");
    assert!(approx(&curve[1]["balance"], 10_500.0));

    // Editing recomputes the P/L and keeps the id.
    let id = loss["id"].as_str().unwrap();
    let edited = json_body(
        send(
            &app,
            "PUT",
            &format!("/api/trades/{id}"),
            Some(&token),
            Some(eur_usd_draft("Win", "2024-05-03")),
        )
        .await,
    )
    .await;
    assert_eq!(edited["id"], loss["id"]);
    assert!(approx(&edited["pnl"], 500.0));

    let response = send(&app, "DELETE", &format!("/api/trades/{id}"), Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = send(&app, "GET", &format!("/api/trades/{id}"), Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn trade_without_outcome_is_rejected() {
    let app = app();
    let token = login(&app).await;
    create_account(&app, &token, "Main", 10_000.0).await;

    let mut draft = eur_usd_draft("Win", "2024-05-01");
    draft["outcome"] = Value::Null;
    let response = send(&app, "POST", "/api/trades", Some(&token), Some(draft)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["error"],
        "Please select a trade outcome."
    );
}

#[tokio::test]
async fn preview_reports_both_targets() {
    let app = app();
    let token = login(&app).await;
    let draft = json!({
        "instrument": "XAU/USD (Gold)",
        "position": "Short",
        "lotSize": 0.5,
        "entryPrice": 2350.0,
        "stopLoss": 2360.0,
        "takeProfit": 2330.0
    });
    let response = send(&app, "POST", "/api/trades/preview", Some(&token), Some(draft)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let preview = json_body(response).await;
    assert!(approx(&preview["potentialProfit"], 1000.0));
    assert!(approx(&preview["potentialLoss"], -500.0));
    assert!(approx(&preview["pnl"], 0.0));
}

#[tokio::test]
async fn instruments_are_grouped() {
    let app = app();
    let token = login(&app).await;
    let groups = json_body(send(&app, "GET", "/api/instruments", Some(&token), None).await).await;
    assert_eq!(groups[0]["name"], "Forex Majors");
    assert_eq!(groups[0]["instruments"][0], "EUR/USD");
}

#[tokio::test]
async fn analysis_of_saved_trade() {
    let app = app();
    let token = login(&app).await;
    create_account(&app, &token, "Main", 10_000.0).await;
    let trade = json_body(
        send(
            &app,
            "POST",
            "/api/trades",
            Some(&token),
            Some(eur_usd_draft("Win", "2024-05-01")),
        )
        .await,
    )
    .await;
    let id = trade["id"].as_str().unwrap();

    let response = send(&app, "POST", &format!("/api/trades/{id}/analysis"), Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let analysis = json_body(response).await;
    assert_eq!(analysis["text"], "EUR/USD moved on the ECB decision.");
    assert_eq!(analysis["sources"][0]["title"], "ECB");

    let response = send(&app, "POST", "/api/trades/missing/analysis", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn calendar_and_price_come_from_the_analyst() {
    let app = app();
    let token = login(&app).await;

    let events = json_body(send(&app, "GET", "/api/calendar", Some(&token), None).await).await;
    assert_eq!(events[0]["currency"], "USD");
    assert_eq!(events[0]["impact"], "High");

    let quote = json_body(
        send(&app, "GET", "/api/price?instrument=EUR%2FUSD", Some(&token), None).await,
    )
    .await;
    assert_eq!(quote["instrument"], "EUR/USD");
    assert!(approx(&quote["price"], 1.0854));

    let response = send(&app, "GET", "/api/price", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn analyst_failures_are_bad_gateway_with_retry_message() {
    let app = app_with(Some(Arc::new(StubAnalyst { fail: true })));
    let token = login(&app).await;

    let response = send(&app, "GET", "/api/calendar", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(
        json_body(response).await["error"],
        "Could not load economic calendar. Please try again later."
    );

    let response = send(&app, "GET", "/api/price?instrument=EUR/USD", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(
        json_body(response).await["error"],
        "Could not fetch the current price. Please enter it manually."
    );
}

#[tokio::test]
async fn missing_analyst_is_unavailable() {
    let app = app_with(None);
    let token = login(&app).await;
    let response = send(&app, "GET", "/api/calendar", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
