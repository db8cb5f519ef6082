//! # FX Journal Web Server Crate
//!
//! Serves the journal over a JSON HTTP API: account management, trade CRUD
//! with live P/L previews, the dashboard report and the AI-backed market
//! tools.
//!
//! ## Architectural Principles
//!
//! - **Thin handlers:** Every handler locks the repository, calls one operation
//!   and serializes the result. Calculation lives in `analytics`, persistence
//!   in `database`.
//! - **Swappable collaborators:** The market analyst and the credential check
//!   are trait objects in `AppState`, so tests run the full router against
//!   stubs and an in-memory journal.
//! - **Optional AI:** Without an API key the server still runs; the AI routes
//!   answer `503 Service Unavailable`.

use api_client::{GeminiClient, MarketAnalyst};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};
use configuration::Config;
use database::JournalRepository;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};

pub mod auth;
pub mod error;
pub mod handlers;

pub use auth::{CredentialVerifier, SessionStore, StaticCredentials};
pub use error::AppError;

/// The shared application state that all handlers can access.
pub struct AppState {
    pub repo: Mutex<JournalRepository>,
    pub analyst: Option<Arc<dyn MarketAnalyst>>,
    pub verifier: Arc<dyn CredentialVerifier>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(
        repo: JournalRepository,
        analyst: Option<Arc<dyn MarketAnalyst>>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Self {
        Self {
            repo: Mutex::new(repo),
            analyst,
            verifier,
            sessions: SessionStore::default(),
        }
    }
}

/// Builds the application router. Everything but the health check and the
/// login route requires a session token.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    let protected = Router::new()
        .route("/api/logout", post(auth::logout))
        .route("/api/instruments", get(handlers::list_instruments))
        .route(
            "/api/accounts",
            get(handlers::list_accounts).post(handlers::create_account),
        )
        .route(
            "/api/accounts/active",
            get(handlers::get_active_account).put(handlers::set_active_account),
        )
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route(
            "/api/trades",
            get(handlers::list_trades).post(handlers::create_trade),
        )
        .route("/api/trades/preview", post(handlers::preview_trade))
        .route(
            "/api/trades/:trade_id",
            get(handlers::get_trade)
                .put(handlers::update_trade)
                .delete(handlers::delete_trade),
        )
        .route("/api/trades/:trade_id/analysis", post(handlers::analyze_trade))
        .route("/api/calendar", get(handlers::get_calendar))
        .route("/api/price", get(handlers::get_price))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/login", post(auth::login))
        .merge(protected)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // Trades may carry a base64 screenshot.
        .layer(DefaultBodyLimit::max(1024 * 1024 * 50))
}

/// The main function to configure and run the web server.
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    // Tracing is initialized by the calling binary.
    let repo = database::connect(&config.storage.data_dir)?;
    let analyst = GeminiClient::new(&config.ai)?
        .map(|client| Arc::new(client) as Arc<dyn MarketAnalyst>);
    let verifier = Arc::new(StaticCredentials::from_settings(&config.auth));

    let app = router(Arc::new(AppState::new(repo, analyst, verifier)));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        data_dir = %config.storage.data_dir.display(),
        "Web server started and listening."
    );
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests;
