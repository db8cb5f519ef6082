use crate::{AppState, error::AppError};
use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use configuration::AuthSettings;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

const INVALID_CREDENTIALS: &str = "Invalid username or password.";

/// Open sessions kept at once. Logging in past this closes the oldest session.
pub const MAX_SESSIONS: usize = 32;

/// Decides whether a username/password pair may open a session.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// A single fixed credential pair, taken from the `[auth]` settings.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    username: String,
    password: String,
}

impl StaticCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn from_settings(settings: &AuthSettings) -> Self {
        Self::new(settings.username.clone(), settings.password.clone())
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        username == self.username && password == self.password
    }
}

/// Bearer tokens of the sessions opened since the server started, oldest first.
#[derive(Debug, Default)]
pub struct SessionStore {
    tokens: RwLock<VecDeque<String>>,
}

impl SessionStore {
    pub async fn issue(&self) -> String {
        let token = Uuid::new_v4().to_string();
        let mut tokens = self.tokens.write().await;
        if tokens.len() >= MAX_SESSIONS {
            tokens.pop_front();
            tracing::debug!("Session limit reached, closed the oldest session.");
        }
        tokens.push_back(token.clone());
        token
    }

    pub async fn contains(&self, token: &str) -> bool {
        self.tokens.read().await.iter().any(|t| t == token)
    }

    pub async fn revoke(&self, token: &str) -> bool {
        let mut tokens = self.tokens.write().await;
        match tokens.iter().position(|t| t == token) {
            Some(index) => tokens.remove(index).is_some(),
            None => false,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// # POST /api/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if !state.verifier.verify(&request.username, &request.password) {
        tracing::warn!(username = %request.username, "Rejected login attempt.");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }
    let token = state.sessions.issue().await;
    tracing::info!(username = %request.username, "Session opened.");
    Ok(Json(LoginResponse { token }))
}

/// # POST /api/logout
pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> StatusCode {
    if let Some(token) = bearer_token(&headers) {
        state.sessions.revoke(token).await;
    }
    StatusCode::NO_CONTENT
}

/// Rejects requests that do not carry the token of an open session.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let authorized = match bearer_token(request.headers()) {
        Some(token) => state.sessions.contains(token).await,
        None => false,
    };
    if !authorized {
        return Err(AppError::Unauthorized(
            "Please log in to access the journal.".to_string(),
        ));
    }
    Ok(next.run(request).await)
}
