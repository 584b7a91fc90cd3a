//! Connect-token proxy and webhook forwarder
//!
//! The small backend behind the registration page. It keeps the Pluggy
//! client credentials server-side: the page asks this service for a
//! connect token, and Pluggy posts webhook events here to be fanned out
//! to the automation endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

const DEFAULT_PLUGGY_BASE_URL: &str = "https://api.pluggy.ai";
const DEFAULT_PORT: u16 = 3000;

/// Server configuration, read from the environment.
#[derive(Clone)]
pub struct ServiceConfig {
    pub port: u16,
    pub pluggy_base_url: Url,
    /// Credentials may be absent at startup; the token route then answers
    /// with a configuration error instead of refusing to boot.
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub webhook_forward_url: Option<Url>,
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("port", &self.port)
            .field("pluggy_base_url", &self.pluggy_base_url)
            .field("client_id", &self.client_id.as_deref().map(|_| "[REDACTED]"))
            .field(
                "client_secret",
                &self.client_secret.as_deref().map(|_| "[REDACTED]"),
            )
            .field("webhook_forward_url", &self.webhook_forward_url)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL in {0}: {1}")]
    InvalidUrl(&'static str, url::ParseError),
}

impl ServiceConfig {
    /// Read configuration from the environment.
    ///
    /// Variables: `PORT` (default 3000), `PLUGGY_BASE_URL` (default
    /// `https://api.pluggy.ai`), `PLUGGY_CLIENT_ID`,
    /// `PLUGGY_CLIENT_SECRET`, `WEBHOOK_FORWARD_URL` (optional).
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let base_raw = std::env::var("PLUGGY_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_PLUGGY_BASE_URL.to_string());
        let pluggy_base_url =
            Url::parse(&base_raw).map_err(|e| ConfigError::InvalidUrl("PLUGGY_BASE_URL", e))?;

        let webhook_forward_url = match std::env::var("WEBHOOK_FORWARD_URL") {
            Ok(raw) => Some(
                Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl("WEBHOOK_FORWARD_URL", e))?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            port,
            pluggy_base_url,
            client_id: std::env::var("PLUGGY_CLIENT_ID").ok(),
            client_secret: std::env::var("PLUGGY_CLIENT_SECRET").ok(),
            webhook_forward_url,
        })
    }
}

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    http: reqwest::Client,
    config: Arc<ServiceConfig>,
}

impl AppState {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config: Arc::new(config),
        }
    }
}

/// Build the service router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/get-connect-token",
            get(get_connect_token).post(get_connect_token),
        )
        .route("/webhook", post(receive_webhook))
        .with_state(state)
}

#[derive(Debug, Error)]
enum ServiceError {
    #[error("Pluggy credentials are not configured")]
    MissingCredentials,
    #[error("Pluggy authentication failed with status {0}")]
    UpstreamAuth(u16),
    #[error("connect token creation failed with status {0}")]
    UpstreamToken(u16),
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        // Client-facing messages stay generic; detail goes to the log only
        tracing::error!(error = %self, "connect-token request failed");
        let (status, message) = match &self {
            Self::MissingCredentials => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server configuration error.",
            ),
            Self::UpstreamAuth(status) => (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                "Failed to authenticate with service provider.",
            ),
            Self::UpstreamToken(status) => (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                "Failed to create connect token.",
            ),
            Self::Upstream(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal server error occurred.",
            ),
        };
        (status, Json(ErrorBody { error: message.to_string() })).into_response()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    api_key: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenUpstreamResponse {
    access_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConnectTokenResponse {
    connect_token: String,
}

/// Exchange the server-side credentials for a Pluggy connect token.
async fn get_connect_token(
    State(state): State<AppState>,
) -> Result<Json<ConnectTokenResponse>, ServiceError> {
    let (client_id, client_secret) = match (
        state.config.client_id.as_deref(),
        state.config.client_secret.as_deref(),
    ) {
        (Some(id), Some(secret)) => (id, secret),
        _ => return Err(ServiceError::MissingCredentials),
    };

    let base = state.config.pluggy_base_url.as_str().trim_end_matches('/');

    // 1. Authenticate to obtain an API key
    let auth_response = state
        .http
        .post(format!("{base}/auth"))
        .json(&AuthRequest { client_id, client_secret })
        .send()
        .await?;

    if !auth_response.status().is_success() {
        return Err(ServiceError::UpstreamAuth(auth_response.status().as_u16()));
    }
    let AuthResponse { api_key } = auth_response.json().await?;

    // 2. Create the connect token with the API key
    let token_response = state
        .http
        .post(format!("{base}/connect_token"))
        .header("X-API-KEY", api_key)
        .send()
        .await?;

    if !token_response.status().is_success() {
        return Err(ServiceError::UpstreamToken(
            token_response.status().as_u16(),
        ));
    }
    let TokenUpstreamResponse { access_token } = token_response.json().await?;

    tracing::info!("connect token issued");
    Ok(Json(ConnectTokenResponse { connect_token: access_token }))
}

/// Accept a webhook event and forward it to the automation endpoint.
/// Forward failures are logged, never surfaced — the sender always gets
/// an acknowledgment.
async fn receive_webhook(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> (StatusCode, &'static str) {
    let event_id = uuid::Uuid::new_v4();
    tracing::info!(%event_id, payload = %payload, "webhook event received");

    if let Some(forward_url) = &state.config.webhook_forward_url {
        match state
            .http
            .post(forward_url.clone())
            .json(&payload)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                tracing::info!(%event_id, "webhook forwarded");
            }
            Ok(response) => {
                tracing::error!(%event_id, status = %response.status(), "webhook forward failed");
            }
            Err(error) => {
                tracing::error!(%event_id, %error, "webhook forward failed");
            }
        }
    }

    (StatusCode::OK, "Webhook received")
}
