//! HTTP surface of the harvester
//!
//! Exposes the crawler as `POST /api/email-scraper`, answering either
//! `{ "emails": [...] }` or `{ "error": "..." }`.

mod handlers;

pub use handlers::{health, scrape_emails, EmailScrapeRequest};

use crate::config::Config;
use crate::crawler::build_http_client;
use crate::HarvestError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use reqwest::Client;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// State shared by all request handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub client: Client,
    /// Cancelled on shutdown; crawls in progress stop claiming new URLs
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Builds the state, including the one HTTP client every crawl reuses
    pub fn from_config(config: Config) -> Result<Self, HarvestError> {
        let client = build_http_client(
            &config.user_agent,
            Duration::from_millis(config.crawler.fetch_timeout_ms),
        )?;

        Ok(Self {
            config: Arc::new(config),
            client,
            shutdown: CancellationToken::new(),
        })
    }
}

/// Errors returned to API callers as `{ "error": message }`
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl From<HarvestError> for ApiError {
    fn from(err: HarvestError) -> Self {
        if err.is_client_error() {
            Self::BadRequest(err.to_string())
        } else {
            tracing::error!("Error processing request: {}", err);
            Self::Internal(err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Builds the API router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/email-scraper", post(scrape_emails))
        .with_state(state)
}

/// Binds the configured address and serves the API until `shutdown` fires
pub async fn serve(config: Config, shutdown: CancellationToken) -> Result<(), HarvestError> {
    let addr = config.server.bind_address.clone();
    let mut state = AppState::from_config(config)?;
    state.shutdown = shutdown.clone();

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
