use crate::crawler::{Coordinator, CrawlJob, EmailScrapeResponse, FetchPolicy};
use crate::server::{ApiError, AppState};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

const INVALID_URL_MESSAGE: &str = "Please provide a valid URL";

/// Body of `POST /api/email-scraper`
#[derive(Debug, Deserialize)]
pub struct EmailScrapeRequest {
    #[serde(default)]
    pub url: Option<String>,
}

/// Crawls the requested site and returns every email address found
///
/// A missing, blank or non-string `url` is rejected up front. Anything that
/// goes wrong inside the crawl comes back as a single error message with no
/// partial results.
pub async fn scrape_emails(
    State(state): State<AppState>,
    payload: Result<Json<EmailScrapeRequest>, JsonRejection>,
) -> Result<Json<EmailScrapeResponse>, ApiError> {
    let url = match payload {
        Ok(Json(EmailScrapeRequest { url: Some(url) })) if !url.trim().is_empty() => url,
        Ok(_) => {
            tracing::debug!("Missing or blank URL in email scrape request");
            return Err(ApiError::BadRequest(INVALID_URL_MESSAGE.to_string()));
        }
        Err(rejection) => {
            tracing::debug!("Rejected email scrape request body: {}", rejection);
            return Err(ApiError::BadRequest(INVALID_URL_MESSAGE.to_string()));
        }
    };

    let url = url.trim();
    tracing::info!("Starting email crawl for: {}", url);

    let job = CrawlJob::new(url, &state.config.crawler)?;
    let outcome = Coordinator::new(
        job,
        state.client.clone(),
        FetchPolicy::from_config(&state.config.crawler),
    )
    .with_cancellation(state.shutdown.child_token())
    .run()
    .await?;

    tracing::info!("Crawl result: {} email(s) found", outcome.emails.len());
    Ok(Json(outcome.into()))
}

/// Liveness probe
pub async fn health() -> &'static str {
    "ok"
}
