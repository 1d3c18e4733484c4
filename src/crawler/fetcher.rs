//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the crawler's user agent and timeout
//! - GET requests with bounded retry
//! - Error classification

use crate::config::{CrawlerConfig, UserAgentConfig};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Why a single fetch attempt failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("request failed: {0}")]
    Request(String),
}

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchOutcome {
    /// Successfully fetched the resource
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value, empty if the header was missing
        content_type: String,
        /// Response body
        body: String,
    },

    /// Every attempt failed
    Failure {
        /// The error of the last attempt
        error: FetchError,
        /// Number of attempts made
        attempts: u32,
    },
}

impl FetchOutcome {
    /// Returns true if the fetch succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Retry behaviour for `fetch_url`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Attempts made after the first one fails
    pub max_retries: u32,

    /// Delay before retry `n` is `retry_backoff * n`
    pub retry_backoff: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            retry_backoff: Duration::ZERO,
        }
    }
}

impl FetchPolicy {
    /// Builds the policy from crawler configuration
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            max_retries: config.fetch_retries,
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// The timeout applies to each request as a whole, so a single attempt that
/// does not complete in time counts as a failed attempt.
///
/// # Example
///
/// ```no_run
/// use jobscript_harvester::config::UserAgentConfig;
/// use jobscript_harvester::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(15)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL, retrying failed attempts
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | 2xx | Return `Success` |
/// | Non-2xx status | Retry |
/// | Timeout | Retry |
/// | Connection error | Retry |
/// | Body read error | Retry |
///
/// At most `1 + policy.max_retries` attempts are made; after the last one a
/// `Failure` carrying that attempt's error is returned. Nothing here
/// panics or propagates: the caller decides what a failure means.
pub async fn fetch_url(client: &Client, url: &str, policy: &FetchPolicy) -> FetchOutcome {
    let mut attempt: u32 = 1;

    loop {
        match fetch_once(client, url).await {
            Ok(outcome) => return outcome,
            Err(error) if attempt > policy.max_retries => {
                return FetchOutcome::Failure {
                    error,
                    attempts: attempt,
                };
            }
            Err(error) => {
                tracing::trace!(
                    "Retrying {} ({}/{}) after: {}",
                    url,
                    attempt,
                    policy.max_retries,
                    error
                );

                if !policy.retry_backoff.is_zero() {
                    tokio::time::sleep(policy.retry_backoff * attempt).await;
                }

                attempt += 1;
            }
        }
    }
}

/// Performs a single GET attempt
async fn fetch_once(client: &Client, url: &str) -> Result<FetchOutcome, FetchError> {
    let response = client.get(url).send().await.map_err(classify_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let body = response.text().await.map_err(|e| {
        if e.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Body(e.to_string())
        }
    })?;

    Ok(FetchOutcome::Success {
        final_url,
        status_code: status.as_u16(),
        content_type,
        body,
    })
}

/// Maps a reqwest error onto the fetch error taxonomy
fn classify_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if e.is_connect() {
        FetchError::Connect(e.to_string())
    } else if let Some(status) = e.status() {
        FetchError::Status(status.as_u16())
    } else {
        FetchError::Request(e.to_string())
    }
}
