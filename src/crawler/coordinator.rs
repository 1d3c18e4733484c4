//! Crawler coordinator - worker pool orchestration
//!
//! This module runs a fixed number of concurrent workers over one shared
//! frontier. Each worker loops:
//! - Claim the next URL (exit when nothing is left)
//! - Skip binary resources without a network call
//! - Fetch with retry; a failed URL is logged and abandoned
//! - Skip responses that are not HTML
//! - Merge the page's emails into the shared result set
//! - Offer the page's in-scope links back to the frontier

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch_url, FetchOutcome, FetchPolicy};
use crate::crawler::frontier::Frontier;
use crate::crawler::job::CrawlJob;
use crate::crawler::parser::{extract_emails, extract_links, is_binary_file};
use crate::crawler::stats::CrawlStats;
use crate::HarvestError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Result of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Unique email addresses found, sorted for stable output
    pub emails: Vec<String>,

    /// Merged worker counters
    pub stats: CrawlStats,

    /// Wall-clock duration of the crawl
    pub elapsed: Duration,
}

/// The `{ "emails": [...] }` payload returned to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailScrapeResponse {
    pub emails: Vec<String>,
}

impl From<CrawlOutcome> for EmailScrapeResponse {
    fn from(outcome: CrawlOutcome) -> Self {
        Self {
            emails: outcome.emails,
        }
    }
}

/// State shared by every worker of one crawl
struct WorkerContext {
    frontier: Frontier,
    emails: Mutex<HashSet<String>>,
    client: Client,
    policy: FetchPolicy,
    base_origin: String,
    cancel: CancellationToken,
}

impl WorkerContext {
    /// Extracts emails and links from one HTML page
    fn process_page(&self, url: &str, body: &str, stats: &mut CrawlStats) {
        let found = extract_emails(body);
        if !found.is_empty() {
            let mut emails = self.emails.lock().unwrap_or_else(PoisonError::into_inner);
            let before = emails.len();
            emails.extend(found);
            tracing::debug!("Found {} new email(s) on {}", emails.len() - before, url);
        }

        let links = extract_links(&self.base_origin, body);
        stats.links_found += links.len();

        for link in &links {
            if self.frontier.offer(link) {
                stats.links_enqueued += 1;
                tracing::trace!("Queued {}", link);
            }
        }

        stats.pages_extracted += 1;
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    job: CrawlJob,
    client: Client,
    policy: FetchPolicy,
    cancel: CancellationToken,
}

impl Coordinator {
    /// Creates a coordinator around an existing HTTP client
    ///
    /// The client carries the per-request timeout; the policy carries the
    /// retry behaviour.
    pub fn new(job: CrawlJob, client: Client, policy: FetchPolicy) -> Self {
        Self {
            job,
            client,
            policy,
            cancel: CancellationToken::new(),
        }
    }

    /// Creates a coordinator, building the HTTP client from configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(HarvestError)` - The HTTP client could not be built
    pub fn from_config(job: CrawlJob, config: &Config) -> Result<Self, HarvestError> {
        let client = build_http_client(
            &config.user_agent,
            Duration::from_millis(config.crawler.fetch_timeout_ms),
        )?;

        Ok(Self::new(
            job,
            client,
            FetchPolicy::from_config(&config.crawler),
        ))
    }

    /// Attaches a cancellation token checked by every worker before it claims
    /// its next URL
    ///
    /// Fetches already in progress run to completion; the crawl then returns
    /// whatever was found so far.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Runs the crawl to completion
    ///
    /// Per-URL failures are logged and counted, never returned. The only
    /// error is a worker task dying unexpectedly.
    pub async fn run(self) -> Result<CrawlOutcome, HarvestError> {
        let start_time = Instant::now();
        let job = self.job;

        tracing::info!(
            "Starting email crawl for {} (budget {}, {} workers)",
            job.start_url(),
            job.page_budget(),
            job.concurrency()
        );

        let ctx = Arc::new(WorkerContext {
            frontier: Frontier::new(job.start_url().as_str(), job.page_budget()),
            emails: Mutex::new(HashSet::new()),
            client: self.client,
            policy: self.policy,
            base_origin: job.base_origin().to_string(),
            cancel: self.cancel,
        });

        let mut workers = JoinSet::new();
        for worker_id in 0..job.concurrency() {
            workers.spawn(run_worker(worker_id, Arc::clone(&ctx)));
        }

        let mut stats = CrawlStats::default();
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(worker_stats) => stats.merge(&worker_stats),
                Err(e) => {
                    workers.abort_all();
                    tracing::error!("Crawl worker failed: {}", e);
                    return Err(HarvestError::Worker(e.to_string()));
                }
            }
        }

        if ctx.cancel.is_cancelled() {
            tracing::info!("Crawl cancelled, returning partial results");
        }

        let mut emails: Vec<String> = {
            let mut found = ctx.emails.lock().unwrap_or_else(PoisonError::into_inner);
            found.drain().collect()
        };
        emails.sort();
        stats.emails_found = emails.len();

        let elapsed = start_time.elapsed();
        tracing::info!(
            "Crawl complete: {} email(s) from {} page(s) in {:?} ({} fetch failure(s))",
            emails.len(),
            ctx.frontier.visited_count(),
            elapsed,
            stats.fetch_failures
        );

        Ok(CrawlOutcome {
            emails,
            stats,
            elapsed,
        })
    }
}

/// One worker loop: claim, fetch, extract, offer, until the frontier runs dry
async fn run_worker(worker_id: usize, ctx: Arc<WorkerContext>) -> CrawlStats {
    let mut stats = CrawlStats::default();

    while let Some(url) = ctx.frontier.next_url(&ctx.cancel).await {
        stats.pages_claimed += 1;
        tracing::debug!(
            "Worker {} crawling: {} ({}/{})",
            worker_id,
            url.as_str(),
            ctx.frontier.visited_count(),
            ctx.frontier.page_budget()
        );

        if is_binary_file(&url) {
            tracing::debug!("Skipping binary file: {}", url.as_str());
            stats.binary_skipped += 1;
            continue;
        }

        match fetch_url(&ctx.client, &url, &ctx.policy).await {
            FetchOutcome::Failure { error, attempts } => {
                tracing::warn!(
                    "Failed to fetch {} after {} attempt(s): {}",
                    url.as_str(),
                    attempts,
                    error
                );
                stats.fetch_failures += 1;
            }
            FetchOutcome::Success {
                content_type, body, ..
            } => {
                if !content_type.contains("text/html") {
                    tracing::debug!("Not HTML ({}): {}", content_type, url.as_str());
                    stats.non_html += 1;
                    continue;
                }

                ctx.process_page(&url, &body, &mut stats);
            }
        }
    }

    tracing::debug!("Worker {} finished", worker_id);
    stats
}

/// Runs a complete crawl from a start URL
///
/// This is the main entry point. It validates the start URL, builds the HTTP
/// client from `config`, and drives the worker pool to completion.
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - Crawl finished; `emails` may be empty
/// * `Err(HarvestError)` - The start URL was invalid or the crawl itself broke
///
/// # Example
///
/// ```no_run
/// use jobscript_harvester::config::Config;
/// use jobscript_harvester::crawler::crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let outcome = crawl("https://example.com", &Config::default()).await?;
/// println!("{:?}", outcome.emails);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(start_url: &str, config: &Config) -> Result<CrawlOutcome, HarvestError> {
    let job = CrawlJob::new(start_url, &config.crawler)?;
    Coordinator::from_config(job, config)?.run().await
}
