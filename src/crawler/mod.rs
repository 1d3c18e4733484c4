//! Crawler module for email harvesting
//!
//! This module contains the core crawling logic, including:
//! - The shared frontier (queue, visited set, page budget)
//! - HTTP fetching with retry logic
//! - Email and link extraction
//! - Worker pool coordination

mod coordinator;
mod fetcher;
mod frontier;
mod job;
mod parser;
mod stats;

pub use coordinator::{crawl, Coordinator, CrawlOutcome, EmailScrapeResponse};
pub use fetcher::{build_http_client, fetch_url, FetchError, FetchOutcome, FetchPolicy};
pub use frontier::{ClaimedUrl, Frontier};
pub use job::CrawlJob;
pub use parser::{extract_emails, extract_links, is_binary_file};
pub use stats::CrawlStats;
