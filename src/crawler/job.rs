use crate::config::CrawlerConfig;
use crate::url::{origin_of, parse_start_url};
use crate::HarvestError;
use url::Url;

/// One crawl invocation
///
/// Built once from the caller's start URL and the crawler limits, then
/// handed to the coordinator. Immutable for the lifetime of the crawl.
#[derive(Debug, Clone)]
pub struct CrawlJob {
    start_url: Url,
    base_origin: String,
    page_budget: usize,
    concurrency: usize,
}

impl CrawlJob {
    /// Validates the start URL and captures the crawl limits
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlJob)` - The start URL is an absolute http(s) URL
    /// * `Err(HarvestError)` - The start URL is blank or invalid, or a limit is zero
    pub fn new(start_url: &str, config: &CrawlerConfig) -> Result<Self, HarvestError> {
        if start_url.trim().is_empty() {
            return Err(HarvestError::InvalidInput(
                "Please provide a valid URL".to_string(),
            ));
        }

        let start_url = parse_start_url(start_url)?;
        let base_origin = origin_of(&start_url);

        if config.page_budget == 0 {
            return Err(HarvestError::InvalidInput(
                "page budget must be at least 1".to_string(),
            ));
        }

        if config.concurrency == 0 {
            return Err(HarvestError::InvalidInput(
                "concurrency must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            start_url,
            base_origin,
            page_budget: config.page_budget,
            concurrency: config.concurrency,
        })
    }

    pub fn start_url(&self) -> &Url {
        &self.start_url
    }

    /// Serialized origin every followed link must start with
    pub fn base_origin(&self) -> &str {
        &self.base_origin
    }

    pub fn page_budget(&self) -> usize {
        self.page_budget
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }
}
