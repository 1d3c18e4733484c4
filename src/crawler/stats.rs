//! Per-crawl counters
//!
//! Each worker keeps its own `CrawlStats` and the coordinator merges them
//! once the pool has drained, so no counter is shared between workers.

use std::fmt;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// URLs claimed from the frontier (marked visited)
    pub pages_claimed: usize,

    /// Claimed URLs skipped because of a binary extension
    pub binary_skipped: usize,

    /// Claimed URLs abandoned after every fetch attempt failed
    pub fetch_failures: usize,

    /// Fetched URLs whose Content-Type was not HTML
    pub non_html: usize,

    /// HTML pages that went through extraction
    pub pages_extracted: usize,

    /// In-scope links found on extracted pages
    pub links_found: usize,

    /// Links the frontier accepted
    pub links_enqueued: usize,

    /// Unique email addresses in the final result
    pub emails_found: usize,
}

impl CrawlStats {
    /// Adds another worker's counters to this one
    pub fn merge(&mut self, other: &CrawlStats) {
        self.pages_claimed += other.pages_claimed;
        self.binary_skipped += other.binary_skipped;
        self.fetch_failures += other.fetch_failures;
        self.non_html += other.non_html;
        self.pages_extracted += other.pages_extracted;
        self.links_found += other.links_found;
        self.links_enqueued += other.links_enqueued;
        self.emails_found += other.emails_found;
    }

    /// Pages that were fetched over the network, successfully or not
    pub fn pages_fetched(&self) -> usize {
        self.pages_claimed - self.binary_skipped
    }
}

impl fmt::Display for CrawlStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Crawl Statistics ===")?;
        writeln!(f, "  Pages visited: {}", self.pages_claimed)?;
        writeln!(f, "  Binary files skipped: {}", self.binary_skipped)?;
        writeln!(f, "  Fetch failures: {}", self.fetch_failures)?;
        writeln!(f, "  Non-HTML responses: {}", self.non_html)?;
        writeln!(f, "  Pages extracted: {}", self.pages_extracted)?;
        writeln!(
            f,
            "  Links found / enqueued: {} / {}",
            self.links_found, self.links_enqueued
        )?;
        write!(f, "  Emails found: {}", self.emails_found)
    }
}
