use crate::models::ListingRecord;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tuning knobs for a scrape run.
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    /// Per-request timeout for page fetches.
    pub timeout: Duration,
    /// Bounded retries for transient fetch failures, on top of the first
    /// attempt. Retries only add latency; they never change output shape.
    pub retries: u32,
    /// Linear backoff unit between retry attempts.
    pub retry_backoff: Duration,
    /// Polite delay between consecutive page fetches.
    pub page_delay: Duration,
    /// Opt-in early termination: stop after this many consecutive pages
    /// yield zero records. `None` (the default) fetches the full requested
    /// range even past the last real listing, matching site behavior where
    /// out-of-range pages simply render without listing cards.
    pub stop_after_empty_pages: Option<u32>,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(20),
            retries: 2,
            retry_backoff: Duration::from_millis(500),
            page_delay: Duration::from_millis(300),
            stop_after_empty_pages: None,
        }
    }
}

/// Progress event emitted before each page fetch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Progress {
    /// 1-based index of the page about to be fetched.
    pub page: u32,
    /// Total pages requested for this run.
    pub total: u32,
}

/// Result of processing a single page.
#[derive(Debug, Clone, Default)]
pub struct PageOutcome {
    /// Successfully extracted records, in block order.
    pub records: Vec<ListingRecord>,
    /// Blocks that failed extraction; surfaced for observability only.
    pub failed_blocks: usize,
}

/// Result of a whole scrape run.
#[derive(Debug, Clone)]
pub struct ScrapeReport {
    /// Deduplicated records, first occurrence position preserved.
    pub records: Vec<ListingRecord>,
    /// Pages actually fetched (may be less than requested on cancellation
    /// or when an early-stop policy is enabled).
    pub pages_fetched: u32,
    /// Pages that failed to fetch after retries, treated as zero-record.
    pub failed_pages: Vec<u32>,
    /// Total listing blocks dropped due to extraction failures.
    pub failed_blocks: usize,
    /// True when the run was cut short by the cancellation token.
    pub cancelled: bool,
}
