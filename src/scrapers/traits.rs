use crate::models::ListingCategory;
use crate::scrapers::error::FetchError;
use crate::scrapers::types::Progress;
use async_trait::async_trait;

/// Source of raw listing-page bodies. The production implementation talks
/// HTTP; tests swap in a canned source.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the raw body of the given 1-based page index for a category.
    async fn fetch_page(&self, category: ListingCategory, page: u32) -> Result<String, FetchError>;
}

/// Observer for incremental scrape feedback (a UI progress bar, a log
/// line). Purely informational; the orchestrator never waits on it.
pub trait ProgressObserver: Send + Sync {
    fn on_page(&self, progress: Progress);
}

/// Observer that discards everything.
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_page(&self, _progress: Progress) {}
}
