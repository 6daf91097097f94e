//! Pagination orchestrator: drives the page processor across a page-index
//! range, accumulates records in page order and deduplicates once at the
//! end of the run.
//!
//! Pages are fetched strictly sequentially. The target site's ranking is
//! encoded in page order and progress events promise monotonic `page/total`
//! advancement, so there is nothing to gain from racing the fetches.

use crate::models::{ListingCategory, ListingRecord};
use crate::scrapers::error::{ConfigError, FetchError};
use crate::scrapers::extract;
use crate::scrapers::fetcher::HttpPageFetcher;
use crate::scrapers::traits::{PageSource, ProgressObserver};
use crate::scrapers::types::{Progress, ScrapeOptions, ScrapeReport};
use anyhow::Result;
use std::collections::HashSet;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Scraper for dakar-auto.com listing categories, generic over the page
/// source so tests can run against canned bodies.
pub struct DakarAutoScraper<F: PageSource> {
    source: F,
    options: ScrapeOptions,
}

impl DakarAutoScraper<HttpPageFetcher> {
    /// Production scraper backed by an HTTP fetcher.
    pub fn new(options: ScrapeOptions) -> Result<Self> {
        let source = HttpPageFetcher::new(options.timeout)?;
        Ok(Self { source, options })
    }
}

impl<F: PageSource> DakarAutoScraper<F> {
    pub fn with_source(source: F, options: ScrapeOptions) -> Self {
        Self { source, options }
    }

    /// Scrape pages `1..=pages` of a category and return the deduplicated
    /// record set.
    ///
    /// A page that fails to fetch (after bounded retries) or fails to
    /// parse degrades to zero records and the run continues; only an
    /// invalid page range aborts, and it does so before the first fetch.
    /// Cancellation is honored between pages and returns the partial
    /// deduplicated set gathered so far.
    pub async fn scrape(
        &self,
        category: ListingCategory,
        pages: u32,
        observer: &dyn ProgressObserver,
        cancel: &CancellationToken,
    ) -> Result<ScrapeReport, ConfigError> {
        if pages == 0 {
            return Err(ConfigError::InvalidPageRange { pages });
        }

        let mut accumulator: Vec<ListingRecord> = Vec::new();
        let mut failed_pages: Vec<u32> = Vec::new();
        let mut failed_blocks = 0usize;
        let mut pages_fetched = 0u32;
        let mut empty_streak = 0u32;
        let mut cancelled = false;

        for page in 1..=pages {
            if cancel.is_cancelled() {
                warn!(page, "Scrape cancelled; returning partial results");
                cancelled = true;
                break;
            }

            observer.on_page(Progress { page, total: pages });

            match self.fetch_with_retry(category, page).await {
                Ok(body) => {
                    pages_fetched += 1;
                    let outcome = extract::process_page(&body, category);
                    info!(
                        page,
                        records = outcome.records.len(),
                        failed_blocks = outcome.failed_blocks,
                        "Processed {} page",
                        category
                    );

                    if outcome.records.is_empty() {
                        empty_streak += 1;
                    } else {
                        empty_streak = 0;
                    }
                    failed_blocks += outcome.failed_blocks;
                    accumulator.extend(outcome.records);
                }
                Err(e) => {
                    pages_fetched += 1;
                    warn!(page, error = %e, "Page fetch failed; treating as empty");
                    failed_pages.push(page);
                    empty_streak += 1;
                }
            }

            if let Some(limit) = self.options.stop_after_empty_pages {
                if empty_streak >= limit {
                    info!(page, empty_streak, "Stopping early after consecutive empty pages");
                    break;
                }
            }

            if page < pages && !self.options.page_delay.is_zero() {
                sleep(self.options.page_delay).await;
            }
        }

        let total = accumulator.len();
        let records = dedup(accumulator);
        if records.len() < total {
            info!(
                kept = records.len(),
                dropped = total - records.len(),
                "Removed duplicate listings"
            );
        }

        Ok(ScrapeReport {
            records,
            pages_fetched,
            failed_pages,
            failed_blocks,
            cancelled,
        })
    }

    async fn fetch_with_retry(
        &self,
        category: ListingCategory,
        page: u32,
    ) -> Result<String, FetchError> {
        let mut attempt = 0u32;
        loop {
            match self.source.fetch_page(category, page).await {
                Ok(body) => return Ok(body),
                Err(e) if attempt < self.options.retries => {
                    attempt += 1;
                    debug!(page, attempt, error = %e, "Retrying page fetch");
                    sleep(self.options.retry_backoff * attempt).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Exact full-record deduplication, first occurrence wins. Idempotent:
/// running it on an already-deduplicated sequence is the identity.
pub fn dedup(records: Vec<ListingRecord>) -> Vec<ListingRecord> {
    let mut seen: HashSet<ListingRecord> = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| seen.insert(record.clone()))
        .collect()
}
