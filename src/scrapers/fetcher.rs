use crate::models::ListingCategory;
use crate::scrapers::error::FetchError;
use crate::scrapers::traits::PageSource;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// HTTP fetcher for dakar-auto listing pages.
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageSource for HttpPageFetcher {
    async fn fetch_page(&self, category: ListingCategory, page: u32) -> Result<String, FetchError> {
        let url = category.page_url(page);
        debug!("Fetching URL: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| FetchError::Request { category, page, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { category, page, status });
        }

        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Request { category, page, source })?;

        debug!("Downloaded {} bytes for {} page {}", body.len(), category, page);
        Ok(body)
    }
}
