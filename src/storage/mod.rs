//! Persistence boundary. The pipeline hands a finished batch over and
//! moves on; storage is append-only, one file per batch, and the batch
//! timestamp is assigned here so every record in a run shares it.

use crate::models::{ListingCategory, ListingRecord, StoredListing};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::info;

#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Append one batch of records for a category, stamping every record
    /// with the shared `scraped_at` value. Returns the written path.
    async fn save_batch(
        &self,
        category: ListingCategory,
        records: &[ListingRecord],
        scraped_at: DateTime<Utc>,
    ) -> Result<PathBuf>;
}

/// JSON-file store: `<dir>/<category-slug>_<timestamp>.json` per batch.
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl ListingStore for JsonStore {
    async fn save_batch(
        &self,
        category: ListingCategory,
        records: &[ListingRecord],
        scraped_at: DateTime<Utc>,
    ) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .context("Failed to create storage directory")?;

        let stored: Vec<StoredListing> = records
            .iter()
            .cloned()
            .map(|record| StoredListing { scraped_at, record })
            .collect();

        let filename = format!(
            "{}_{}.json",
            category.slug(),
            scraped_at.format("%Y%m%dT%H%M%S")
        );
        let path = self.dir.join(filename);

        let json = serde_json::to_string_pretty(&stored)?;
        tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        info!(
            "💾 Saved {} {} listings to {}",
            records.len(),
            category,
            path.display()
        );
        Ok(path)
    }
}
