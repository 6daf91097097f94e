//! Error taxonomy for the extraction pipeline.
//!
//! Three classes with very different blast radii: a `FetchError` costs one
//! page, an `ExtractionFailure` costs one listing block, and only a
//! `ConfigError` aborts a run. The input markup is untrusted and expected
//! to be imperfect; caller-supplied parameters are not.

use crate::models::ListingCategory;
use thiserror::Error;

/// A page-level fetch failure, scoped to one category + page index.
/// The orchestrator treats the page as empty and keeps going.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request for {category} page {page} failed: {source}")]
    Request {
        category: ListingCategory,
        page: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("{category} page {page} returned HTTP {status}")]
    Status {
        category: ListingCategory,
        page: u32,
        status: reqwest::StatusCode,
    },
}

impl FetchError {
    pub fn page(&self) -> u32 {
        match self {
            FetchError::Request { page, .. } | FetchError::Status { page, .. } => *page,
        }
    }
}

/// A block-level failure: one required element could not be located in one
/// listing's markup. The block is dropped and counted; siblings are
/// unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionFailure {
    #[error("listing title is missing or empty")]
    MissingTitle,

    #[error("attribute list is missing")]
    MissingAttributes,

    #[error("attribute list has {found} items, expected at least {expected}")]
    TruncatedAttributes { expected: usize, found: usize },

    #[error("address element not found")]
    MissingAddress,

    #[error("owner by-line not found")]
    MissingOwner,

    #[error("price element not found")]
    MissingPrice,
}

/// Invalid caller-supplied parameters. The only error class that fails a
/// whole run, and it does so before the first fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("page count must be at least 1, got {pages}")]
    InvalidPageRange { pages: u32 },
}
