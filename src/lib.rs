pub mod models;
pub mod scrapers;
pub mod storage;

// Re-export main types
pub use models::{ListingCategory, ListingRecord};
pub use scrapers::{DakarAutoScraper, ScrapeOptions, ScrapeReport};
pub use storage::{JsonStore, ListingStore};
