pub mod dakar_auto;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod traits;
pub mod types;

pub use dakar_auto::DakarAutoScraper;
pub use traits::{NoProgress, PageSource, ProgressObserver};
pub use types::{Progress, ScrapeOptions, ScrapeReport};
