use chrono::Utc;
use dakar_auto_scraper::models::{ListingCategory, ListingRecord};
use dakar_auto_scraper::scrapers::{DakarAutoScraper, Progress, ProgressObserver, ScrapeOptions};
use dakar_auto_scraper::storage::{JsonStore, ListingStore};
use tokio_util::sync::CancellationToken;
use tracing::{info, Level};

struct LogProgress;

impl ProgressObserver for LogProgress {
    fn on_page(&self, progress: Progress) {
        info!("Scraping page {}/{}...", progress.page, progress.total);
    }
}

fn usage() -> ! {
    eprintln!("Usage: dakar-auto-scraper <voitures|motos|location> [pages]");
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let category = match args.get(1) {
        Some(raw) => ListingCategory::parse(raw).unwrap_or_else(|| usage()),
        None => ListingCategory::Vehicle,
    };
    let pages: u32 = match args.get(2) {
        Some(raw) => raw.parse().unwrap_or_else(|_| usage()),
        None => 1,
    };

    info!("🚗 Dakar Auto Scraper");
    info!("=====================");
    info!("Category: {}, pages: {}", category, pages);

    let scraper = DakarAutoScraper::new(ScrapeOptions::default())?;
    let cancel = CancellationToken::new();

    let report = scraper.scrape(category, pages, &LogProgress, &cancel).await?;

    info!(
        "\n✅ Scraped {} unique listings ({} pages, {} failed pages, {} dropped blocks)\n",
        report.records.len(),
        report.pages_fetched,
        report.failed_pages.len(),
        report.failed_blocks
    );

    for (i, record) in report.records.iter().enumerate() {
        match record {
            ListingRecord::Vehicle(v) => {
                println!("{}. {} {} {} ({} FCFA)", i + 1, v.brand, v.model, v.year, v.price);
                println!("   {} km, {}, {}", v.kilometers, v.gearbox, v.fuel_type);
                println!("   {} — {}", v.address.trim(), v.owner);
            }
            ListingRecord::Motorcycle(m) => {
                println!("{}. {} {} ({} FCFA)", i + 1, m.brand, m.year, m.price);
                println!("   {} km", m.kilometers);
                println!("   {} — {}", m.address.trim(), m.owner);
            }
            ListingRecord::RentalCar(r) => {
                println!("{}. {} {} ({} FCFA)", i + 1, r.brand, r.year, r.price);
                println!("   {} — {}", r.address.trim(), r.owner);
            }
        }
        println!();
    }

    // One batch timestamp for the whole run, assigned at persistence time.
    let store = JsonStore::new("data");
    store.save_batch(category, &report.records, Utc::now()).await?;

    Ok(())
}
