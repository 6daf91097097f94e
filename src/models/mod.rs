use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Listing category on dakar-auto.com. Each category has its own field
/// schema and its own paginated listing URL.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ListingCategory {
    Vehicle,
    Motorcycle,
    RentalCar,
}

impl ListingCategory {
    /// Stable slug used for storage file names.
    pub fn slug(&self) -> &'static str {
        match self {
            ListingCategory::Vehicle => "voitures",
            ListingCategory::Motorcycle => "motos",
            ListingCategory::RentalCar => "location",
        }
    }

    /// Paginated listing URL for the given 1-based page index.
    /// The query shape mirrors what the site actually serves.
    pub fn page_url(&self, page: u32) -> String {
        let path = match self {
            ListingCategory::Vehicle => "voitures-4",
            ListingCategory::Motorcycle => "motos-and-scooters-3",
            ListingCategory::RentalCar => "location-de-voitures-19",
        };
        format!("https://dakar-auto.com/senegal/{}?&page={}", path, page)
    }

    /// Parse a category from a user-facing name or slug.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "voitures" | "vehicle" | "cars" => Some(ListingCategory::Vehicle),
            "motos" | "motorcycle" | "motos-and-scooters" => Some(ListingCategory::Motorcycle),
            "location" | "rental" | "rental-car" => Some(ListingCategory::RentalCar),
            _ => None,
        }
    }
}

impl fmt::Display for ListingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

/// A car listing. Kilometers and price are normalized digit-and-separator
/// strings with the `km` / `FCFA` markers and all whitespace stripped;
/// numeric parsing is left to downstream consumers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct VehicleListing {
    pub brand: String,
    pub model: String,
    pub year: String,
    pub kilometers: String,
    pub fuel_type: String,
    pub gearbox: String,
    pub address: String,
    pub owner: String,
    pub price: String,
}

/// A motorcycle/scooter listing. `kilometers` defaults to `"0"` when the
/// attribute list is absent or empty; every other field is mandatory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MotorcycleListing {
    pub brand: String,
    pub year: String,
    pub kilometers: String,
    pub address: String,
    pub owner: String,
    pub price: String,
}

/// A rental-car listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RentalListing {
    pub brand: String,
    pub year: String,
    pub address: String,
    pub owner: String,
    pub price: String,
}

/// One extracted listing. Records carry no stable external identifier;
/// identity for deduplication is the full field tuple, hence `Eq + Hash`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "category")]
pub enum ListingRecord {
    Vehicle(VehicleListing),
    Motorcycle(MotorcycleListing),
    RentalCar(RentalListing),
}

impl ListingRecord {
    pub fn category(&self) -> ListingCategory {
        match self {
            ListingRecord::Vehicle(_) => ListingCategory::Vehicle,
            ListingRecord::Motorcycle(_) => ListingCategory::Motorcycle,
            ListingRecord::RentalCar(_) => ListingCategory::RentalCar,
        }
    }
}

/// Persistence shape: the batch timestamp is assigned once per scrape run,
/// at save time, so every record in a batch shares the same `scraped_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredListing {
    pub scraped_at: DateTime<Utc>,
    pub record: ListingRecord,
}
