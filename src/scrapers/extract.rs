//! Container location and per-category field extraction.
//!
//! dakar-auto listing pages carry one card per advertisement. The card
//! markup names no fields; attributes are identified purely by their
//! ordinal position in the card's attribute list, so the position → field
//! mapping lives in one schema table below rather than inline indexing.
//!
//! Every field lookup is independently fallible: the site mixes ads and
//! partial blocks into the listing grid, so one malformed card must never
//! cost the rest of the page.

use crate::models::{
    ListingCategory, ListingRecord, MotorcycleListing, RentalListing, VehicleListing,
};
use crate::scrapers::error::ExtractionFailure;
use crate::scrapers::types::PageOutcome;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

const CONTAINER: &str = "div.listings-cards__list-item.mb-md-3.mb-3";
const TITLE: &str = "h2.listing-card__header__title a";
const ATTRIBUTE_LIST: &str = "ul.listing-card__attribute-list";
const ATTRIBUTE_ITEM: &str = "li.listing-card__attribute";
const ADDRESS: &str = "div.entry-zone-address";
const OWNER: &str = "p.time-author a";
const PRICE: &str = "h3.listing-card__header__price";

/// Ordinal schema of the attribute list. Slot 0 holds a non-attribute
/// entry on the live site and is never read.
const ATTR_KILOMETERS: usize = 1;
const ATTR_GEARBOX: usize = 2;
const ATTR_FUEL: usize = 3;
/// A vehicle card must carry all three mapped slots.
const VEHICLE_MIN_ATTRS: usize = 4;
/// A motorcycle card only needs the kilometers slot, and even that one is
/// optional (defaulted, see `extract_motorcycle`).
const MOTO_MIN_ATTRS: usize = 2;

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap()
}

/// Process one fetched page: locate every listing block and run the
/// category extractor over each. Failed blocks are counted and dropped;
/// record order follows block order.
pub fn process_page(html: &str, category: ListingCategory) -> PageOutcome {
    let document = Html::parse_document(html);
    let container_sel = selector(CONTAINER);

    let mut outcome = PageOutcome::default();
    for block in document.select(&container_sel) {
        match extract_listing(block, category) {
            Ok(record) => outcome.records.push(record),
            Err(failure) => {
                debug!("Dropping malformed {} block: {}", category, failure);
                outcome.failed_blocks += 1;
            }
        }
    }
    outcome
}

/// Extract one listing block into a record, or a failure naming the first
/// missing element. A failure here never affects sibling blocks.
pub fn extract_listing(
    block: ElementRef<'_>,
    category: ListingCategory,
) -> Result<ListingRecord, ExtractionFailure> {
    match category {
        ListingCategory::Vehicle => extract_vehicle(block).map(ListingRecord::Vehicle),
        ListingCategory::Motorcycle => extract_motorcycle(block).map(ListingRecord::Motorcycle),
        ListingCategory::RentalCar => extract_rental(block).map(ListingRecord::RentalCar),
    }
}

fn extract_vehicle(block: ElementRef<'_>) -> Result<VehicleListing, ExtractionFailure> {
    let tokens = title_tokens(block)?;
    let brand = tokens[0].clone();
    let year = tokens[tokens.len() - 1].clone();
    // A one-token title has no middle slice; the model is simply empty.
    let model = tokens
        .get(1..tokens.len() - 1)
        .map(|middle| middle.join(" "))
        .unwrap_or_default();

    let items = attribute_items(block).ok_or(ExtractionFailure::MissingAttributes)?;
    if items.len() < VEHICLE_MIN_ATTRS {
        return Err(ExtractionFailure::TruncatedAttributes {
            expected: VEHICLE_MIN_ATTRS,
            found: items.len(),
        });
    }

    Ok(VehicleListing {
        brand,
        model,
        year,
        kilometers: strip_kilometers(&items[ATTR_KILOMETERS]),
        gearbox: items[ATTR_GEARBOX].trim().to_string(),
        fuel_type: items[ATTR_FUEL].trim().to_string(),
        address: address(block)?,
        owner: owner(block)?,
        price: price(block)?,
    })
}

fn extract_motorcycle(block: ElementRef<'_>) -> Result<MotorcycleListing, ExtractionFailure> {
    let tokens = title_tokens(block)?;
    let brand = tokens[0].clone();
    let year = tokens[tokens.len() - 1].clone();

    // The one default-on-missing field in the pipeline: motorcycles are
    // routinely listed without mileage, so an absent or empty kilometers
    // slot becomes "0" instead of failing the record.
    let kilometers = attribute_items(block)
        .filter(|items| items.len() >= MOTO_MIN_ATTRS)
        .map(|items| strip_kilometers(&items[ATTR_KILOMETERS]))
        .filter(|kms| !kms.is_empty())
        .unwrap_or_else(|| "0".to_string());

    Ok(MotorcycleListing {
        brand,
        year,
        kilometers,
        address: address(block)?,
        owner: owner(block)?,
        price: price(block)?,
    })
}

fn extract_rental(block: ElementRef<'_>) -> Result<RentalListing, ExtractionFailure> {
    let tokens = title_tokens(block)?;
    let brand = tokens[0].clone();
    let year = tokens[tokens.len() - 1].clone();

    Ok(RentalListing {
        brand,
        year,
        address: address(block)?,
        owner: owner(block)?,
        price: price(block)?,
    })
}

/// Whitespace-normalized tokens of the card title. Brand is the first
/// token, year the last; a vehicle's model is everything in between.
fn title_tokens(block: ElementRef<'_>) -> Result<Vec<String>, ExtractionFailure> {
    let title = block
        .select(&selector(TITLE))
        .next()
        .ok_or(ExtractionFailure::MissingTitle)?;

    let tokens: Vec<String> = text_of(title)
        .split_whitespace()
        .map(str::to_string)
        .collect();

    if tokens.is_empty() {
        return Err(ExtractionFailure::MissingTitle);
    }
    Ok(tokens)
}

/// Texts of the attribute-list items, in markup order. `None` when the
/// card has no attribute list at all.
fn attribute_items(block: ElementRef<'_>) -> Option<Vec<String>> {
    let list = block.select(&selector(ATTRIBUTE_LIST)).next()?;
    Some(
        list.select(&selector(ATTRIBUTE_ITEM))
            .map(text_of)
            .collect(),
    )
}

fn address(block: ElementRef<'_>) -> Result<String, ExtractionFailure> {
    block
        .select(&selector(ADDRESS))
        .next()
        .map(text_of)
        .ok_or(ExtractionFailure::MissingAddress)
}

/// Author name from the by-line, with the literal "Par" marker removed
/// wherever it occurs, not only as a prefix.
fn owner(block: ElementRef<'_>) -> Result<String, ExtractionFailure> {
    block
        .select(&selector(OWNER))
        .next()
        .map(|el| text_of(el).replace("Par", "").trim().to_string())
        .ok_or(ExtractionFailure::MissingOwner)
}

/// Price as a digit-and-separator string: all whitespace and the FCFA
/// currency marker stripped, no numeric parsing.
fn price(block: ElementRef<'_>) -> Result<String, ExtractionFailure> {
    block
        .select(&selector(PRICE))
        .next()
        .map(|el| {
            text_of(el)
                .split_whitespace()
                .collect::<String>()
                .replace("FCFA", "")
        })
        .ok_or(ExtractionFailure::MissingPrice)
}

/// Kilometers with the "km" unit marker and all whitespace stripped.
fn strip_kilometers(raw: &str) -> String {
    raw.replace("km", "").split_whitespace().collect()
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect()
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    fn extract_one(
        html: &str,
        category: ListingCategory,
    ) -> Result<ListingRecord, ExtractionFailure> {
        let document = Html::parse_document(html);
        let block = document
            .select(&selector(CONTAINER))
            .next()
            .expect("fixture must contain a listing block");
        extract_listing(block, category)
    }

    #[test]
    fn vehicle_end_to_end() {
        let record = extract_one(&corolla_card(), ListingCategory::Vehicle).unwrap();
        let ListingRecord::Vehicle(v) = record else {
            panic!("expected a vehicle record");
        };
        assert_eq!(v.brand, "Toyota");
        assert_eq!(v.model, "Corolla");
        assert_eq!(v.year, "2018");
        assert_eq!(v.kilometers, "50000");
        assert_eq!(v.gearbox, "Automatique");
        assert_eq!(v.fuel_type, "Essence");
        assert_eq!(v.address, "Dakar");
        assert_eq!(v.owner, "Moussa");
        assert_eq!(v.price, "12500000");
    }

    #[test]
    fn vehicle_model_spans_middle_tokens() {
        let html = card_with_attributes(
            "Land Rover Range Rover Sport 2020",
            &["entry", "30 000 km", "Automatique", "Diesel"],
            "Almadies",
            "Par Awa",
            "45 000 000 FCFA",
        );
        let ListingRecord::Vehicle(v) = extract_one(&html, ListingCategory::Vehicle).unwrap() else {
            panic!("expected a vehicle record");
        };
        assert_eq!(v.brand, "Land");
        assert_eq!(v.model, "Rover Range Rover Sport");
        assert_eq!(v.year, "2020");
        assert_eq!(v.kilometers, "30000");
    }

    #[test]
    fn vehicle_two_token_title_has_empty_model() {
        let html = card_with_attributes(
            "Kia 2015",
            &["entry", "80000 km", "Manuelle", "Essence"],
            "Thiès",
            "Par Ousmane",
            "4 000 000 FCFA",
        );
        let ListingRecord::Vehicle(v) = extract_one(&html, ListingCategory::Vehicle).unwrap() else {
            panic!("expected a vehicle record");
        };
        assert_eq!(v.brand, "Kia");
        assert_eq!(v.model, "");
        assert_eq!(v.year, "2015");
    }

    #[test]
    fn vehicle_one_token_title_extracts_with_empty_model() {
        let html = card_with_attributes(
            "Toyota",
            &["entry", "50000 km", "Automatique", "Essence"],
            "Dakar",
            "Par Moussa",
            "12 500 000 FCFA",
        );
        let ListingRecord::Vehicle(v) = extract_one(&html, ListingCategory::Vehicle).unwrap() else {
            panic!("expected a vehicle record");
        };
        assert_eq!(v.brand, "Toyota");
        assert_eq!(v.model, "");
        assert_eq!(v.year, "Toyota");
    }

    #[test]
    fn vehicle_one_token_title_does_not_abort_page() {
        let sparse = card_with_attributes(
            "Toyota",
            &["entry", "50000 km", "Automatique", "Essence"],
            "Dakar",
            "Par Moussa",
            "12 500 000 FCFA",
        );
        let outcome = process_page(
            &page(&[sparse, corolla_card()]),
            ListingCategory::Vehicle,
        );
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.failed_blocks, 0);
    }

    #[test]
    fn vehicle_truncated_attribute_list_fails() {
        let html = card_with_attributes(
            "Toyota Corolla 2018",
            &["entry", "50000 km"],
            "Dakar",
            "Par Moussa",
            "12 500 000 FCFA",
        );
        let err = extract_one(&html, ListingCategory::Vehicle).unwrap_err();
        assert_eq!(
            err,
            ExtractionFailure::TruncatedAttributes { expected: 4, found: 2 }
        );
    }

    #[test]
    fn vehicle_missing_attribute_list_fails() {
        let html = card_without_attributes("Toyota Corolla 2018", "Dakar", "Par Moussa", "1 FCFA");
        let err = extract_one(&html, ListingCategory::Vehicle).unwrap_err();
        assert_eq!(err, ExtractionFailure::MissingAttributes);
    }

    #[test]
    fn motorcycle_defaults_kilometers_without_attribute_list() {
        let html = card_without_attributes("Yamaha 2021", "Pikine", "Par Ibrahima", "800 000 FCFA");
        let ListingRecord::Motorcycle(m) = extract_one(&html, ListingCategory::Motorcycle).unwrap()
        else {
            panic!("expected a motorcycle record");
        };
        assert_eq!(m.brand, "Yamaha");
        assert_eq!(m.year, "2021");
        assert_eq!(m.kilometers, "0");
    }

    #[test]
    fn motorcycle_defaults_kilometers_on_short_attribute_list() {
        let html = card_with_attributes(
            "Honda 2019",
            &["entry"],
            "Rufisque",
            "Par Cheikh",
            "600 000 FCFA",
        );
        let ListingRecord::Motorcycle(m) = extract_one(&html, ListingCategory::Motorcycle).unwrap()
        else {
            panic!("expected a motorcycle record");
        };
        assert_eq!(m.kilometers, "0");
    }

    #[test]
    fn motorcycle_defaults_kilometers_on_blank_slot() {
        let html = card_with_attributes(
            "Honda 2019",
            &["entry", " km "],
            "Rufisque",
            "Par Cheikh",
            "600 000 FCFA",
        );
        let ListingRecord::Motorcycle(m) = extract_one(&html, ListingCategory::Motorcycle).unwrap()
        else {
            panic!("expected a motorcycle record");
        };
        assert_eq!(m.kilometers, "0");
    }

    #[test]
    fn motorcycle_reads_kilometers_when_present() {
        let html = card_with_attributes(
            "Honda 2019",
            &["entry", "12 000 km"],
            "Rufisque",
            "Par Cheikh",
            "600 000 FCFA",
        );
        let ListingRecord::Motorcycle(m) = extract_one(&html, ListingCategory::Motorcycle).unwrap()
        else {
            panic!("expected a motorcycle record");
        };
        assert_eq!(m.kilometers, "12000");
    }

    #[test]
    fn rental_ignores_attribute_list() {
        let html = card_without_attributes("Hyundai 2022", "Plateau", "Par Fatou", "35 000 FCFA");
        let ListingRecord::RentalCar(r) = extract_one(&html, ListingCategory::RentalCar).unwrap()
        else {
            panic!("expected a rental record");
        };
        assert_eq!(r.brand, "Hyundai");
        assert_eq!(r.year, "2022");
        assert_eq!(r.owner, "Fatou");
        assert_eq!(r.price, "35000");
    }

    #[test]
    fn owner_marker_stripped_wherever_it_occurs() {
        let html =
            card_without_attributes("Hyundai 2022", "Plateau", "Par Amadou Par", "35 000 FCFA");
        let ListingRecord::RentalCar(r) = extract_one(&html, ListingCategory::RentalCar).unwrap()
        else {
            panic!("expected a rental record");
        };
        assert_eq!(r.owner, "Amadou");
    }

    #[test]
    fn missing_price_fails_block() {
        let html = r#"<div class="listings-cards__list-item mb-md-3 mb-3">
            <h2 class="listing-card__header__title mb-md-2 mb-0"><a href="/i">Hyundai 2022</a></h2>
            <div class="col-12 entry-zone-address">Plateau</div>
            <p class="time-author m-0"><a href="/u">Par Fatou</a></p>
        </div>"#;
        let err = extract_one(html, ListingCategory::RentalCar).unwrap_err();
        assert_eq!(err, ExtractionFailure::MissingPrice);
    }

    #[test]
    fn malformed_block_is_isolated() {
        let a = card_without_attributes("Hyundai 2022", "Plateau", "Par Fatou", "35 000 FCFA");
        let b = malformed_card();
        let c = card_without_attributes("Kia 2020", "Ouakam", "Par Omar", "28 000 FCFA");
        let outcome = process_page(&page(&[a, b, c]), ListingCategory::RentalCar);

        assert_eq!(outcome.failed_blocks, 1);
        assert_eq!(outcome.records.len(), 2);
        let brands: Vec<_> = outcome
            .records
            .iter()
            .map(|r| match r {
                ListingRecord::RentalCar(r) => r.brand.as_str(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(brands, ["Hyundai", "Kia"]);
    }

    #[test]
    fn unmatched_markup_yields_empty_page() {
        let outcome = process_page(
            "<html><body><p>Aucune annonce trouvée</p></body></html>",
            ListingCategory::Vehicle,
        );
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.failed_blocks, 0);
    }
}
