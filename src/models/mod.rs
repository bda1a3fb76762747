use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Listing partition on the source site
///
/// The category picks both the index path that is crawled and the name of
/// the table the cleaned dataset is stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Villas,
    Appartements,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Villas, Category::Appartements];

    /// Path segment on the source site, also used as the dataset name
    pub fn slug(&self) -> &'static str {
        match self {
            Category::Villas => "villas",
            Category::Appartements => "appartements",
        }
    }

    pub fn dataset_name(&self) -> &'static str {
        self.slug()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "villas" | "villa" => Ok(Category::Villas),
            "appartements" | "appartement" | "apartments" => Ok(Category::Appartements),
            other => Err(format!("unknown category '{}'", other)),
        }
    }
}

/// Fields lifted from one detail page, before numeric coercion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawListing {
    pub details: String,
    /// Digits left after stripping whitespace and the currency marker
    pub price: String,
    pub address: String,
    pub number_of_rooms: Option<String>,
    pub image_link: Option<String>,
}

/// One cleaned listing, as stored and exported
///
/// Field order matches the persisted column order and the CSV header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub details: String,
    /// Amount in FCFA
    pub price: Option<i64>,
    pub address: String,
    pub number_of_rooms: Option<i64>,
    pub image_link: Option<String>,
}

/// Why a listing was dropped during extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Detail page could not be fetched
    Fetch,
    MissingTitle,
    MissingPrice,
    MissingAddress,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SkipReason::Fetch => "detail fetch failed",
            SkipReason::MissingTitle => "title missing",
            SkipReason::MissingPrice => "price missing",
            SkipReason::MissingAddress => "address missing",
        };
        f.write_str(label)
    }
}

/// Result of processing one listing link
#[derive(Debug, Clone, PartialEq)]
pub enum ListingOutcome {
    Extracted(RawListing),
    Skipped(SkipReason),
}
