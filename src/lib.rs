//! Real-estate listing ingestion for CoinAfrique Senegal.
//!
//! Crawl a category's index pages, extract each linked listing, fill numeric
//! gaps with the batch median and replace the category's table in SQLite.

pub mod export;
pub mod models;
pub mod pipeline;
pub mod scrapers;
pub mod stats;
pub mod storage;

pub use models::{Category, ListingRecord, RawListing};
pub use scrapers::{CoinAfriqueScraper, ScrapeParams, ScrapeReport};
pub use storage::ListingStore;
