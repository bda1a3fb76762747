pub mod client;
pub mod coinafrique;
pub mod extract;
pub mod traits;
pub mod types;

pub use client::{FetchError, HttpFetcher};
pub use coinafrique::CoinAfriqueScraper;
pub use traits::{PageFetcher, ScraperTrait};
pub use types::{ScrapeParams, ScrapeReport};
