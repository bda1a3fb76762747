use crate::models::Category;
use crate::scrapers::client::FetchError;
use crate::scrapers::types::ScrapeReport;
use async_trait::async_trait;

/// Source of raw page bodies
///
/// The production implementation is `HttpFetcher`; tests plug in canned pages.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET `url` and return the body as text
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Common trait for all listing sources
#[async_trait]
pub trait ScraperTrait: Send + Sync {
    /// Crawl pages `1..=page_count` of a category. Always completes.
    async fn scrape(&self, category: Category, page_count: u32) -> ScrapeReport;

    /// Get the name of the scraper source
    fn source_name(&self) -> &'static str;
}
