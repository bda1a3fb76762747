use crate::models::{Category, RawListing};
use crate::pipeline::aggregator::SkipTally;
use chrono::{DateTime, Utc};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://sn.coinafrique.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Parameters shared by every request of a crawl
#[derive(Debug, Clone)]
pub struct ScrapeParams {
    /// Absolute site root; index paths and listing hrefs resolve against it
    pub base_url: String,
    /// Per-request timeout, applied to index and detail fetches alike
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ScrapeParams {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ScrapeParams {
    pub fn index_url(&self, category: Category, page: u32) -> String {
        format!(
            "{}/categorie/{}?page={}",
            self.base_url.trim_end_matches('/'),
            category.slug(),
            page
        )
    }
}

/// Everything a crawl produced, in discovery order
#[derive(Debug, Clone)]
pub struct ScrapeReport {
    pub category: Category,
    pub page_count: u32,
    pub records: Vec<RawListing>,
    pub skipped: SkipTally,
    /// Index pages that could not be fetched
    pub failed_pages: Vec<u32>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}
