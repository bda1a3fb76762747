use crate::models::{Category, ListingOutcome, SkipReason};
use crate::pipeline::aggregator::RecordAggregator;
use crate::pipeline::progress::{ProgressEvent, ProgressReporter};
use crate::scrapers::client::{FetchError, HttpFetcher};
use crate::scrapers::extract::{extract_listing, extract_listing_links};
use crate::scrapers::traits::{PageFetcher, ScraperTrait};
use crate::scrapers::types::{ScrapeParams, ScrapeReport};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info, warn};
use url::Url;

/// CoinAfrique Senegal scraper
///
/// Walks index pages strictly in order, one request at a time, and visits
/// every listing linked from each page.
pub struct CoinAfriqueScraper<F = HttpFetcher> {
    fetcher: F,
    params: ScrapeParams,
    base: Url,
    progress: ProgressReporter,
}

impl CoinAfriqueScraper<HttpFetcher> {
    /// Create a scraper against the live site with default parameters
    pub fn new() -> Result<Self> {
        Self::with_params(ScrapeParams::default())
    }

    pub fn with_params(params: ScrapeParams) -> Result<Self> {
        let fetcher = HttpFetcher::new(&params).context("Failed to create HTTP client")?;
        Self::with_fetcher(fetcher, params)
    }
}

impl<F: PageFetcher> CoinAfriqueScraper<F> {
    pub fn with_fetcher(fetcher: F, params: ScrapeParams) -> Result<Self> {
        let base = Url::parse(&params.base_url)
            .with_context(|| format!("Invalid base URL '{}'", params.base_url))?;

        Ok(Self {
            fetcher,
            params,
            base,
            progress: ProgressReporter::silent(),
        })
    }

    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    /// Crawl pages `1..=page_count`. Every page is attempted exactly once.
    pub async fn run(&self, category: Category, page_count: u32) -> ScrapeReport {
        let started_at = Utc::now();
        let mut aggregator = RecordAggregator::new();
        let mut failed_pages = Vec::new();

        info!("Starting {} scrape of {} page(s)", category, page_count);

        for page in 1..=page_count {
            self.progress.emit(ProgressEvent::PageStarted { page, total: page_count });

            match self.scrape_page(category, page).await {
                Ok(outcomes) => {
                    let attempted = outcomes.len();
                    if attempted == 0 {
                        self.progress.notice(format!("Page {} lists no listings", page));
                    }
                    let added = aggregator.absorb(outcomes);
                    info!(
                        "Page {}/{}: kept {} of {} listing(s)",
                        page, page_count, added, attempted
                    );
                    self.progress.emit(ProgressEvent::PageCompleted {
                        page,
                        total: page_count,
                        records: added,
                    });
                }
                Err(e) => {
                    warn!("Skipping page {}/{}: {}", page, page_count, e);
                    failed_pages.push(page);
                    self.progress.emit(ProgressEvent::PageFailed {
                        page,
                        total: page_count,
                        error: e.to_string(),
                    });
                }
            }
        }

        let (records, skipped) = aggregator.into_parts();
        info!(
            "Finished {} scrape: {} record(s), skipped listings: {}",
            category,
            records.len(),
            skipped
        );
        self.progress.emit(ProgressEvent::Finished { records: records.len() });

        ScrapeReport {
            category,
            page_count,
            records,
            skipped,
            failed_pages,
            started_at,
            finished_at: Utc::now(),
        }
    }

    async fn scrape_page(
        &self,
        category: Category,
        page: u32,
    ) -> Result<Vec<ListingOutcome>, FetchError> {
        let url = self.params.index_url(category, page);
        let body = self.fetcher.fetch(&url).await?;

        let links = extract_listing_links(&body, &self.base);
        debug!("Found {} listing link(s) on {}", links.len(), url);

        let mut outcomes = Vec::with_capacity(links.len());
        for link in &links {
            outcomes.push(self.scrape_listing(link).await);
        }
        Ok(outcomes)
    }

    /// Fetch one detail page and extract it; never fails the caller
    pub async fn scrape_listing(&self, url: &str) -> ListingOutcome {
        let body = match self.fetcher.fetch(url).await {
            Ok(body) => body,
            Err(e) => {
                debug!("Skipping listing {}: {}", url, e);
                return ListingOutcome::Skipped(SkipReason::Fetch);
            }
        };

        match extract_listing(&body) {
            Ok(listing) => ListingOutcome::Extracted(listing),
            Err(reason) => {
                debug!("Skipping listing {}: {}", url, reason);
                ListingOutcome::Skipped(reason)
            }
        }
    }
}

#[async_trait]
impl<F: PageFetcher> ScraperTrait for CoinAfriqueScraper<F> {
    async fn scrape(&self, category: Category, page_count: u32) -> ScrapeReport {
        self.run(category, page_count).await
    }

    fn source_name(&self) -> &'static str {
        "CoinAfrique"
    }
}
