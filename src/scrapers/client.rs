use crate::scrapers::traits::PageFetcher;
use crate::scrapers::types::ScrapeParams;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("http error {0}")]
    Status(StatusCode),

    #[error("failed to read body: {0}")]
    Body(String),

    #[error("client setup failed: {0}")]
    Client(String),
}

impl FetchError {
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if let Some(status) = err.status() {
            Self::Status(status)
        } else if err.is_body() || err.is_decode() {
            Self::Body(err.to_string())
        } else {
            Self::Connect(err.to_string())
        }
    }
}

/// `reqwest`-backed fetcher with a fixed per-request timeout and no retries
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(params: &ScrapeParams) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(params.timeout)
            .user_agent(params.user_agent.as_str())
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let parsed = url::Url::parse(url)?;
        debug!("Fetching URL: {}", parsed);

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await.map_err(FetchError::from_reqwest)?;
        debug!("Downloaded {} bytes of HTML", body.len());
        Ok(body)
    }
}
