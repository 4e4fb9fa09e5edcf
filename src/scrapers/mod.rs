//! Source scrapers for the pages the relay watches.
//!
//! Each scraper knows one family of sites and turns their markup into
//! [`NewsItem`](crate::models::NewsItem)s. Scrapers never filter by what was
//! already announced; that is the scheduler's job via the dedup store.
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | PANews | [`panews`] | HTML scraping | Chinese crypto news aggregator, one page |
//! | Federal Reserve, BLS CPI/PPI, DOL | [`gov`] | HTML scraping | Four pages, translated after dedup |
//!
//! # Common Patterns
//!
//! - Page download goes through [`PageFetcher`] so tests can serve fixtures
//! - Parsing is a pure function of the HTML string
//! - Failed fetches are logged and yield no items; they never fail the tick

pub mod gov;
pub mod panews;

use crate::error::FetchError;
use crate::utils::normalize_text;
use reqwest::Client;
use scraper::ElementRef;
use std::time::Duration;
use tracing::{debug, instrument};

/// Browser-like User-Agent sent with every page request.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Capability to download a page as text.
pub trait PageFetcher {
    /// GET `url` and return the body of a 200 response.
    async fn get_text(&self, url: &str) -> Result<String, FetchError>;
}

/// [`PageFetcher`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        debug!(bytes = body.len(), "Fetched page");
        Ok(body)
    }
}

/// Build the HTTP client used for page scraping.
///
/// Every request carries [`USER_AGENT`] and is bounded by `timeout`.
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
}

/// All descendant text of `element`, whitespace-normalized.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    normalize_text(&element.text().collect::<String>())
}
