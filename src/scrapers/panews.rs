//! PANews headline scraper.
//!
//! This module scrapes the Chinese-language front page of
//! [PANews](https://www.panewslab.com/zh/index.html), a crypto news
//! aggregator. Headlines are already in the operator's language, so nothing
//! here is translated.
//!
//! # Page Layout
//!
//! Headlines are `.pa-news__list-title` nodes. The summary for a headline is
//! the first `p.description` element that follows it in document order; it
//! is not necessarily a sibling.

use super::{PageFetcher, element_text};
use crate::models::{NO_DESCRIPTION, NewsItem};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, error, info, instrument};

/// Front page scraped on every tick.
pub const PANEWS_URL: &str = "https://www.panewslab.com/zh/index.html";

static HEADLINE: Lazy<Selector> = Lazy::new(|| Selector::parse(".pa-news__list-title").unwrap());
static DESCRIPTION: Lazy<Selector> = Lazy::new(|| Selector::parse("p.description").unwrap());

/// Scraper for the PANews front page.
#[derive(Debug, Clone)]
pub struct PanewsScraper {
    url: String,
}

impl Default for PanewsScraper {
    fn default() -> Self {
        Self::new(PANEWS_URL)
    }
}

impl PanewsScraper {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Fetch the front page and return every headline on it.
    ///
    /// Network failures and non-200 responses are logged and produce an
    /// empty list.
    #[instrument(level = "info", skip_all, fields(url = %self.url))]
    pub async fn fetch<F: PageFetcher>(&self, http: &F) -> Vec<NewsItem> {
        match http.get_text(&self.url).await {
            Ok(html) => {
                let items = parse_headlines(&html);
                info!(count = items.len(), "Parsed PANews headlines");
                items
            }
            Err(e) => {
                error!(error = %e, "PANews fetch failed");
                Vec::new()
            }
        }
    }
}

/// Extract headlines and their descriptions from a PANews page.
///
/// Walks the document once in order. Every headline waits for the next
/// `p.description` to appear; consecutive headlines with no description in
/// between all receive the same one. Headlines with empty text are dropped.
pub fn parse_headlines(html: &str) -> Vec<NewsItem> {
    let document = Html::parse_document(html);
    let mut items: Vec<NewsItem> = Vec::new();
    let mut awaiting_body: Vec<usize> = Vec::new();

    for node in document.root_element().descendants() {
        let Some(element) = ElementRef::wrap(node) else {
            continue;
        };

        if DESCRIPTION.matches(&element) && !awaiting_body.is_empty() {
            let body = element_text(element);
            if !body.is_empty() {
                for index in awaiting_body.drain(..) {
                    items[index].body = body.clone();
                }
            } else {
                awaiting_body.clear();
            }
        }

        if HEADLINE.matches(&element) {
            let title = element_text(element);
            if title.is_empty() {
                debug!("Skipping headline node with no text");
                continue;
            }
            awaiting_body.push(items.len());
            items.push(NewsItem::headline(title, NO_DESCRIPTION));
        }
    }

    items
}
