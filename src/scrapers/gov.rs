//! US government economic release scraper.
//!
//! Four pages are watched, one per [`SourceTag`]. Each page has its own
//! article selector; inside an article the title, description and date live
//! under `.title`, `.description` and `.date`.
//!
//! Pages are English. After the scheduler has filtered out titles it has
//! already announced, [`localize`] translates what is left, one source tag at
//! a time.

use super::{PageFetcher, element_text};
use crate::error::TranslateError;
use crate::models::{NO_DESCRIPTION, NO_TIME, NewsItem, SourceTag};
use crate::translate::Translator;
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, error, info, instrument, warn};

static FED_ARTICLE: Lazy<Selector> = Lazy::new(|| Selector::parse(".press-release-item").unwrap());
static BLS_ARTICLE: Lazy<Selector> = Lazy::new(|| Selector::parse(".accordion-item").unwrap());
static DOL_ARTICLE: Lazy<Selector> = Lazy::new(|| Selector::parse(".release").unwrap());
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse(".title").unwrap());
static DESCRIPTION: Lazy<Selector> = Lazy::new(|| Selector::parse(".description").unwrap());
static DATE: Lazy<Selector> = Lazy::new(|| Selector::parse(".date").unwrap());

/// One watched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GovSite {
    pub tag: SourceTag,
    pub url: String,
}

impl GovSite {
    pub fn new(tag: SourceTag, url: impl Into<String>) -> Self {
        Self {
            tag,
            url: url.into(),
        }
    }
}

/// Release pages by source key, in fetch order.
const SITES: [(&str, &str); 4] = [
    ("fed", "https://www.federalreserve.gov/newsevents/pressreleases.htm"),
    ("cpi", "https://www.bls.gov/cpi/"),
    ("ppi", "https://www.bls.gov/ppi/"),
    ("non_farm_jobs", "https://www.dol.gov/newsroom/releases"),
];

/// The fixed set of release pages, in fetch order.
pub fn default_sites() -> Vec<GovSite> {
    SITES
        .iter()
        .map(|(key, url)| GovSite::new(SourceTag::from_key(key), *url))
        .collect()
}

/// Article container selector for a page layout.
fn article_selector(tag: &SourceTag) -> &'static Selector {
    match tag {
        SourceTag::Fed => &*FED_ARTICLE,
        SourceTag::Cpi | SourceTag::Ppi => &*BLS_ARTICLE,
        SourceTag::NonFarmJobs | SourceTag::Other(_) => &*DOL_ARTICLE,
    }
}

/// Scraper over all configured release pages.
#[derive(Debug, Clone)]
pub struct GovScraper {
    sites: Vec<GovSite>,
}

impl Default for GovScraper {
    fn default() -> Self {
        Self::new(default_sites())
    }
}

impl GovScraper {
    pub fn new(sites: Vec<GovSite>) -> Self {
        Self { sites }
    }

    /// Fetch every page in order and return all parsed articles, tagged.
    ///
    /// A page that fails is logged and contributes nothing; the remaining
    /// pages are still fetched.
    #[instrument(level = "info", skip_all)]
    pub async fn fetch<F: PageFetcher>(&self, http: &F) -> Vec<NewsItem> {
        let items: Vec<NewsItem> = stream::iter(self.sites.iter())
            .then(|site| async move {
                match http.get_text(&site.url).await {
                    Ok(html) => {
                        let items = parse_articles(&site.tag, &html);
                        debug!(source = %site.tag, count = items.len(), "Parsed release page");
                        items
                    }
                    Err(e) => {
                        error!(source = %site.tag, url = %site.url, error = %e, "Release page fetch failed");
                        Vec::new()
                    }
                }
            })
            .concat()
            .await;

        info!(count = items.len(), "Fetched government releases");
        items
    }
}

/// Extract articles from one release page using the layout for `tag`.
///
/// Articles without a title are skipped; a missing description or date is
/// replaced by [`NO_DESCRIPTION`] or [`NO_TIME`].
pub fn parse_articles(tag: &SourceTag, html: &str) -> Vec<NewsItem> {
    let document = Html::parse_document(html);
    document
        .select(article_selector(tag))
        .filter_map(|article| {
            let title = first_text(article, &TITLE)?;
            Some(NewsItem {
                title,
                body: first_text(article, &DESCRIPTION).unwrap_or_else(|| NO_DESCRIPTION.to_string()),
                timestamp: Some(first_text(article, &DATE).unwrap_or_else(|| NO_TIME.to_string())),
                source_tag: Some(tag.clone()),
            })
        })
        .collect()
}

/// Normalized text of the first match under `scope`, if non-empty.
fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
}

/// Translate title and body of every item into `target_lang`.
///
/// Items are handled per source tag. The first translation error in a tag
/// drops that tag's whole batch for this tick; other tags are unaffected.
/// Dropped titles are already recorded as seen and will not come back.
#[instrument(level = "info", skip_all, fields(target_lang = %target_lang))]
pub async fn localize<T: Translator>(
    translator: &T,
    target_lang: &str,
    items: Vec<NewsItem>,
) -> Vec<NewsItem> {
    let groups = items
        .into_iter()
        .chunk_by(|item| item.source_tag.clone())
        .into_iter()
        .map(|(tag, group)| (tag, group.collect::<Vec<_>>()))
        .collect::<Vec<_>>();

    let mut out = Vec::new();
    for (tag, batch) in groups {
        let source = tag.as_ref().map(SourceTag::key).unwrap_or("unknown").to_string();
        let size = batch.len();
        match translate_batch(translator, target_lang, batch).await {
            Ok(mut translated) => out.append(&mut translated),
            Err(e) => {
                warn!(%source, lost = size, error = %e, "Translation failed; dropping batch for this tick");
            }
        }
    }
    out
}

async fn translate_batch<T: Translator>(
    translator: &T,
    target_lang: &str,
    batch: Vec<NewsItem>,
) -> Result<Vec<NewsItem>, TranslateError> {
    let mut out = Vec::with_capacity(batch.len());
    for mut item in batch {
        item.title = translator.translate(&item.title, target_lang).await?;
        item.body = translator.translate(&item.body, target_lang).await?;
        out.push(item);
    }
    Ok(out)
}
