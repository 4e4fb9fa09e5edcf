//! Data models for scraped headlines and outbound notifications.
//!
//! This module defines the core data structures used throughout the application:
//! - [`NewsItem`]: A normalized candidate headline produced by a scraper
//! - [`SourceTag`]: Which government release page an item came from
//! - [`NotificationMessage`]: The embed-shaped message handed to the sink
//!
//! Items and messages live for a single tick; only the dedup store outlives one.

use chrono::{DateTime, Utc};

/// Body used when a page carries no description for a headline.
pub const NO_DESCRIPTION: &str = "无描述";

/// Timestamp text used when a government article has no date node.
pub const NO_TIME: &str = "无时间";

/// Label used for source tags that have no human-readable name.
pub const UNKNOWN_SOURCE: &str = "未知来源";

/// A candidate notification scraped from a source page.
///
/// `title` is always trimmed and non-empty; scrapers drop anything else
/// before it reaches the dedup stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsItem {
    /// The headline text, also the dedup key.
    pub title: String,
    /// Description or summary, [`NO_DESCRIPTION`] when absent.
    pub body: String,
    /// Free-text publication time as printed on the page.
    pub timestamp: Option<String>,
    /// Government source; `None` for the aggregator.
    pub source_tag: Option<SourceTag>,
}

impl NewsItem {
    /// Build an aggregator item with no timestamp or source tag.
    pub fn headline(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            timestamp: None,
            source_tag: None,
        }
    }
}

/// Identifies which government data source produced an item.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceTag {
    /// Federal Reserve press releases.
    Fed,
    /// BLS consumer price index.
    Cpi,
    /// BLS producer price index.
    Ppi,
    /// Department of Labor releases (non-farm payrolls).
    NonFarmJobs,
    /// Any key without a dedicated variant.
    Other(String),
}

impl SourceTag {
    /// Map a config key such as `"non_farm_jobs"` to a tag.
    pub fn from_key(key: &str) -> Self {
        match key {
            "fed" => SourceTag::Fed,
            "cpi" => SourceTag::Cpi,
            "ppi" => SourceTag::Ppi,
            "non_farm_jobs" => SourceTag::NonFarmJobs,
            other => SourceTag::Other(other.to_string()),
        }
    }

    /// The short key used in logs.
    pub fn key(&self) -> &str {
        match self {
            SourceTag::Fed => "fed",
            SourceTag::Cpi => "cpi",
            SourceTag::Ppi => "ppi",
            SourceTag::NonFarmJobs => "non_farm_jobs",
            SourceTag::Other(key) => key,
        }
    }

    /// Localized label prefixed to notification titles.
    pub fn label(&self) -> &'static str {
        match self {
            SourceTag::Fed => "美联储新闻",
            SourceTag::Cpi => "消费者物价指数",
            SourceTag::Ppi => "生产者物价指数",
            SourceTag::NonFarmJobs => "非农就业数据",
            SourceTag::Other(_) => UNKNOWN_SOURCE,
        }
    }
}

impl std::fmt::Display for SourceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Embed accent colour, by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Aggregator headlines.
    Info,
    /// Government releases.
    Alert,
}

impl Color {
    /// RGB value as Discord expects it.
    pub fn rgb(self) -> u32 {
        match self {
            Color::Info => 0x3498db,
            Color::Alert => 0x2ecc71,
        }
    }
}

/// A named value shown under the embed body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
}

/// One message ready for the sink.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationMessage {
    pub title: String,
    pub description: String,
    pub color: Color,
    pub timestamp: DateTime<Utc>,
    /// Shown in order.
    pub fields: Vec<EmbedField>,
}
