//! Turns scraped items into embed-shaped notification messages.

use crate::models::{Color, EmbedField, NO_DESCRIPTION, NO_TIME, NewsItem, NotificationMessage};
use chrono::{DateTime, Utc};

/// Name of the field carrying a government release's publication time.
pub const PUBLISHED_AT: &str = "发布时间";

/// Format one item as of `now`.
///
/// Aggregator items become plain info messages. Government items get an
/// alert colour, a bracketed source label in the title and a
/// [`PUBLISHED_AT`] field.
pub fn format(item: NewsItem, now: DateTime<Utc>) -> NotificationMessage {
    let description = if item.body.trim().is_empty() {
        NO_DESCRIPTION.to_string()
    } else {
        item.body
    };

    match item.source_tag {
        None => NotificationMessage {
            title: item.title,
            description,
            color: Color::Info,
            timestamp: now,
            fields: Vec::new(),
        },
        Some(tag) => NotificationMessage {
            title: format!("[{}] {}", tag.label(), item.title),
            description,
            color: Color::Alert,
            timestamp: now,
            fields: vec![EmbedField {
                name: PUBLISHED_AT.to_string(),
                value: item.timestamp.unwrap_or_else(|| NO_TIME.to_string()),
            }],
        },
    }
}
