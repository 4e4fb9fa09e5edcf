//! Outbound side: message formatting and the chat sink.
//!
//! # Submodules
//!
//! - [`formatter`]: Maps a [`NewsItem`](crate::models::NewsItem) to a [`NotificationMessage`]
//! - [`discord`]: Posts messages to a Discord channel as a bot

pub mod discord;
pub mod formatter;

use crate::error::SinkError;
use crate::models::NotificationMessage;

/// Destination for finished notifications.
pub trait ChatSink {
    /// Whether the target channel can be resolved right now.
    async fn ready(&self) -> Result<(), SinkError>;

    /// Deliver one message. Failures are not retried by callers.
    async fn send(&self, message: &NotificationMessage) -> Result<(), SinkError>;
}
