//! Error types for each boundary of the relay.
//!
//! None of these escape a tick: fetch errors become "no items from this
//! source", translation errors drop one source tag's batch, and sink errors
//! either skip the tick or lose one message.

use thiserror::Error;

/// A page could not be turned into markup.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },
}

/// The translation backend failed or answered with something unreadable.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("translation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("translation service returned status {0}")]
    Status(u16),

    #[error("malformed translation response: {0}")]
    Malformed(String),
}

/// The chat channel could not be resolved or a message was rejected.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink not configured: {0}")]
    NotConfigured(&'static str),

    #[error("Discord request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Discord returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid Discord URL: {0}")]
    Url(#[from] url::ParseError),
}
