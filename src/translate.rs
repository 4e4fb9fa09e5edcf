//! Machine translation for foreign-language releases.
//!
//! [`Translator`] is the seam the government scraper depends on.
//! [`GoogleTranslator`] talks to the public `translate_a/single` endpoint
//! with source-language auto detection.

use crate::error::TranslateError;
use crate::utils::truncate_for_log;
use itertools::Itertools;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

/// Default endpoint for [`GoogleTranslator`].
pub const GOOGLE_TRANSLATE_URL: &str = "https://translate.googleapis.com/translate_a/single";

/// Capability to translate text into a requested language.
pub trait Translator {
    /// Translate `text` into `target_lang`; the source language is inferred.
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslateError>;
}

/// Translator backed by Google's keyless web endpoint.
#[derive(Debug, Clone)]
pub struct GoogleTranslator {
    client: Client,
    endpoint: Url,
}

impl GoogleTranslator {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            endpoint: Url::parse(GOOGLE_TRANSLATE_URL).expect("static translate URL is valid"),
        }
    }

    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = endpoint;
        self
    }
}

impl Translator for GoogleTranslator {
    #[instrument(level = "debug", skip_all, fields(target_lang = %target_lang, chars = text.chars().count()))]
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslateError> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target_lang),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslateError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let translated = parse_response(&body)?;
        debug!(preview = %truncate_for_log(&translated, 80), "Translated text");
        Ok(translated)
    }
}

/// Pull the translated text out of a `translate_a/single` reply.
///
/// The reply is a nested array whose first element lists sentence segments;
/// the translated text of each segment sits at index 0.
pub fn parse_response(body: &str) -> Result<String, TranslateError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| TranslateError::Malformed(e.to_string()))?;
    let segments = value
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslateError::Malformed(truncate_for_log(body, 120)))?;

    let text = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .join("");

    if text.is_empty() {
        return Err(TranslateError::Malformed("no translated segments".to_string()));
    }
    Ok(text)
}
