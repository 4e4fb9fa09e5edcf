//! In-memory stand-ins for the network-facing capabilities.

use crate::error::{FetchError, SinkError, TranslateError};
use crate::models::NotificationMessage;
use crate::notify::ChatSink;
use crate::scrapers::PageFetcher;
use crate::translate::Translator;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Serves fixed pages; unknown URLs answer 404, failing ones 500.
#[derive(Debug, Default)]
pub struct FakeFetcher {
    pages: HashMap<String, String>,
    failing: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn failing(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    /// URLs requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl PageFetcher for FakeFetcher {
    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        if self.failing.contains(url) {
            return Err(FetchError::Status {
                status: 500,
                url: url.to_string(),
            });
        }
        self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
            status: 404,
            url: url.to_string(),
        })
    }
}

/// Prefixes text with `[lang] `, or fails on one exact input.
#[derive(Debug, Default)]
pub struct FakeTranslator {
    fail_on: Option<String>,
}

impl FakeTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, text: &str) -> Self {
        self.fail_on = Some(text.to_string());
        self
    }
}

impl Translator for FakeTranslator {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslateError> {
        if self.fail_on.as_deref() == Some(text) {
            return Err(TranslateError::Status(429));
        }
        Ok(format!("[{target_lang}] {text}"))
    }
}

/// Records messages; can be unavailable or reject every send.
#[derive(Debug)]
pub struct FakeSink {
    available: bool,
    reject_sends: bool,
    sent: Mutex<Vec<NotificationMessage>>,
    attempts: Mutex<usize>,
}

impl FakeSink {
    fn build(available: bool, reject_sends: bool) -> Self {
        Self {
            available,
            reject_sends,
            sent: Mutex::new(Vec::new()),
            attempts: Mutex::new(0),
        }
    }

    pub fn available() -> Self {
        Self::build(true, false)
    }

    pub fn unavailable() -> Self {
        Self::build(false, false)
    }

    pub fn rejecting() -> Self {
        Self::build(true, true)
    }

    pub fn sent(&self) -> Vec<NotificationMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

impl ChatSink for FakeSink {
    async fn ready(&self) -> Result<(), SinkError> {
        if self.available {
            Ok(())
        } else {
            Err(SinkError::NotConfigured("fake channel missing"))
        }
    }

    async fn send(&self, message: &NotificationMessage) -> Result<(), SinkError> {
        *self.attempts.lock().unwrap() += 1;
        if self.reject_sends {
            return Err(SinkError::Status {
                status: 403,
                body: "Missing Access".to_string(),
            });
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}
