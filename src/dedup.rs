//! Process-lifetime record of announced headlines.
//!
//! A title is recorded the moment it is judged new. Nothing downstream
//! (translation, formatting, sending) can un-record it, which gives
//! at-most-once delivery per title.

use crate::models::NewsItem;
use std::collections::{HashSet, VecDeque};
use tracing::debug;

const INITIAL_RESERVE: usize = 1024;

/// Set of trimmed titles seen since process start.
///
/// Unbounded by default. With a capacity, the oldest titles are evicted in
/// insertion order once the store is full; an evicted title that shows up
/// again is announced again.
#[derive(Debug, Default)]
pub struct DedupStore {
    seen: HashSet<String>,
    order: VecDeque<String>,
    capacity: Option<usize>,
}

impl DedupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that keeps at most `capacity` titles.
    ///
    /// Storage grows as titles arrive; only a small head start is reserved
    /// up front whatever the cap.
    pub fn with_capacity(capacity: usize) -> Self {
        let reserve = capacity.min(INITIAL_RESERVE);
        Self {
            seen: HashSet::with_capacity(reserve),
            order: VecDeque::with_capacity(reserve),
            capacity: Some(capacity.max(1)),
        }
    }

    pub fn has(&self, title: &str) -> bool {
        self.seen.contains(title.trim())
    }

    /// Record a title. Returns `true` if it was not already present.
    pub fn add(&mut self, title: &str) -> bool {
        if self.has(title) {
            return false;
        }
        let key = title.trim().to_string();
        self.seen.insert(key.clone());
        if let Some(cap) = self.capacity {
            self.order.push_back(key);
            while self.order.len() > cap {
                if let Some(oldest) = self.order.pop_front() {
                    debug!(title = %oldest, "Evicting oldest seen title");
                    self.seen.remove(&oldest);
                }
            }
        }
        true
    }

    /// Keep only items whose title has not been seen, marking each as seen.
    ///
    /// Repeats within `items` are also dropped, keeping the first.
    pub fn filter_new(&mut self, items: Vec<NewsItem>) -> Vec<NewsItem> {
        items
            .into_iter()
            .filter(|item| self.add(&item.title))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
