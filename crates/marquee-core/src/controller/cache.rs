//! Short-lived cache of successful lookups, keyed by the exact query.

use marquee_types::ResultItem;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

/// Upper bound on cached queries; the oldest entry is evicted first
const MAX_ENTRIES: usize = 64;

#[derive(Debug, Clone)]
struct CacheEntry {
    stored_at: Instant,
    items: Vec<ResultItem>,
}

#[derive(Debug, Clone)]
pub struct SuggestionCache {
    ttl: Option<Duration>,
    entries: HashMap<String, CacheEntry>,
}

impl SuggestionCache {
    /// `None` disables caching entirely
    #[must_use]
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Fresh items for `query`, dropping the entry if it has expired
    pub fn get(&mut self, query: &str) -> Option<Vec<ResultItem>> {
        let ttl = self.ttl?;
        let entry = self.entries.get(query)?;
        if entry.stored_at.elapsed() >= ttl {
            self.entries.remove(query);
            return None;
        }
        Some(entry.items.clone())
    }

    pub fn insert(&mut self, query: &str, items: Vec<ResultItem>) {
        if self.ttl.is_none() {
            return;
        }
        if self.entries.len() >= MAX_ENTRIES
            && !self.entries.contains_key(query)
            && let Some(oldest) = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.stored_at)
                .map(|(key, _)| key.clone())
        {
            self.entries.remove(&oldest);
        }
        self.entries.insert(
            query.to_string(),
            CacheEntry {
                stored_at: Instant::now(),
                items,
            },
        );
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
