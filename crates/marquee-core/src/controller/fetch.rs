//! Lookup issuing and the staleness guard.
//!
//! Each lookup is tagged with the settled query it was issued for. When it
//! resolves, the result is applied only if that query is still the settled
//! one; anything else is a superseded lookup and is dropped.

use super::cache::SuggestionCache;
use crate::Result;
use marquee_types::ResultItem;
use tracing::{debug, warn};

/// Tag attached to an in-flight lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    /// Settled query the lookup was issued for
    pub query: String,
    /// Issue order, for logging
    pub sequence: u64,
}

/// Suggestions for one settled query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionSet {
    pub query: String,
    pub items: Vec<ResultItem>,
}

#[derive(Debug, Clone)]
pub struct FetchCoordinator {
    min_len: usize,
    max_items: usize,
    current: Option<SuggestionSet>,
    in_flight: Option<String>,
    cache: SuggestionCache,
    sequence: u64,
}

impl FetchCoordinator {
    #[must_use]
    pub fn new(min_len: usize, max_items: usize, cache: SuggestionCache) -> Self {
        Self {
            min_len,
            max_items,
            current: None,
            in_flight: None,
            cache,
            sequence: 0,
        }
    }

    /// React to a newly settled query.
    ///
    /// Clears the set for short queries, serves fresh cache entries directly,
    /// and otherwise returns the ticket of the single lookup to issue.
    pub fn settle(&mut self, query: &str) -> Option<LookupTicket> {
        if query.chars().count() < self.min_len {
            debug!(query, "Query below minimum length, clearing suggestions");
            self.current = None;
            self.in_flight = None;
            return None;
        }

        if let Some(items) = self.cache.get(query) {
            debug!(query, count = items.len(), "Serving suggestions from cache");
            self.in_flight = None;
            self.current = Some(SuggestionSet {
                query: query.to_string(),
                items,
            });
            return None;
        }

        self.sequence += 1;
        self.in_flight = Some(query.to_string());
        debug!(query, sequence = self.sequence, "Issuing catalog lookup");
        Some(LookupTicket {
            query: query.to_string(),
            sequence: self.sequence,
        })
    }

    /// Apply a resolved lookup. Returns true if it replaced the current set.
    pub fn resolve(
        &mut self,
        ticket: &LookupTicket,
        result: Result<Vec<ResultItem>>,
        settled: &str,
    ) -> bool {
        let items = match result {
            Ok(mut items) => {
                items.truncate(self.max_items);
                self.cache.insert(&ticket.query, items.clone());
                items
            }
            Err(e) => {
                warn!(query = %ticket.query, "Catalog lookup failed: {e}");
                Vec::new()
            }
        };

        if ticket.query != settled {
            debug!(
                query = %ticket.query,
                sequence = ticket.sequence,
                settled,
                "Discarding stale lookup result"
            );
            return false;
        }

        self.in_flight = None;
        self.current = Some(SuggestionSet {
            query: ticket.query.clone(),
            items,
        });
        true
    }

    /// Items to render for `settled`; empty unless the set belongs to it
    #[must_use]
    pub fn visible(&self, settled: &str) -> &[ResultItem] {
        match &self.current {
            Some(set) if set.query == settled => &set.items,
            _ => &[],
        }
    }

    /// Whether a lookup for `settled` is still outstanding
    #[must_use]
    pub fn is_fetching(&self, settled: &str) -> bool {
        self.in_flight.as_deref() == Some(settled)
    }

    #[must_use]
    pub fn current(&self) -> Option<&SuggestionSet> {
        self.current.as_ref()
    }
}
