//! Quiet-interval debounce over the trimmed query.
//!
//! Every distinct trimmed value restarts the interval under a new
//! generation. A timer only settles the query if its generation is still
//! the latest one, so a timer the caller failed to abort is harmless.

use std::time::Duration;
use tracing::debug;

/// Identifies one scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceTicket {
    pub generation: u64,
}

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    min_len: usize,
    generation: u64,
    /// Value waiting for the interval to elapse
    pending: Option<String>,
    /// Last value that survived a full interval
    settled: String,
}

impl Debouncer {
    #[must_use]
    pub fn new(delay: Duration, min_len: usize) -> Self {
        Self {
            delay,
            min_len,
            generation: 0,
            pending: None,
            settled: String::new(),
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Observe a new trimmed query.
    ///
    /// Returns a ticket when a timer must be started. Any earlier ticket is
    /// invalidated. Returning to the settled value cancels without a new timer.
    pub fn observe(&mut self, trimmed: &str) -> Option<DebounceTicket> {
        if self.pending.as_deref() == Some(trimmed) {
            return None;
        }

        self.generation += 1;
        if trimmed == self.settled {
            self.pending = None;
            debug!(
                generation = self.generation,
                "Debounce cancelled, query back to settled value"
            );
            return None;
        }

        self.pending = Some(trimmed.to_string());
        Some(DebounceTicket {
            generation: self.generation,
        })
    }

    /// Timer fired. Returns the newly settled query if the ticket is current
    /// and the value actually changed.
    pub fn fire(&mut self, ticket: DebounceTicket) -> Option<&str> {
        if ticket.generation != self.generation {
            debug!(
                generation = ticket.generation,
                current = self.generation,
                "Ignoring superseded debounce timer"
            );
            return None;
        }

        let value = self.pending.take()?;
        if value == self.settled {
            return None;
        }
        self.settled = value;
        Some(&self.settled)
    }

    #[must_use]
    pub fn settled(&self) -> &str {
        &self.settled
    }

    /// True while a long-enough query has not reached the settled value yet
    #[must_use]
    pub fn is_pending(&self, trimmed: &str) -> bool {
        trimmed.chars().count() >= self.min_len && trimmed != self.settled
    }
}
