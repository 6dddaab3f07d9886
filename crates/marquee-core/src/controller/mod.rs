//! Search-suggestion controller.
//!
//! [`SuggestionController`] is the explicit state of one search entry: the
//! typed query, the debounced query, the current suggestion set, the
//! highlighted row and whether the panel is open. Each input is a plain
//! method that mutates that state and returns the [`Effect`]s the caller
//! has to carry out (start a timer, run a lookup, navigate). Nothing here
//! touches a runtime, so every transition can be tested directly.

mod cache;
mod commit;
mod debounce;
mod fetch;
mod input;
mod selection;

pub use cache::SuggestionCache;
pub use commit::{Commit, RouteBuilder, encode_component};
pub use debounce::{DebounceTicket, Debouncer};
pub use fetch::{FetchCoordinator, LookupTicket, SuggestionSet};
pub use input::InputBuffer;
pub use selection::Selection;

use crate::Result;
use crate::config::Config;
use marquee_types::{ControllerEvent, Key, NavigationTarget, ResultItem, SuggestionSnapshot};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Work requested by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start the quiet-interval timer; report back with `debounce_elapsed`
    ScheduleDebounce {
        ticket: DebounceTicket,
        delay: Duration,
    },
    /// Query the catalog; report back with `lookup_resolved`
    Lookup(LookupTicket),
    /// Hand the target to the router
    Navigate(NavigationTarget),
    /// Close the enclosing search entry
    Close,
}

#[derive(Debug, Clone)]
pub struct SuggestionController {
    min_len: usize,
    input: InputBuffer,
    debouncer: Debouncer,
    fetch: FetchCoordinator,
    selection: Selection,
    /// Cleared by dismissal, set again by an edit reaching `min_len`
    panel_open: bool,
    routes: RouteBuilder,
}

impl SuggestionController {
    /// Build a controller from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the configuration fails validation.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let suggest = &config.suggest;
        Ok(Self {
            min_len: suggest.min_query_length,
            input: InputBuffer::default(),
            debouncer: Debouncer::new(suggest.debounce(), suggest.min_query_length),
            fetch: FetchCoordinator::new(
                suggest.min_query_length,
                suggest.max_suggestions,
                SuggestionCache::new(suggest.cache_ttl()),
            ),
            selection: Selection::Idle,
            panel_open: true,
            routes: RouteBuilder::new(config.routes.clone()),
        })
    }

    /// Dispatch a front-end event
    pub fn handle(&mut self, event: ControllerEvent) -> Vec<Effect> {
        match event {
            ControllerEvent::QueryChanged { query } => self.set_query(&query),
            ControllerEvent::KeyPressed { key } => self.key_pressed(key),
            ControllerEvent::RowHovered { index } => {
                self.row_hovered(index);
                Vec::new()
            }
            ControllerEvent::RowClicked { index } => self.row_clicked(index),
            ControllerEvent::ViewAllClicked => self.commit(Commit::ViewAll),
            ControllerEvent::ClickedOutside => {
                self.click_outside();
                Vec::new()
            }
        }
    }

    /// Input text changed. The highlight resets immediately; suggestions
    /// follow once the debounce settles.
    pub fn set_query(&mut self, text: &str) -> Vec<Effect> {
        self.input.set(text);
        self.selection = Selection::Idle;
        if self.input.len() >= self.min_len {
            self.panel_open = true;
        }

        match self.debouncer.observe(self.input.trimmed()) {
            Some(ticket) => vec![Effect::ScheduleDebounce {
                ticket,
                delay: self.debouncer.delay(),
            }],
            None => Vec::new(),
        }
    }

    /// A debounce timer fired
    pub fn debounce_elapsed(&mut self, ticket: DebounceTicket) -> Vec<Effect> {
        let Some(settled) = self.debouncer.fire(ticket) else {
            return Vec::new();
        };
        debug!(query = settled, "Query settled");

        let lookup = self.fetch.settle(settled);
        self.selection = Selection::Idle;
        lookup.map(Effect::Lookup).into_iter().collect()
    }

    /// A catalog lookup finished, successfully or not
    pub fn lookup_resolved(
        &mut self,
        ticket: &LookupTicket,
        result: Result<Vec<ResultItem>>,
    ) -> Vec<Effect> {
        if self
            .fetch
            .resolve(ticket, result, self.debouncer.settled())
        {
            self.selection = Selection::Idle;
        }
        Vec::new()
    }

    pub fn key_pressed(&mut self, key: Key) -> Vec<Effect> {
        let visible = self.is_panel_visible();
        let count = self.suggestions().len();

        match key {
            Key::ArrowDown | Key::ArrowUp => {
                if !visible || (count == 0 && !self.is_loading()) {
                    return Vec::new();
                }
                self.selection = if key == Key::ArrowDown {
                    self.selection.next(count)
                } else {
                    self.selection.prev(count)
                };
                Vec::new()
            }
            Key::Enter => {
                let row = if visible {
                    self.selection.item_row(count)
                } else {
                    None
                };
                match row {
                    Some(i) => {
                        let item = self.suggestions()[i].clone();
                        self.commit(Commit::Item(item))
                    }
                    None => self.commit(Commit::ViewAll),
                }
            }
            Key::Escape => {
                if visible {
                    debug!("Escape: hiding suggestion panel");
                    self.panel_open = false;
                    Vec::new()
                } else {
                    vec![Effect::Close]
                }
            }
        }
    }

    /// Pointer over a row. Highlights it without committing.
    pub fn row_hovered(&mut self, index: usize) {
        if self.is_panel_visible() && index <= self.suggestions().len() {
            self.selection = Selection::Highlighted(index);
        }
    }

    /// Row clicked: highlight it, then commit
    pub fn row_clicked(&mut self, index: usize) -> Vec<Effect> {
        if !self.is_panel_visible() {
            return Vec::new();
        }
        let count = self.suggestions().len();
        if index > count {
            debug!(index, count, "Ignoring click on missing row");
            return Vec::new();
        }

        self.selection = Selection::Highlighted(index);
        match self.selection.item_row(count) {
            Some(i) => {
                let item = self.suggestions()[i].clone();
                self.commit(Commit::Item(item))
            }
            None => self.commit(Commit::ViewAll),
        }
    }

    /// Pointer interaction outside the search entry. Idempotent.
    pub fn click_outside(&mut self) {
        self.panel_open = false;
    }

    /// Navigate to an item or the full results page, then reset the entry.
    pub fn commit(&mut self, commit: Commit) -> Vec<Effect> {
        let target = match &commit {
            Commit::Item(item) => self.routes.item_route(item).map(Some),
            Commit::ViewAll => self.routes.search_route(self.input.trimmed()),
        };

        let target = match target {
            Ok(Some(target)) => target,
            Ok(None) => {
                debug!("Nothing to search for, ignoring commit");
                return Vec::new();
            }
            Err(e) => {
                warn!("Cannot commit selection: {e}");
                return Vec::new();
            }
        };

        info!(path = %target, "Committing search selection");
        let mut effects = self.set_query("");
        self.panel_open = false;
        effects.push(Effect::Navigate(target));
        effects.push(Effect::Close);
        effects
    }

    /// Query as typed
    #[must_use]
    pub fn query(&self) -> &str {
        self.input.raw()
    }

    #[must_use]
    pub fn debounced_query(&self) -> &str {
        self.debouncer.settled()
    }

    /// Suggestions belonging to the settled query
    #[must_use]
    pub fn suggestions(&self) -> &[ResultItem] {
        self.fetch.visible(self.debouncer.settled())
    }

    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection.clamp(self.suggestions().len())
    }

    #[must_use]
    pub fn selected_index(&self) -> i64 {
        self.selection().index()
    }

    #[must_use]
    pub fn is_panel_visible(&self) -> bool {
        self.panel_open && self.input.len() >= self.min_len
    }

    /// Debouncing: typed query not settled yet
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending(self.input.trimmed())
    }

    /// Debouncing or waiting on the catalog
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.is_pending() || self.fetch.is_fetching(self.debouncer.settled())
    }

    #[must_use]
    pub fn snapshot(&self) -> SuggestionSnapshot {
        SuggestionSnapshot {
            query: self.input.trimmed().to_string(),
            suggestions: self.suggestions().to_vec(),
            selected_index: self.selected_index(),
            panel_visible: self.is_panel_visible(),
            is_loading: self.is_loading(),
        }
    }
}
