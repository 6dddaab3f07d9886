//! Navigation targets for committed suggestions.

use crate::config::RouteConfig;
use crate::slug::generate_slug;
use crate::{Error, Result};
use marquee_types::{MediaKind, NavigationTarget, ResultItem};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tracing::warn;

/// Characters left alone by a URI component encoder
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a query string value
#[must_use]
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, QUERY_COMPONENT).to_string()
}

/// What a commit navigates to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Commit {
    Item(ResultItem),
    ViewAll,
}

#[derive(Debug, Clone, Default)]
pub struct RouteBuilder {
    routes: RouteConfig,
}

impl RouteBuilder {
    #[must_use]
    pub fn new(routes: RouteConfig) -> Self {
        Self { routes }
    }

    fn prefix_for(&self, item: &ResultItem) -> &str {
        let prefix = match item {
            ResultItem::Person(_) => &self.routes.person,
            ResultItem::Media(m) => match m.media_kind {
                MediaKind::Movie => &self.routes.movie,
                MediaKind::Series => &self.routes.series,
            },
        };
        prefix.trim_end_matches('/')
    }

    /// Detail route built from the item's slug.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidNavigationTarget` if the resulting path is not routable.
    pub fn try_item_route(&self, item: &ResultItem) -> Result<NavigationTarget> {
        let path = format!(
            "{}/{}",
            self.prefix_for(item),
            generate_slug(item.display_name(), item.id())
        );
        NavigationTarget::new(path.clone()).ok_or(Error::InvalidNavigationTarget(path))
    }

    /// Detail route for an item, falling back to the id alone when the slug
    /// route cannot be built.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidNavigationTarget` only if the route prefix itself
    /// is unroutable.
    pub fn item_route(&self, item: &ResultItem) -> Result<NavigationTarget> {
        self.try_item_route(item).or_else(|e| {
            warn!("{e}, falling back to id route");
            let path = format!("{}/{}", self.prefix_for(item), item.id());
            NavigationTarget::new(path.clone()).ok_or(Error::InvalidNavigationTarget(path))
        })
    }

    /// Full results route for a trimmed query. `None` for an empty query.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidNavigationTarget` if the search prefix is unroutable.
    pub fn search_route(&self, query: &str) -> Result<Option<NavigationTarget>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }
        let path = format!(
            "{}?q={}",
            self.routes.search.trim_end_matches('/'),
            encode_component(query)
        );
        NavigationTarget::new(path.clone())
            .map(Some)
            .ok_or(Error::InvalidNavigationTarget(path))
    }
}
