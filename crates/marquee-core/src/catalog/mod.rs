//! Catalog query service consumed by the suggestion engine.

mod tmdb;

pub use tmdb::{TmdbCatalog, parse_search_response};

use crate::Result;
use futures_util::future::BoxFuture;
use marquee_types::ResultItem;

/// Ranked lookup of catalog items for a text query.
///
/// Implementations return the first page of results; the controller trims
/// them to its own limit. Any failure is reported as `Error::LookupFailed`.
pub trait CatalogService: Send + Sync {
    fn lookup(&self, query: &str) -> BoxFuture<'static, Result<Vec<ResultItem>>>;
}
