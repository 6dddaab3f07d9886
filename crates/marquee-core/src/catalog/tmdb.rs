//! TMDB `/search/multi` client.

use super::CatalogService;
use crate::config::CatalogConfig;
use crate::controller::encode_component;
use crate::{Error, Result};
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use marquee_types::{MediaKind, MediaResult, PersonResult, ResultItem};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "media_type", rename_all = "snake_case")]
enum SearchHit {
    Movie(MediaHit),
    Tv(MediaHit),
    Person(PersonHit),
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct MediaHit {
    id: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    first_air_date: Option<String>,
    #[serde(default)]
    poster_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PersonHit {
    id: u64,
    name: String,
    #[serde(default)]
    known_for_department: Option<String>,
    #[serde(default)]
    profile_path: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Year from a `YYYY-MM-DD` date
fn year_of(date: Option<&str>) -> Option<i32> {
    date?.get(..4)?.parse().ok()
}

impl MediaHit {
    fn into_item(self, media_kind: MediaKind) -> ResultItem {
        let date = match media_kind {
            MediaKind::Movie => self.release_date.as_deref().or(self.first_air_date.as_deref()),
            MediaKind::Series => self.first_air_date.as_deref().or(self.release_date.as_deref()),
        };
        let release_year = year_of(date.filter(|d| !d.is_empty()));
        let title = non_empty(self.title)
            .or_else(|| non_empty(self.name))
            .unwrap_or_else(|| "Untitled".to_string());

        ResultItem::Media(MediaResult {
            id: self.id,
            title,
            release_year,
            media_kind,
            thumbnail: non_empty(self.poster_path),
        })
    }
}

/// Decode a `/search/multi` body into result items, dropping unknown kinds.
///
/// # Errors
///
/// Returns `Error::LookupFailed` if the body is not a search page.
pub fn parse_search_response(body: &[u8]) -> Result<Vec<ResultItem>> {
    let page: SearchPage = serde_json::from_slice(body)
        .map_err(|e| Error::LookupFailed(format!("unexpected response body: {e}")))?;

    Ok(page
        .results
        .into_iter()
        .filter_map(|hit| match hit {
            SearchHit::Movie(m) => Some(m.into_item(MediaKind::Movie)),
            SearchHit::Tv(m) => Some(m.into_item(MediaKind::Series)),
            SearchHit::Person(p) => Some(ResultItem::Person(PersonResult {
                id: p.id,
                name: p.name,
                department: non_empty(p.known_for_department),
                thumbnail: non_empty(p.profile_path),
            })),
            SearchHit::Other => None,
        })
        .collect())
}

/// Catalog backed by The Movie Database
#[derive(Debug, Clone)]
pub struct TmdbCatalog {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    include_adult: bool,
}

impl TmdbCatalog {
    #[must_use]
    pub fn new(config: &CatalogConfig, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            include_adult: config.include_adult,
        }
    }

    /// Build from config, reading the key from the configured variable.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the API key variable is unset or empty.
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        let api_key = config
            .api_key()
            .ok_or_else(|| Error::Config(format!("{} is not set", config.api_key_env)))?;
        Ok(Self::new(config, api_key))
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}/search/multi?query={}&include_adult={}&api_key={}",
            self.base_url,
            encode_component(query),
            self.include_adult,
            encode_component(&self.api_key)
        )
    }
}

impl CatalogService for TmdbCatalog {
    fn lookup(&self, query: &str) -> BoxFuture<'static, Result<Vec<ResultItem>>> {
        let client = self.client.clone();
        let url = self.search_url(query);
        let query = query.to_string();

        async move {
            let response = client
                .get(&url)
                .send()
                .await
                .map_err(|e| Error::LookupFailed(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(Error::LookupFailed(format!("HTTP {status}")));
            }

            let body = response
                .bytes()
                .await
                .map_err(|e| Error::LookupFailed(e.to_string()))?;
            let items = parse_search_response(&body)?;
            debug!(query = %query, count = items.len(), "Catalog lookup finished");
            Ok(items)
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "page": 1,
        "results": [
            {"media_type": "movie", "id": 603, "title": "The Matrix",
             "release_date": "1999-03-31", "poster_path": "/matrix.jpg"},
            {"media_type": "tv", "id": 1399, "name": "Game of Thrones",
             "first_air_date": "2011-04-17", "poster_path": null},
            {"media_type": "person", "id": 6384, "name": "Keanu Reeves",
             "known_for_department": "Acting", "profile_path": "/keanu.jpg"},
            {"media_type": "collection", "id": 2344, "name": "The Matrix Collection"}
        ],
        "total_results": 4
    }"#;

    #[test]
    fn parses_movies_series_and_people() {
        let items = parse_search_response(SAMPLE.as_bytes()).unwrap();
        assert_eq!(items.len(), 3);

        assert_eq!(
            items[0],
            ResultItem::Media(MediaResult {
                id: 603,
                title: "The Matrix".to_string(),
                release_year: Some(1999),
                media_kind: MediaKind::Movie,
                thumbnail: Some("/matrix.jpg".to_string()),
            })
        );
        assert_eq!(
            items[1],
            ResultItem::Media(MediaResult {
                id: 1399,
                title: "Game of Thrones".to_string(),
                release_year: Some(2011),
                media_kind: MediaKind::Series,
                thumbnail: None,
            })
        );
        assert_eq!(
            items[2],
            ResultItem::Person(PersonResult {
                id: 6384,
                name: "Keanu Reeves".to_string(),
                department: Some("Acting".to_string()),
                thumbnail: Some("/keanu.jpg".to_string()),
            })
        );
    }

    #[test]
    fn missing_titles_and_dates() {
        let body = r#"{"results": [
            {"media_type": "movie", "id": 1, "title": "", "release_date": ""},
            {"media_type": "movie", "id": 2, "name": "Named Only"}
        ]}"#;
        let items = parse_search_response(body.as_bytes()).unwrap();
        assert_eq!(items[0].display_name(), "Untitled");
        assert!(matches!(&items[0], ResultItem::Media(m) if m.release_year.is_none()));
        assert_eq!(items[1].display_name(), "Named Only");
    }

    #[test]
    fn empty_page_and_bad_body() {
        assert!(parse_search_response(b"{}").unwrap().is_empty());
        assert!(matches!(
            parse_search_response(b"<html>rate limited</html>"),
            Err(Error::LookupFailed(_))
        ));
    }

    #[test]
    fn search_url_encodes_query_and_key() {
        let catalog = TmdbCatalog::new(
            &CatalogConfig {
                base_url: "https://api.example.test/3/".to_string(),
                ..CatalogConfig::default()
            },
            "k&y".to_string(),
        );
        assert_eq!(
            catalog.search_url("the matrix"),
            "https://api.example.test/3/search/multi?query=the%20matrix&include_adult=false&api_key=k%26y"
        );
    }

    #[test]
    fn year_of_short_dates() {
        assert_eq!(year_of(Some("2024")), Some(2024));
        assert_eq!(year_of(Some("20")), None);
        assert_eq!(year_of(None), None);
    }
}
