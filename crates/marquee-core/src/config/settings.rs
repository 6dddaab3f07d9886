use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub suggest: SuggestConfig,

    #[serde(default)]
    pub routes: RouteConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl Config {
    /// Load config from file. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid JSON,
    /// or holds values that fail validation.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        super::validation::warn_unknown_fields(&content, "config.json");
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check values serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.suggest.min_query_length == 0 {
            return Err(Error::Config(
                "suggest.minQueryLength must be at least 1".to_string(),
            ));
        }
        if self.suggest.max_suggestions == 0 {
            return Err(Error::Config(
                "suggest.maxSuggestions must be at least 1".to_string(),
            ));
        }
        for (field, prefix) in self.routes.prefixes() {
            super::validation::check_route_prefix(field, prefix)?;
        }
        Ok(())
    }
}

/// Suggestion timing and sizing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestConfig {
    /// Quiet interval before a query is looked up
    #[serde(default = "default_debounce")]
    pub debounce_ms: u64,

    /// Trimmed length below which no lookup is made and the panel stays closed
    #[serde(default = "default_min_query_length")]
    pub min_query_length: usize,

    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,

    /// How long a successful lookup is reused for the same query (0 disables)
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_ms: u64,
}

fn default_debounce() -> u64 {
    300
}
fn default_min_query_length() -> usize {
    2
}
fn default_max_suggestions() -> usize {
    8
}
fn default_cache_ttl() -> u64 {
    5 * 60 * 1000
}

impl SuggestConfig {
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    #[must_use]
    pub fn cache_ttl(&self) -> Option<Duration> {
        (self.cache_ttl_ms > 0).then(|| Duration::from_millis(self.cache_ttl_ms))
    }
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce(),
            min_query_length: default_min_query_length(),
            max_suggestions: default_max_suggestions(),
            cache_ttl_ms: default_cache_ttl(),
        }
    }
}

/// Route prefixes for navigation targets
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteConfig {
    #[serde(default = "default_person_route")]
    pub person: String,

    #[serde(default = "default_movie_route")]
    pub movie: String,

    #[serde(default = "default_series_route")]
    pub series: String,

    /// Full results page, receives `?q=<query>`
    #[serde(default = "default_search_route")]
    pub search: String,
}

fn default_person_route() -> String {
    "/person".to_string()
}
fn default_movie_route() -> String {
    "/movies".to_string()
}
fn default_series_route() -> String {
    "/tv-shows".to_string()
}
fn default_search_route() -> String {
    "/search".to_string()
}

impl RouteConfig {
    fn prefixes(&self) -> [(&'static str, &str); 4] {
        [
            ("routes.person", &self.person),
            ("routes.movie", &self.movie),
            ("routes.series", &self.series),
            ("routes.search", &self.search),
        ]
    }
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            person: default_person_route(),
            movie: default_movie_route(),
            series: default_series_route(),
            search: default_search_route(),
        }
    }
}

/// Remote catalog connection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default)]
    pub include_adult: bool,
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}
fn default_api_key_env() -> String {
    "TMDB_API_KEY".to_string()
}

impl CatalogConfig {
    /// Read the API key from the configured environment variable
    #[must_use]
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            include_adult: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.suggest.debounce_ms, 300);
        assert_eq!(config.suggest.min_query_length, 2);
        assert_eq!(config.suggest.max_suggestions, 8);
        assert_eq!(config.suggest.cache_ttl_ms, 300_000);
        assert_eq!(config.routes.person, "/person");
        assert_eq!(config.routes.movie, "/movies");
        assert_eq!(config.routes.series, "/tv-shows");
        assert_eq!(config.routes.search, "/search");
        assert!(!config.catalog.include_adult);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_load_nonexistent_returns_default() {
        let path = std::path::Path::new("/nonexistent/path/config.json");
        let config = Config::load(path).unwrap();
        assert_eq!(config.suggest.max_suggestions, 8);
    }

    #[test]
    fn test_config_load_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"suggest": {{"debounceMs": 150, "maxSuggestions": 5}}, "routes": {{"person": "/people"}}}}"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.suggest.debounce_ms, 150);
        assert_eq!(config.suggest.max_suggestions, 5);
        assert_eq!(config.suggest.min_query_length, 2);
        assert_eq!(config.routes.person, "/people");
        assert_eq!(config.routes.movie, "/movies");
    }

    #[test]
    fn test_config_load_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{{not json").unwrap();
        assert!(matches!(Config::load(file.path()), Err(Error::Json(_))));
    }

    #[test]
    fn test_config_load_rejects_bad_route() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"routes": {{"movie": "movies"}}}}"#).unwrap();
        let err = Config::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("routes.movie"));
    }

    #[test]
    fn test_config_rejects_zero_limits() {
        let mut config = Config::default();
        config.suggest.max_suggestions = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = Config::default();
        config.suggest.min_query_length = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_config_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::default();
        config.suggest.cache_ttl_ms = 0;
        config.routes.series = "/tv".to_string();
        config.save(&path).unwrap();

        let reloaded = Config::load(&path).unwrap();
        assert_eq!(reloaded.suggest.cache_ttl_ms, 0);
        assert_eq!(reloaded.routes.series, "/tv");
    }

    #[test]
    fn test_durations() {
        let mut suggest = SuggestConfig::default();
        assert_eq!(suggest.debounce(), Duration::from_millis(300));
        assert_eq!(suggest.cache_ttl(), Some(Duration::from_secs(300)));
        suggest.cache_ttl_ms = 0;
        assert_eq!(suggest.cache_ttl(), None);
    }
}
