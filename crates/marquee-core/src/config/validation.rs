//! Config validation - warns about unknown fields, rejects unroutable prefixes

use crate::{Error, Result};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Validate JSON config and warn about unknown fields.
pub fn warn_unknown_fields(content: &str, config_name: &str) {
    let Ok(value) = serde_json::from_str::<Value>(content) else {
        return;
    };

    let expected = expected_config_keys();
    for path in find_unknown_keys(&value, &expected, "") {
        warn!("Unknown config field in {config_name}: {path}");
    }
}

/// A route prefix must start with `/`, must not end with one, and must not
/// contain whitespace.
pub(crate) fn check_route_prefix(field: &str, prefix: &str) -> Result<()> {
    if !prefix.starts_with('/') {
        return Err(Error::Config(format!("{field} must start with '/'")));
    }
    if prefix.len() > 1 && prefix.ends_with('/') {
        return Err(Error::Config(format!("{field} must not end with '/'")));
    }
    if prefix.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(Error::Config(format!("{field} must not contain whitespace")));
    }
    Ok(())
}

/// Find unknown keys in JSON value compared to expected keys.
/// Returns paths like "suggest.unknownField" for unknown fields.
fn find_unknown_keys(value: &Value, expected: &ExpectedKeys, prefix: &str) -> Vec<String> {
    let mut unknowns = Vec::new();

    let Value::Object(obj) = value else {
        return unknowns;
    };

    for (key, child) in obj {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        if let Some(nested) = expected.nested.get(key.as_str()) {
            unknowns.extend(find_unknown_keys(child, nested, &path));
        } else if !expected.fields.contains(key.as_str()) {
            unknowns.push(path);
        }
    }

    unknowns
}

/// Expected keys for a config section.
/// `fields` are leaf fields, `nested` are nested objects with their own expected keys.
struct ExpectedKeys {
    fields: HashSet<&'static str>,
    nested: HashMap<&'static str, ExpectedKeys>,
}

impl ExpectedKeys {
    fn new(fields: &[&'static str]) -> Self {
        Self {
            fields: fields.iter().copied().collect(),
            nested: HashMap::new(),
        }
    }

    fn with_nested(mut self, key: &'static str, nested: ExpectedKeys) -> Self {
        self.nested.insert(key, nested);
        self
    }
}

fn expected_config_keys() -> ExpectedKeys {
    let suggest_keys = ExpectedKeys::new(&[
        "debounceMs",
        "minQueryLength",
        "maxSuggestions",
        "cacheTtlMs",
    ]);
    let routes_keys = ExpectedKeys::new(&["person", "movie", "series", "search"]);
    let catalog_keys = ExpectedKeys::new(&["baseUrl", "apiKeyEnv", "includeAdult"]);

    ExpectedKeys::new(&[])
        .with_nested("suggest", suggest_keys)
        .with_nested("routes", routes_keys)
        .with_nested("catalog", catalog_keys)
}
