//! URL fragment parsing into an ordered key/value mapping.
//!
//! The hand-off page receives its credentials as query-string syntax carried
//! in the location fragment (`#access_token=...&scope=...`). Parsing follows
//! form-urlencoded semantics: `&`-separated pairs, split once on `=`,
//! percent-decoding with `+` as space.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use url::form_urlencoded;

/// Ordered key/value pairs parsed from a URL fragment.
///
/// Insertion order matches the order keys first appear in the fragment. A
/// repeated key keeps its original position and takes the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentParams {
    entries: Vec<(String, String)>,
}

impl FragmentParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair, overwriting in place if the key is already present.
    pub fn insert(&mut self, key: &str, value: &str) {
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| k == key) {
            slot.1 = value.to_string();
        } else {
            self.entries.push((key.to_string(), value.to_string()));
        }
    }

    /// Value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Builds the JSON object submitted to the collector. Key order follows
    /// insertion order.
    pub fn to_json(&self) -> Map<String, Value> {
        let mut map = Map::new();
        for (k, v) in &self.entries {
            map.insert(k.clone(), Value::String(v.clone()));
        }
        map
    }
}

/// Parses a fragment string into ordered parameters.
///
/// Accepts the fragment with or without its leading `#`. An empty fragment
/// yields an empty mapping; a pair without `=` yields an empty-string value.
pub fn parse_fragment(fragment: &str) -> FragmentParams {
    let raw = fragment.strip_prefix('#').unwrap_or(fragment);
    let mut params = FragmentParams::new();
    for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
        params.insert(&key, &value);
    }
    params
}

/// Extracts and parses the fragment of a full redirect URL.
///
/// A URL without a fragment yields an empty mapping.
pub fn parse_url_fragment(url: &str) -> Result<FragmentParams> {
    let parsed = url::Url::parse(url).context("invalid URL")?;
    Ok(parse_fragment(parsed.fragment().unwrap_or("")))
}
