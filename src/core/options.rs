//! Build options handed to a component's build.
//!
//! Options keep insertion order so that the generated build configuration is
//! reproducible. Composition is last-writer-wins per key while the key keeps
//! the position where it was first seen.

use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An ordered set of `KEY=VALUE` build options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BuildOptions(IndexMap<String, String>);

/// Error parsing a `KEY=VALUE` override.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionParseError {
    #[error("build option `{0}` must have the form KEY=VALUE")]
    MissingEquals(String),

    #[error("build option `{0}` has an empty key")]
    EmptyKey(String),
}

impl BuildOptions {
    /// Create an empty option set.
    pub fn new() -> Self {
        BuildOptions(IndexMap::new())
    }

    /// Set an option. An existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Get an option value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Iterate options in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Option keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse command-line overrides of the form `KEY=VALUE`.
    ///
    /// The key ends at the first `=`; the value may be empty. A key given
    /// twice keeps the later value.
    pub fn parse_overrides<I, S>(items: I) -> Result<Self, OptionParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = BuildOptions::new();
        for item in items {
            let item = item.as_ref();
            let (key, value) = item
                .split_once('=')
                .ok_or_else(|| OptionParseError::MissingEquals(item.to_string()))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(OptionParseError::EmptyKey(item.to_string()));
            }
            options.insert(key, value);
        }
        Ok(options)
    }
}

/// Compose default options with caller overrides.
pub fn compose(defaults: &BuildOptions, overrides: &BuildOptions) -> BuildOptions {
    let mut composed = defaults.clone();
    for (key, value) in overrides.iter() {
        composed.insert(key, value);
    }
    composed
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for BuildOptions {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut options = BuildOptions::new();
        for (k, v) in iter {
            options.insert(k, v);
        }
        options
    }
}

impl fmt::Display for BuildOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (k, v) in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{}={}", k, v)?;
            first = false;
        }
        Ok(())
    }
}

/// Registry documents may write option values as strings, booleans or
/// numbers. Booleans map to CMake's `ON`/`OFF`.
#[derive(Deserialize)]
#[serde(untagged)]
enum OptionValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl From<OptionValue> for String {
    fn from(value: OptionValue) -> Self {
        match value {
            OptionValue::Bool(true) => "ON".to_string(),
            OptionValue::Bool(false) => "OFF".to_string(),
            OptionValue::Int(i) => i.to_string(),
            OptionValue::Float(f) => f.to_string(),
            OptionValue::Str(s) => s,
        }
    }
}

impl<'de> Deserialize<'de> for BuildOptions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = IndexMap::<String, OptionValue>::deserialize(deserializer)?;
        let mut options = BuildOptions::new();
        for (key, value) in raw {
            if key.is_empty() {
                return Err(de::Error::custom("build option key cannot be empty"));
            }
            options.insert(key, String::from(value));
        }
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_last_writer_wins_first_seen_order() {
        let defaults: BuildOptions = [("A", "1"), ("B", "2")].into_iter().collect();
        let overrides: BuildOptions = [("A", "3")].into_iter().collect();

        let composed = compose(&defaults, &overrides);

        let pairs: Vec<_> = composed.iter().collect();
        assert_eq!(pairs, vec![("A", "3"), ("B", "2")]);
    }

    #[test]
    fn test_compose_appends_new_keys() {
        let defaults: BuildOptions = [("FMT_DOC", "OFF")].into_iter().collect();
        let overrides: BuildOptions = [("FMT_TEST", "ON"), ("FMT_DOC", "ON")]
            .into_iter()
            .collect();

        let composed = compose(&defaults, &overrides);
        let keys: Vec<_> = composed.keys().collect();
        assert_eq!(keys, vec!["FMT_DOC", "FMT_TEST"]);
        assert_eq!(composed.get("FMT_DOC"), Some("ON"));
    }

    #[test]
    fn test_parse_overrides() {
        let opts = BuildOptions::parse_overrides(["A=1", "B=x=y", "C=", "A=2"]).unwrap();
        assert_eq!(opts.get("A"), Some("2"));
        assert_eq!(opts.get("B"), Some("x=y"));
        assert_eq!(opts.get("C"), Some(""));
        assert_eq!(opts.keys().collect::<Vec<_>>(), vec!["A", "B", "C"]);

        assert_eq!(
            BuildOptions::parse_overrides(["NOEQUALS"]),
            Err(OptionParseError::MissingEquals("NOEQUALS".to_string()))
        );
        assert_eq!(
            BuildOptions::parse_overrides(["=1"]),
            Err(OptionParseError::EmptyKey("=1".to_string()))
        );
    }

    #[test]
    fn test_deserialize_scalar_values_in_order() {
        let opts: BuildOptions = serde_json::from_str(
            r#"{"Z_FIRST": "x", "SPDLOG_FMT_EXTERNAL": true, "LEVEL": 3, "TESTS": false}"#,
        )
        .unwrap();

        let pairs: Vec<_> = opts.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("Z_FIRST", "x"),
                ("SPDLOG_FMT_EXTERNAL", "ON"),
                ("LEVEL", "3"),
                ("TESTS", "OFF"),
            ]
        );
    }

    #[test]
    fn test_display() {
        let opts: BuildOptions = [("A", "1"), ("B", "2")].into_iter().collect();
        assert_eq!(opts.to_string(), "A=1 B=2");
    }
}
