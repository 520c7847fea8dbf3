//! Option maps and the helpers that read them.
//!
//! Options are plain JSON objects so they can come from code, YAML or the CLI
//! alike. Key order is preserved.

use serde_json::Value;

mod merge;

pub use self::merge::{merge_layers, merge_options, pull_options};

/// Configuration object handed to an app at construction or start time.
pub type Options = serde_json::Map<String, Value>;

/// Build an `Options` map from `(key, value)` pairs.
pub fn options_from<K, V, I>(pairs: I) -> Options
where
    K: Into<String>,
    V: Into<Value>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}

/// Parse a `key=value` pair. The value is read as JSON when it parses,
/// otherwise it is kept as a string.
pub fn parse_assignment(raw: &str) -> Option<(String, Value)> {
    let (key, value) = raw.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Some((key.to_string(), value))
}
