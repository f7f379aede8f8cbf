//! Attribute namespace parsing.
//!
//! Slides carry configuration as flat camelCase dataset keys that share a
//! prefix. This module strips the prefix, splits the remainder at uppercase
//! boundaries into a path, and writes the decoded value at that path:
//!
//! ```text
//! prefix  codeExerciseMonaco
//! key     codeExerciseMonacoMinimapEnabled = "false"
//! result  {"minimap": {"enabled": false}}
//! ```
//!
//! The bare prefix key (`codeExerciseMonaco` itself) may hold a whole JSON
//! object. It is used as the starting point and the path keys are layered
//! on top of it.

use indexmap::IndexMap;
use serde_json::Value;

use crate::types::ConfigMap;

/// Parse every entry whose key starts with `prefix` into a nested config object.
///
/// Entries are `(key, raw value)` pairs; a `None` value stands for an
/// attribute that is present but has no value, which decodes to an empty
/// string with a warning. Malformed JSON never fails: leaves fall back to the
/// raw string and a malformed bare-prefix object falls back to `{}`.
pub fn parse_namespace<'a, I>(entries: I, prefix: &str) -> ConfigMap
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    let entries: Vec<(&str, Option<&str>)> = entries.into_iter().collect();

    let mut config = entries
        .iter()
        .find(|(key, _)| *key == prefix)
        .map(|(_, raw)| decode_base_object(prefix, *raw))
        .unwrap_or_default();

    for (key, raw) in &entries {
        let Some(path) = namespace_path(key, prefix) else {
            continue;
        };
        insert_at_path(&mut config, &path, decode_value(*raw));
    }

    config
}

/// [`parse_namespace`] over an element dataset.
pub fn parse_dataset(dataset: &IndexMap<String, String>, prefix: &str) -> ConfigMap {
    parse_namespace(
        dataset.iter().map(|(k, v)| (k.as_str(), Some(v.as_str()))),
        prefix,
    )
}

/// Split a prefixed key into its lowercase path segments.
///
/// Returns `None` when the key is outside the namespace or is the bare prefix.
///
/// ```rust
/// use code_exercise_config::namespace_path;
///
/// assert_eq!(
///     namespace_path("fooBarEditorFontSize", "fooBar"),
///     Some(vec!["editor".to_string(), "font".to_string(), "size".to_string()]),
/// );
/// assert_eq!(namespace_path("fooBar", "fooBar"), None);
/// assert_eq!(namespace_path("other", "fooBar"), None);
/// ```
pub fn namespace_path(key: &str, prefix: &str) -> Option<Vec<String>> {
    let rest = key.strip_prefix(prefix)?;
    if rest.is_empty() {
        return None;
    }

    let mut segments = Vec::new();
    let mut current = String::new();
    for (i, c) in rest.chars().enumerate() {
        if i > 0 && c.is_ascii_uppercase() && !current.is_empty() {
            segments.push(std::mem::take(&mut current));
        }
        current.push(c.to_ascii_lowercase());
    }
    if !current.is_empty() {
        segments.push(current);
    }
    Some(segments)
}

/// Decode one raw attribute value.
///
/// JSON wins when it parses (numbers, booleans, null, arrays, objects);
/// anything else is kept verbatim as a string.
pub fn decode_value(raw: Option<&str>) -> Value {
    match raw {
        Some(raw) => serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())),
        None => {
            tracing::warn!("Dataset value is undefined, using an empty string");
            Value::String(String::new())
        }
    }
}

fn decode_base_object(prefix: &str, raw: Option<&str>) -> ConfigMap {
    let Some(raw) = raw else {
        tracing::warn!(prefix, "Namespace value is undefined, starting from an empty object");
        return ConfigMap::new();
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            tracing::warn!(
                prefix,
                value = %other,
                "Namespace value is not a JSON object, ignoring it"
            );
            ConfigMap::new()
        }
        Err(e) => {
            tracing::warn!(prefix, error = %e, "Namespace value is not valid JSON, ignoring it");
            ConfigMap::new()
        }
    }
}

/// Write `value` at `path`, replacing non-object intermediates with objects.
fn insert_at_path(config: &mut ConfigMap, path: &[String], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };

    let mut current = config;
    for segment in parents {
        let slot = current
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(ConfigMap::new()));
        if !slot.is_object() {
            *slot = Value::Object(ConfigMap::new());
        }
        let Value::Object(map) = slot else {
            return;
        };
        current = map;
    }
    current.insert(last.clone(), value);
}
