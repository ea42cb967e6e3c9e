//! Field projection and structural access over raw API items

use crate::{CoreError, Result};
use serde_json::{Map, Value};

/// Project the named fields out of `source`, one slot per requested name.
///
/// A name that is absent (or explicitly `null`) yields `None` in its slot, so
/// the output always has exactly `fields.len()` entries in request order.
pub fn project<S: AsRef<str>>(fields: &[S], source: &Map<String, Value>) -> Vec<Option<Value>> {
    fields
        .iter()
        .map(|name| source.get(name.as_ref()).filter(|v| !v.is_null()).cloned())
        .collect()
}

/// Look up a nested object that the item is required to carry
pub fn require_object<'a>(item: &'a Value, section: &str) -> Result<&'a Map<String, Value>> {
    item.get(section)
        .and_then(Value::as_object)
        .ok_or_else(|| CoreError::MissingStructure {
            item_id: item_label(item),
            section: section.to_string(),
        })
}

/// Walk a chain of object keys, failing on the first missing step
pub fn require_path<'a>(item: &'a Value, path: &[&str]) -> Result<&'a Value> {
    let mut current = item;
    for (depth, key) in path.iter().enumerate() {
        current = current.get(key).ok_or_else(|| CoreError::MissingField {
            path: path[..=depth].join("."),
        })?;
    }
    Ok(current)
}

/// Read a required string field `key` from an object.
///
/// Errors name only `key`; callers holding a nested object add the prefix.
pub fn require_str<'a>(source: &'a Map<String, Value>, key: &str) -> Result<&'a str> {
    match source.get(key) {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(CoreError::InvalidField {
            path: key.to_string(),
            reason: format!("expected a string, found {}", other),
        }),
        None => Err(CoreError::MissingField {
            path: key.to_string(),
        }),
    }
}

/// Best-effort identifier for error messages
pub(crate) fn item_label(item: &Value) -> String {
    match item.get("id") {
        Some(Value::String(id)) => id.clone(),
        Some(other) => other.to_string(),
        None => "<unknown>".to_string(),
    }
}
