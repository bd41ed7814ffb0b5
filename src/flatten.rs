//! Collapse nested JSON objects into a single-level mapping.
//!
//! Keys are the path from the root to each leaf joined by a separator, so
//! `{"current": {"condition": {"text": "Sunny"}}}` becomes
//! `current__condition__text = "Sunny"`. Only objects are descended into;
//! arrays and scalars are leaves. Colliding paths are last-write-wins.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Separator used for provider responses
pub const DEFAULT_SEPARATOR: &str = "__";

/// Flatten `object` joining key paths with `separator`
#[must_use]
pub fn flatten(object: &Map<String, Value>, separator: &str) -> BTreeMap<String, Value> {
    let mut flat = BTreeMap::new();
    flatten_into(object, None, separator, &mut flat);
    flat
}

fn flatten_into(
    object: &Map<String, Value>,
    parent: Option<&str>,
    separator: &str,
    flat: &mut BTreeMap<String, Value>,
) {
    for (key, value) in object {
        let path = match parent {
            Some(parent) => format!("{parent}{separator}{key}"),
            None => key.clone(),
        };
        match value {
            Value::Object(nested) => flatten_into(nested, Some(&path), separator, flat),
            leaf => {
                flat.insert(path, leaf.clone());
            }
        }
    }
}
