//! Current-conditions snapshot, stored flattened for tabular display

use crate::WeatherDeckError;
use crate::flatten::{DEFAULT_SEPARATOR, flatten};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Flattened current-conditions response
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CurrentSnapshot {
    fields: BTreeMap<String, Value>,
}

impl CurrentSnapshot {
    /// Flatten a provider response object
    #[must_use]
    pub fn from_response(object: &Map<String, Value>) -> Self {
        Self {
            fields: flatten(object, DEFAULT_SEPARATOR),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Raw value under a flattened key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Display text for a flattened key, failing when the provider omitted it
    pub fn text(&self, key: &str) -> Result<String, WeatherDeckError> {
        self.fields
            .get(key)
            .map(display_value)
            .ok_or_else(|| WeatherDeckError::missing_field(key))
    }

    /// All entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }
}

/// Render a JSON leaf the way a person would write it: strings unquoted
#[must_use]
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "N/A".to_string(),
        other => other.to_string(),
    }
}
