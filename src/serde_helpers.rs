//! Shared serde helpers for manifest fields that YAML users tend to write
//! unquoted (e.g., `version: 2017`).

use std::collections::BTreeMap;

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_yaml::Value;

/// Renders a scalar YAML key or value as a string.
///
/// Strings pass through, numbers and booleans use their YAML spelling.
/// Returns `None` for sequences, mappings, tagged values, and null.
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Deserializes a string field that may have been written as a bare number.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    scalar_to_string(&value)
        .ok_or_else(|| de::Error::custom(format!("expected a string or number, got {:?}", value)))
}

/// Deserializes a mapping whose keys may be bare numbers into a
/// string-keyed map.
pub(crate) fn string_keyed_map<'de, D, T>(deserializer: D) -> Result<BTreeMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let mapping = Option::<serde_yaml::Mapping>::deserialize(deserializer)?.unwrap_or_default();
    let mut out = BTreeMap::new();
    for (key, value) in mapping {
        let key = scalar_to_string(&key)
            .ok_or_else(|| de::Error::custom(format!("invalid map key: {:?}", key)))?;
        let value = serde_yaml::from_value(value)
            .map_err(|e| de::Error::custom(format!("invalid entry '{}': {}", key, e)))?;
        out.insert(key, value);
    }
    Ok(out)
}
