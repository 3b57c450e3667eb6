//! Per-field deserializers that never reject a snapshot because of one bad value.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserializes `T`, falling back to `T::default()` when the stored value has
/// the wrong shape. Empty strings are treated as absent.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(convert(value).unwrap_or_default())
}

/// Same as [`or_default`] for flags whose default is `true`.
pub fn or_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(convert(value).unwrap_or(true))
}

fn convert<T: DeserializeOwned>(value: Value) -> Option<T> {
    if matches!(&value, Value::String(text) if text.is_empty()) {
        return None;
    }
    match serde_json::from_value::<T>(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            tracing::warn!(%value, error = %err, "ignoring malformed snapshot value");
            None
        }
    }
}
