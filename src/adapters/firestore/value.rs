//! Firestore typed-value JSON helpers.
//!
//! The REST API wraps every field in a type marker object, e.g.
//! `{"stringValue": "u1"}` or `{"arrayValue": {"values": [...]}}`. These
//! helpers cover the two shapes the chat documents use.

use serde_json::{json, Value};

/// Encode a string field.
pub fn string_value(s: &str) -> Value {
    json!({ "stringValue": s })
}

/// Encode an array-of-strings field.
pub fn string_array_value(items: &[String]) -> Value {
    let values: Vec<Value> = items.iter().map(|s| string_value(s)).collect();
    json!({ "arrayValue": { "values": values } })
}

/// Decode a string field. `None` for any other type marker.
pub fn as_string(value: &Value) -> Option<&str> {
    value.get("stringValue")?.as_str()
}

/// Decode an array-of-strings field, dropping non-string elements.
///
/// Firestore omits the `values` key entirely for empty arrays.
pub fn as_string_array(value: &Value) -> Option<Vec<String>> {
    let array = value.get("arrayValue")?;
    match array.get("values") {
        None => Some(Vec::new()),
        Some(values) => values.as_array().map(|items| {
            items
                .iter()
                .filter_map(|item| as_string(item).map(str::to_string))
                .collect()
        }),
    }
}
