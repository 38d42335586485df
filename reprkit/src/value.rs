//! Raw field values and their default string conversion.

pub use serde_json::Value;

/// Default string conversion for an extracted value.
///
/// Strings are written bare, everything else uses its JSON text.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
