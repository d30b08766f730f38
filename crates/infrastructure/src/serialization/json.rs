//! JSON serialization helpers for deterministic output.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Error type for serialization operations.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// JSON deserialization failed.
    #[error("JSON deserialization failed: {0}")]
    Deserialize(serde_json::Error),

    /// YAML deserialization failed.
    #[error("YAML deserialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// UTF-8 encoding error.
    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

fn to_json_indented<T: Serialize>(value: &T, indent: &[u8]) -> Result<String, SerializationError> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent);
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;

    let mut json = String::from_utf8(buffer)?;
    json.push('\n');
    Ok(json)
}

/// Serializes a value to deterministic JSON.
///
/// Output format:
/// - 2-space indentation
/// - Trailing newline
/// - Keys in declaration order
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_stable<T: Serialize>(value: &T) -> Result<String, SerializationError> {
    to_json_indented(value, b"  ")
}

/// Serializes a value to deterministic JSON bytes.
///
/// Same as `to_json_stable` but returns bytes for direct file writing.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_stable_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, SerializationError> {
    Ok(to_json_stable(value)?.into_bytes())
}

/// Serializes a value to JSON with 4-space indentation and a trailing
/// newline, the layout of exported documents.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_document<T: Serialize>(value: &T) -> Result<String, SerializationError> {
    to_json_indented(value, b"    ")
}

/// Deserializes JSON from bytes.
///
/// Handles both pretty-printed and minified JSON.
///
/// # Errors
///
/// Returns an error if the JSON is invalid or doesn't match the expected type.
pub fn from_json_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SerializationError> {
    serde_json::from_slice(bytes).map_err(SerializationError::Deserialize)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stable_serialization_has_trailing_newline() {
        let json = to_json_stable(&json!({ "key": "value" })).expect("serialization should work");
        assert!(json.ends_with('\n'));
        assert!(json.contains("\n  \"key\""));
    }

    #[test]
    fn test_document_serialization_uses_four_space_indent() {
        let json = to_json_document(&json!({ "collections": [] })).unwrap();
        assert_eq!(json, "{\n    \"collections\": []\n}\n");
    }

    #[test]
    fn test_declaration_order_is_kept() {
        let json = to_json_stable(&json!({ "z": 1, "a": 2 })).unwrap();
        let z = json.find("\"z\"").unwrap();
        let a = json.find("\"a\"").unwrap();
        assert!(z < a);
    }

    #[test]
    fn test_from_json_bytes_reports_deserialize_error() {
        let result: Result<serde_json::Value, _> = from_json_bytes(b"{ not json");
        assert!(matches!(result, Err(SerializationError::Deserialize(_))));
    }
}
