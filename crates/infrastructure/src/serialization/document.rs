//! Document encodings.

use std::path::Path;

use varsync_domain::Document;

use super::json::{SerializationError, from_json_bytes, to_json_document};

/// File formats a document can be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
    /// JSON (the default).
    #[default]
    Json,
    /// YAML.
    Yaml,
}

impl DocumentFormat {
    /// Picks the format from a file extension: `.yaml` and `.yml` are YAML,
    /// anything else is JSON.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// Parses a document.
///
/// # Errors
///
/// Returns an error if the bytes are not a valid document in `format`.
pub fn parse_document(bytes: &[u8], format: DocumentFormat) -> Result<Document, SerializationError> {
    match format {
        DocumentFormat::Json => from_json_bytes(bytes),
        DocumentFormat::Yaml => Ok(serde_yaml::from_slice(bytes)?),
    }
}

/// Renders a document as 4-space JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_document(document: &Document) -> Result<String, SerializationError> {
    to_json_document(document)
}
