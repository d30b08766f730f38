//! Reading and writing variable documents.

use std::path::Path;

use tokio::fs;
use varsync_domain::Document;

use crate::serialization::{DocumentFormat, SerializationError, parse_document, render_document};

/// Error type for document file operations.
#[derive(Debug, thiserror::Error)]
pub enum DocumentFileError {
    /// IO error during file operations.
    #[error("IO error on {path}: {source}")]
    Io {
        /// File being accessed.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not a valid document.
    #[error("Invalid document {path}: {source}")]
    Parse {
        /// File being parsed.
        path: String,
        /// Underlying error.
        source: SerializationError,
    },

    /// Rendering failed.
    #[error("Serialization error: {0}")]
    Render(#[from] SerializationError),
}

/// Reads a document, picking JSON or YAML from the file extension.
///
/// # Errors
/// Returns an error if the file cannot be read or is not a valid document.
pub async fn read_document(path: &Path) -> Result<Document, DocumentFileError> {
    let content = fs::read(path).await.map_err(|source| DocumentFileError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse_document(&content, DocumentFormat::from_path(path)).map_err(|source| {
        DocumentFileError::Parse {
            path: path.display().to_string(),
            source,
        }
    })
}

/// Writes a document as JSON, creating parent directories as needed.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub async fn write_document(path: &Path, document: &Document) -> Result<(), DocumentFileError> {
    let rendered = render_document(document)?;
    let io_error = |source| DocumentFileError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).await.map_err(io_error)?;
    }
    fs::write(path, rendered).await.map_err(io_error)
}
