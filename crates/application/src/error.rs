//! Application error types

use thiserror::Error;
use varsync_domain::DomainError;

use crate::export::ExportError;
use crate::import::ImportError;
use crate::ports::{ClientStorageError, StoreError};

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// The import could not be completed.
    #[error("import failed: {0}")]
    Import(#[from] ImportError),

    /// The export could not be completed.
    #[error("export failed: {0}")]
    Export(#[from] ExportError),

    /// The host variable store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A client storage operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] ClientStorageError),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
