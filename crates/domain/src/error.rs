//! Domain error types

use thiserror::Error;

use crate::value::ValueError;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A flat key is not of the form `collection:path`.
    #[error("invalid variable key: {0}")]
    InvalidFlatKey(String),

    /// A raw value does not fit its declared type.
    #[error("invalid value: {0}")]
    InvalidValue(#[from] ValueError),

    /// A variable path runs through an existing variable instead of a group.
    #[error("path conflict at '{0}': a variable already occupies this position")]
    PathConflict(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
