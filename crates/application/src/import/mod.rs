//! Import pipeline.
//!
//! `flatten` → `Validator::validate` → `resolve` → `StoreSynchronizer::materialize`.
//! Validation is a gate: nothing is written to the store unless it passes.

pub mod flatten;
pub mod resolver;
pub mod synchronizer;
pub mod validator;

use thiserror::Error;
use varsync_domain::FlatKey;

use crate::ports::StoreError;

pub use flatten::{FlatVariables, FlattenError, flatten};
pub use resolver::{
    AliasTarget, Resolution, ResolveError, ResolvedValue, ResolvedVariable, UnresolvedAlias,
    resolve,
};
pub use synchronizer::{ResolvedEntry, StoreSynchronizer, SyncOutcome};
pub use validator::{ValidationReport, Validator};

/// Internal failures that abort an import.
///
/// Document problems are not errors at this level; they are returned as a
/// validation report.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Alias resolution failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The store rejected an operation.
    #[error("store operation failed: {0}")]
    Store(#[from] StoreError),

    /// A variable belongs to a collection that was never prepared.
    #[error("collection '{0}' was not prepared")]
    MissingCollection(String),

    /// An alias target has no store handle.
    #[error("no store handle for alias target '{0}'")]
    MissingHandle(FlatKey),
}
