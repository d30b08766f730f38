//! Varsync Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (the host variable store and client storage)
//! - The import pipeline: flatten, validate, resolve, materialize
//! - The exporter
//! - Use case orchestration and application-level error handling

pub mod error;
pub mod export;
pub mod import;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
mod test_support;

pub use error::{ApplicationError, ApplicationResult};
pub use export::{ExportError, Exporter};
pub use import::{ImportError, ResolvedEntry};
pub use ports::{ClientStorage, ClientStorageError, StoreError, VariableStore};
pub use use_cases::{
    CollectionSummary, ExportVariables, ImportOutcome, ImportVariables, ListCollections,
    LoadSettings, SaveSettings,
};
