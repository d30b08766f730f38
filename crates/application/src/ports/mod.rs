//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod client_storage;
mod variable_store;

pub use client_storage::{ClientStorage, ClientStorageError};
pub use variable_store::{StoreError, VariableStore};
