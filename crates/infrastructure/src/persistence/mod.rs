//! Persistence implementations for file-based storage.

mod client_storage;
mod document_file;
mod location;
mod store_file;

pub use client_storage::*;
pub use document_file::*;
pub use location::*;
pub use store_file::*;
