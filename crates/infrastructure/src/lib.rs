//! Varsync Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer.

pub mod adapters;
pub mod persistence;
pub mod serialization;

pub use adapters::{DEFAULT_MODE_LIMIT, DEFAULT_MODE_NAME, MemoryVariableStore};
pub use persistence::{
    APP_DIR_NAME, DocumentFileError, FileClientStorage, NoConfigDir, STORE_FILE_NAME,
    StoreFileError, default_config_dir, load_store, read_document, save_store, write_document,
};
pub use serialization::{
    DocumentFormat, SerializationError, from_json_bytes, parse_document, render_document,
    to_json_document, to_json_stable, to_json_stable_bytes,
};
