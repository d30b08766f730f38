//! Infrastructure adapters

mod memory_store;

pub use memory_store::{DEFAULT_MODE_LIMIT, DEFAULT_MODE_NAME, MemoryVariableStore};
