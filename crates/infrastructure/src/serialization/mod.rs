//! Serialization for varsync files.
//!
//! - Store files and client storage use deterministic 2-space JSON with a
//!   trailing newline
//! - Exported documents use 4-space JSON
//! - Documents are read as JSON or YAML

mod document;
mod json;

pub use document::*;
pub use json::*;
