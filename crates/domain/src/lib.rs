//! Varsync Domain - Core design variable types
//!
//! This crate defines the domain model for importing and exporting design
//! variables: the document format, color literals, references, settings and
//! the shape of the host variable store.
//! All types here are pure Rust with no I/O dependencies.

pub mod color;
pub mod document;
pub mod error;
pub mod reference;
pub mod settings;
pub mod store;
pub mod validation;
pub mod value;

pub use color::{ColorError, ColorFormat, Rgba};
pub use document::{
    Collection, Document, Lenient, RawValue, VariableGroup, VariableNode, VariableType,
    VariableValue,
};
pub use error::{DomainError, DomainResult};
pub use reference::{FlatKey, is_reference};
pub use settings::{SETTINGS_KEY, Settings};
pub use store::{
    CollectionId, ModeId, StoreCollection, StoreIndex, StoreMode, StoreSnapshot, StoreValue,
    StoreVariable, StoreVariableType, UNKNOWN_COLLECTION, VariableId,
};
pub use validation::{FallbackSubstitution, ValidationError, ValidationErrorCode};
pub use value::{ScalarValue, ValueError};
