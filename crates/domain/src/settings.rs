//! Import/export settings.
//!
//! Persisted under [`SETTINGS_KEY`] in client storage as camelCase JSON.
//! Unknown fields are ignored and missing fields take their default.

use serde::{Deserialize, Serialize};

use crate::document::{RawValue, VariableType};

/// Client storage key holding the serialized [`Settings`].
pub const SETTINGS_KEY: &str = "import-export-settings";

/// User preferences for importing variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Fail the import when an alias cannot be resolved, instead of
    /// substituting the per-type fallback.
    pub fail_on_null_alias: bool,

    /// Substitute for unresolvable number references.
    pub number_fallback: f64,

    /// Substitute for unresolvable boolean references.
    pub boolean_fallback: bool,

    /// Substitute for unresolvable string references.
    pub string_fallback: String,

    /// Substitute for unresolvable color references. Must be a valid color.
    pub color_fallback: String,

    /// Reuse a store collection with the same name instead of creating a new
    /// one.
    #[serde(alias = "extendCollections")]
    pub extend_existing_collections: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fail_on_null_alias: true,
            number_fallback: 0.0,
            boolean_fallback: false,
            string_fallback: String::new(),
            color_fallback: "#000000".to_string(),
            extend_existing_collections: true,
        }
    }
}

impl Settings {
    /// The literal substituted for an unresolvable reference of this type.
    #[must_use]
    pub fn fallback_for(&self, var_type: VariableType) -> RawValue {
        match var_type {
            VariableType::Color => RawValue::String(self.color_fallback.clone()),
            VariableType::Number => RawValue::number(self.number_fallback),
            VariableType::Boolean => RawValue::Boolean(self.boolean_fallback),
            VariableType::String => RawValue::String(self.string_fallback.clone()),
        }
    }
}
