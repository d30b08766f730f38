//! Host variable store model.
//!
//! These types mirror what a variable store holds: collections with
//! identified modes, and variables with one value per mode. Values are either
//! literals or aliases to another variable by id.

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::document::VariableType;
use crate::reference::FlatKey;
use crate::value::ScalarValue;

/// Collection name used for variables whose collection cannot be found.
pub const UNKNOWN_COLLECTION: &str = "Unknown";

macro_rules! store_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps an opaque store handle.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The handle as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

store_id!(
    /// Opaque handle of a store collection.
    CollectionId
);
store_id!(
    /// Opaque handle of a mode within a store collection.
    ModeId
);
store_id!(
    /// Opaque handle of a store variable.
    VariableId
);

/// Variable types as the store names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StoreVariableType {
    /// Boolean flag.
    Boolean,
    /// Floating-point number.
    Float,
    /// Free text.
    String,
    /// RGBA color.
    Color,
}

impl From<VariableType> for StoreVariableType {
    fn from(value: VariableType) -> Self {
        match value {
            VariableType::Boolean => Self::Boolean,
            VariableType::Number => Self::Float,
            VariableType::String => Self::String,
            VariableType::Color => Self::Color,
        }
    }
}

impl From<StoreVariableType> for VariableType {
    fn from(value: StoreVariableType) -> Self {
        match value {
            StoreVariableType::Boolean => Self::Boolean,
            StoreVariableType::Float => Self::Number,
            StoreVariableType::String => Self::String,
            StoreVariableType::Color => Self::Color,
        }
    }
}

/// A value held by a store variable for one mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum StoreValue {
    /// Boolean literal.
    Boolean(bool),
    /// Number literal.
    Float(f64),
    /// String literal.
    String(String),
    /// Color literal.
    Color(Rgba),
    /// Alias to another variable.
    Alias(VariableId),
}

impl From<ScalarValue> for StoreValue {
    fn from(value: ScalarValue) -> Self {
        match value {
            ScalarValue::Boolean(value) => Self::Boolean(value),
            ScalarValue::Number(value) => Self::Float(value),
            ScalarValue::String(value) => Self::String(value),
            ScalarValue::Color(value) => Self::Color(value),
        }
    }
}

impl StoreValue {
    /// The literal as a typed value, or `None` for aliases.
    #[must_use]
    pub fn as_scalar(&self) -> Option<ScalarValue> {
        match self {
            Self::Boolean(value) => Some(ScalarValue::Boolean(*value)),
            Self::Float(value) => Some(ScalarValue::Number(*value)),
            Self::String(value) => Some(ScalarValue::String(value.clone())),
            Self::Color(value) => Some(ScalarValue::Color(*value)),
            Self::Alias(_) => None,
        }
    }
}

/// A mode of a store collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreMode {
    /// Mode handle.
    pub id: ModeId,
    /// Display name.
    pub name: String,
}

/// A collection as held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreCollection {
    /// Collection handle.
    pub id: CollectionId,
    /// Display name. Not necessarily unique.
    pub name: String,
    /// Modes in order. The first one is the default mode.
    pub modes: Vec<StoreMode>,
}

impl StoreCollection {
    /// Finds a mode by display name.
    #[must_use]
    pub fn mode_named(&self, name: &str) -> Option<&StoreMode> {
        self.modes.iter().find(|mode| mode.name == name)
    }

    /// Display name of a mode handle.
    #[must_use]
    pub fn mode_name(&self, id: &ModeId) -> Option<&str> {
        self.modes
            .iter()
            .find(|mode| &mode.id == id)
            .map(|mode| mode.name.as_str())
    }

    /// The default mode.
    #[must_use]
    pub fn default_mode(&self) -> Option<&StoreMode> {
        self.modes.first()
    }
}

/// A variable as held by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreVariable {
    /// Variable handle.
    pub id: VariableId,
    /// Owning collection.
    pub collection_id: CollectionId,
    /// Slash-separated path within the collection.
    pub name: String,
    /// Declared type.
    pub resolved_type: StoreVariableType,
    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Value per mode handle.
    #[serde(default)]
    pub values_by_mode: IndexMap<ModeId, StoreValue>,
}

/// Everything a store holds at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Collections in creation order.
    pub collections: Vec<StoreCollection>,
    /// Variables in creation order.
    pub variables: Vec<StoreVariable>,
}

impl StoreSnapshot {
    /// Finds a collection by handle.
    #[must_use]
    pub fn collection(&self, id: &CollectionId) -> Option<&StoreCollection> {
        self.collections.iter().find(|collection| &collection.id == id)
    }

    /// Finds the first collection with the given name.
    #[must_use]
    pub fn collection_named(&self, name: &str) -> Option<&StoreCollection> {
        self.collections
            .iter()
            .find(|collection| collection.name == name)
    }

    /// Variables belonging to a collection, in store order.
    pub fn variables_in<'a>(
        &'a self,
        collection: &'a CollectionId,
    ) -> impl Iterator<Item = &'a StoreVariable> + 'a {
        self.variables
            .iter()
            .filter(move |variable| &variable.collection_id == collection)
    }

    /// Flat key of a variable. Variables whose collection is missing are
    /// keyed under [`UNKNOWN_COLLECTION`].
    #[must_use]
    pub fn flat_key(&self, variable: &StoreVariable) -> FlatKey {
        let collection = self
            .collection(&variable.collection_id)
            .map_or(UNKNOWN_COLLECTION, |collection| collection.name.as_str());
        FlatKey::new(collection, &variable.name)
    }

    /// Map from variable handle to flat key.
    #[must_use]
    pub fn keys_by_id(&self) -> HashMap<VariableId, FlatKey> {
        self.variables
            .iter()
            .map(|variable| (variable.id.clone(), self.flat_key(variable)))
            .collect()
    }
}

/// Lookup tables over a store snapshot, taken before an import starts.
#[derive(Debug, Clone, Default)]
pub struct StoreIndex {
    collections: IndexMap<String, StoreCollection>,
    variables: IndexMap<FlatKey, (VariableId, StoreVariableType)>,
}

impl StoreIndex {
    /// Builds the index. When names repeat, the last one wins.
    #[must_use]
    pub fn new(snapshot: &StoreSnapshot) -> Self {
        let collections = snapshot
            .collections
            .iter()
            .map(|collection| (collection.name.clone(), collection.clone()))
            .collect();
        let variables = snapshot
            .variables
            .iter()
            .map(|variable| {
                (
                    snapshot.flat_key(variable),
                    (variable.id.clone(), variable.resolved_type),
                )
            })
            .collect();
        Self {
            collections,
            variables,
        }
    }

    /// Existing collection with this name.
    #[must_use]
    pub fn collection(&self, name: &str) -> Option<&StoreCollection> {
        self.collections.get(name)
    }

    /// Existing variable handle for a flat key.
    #[must_use]
    pub fn variable(&self, key: &str) -> Option<&VariableId> {
        self.variables.get(key).map(|(id, _)| id)
    }

    /// Declared type of an existing variable.
    #[must_use]
    pub fn variable_type(&self, key: &str) -> Option<VariableType> {
        self.variables.get(key).map(|(_, var_type)| (*var_type).into())
    }

    /// Returns true if a variable with this key exists.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.variables.contains_key(key)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn snapshot() -> StoreSnapshot {
        StoreSnapshot {
            collections: vec![StoreCollection {
                id: CollectionId::new("c1"),
                name: "Colors".to_string(),
                modes: vec![
                    StoreMode {
                        id: ModeId::new("m1"),
                        name: "light".to_string(),
                    },
                    StoreMode {
                        id: ModeId::new("m2"),
                        name: "dark".to_string(),
                    },
                ],
            }],
            variables: vec![
                StoreVariable {
                    id: VariableId::new("v1"),
                    collection_id: CollectionId::new("c1"),
                    name: "primary".to_string(),
                    resolved_type: StoreVariableType::Color,
                    description: None,
                    values_by_mode: IndexMap::new(),
                },
                StoreVariable {
                    id: VariableId::new("v2"),
                    collection_id: CollectionId::new("gone"),
                    name: "orphan".to_string(),
                    resolved_type: StoreVariableType::Float,
                    description: None,
                    values_by_mode: IndexMap::new(),
                },
            ],
        }
    }

    #[test]
    fn test_flat_keys_use_collection_names() {
        let snapshot = snapshot();
        let keys = snapshot.keys_by_id();
        assert_eq!(keys[&VariableId::new("v1")].as_str(), "Colors:primary");
        assert_eq!(keys[&VariableId::new("v2")].as_str(), "Unknown:orphan");
    }

    #[test]
    fn test_index_lookups() {
        let index = StoreIndex::new(&snapshot());
        assert_eq!(index.variable("Colors:primary"), Some(&VariableId::new("v1")));
        assert_eq!(index.variable_type("Colors:primary"), Some(VariableType::Color));
        assert!(!index.contains("Colors:secondary"));
        assert_eq!(index.collection("Colors").unwrap().id, CollectionId::new("c1"));
    }

    #[test]
    fn test_mode_lookups() {
        let snapshot = snapshot();
        let collection = &snapshot.collections[0];
        assert_eq!(collection.mode_named("dark").unwrap().id, ModeId::new("m2"));
        assert_eq!(collection.mode_name(&ModeId::new("m1")), Some("light"));
        assert_eq!(collection.default_mode().unwrap().name, "light");
    }

    #[test]
    fn test_type_names_round_through_document_types() {
        assert_eq!(StoreVariableType::from(VariableType::Number), StoreVariableType::Float);
        assert_eq!(VariableType::from(StoreVariableType::Float), VariableType::Number);
    }
}
