//! Import/export document model.
//!
//! A document is a list of collections, each declaring its modes and a tree of
//! variable groups. Fields that the validator reports on (collection name,
//! description, modes and variable type) are held as [`Lenient`] so that a
//! malformed document still loads and every problem can be reported at once.

use std::borrow::Cow;
use std::fmt;

use indexmap::IndexMap;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{DomainError, DomainResult};
use crate::reference::is_reference;

/// A field that keeps whatever JSON it was given when it does not have the
/// expected shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Lenient<T> {
    /// The field has the expected shape.
    Valid(T),
    /// The field is missing or malformed; the raw value is kept for reporting.
    Invalid(Value),
}

impl<T> Lenient<T> {
    /// A missing field.
    #[must_use]
    pub const fn missing() -> Self {
        Self::Invalid(Value::Null)
    }

    /// The value if it has the expected shape.
    #[must_use]
    pub const fn valid(&self) -> Option<&T> {
        match self {
            Self::Valid(value) => Some(value),
            Self::Invalid(_) => None,
        }
    }

    /// Returns true if the value has the expected shape.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

impl<T> From<T> for Lenient<T> {
    fn from(value: T) -> Self {
        Self::Valid(value)
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Lenient<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(match serde_json::from_value::<T>(raw.clone()) {
            Ok(value) => Self::Valid(value),
            Err(_) => Self::Invalid(raw),
        })
    }
}

impl<T: Serialize> Serialize for Lenient<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Valid(value) => value.serialize(serializer),
            Self::Invalid(raw) => raw.serialize(serializer),
        }
    }
}

/// Top-level import/export document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Collections in declaration order.
    #[serde(default)]
    pub collections: Vec<Collection>,
}

impl Document {
    /// Creates a document from a list of collections.
    #[must_use]
    pub const fn new(collections: Vec<Collection>) -> Self {
        Self { collections }
    }
}

/// A named group of variables sharing one set of modes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    /// Collection name, unique within a document.
    #[serde(default = "Lenient::missing")]
    pub name: Lenient<String>,

    /// Optional free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Lenient<String>>,

    /// Ordered mode names. The first one is the default mode.
    #[serde(default = "Lenient::missing")]
    pub modes: Lenient<Vec<String>>,

    /// Nested variable groups.
    #[serde(default)]
    pub variables: VariableGroup,
}

impl Collection {
    /// Creates an empty collection with the given modes.
    pub fn new<I, S>(name: impl Into<String>, modes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: Lenient::Valid(name.into()),
            description: None,
            modes: Lenient::Valid(modes.into_iter().map(Into::into).collect()),
            variables: VariableGroup::default(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Lenient::Valid(description.into()));
        self
    }

    /// Adds a variable at a slash-separated path.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::PathConflict`] if the path runs through an
    /// existing variable.
    pub fn with_variable(mut self, path: &str, value: VariableValue) -> DomainResult<Self> {
        self.variables.insert_at(path, value)?;
        Ok(self)
    }

    /// The collection name for display and key building.
    ///
    /// A malformed name is rendered from its raw JSON.
    #[must_use]
    pub fn display_name(&self) -> Cow<'_, str> {
        match &self.name {
            Lenient::Valid(name) => Cow::Borrowed(name.as_str()),
            Lenient::Invalid(raw) => Cow::Owned(raw.to_string()),
        }
    }

    /// Declared modes, or an empty slice when the field is malformed.
    #[must_use]
    pub fn mode_names(&self) -> &[String] {
        self.modes.valid().map_or(&[], Vec::as_slice)
    }

    /// The description, if present and a string.
    #[must_use]
    pub fn description_text(&self) -> Option<&str> {
        self.description
            .as_ref()
            .and_then(Lenient::valid)
            .map(String::as_str)
    }
}

/// An ordered map of child groups and variables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableGroup {
    entries: IndexMap<String, VariableNode>,
}

impl VariableGroup {
    /// Creates an empty group.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of direct children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the group has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up a direct child.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&VariableNode> {
        self.entries.get(name)
    }

    /// Iterates over direct children in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &VariableNode)> {
        self.entries.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// Inserts or replaces a direct child.
    pub fn insert(&mut self, name: impl Into<String>, node: VariableNode) {
        self.entries.insert(name.into(), node);
    }

    /// Inserts a variable at a slash-separated path, creating intermediate
    /// groups on demand. An existing variable at the final segment is
    /// replaced.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::PathConflict`] if an intermediate segment is
    /// already a variable.
    pub fn insert_at(&mut self, path: &str, value: VariableValue) -> DomainResult<()> {
        let mut segments: Vec<&str> = path.split('/').collect();
        let leaf = segments.pop().unwrap_or_default();

        let mut group = self;
        for (depth, segment) in segments.iter().enumerate() {
            let node = group
                .entries
                .entry((*segment).to_string())
                .or_insert_with(|| VariableNode::Group(Self::new()));
            group = match node {
                VariableNode::Group(child) => child,
                VariableNode::Leaf(_) => {
                    return Err(DomainError::PathConflict(segments[..=depth].join("/")));
                }
            };
        }

        group
            .entries
            .insert(leaf.to_string(), VariableNode::Leaf(value));
        Ok(())
    }
}

/// A node in the variable tree.
///
/// An object with a `type` field is a variable; any other object is a group.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableNode {
    /// A nested group of variables.
    Group(VariableGroup),
    /// A variable definition.
    Leaf(VariableValue),
}

impl<'de> Deserialize<'de> for VariableNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        match &raw {
            Value::Object(map) if map.contains_key("type") => serde_json::from_value(raw)
                .map(Self::Leaf)
                .map_err(D::Error::custom),
            Value::Object(_) => serde_json::from_value(raw)
                .map(Self::Group)
                .map_err(D::Error::custom),
            other => Err(D::Error::custom(format!(
                "expected a variable group or a variable definition, found {other}"
            ))),
        }
    }
}

impl Serialize for VariableNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Group(group) => group.serialize(serializer),
            Self::Leaf(value) => value.serialize(serializer),
        }
    }
}

/// Declared type of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    /// Color literal.
    Color,
    /// Floating-point number.
    Number,
    /// Boolean flag.
    Boolean,
    /// Free text.
    String,
}

impl VariableType {
    /// The lowercase name used in documents.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::String => "string",
        }
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A variable definition: its type and one raw value per mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableValue {
    /// Declared type.
    #[serde(rename = "type")]
    pub var_type: Lenient<VariableType>,

    /// Optional free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Raw value per mode name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<IndexMap<String, RawValue>>,
}

impl VariableValue {
    /// Creates a variable with no values.
    #[must_use]
    pub fn new(var_type: VariableType) -> Self {
        Self {
            var_type: Lenient::Valid(var_type),
            description: None,
            values: Some(IndexMap::new()),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the value for a mode.
    #[must_use]
    pub fn with_value(mut self, mode: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.values
            .get_or_insert_with(IndexMap::new)
            .insert(mode.into(), value.into());
        self
    }

    /// The declared type, if it is one of the known types.
    #[must_use]
    pub const fn declared_type(&self) -> Option<VariableType> {
        match &self.var_type {
            Lenient::Valid(var_type) => Some(*var_type),
            Lenient::Invalid(_) => None,
        }
    }

    /// The raw value for a mode.
    #[must_use]
    pub fn value(&self, mode: &str) -> Option<&RawValue> {
        self.values.as_ref().and_then(|values| values.get(mode))
    }
}

/// A literal as written in a document, before type checking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// JSON boolean.
    Boolean(bool),
    /// JSON number.
    Number(serde_json::Number),
    /// JSON string: a literal or a reference.
    String(String),
    /// Anything else (null, arrays, objects).
    Unsupported(Value),
}

impl RawValue {
    /// Builds a number, writing integral values without a fractional part.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn number(value: f64) -> Self {
        if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
            return Self::Number((value as i64).into());
        }
        serde_json::Number::from_f64(value).map_or(Self::Unsupported(Value::Null), Self::Number)
    }

    /// The reference text if this is a string matching the reference grammar.
    #[must_use]
    pub fn as_reference(&self) -> Option<&str> {
        match self {
            Self::String(text) if is_reference(text) => Some(text),
            _ => None,
        }
    }

    /// Short name of the JSON kind, for error messages.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Boolean(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Unsupported(Value::Null) => "null",
            Self::Unsupported(Value::Array(_)) => "array",
            Self::Unsupported(_) => "object",
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{value}"),
            Self::String(value) => f.write_str(value),
            Self::Unsupported(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::number(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn parse(value: Value) -> Document {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_parses_nested_groups_and_leaves() {
        let doc = parse(json!({
            "collections": [{
                "name": "Colors",
                "modes": ["light", "dark"],
                "variables": {
                    "button": {
                        "primary": {
                            "type": "color",
                            "values": { "light": "#ffffff", "dark": "#000000" }
                        }
                    }
                }
            }]
        }));

        let collection = &doc.collections[0];
        assert_eq!(collection.display_name(), "Colors");
        assert_eq!(collection.mode_names(), ["light", "dark"]);

        let Some(VariableNode::Group(button)) = collection.variables.get("button") else {
            panic!("expected a group");
        };
        let Some(VariableNode::Leaf(primary)) = button.get("primary") else {
            panic!("expected a variable");
        };
        assert_eq!(primary.declared_type(), Some(VariableType::Color));
        assert_eq!(primary.value("dark"), Some(&RawValue::from("#000000")));
    }

    #[test]
    fn test_malformed_fields_are_kept_for_reporting() {
        let doc = parse(json!({
            "collections": [{
                "name": 42,
                "description": ["x"],
                "modes": "light",
                "variables": { "v": { "type": "gradient", "values": {} } }
            }]
        }));

        let collection = &doc.collections[0];
        assert_eq!(collection.name, Lenient::Invalid(json!(42)));
        assert_eq!(collection.display_name(), "42");
        assert!(!collection.description.as_ref().unwrap().is_valid());
        assert!(collection.mode_names().is_empty());

        let Some(VariableNode::Leaf(v)) = collection.variables.get("v") else {
            panic!("expected a variable");
        };
        assert_eq!(v.declared_type(), None);
    }

    #[test]
    fn test_missing_name_and_modes_are_invalid() {
        let doc = parse(json!({ "collections": [{ "variables": {} }] }));
        assert_eq!(doc.collections[0].name, Lenient::missing());
        assert_eq!(doc.collections[0].modes, Lenient::missing());
    }

    #[test]
    fn test_scalar_in_variable_tree_is_rejected() {
        let result = serde_json::from_value::<Document>(json!({
            "collections": [{ "name": "C", "modes": ["m"], "variables": { "v": 3 } }]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_raw_values_keep_their_json_kind() {
        let doc = parse(json!({
            "collections": [{
                "name": "C",
                "modes": ["m"],
                "variables": {
                    "a": { "type": "number", "values": { "m": 1.5 } },
                    "b": { "type": "boolean", "values": { "m": true } },
                    "c": { "type": "string", "values": { "m": null } }
                }
            }]
        }));
        let vars = &doc.collections[0].variables;
        let leaf = |name: &str| match vars.get(name) {
            Some(VariableNode::Leaf(value)) => value.value("m").cloned().unwrap(),
            _ => panic!("expected a variable"),
        };
        assert_eq!(leaf("a").kind_name(), "number");
        assert_eq!(leaf("b"), RawValue::Boolean(true));
        assert_eq!(leaf("c").kind_name(), "null");
    }

    #[test]
    fn test_insert_at_creates_intermediate_groups() {
        let collection = Collection::new("C", ["m"])
            .with_variable("a/b/c", VariableValue::new(VariableType::Number).with_value("m", 1_i64))
            .unwrap()
            .with_variable("a/d", VariableValue::new(VariableType::Number).with_value("m", 2_i64))
            .unwrap();

        let json = serde_json::to_value(&collection).unwrap();
        assert_eq!(
            json,
            json!({
                "name": "C",
                "modes": ["m"],
                "variables": {
                    "a": {
                        "b": { "c": { "type": "number", "values": { "m": 1 } } },
                        "d": { "type": "number", "values": { "m": 2 } }
                    }
                }
            })
        );
    }

    #[test]
    fn test_insert_at_reports_path_conflicts() {
        let mut group = VariableGroup::new();
        group
            .insert_at("a", VariableValue::new(VariableType::String))
            .unwrap();
        let err = group
            .insert_at("a/b", VariableValue::new(VariableType::String))
            .unwrap_err();
        assert_eq!(err, DomainError::PathConflict("a".to_string()));
    }

    #[test]
    fn test_number_constructor_drops_integral_fraction() {
        assert_eq!(RawValue::number(4.0).to_string(), "4");
        assert_eq!(RawValue::number(4.5).to_string(), "4.5");
        assert_eq!(RawValue::number(-2.0).to_string(), "-2");
    }

    #[test]
    fn test_as_reference_only_matches_reference_strings() {
        assert_eq!(
            RawValue::from("Colors:primary").as_reference(),
            Some("Colors:primary")
        );
        assert_eq!(RawValue::from("#fff").as_reference(), None);
        assert_eq!(RawValue::from(true).as_reference(), None);
    }
}
