//! Document flattening.
//!
//! Walks each collection's variable tree depth-first and produces one entry
//! per variable keyed by `"<collection>:<path>"`.

use indexmap::IndexMap;
use thiserror::Error;
use varsync_domain::{Collection, FlatKey, VariableGroup, VariableNode, VariableValue};

/// Errors that make a document impossible to flatten.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlattenError {
    /// Two or more variables produce the same key.
    #[error("duplicate variable keys: {}", format_keys(.0))]
    DuplicateKeys(Vec<FlatKey>),
}

fn format_keys(keys: &[FlatKey]) -> String {
    keys.iter()
        .map(FlatKey::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A document's variables keyed by flat key, plus per-collection indexes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatVariables {
    /// Every variable, in document order.
    pub entries: IndexMap<FlatKey, VariableValue>,
    /// Declared modes per collection name.
    pub modes: IndexMap<String, Vec<String>>,
    /// Member keys per collection name, in document order.
    pub members: IndexMap<String, Vec<FlatKey>>,
}

impl FlatVariables {
    /// Declared modes of the collection owning `key`.
    #[must_use]
    pub fn modes_of(&self, key: &FlatKey) -> &[String] {
        self.modes
            .get(key.collection())
            .map_or(&[], Vec::as_slice)
    }

    /// Number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the document declares no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Flattens the collections of a document.
///
/// When a collection name repeats, the first declaration's modes are kept and
/// the member lists are merged.
///
/// # Errors
///
/// Returns [`FlattenError::DuplicateKeys`] listing every key produced more
/// than once.
pub fn flatten(collections: &[Collection]) -> Result<FlatVariables, FlattenError> {
    let mut flat = FlatVariables::default();
    let mut duplicates = Vec::new();

    for collection in collections {
        let name = collection.display_name().into_owned();
        flat.modes
            .entry(name.clone())
            .or_insert_with(|| collection.mode_names().to_vec());
        let members = flat.members.entry(name.clone()).or_default();

        let mut path = Vec::new();
        walk(
            &name,
            &collection.variables,
            &mut path,
            &mut flat.entries,
            members,
            &mut duplicates,
        );
    }

    if duplicates.is_empty() {
        tracing::debug!(variables = flat.len(), "flattened document");
        Ok(flat)
    } else {
        Err(FlattenError::DuplicateKeys(duplicates))
    }
}

fn walk<'a>(
    collection: &str,
    group: &'a VariableGroup,
    path: &mut Vec<&'a str>,
    entries: &mut IndexMap<FlatKey, VariableValue>,
    members: &mut Vec<FlatKey>,
    duplicates: &mut Vec<FlatKey>,
) {
    for (name, node) in group.iter() {
        path.push(name);
        match node {
            VariableNode::Group(child) => {
                walk(collection, child, path, entries, members, duplicates);
            }
            VariableNode::Leaf(value) => {
                let key = FlatKey::new(collection, &path.join("/"));
                if entries.contains_key(&key) {
                    if !duplicates.contains(&key) {
                        duplicates.push(key);
                    }
                } else {
                    members.push(key.clone());
                    entries.insert(key, value.clone());
                }
            }
        }
        path.pop();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use varsync_domain::{Document, VariableType};

    fn number() -> VariableValue {
        VariableValue::new(VariableType::Number).with_value("m", 1_i64)
    }

    #[test]
    fn test_flatten_nested_path() {
        let collection = Collection::new("C", ["m"])
            .with_variable("a/b", number())
            .unwrap();

        let flat = flatten(&[collection]).unwrap();

        let keys: Vec<_> = flat.entries.keys().map(FlatKey::as_str).collect();
        assert_eq!(keys, vec!["C:a/b"]);
        assert_eq!(flat.modes["C"], vec!["m".to_string()]);
        assert_eq!(flat.members["C"], vec![FlatKey::new("C", "a/b")]);
    }

    #[test]
    fn test_flatten_preserves_document_order() {
        let document: Document = serde_json::from_value(serde_json::json!({
            "collections": [
                {
                    "name": "B",
                    "modes": ["m"],
                    "variables": {
                        "z": { "type": "number", "values": { "m": 1 } },
                        "g": {
                            "y": { "type": "number", "values": { "m": 2 } },
                            "a": { "type": "number", "values": { "m": 3 } }
                        }
                    }
                },
                { "name": "A", "modes": ["m"], "variables": {} }
            ]
        }))
        .unwrap();

        let flat = flatten(&document.collections).unwrap();
        let keys: Vec<_> = flat.entries.keys().map(FlatKey::as_str).collect();
        assert_eq!(keys, vec!["B:z", "B:g/y", "B:g/a"]);
        assert_eq!(flat.modes.keys().collect::<Vec<_>>(), vec!["B", "A"]);
        assert!(flat.members["A"].is_empty());
    }

    #[test]
    fn test_slash_in_name_collides_with_nested_group() {
        let mut collection = Collection::new("C", ["m"])
            .with_variable("a/b", number())
            .unwrap();
        collection
            .variables
            .insert("a/b", VariableNode::Leaf(number()));

        let err = flatten(&[collection]).unwrap_err();
        assert_eq!(err, FlattenError::DuplicateKeys(vec![FlatKey::new("C", "a/b")]));
    }

    #[test]
    fn test_repeated_collection_names_merge_members() {
        let first = Collection::new("C", ["light"])
            .with_variable("a", number())
            .unwrap();
        let second = Collection::new("C", ["dark"])
            .with_variable("b", number())
            .unwrap();

        let flat = flatten(&[first, second]).unwrap();
        assert_eq!(flat.modes["C"], vec!["light".to_string()]);
        assert_eq!(flat.members["C"].len(), 2);
    }

    #[test]
    fn test_repeated_collection_with_same_variable_is_duplicate() {
        let first = Collection::new("C", ["m"]).with_variable("a", number()).unwrap();
        let second = first.clone();

        let err = flatten(&[first, second]).unwrap_err();
        assert_eq!(err.to_string(), "duplicate variable keys: C:a");
    }
}
