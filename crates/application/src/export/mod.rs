//! Store export.
//!
//! Rebuilds the nested document form of a store collection. Aliases are
//! written as reference literals and colors in the requested encoding.

use thiserror::Error;
use varsync_domain::{
    Collection, ColorFormat, Document, RawValue, StoreSnapshot, StoreValue, VariableType,
    VariableValue,
};

/// Errors that can occur while exporting.
#[derive(Debug, Error)]
pub enum ExportError {
    /// No collection with the requested name exists.
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    /// Reading the store failed.
    #[error("store error: {0}")]
    Store(#[from] crate::ports::StoreError),
}

/// Converts store snapshots into documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct Exporter {
    color_format: ColorFormat,
}

impl Exporter {
    /// Creates an exporter writing colors in `color_format`.
    #[must_use]
    pub const fn new(color_format: ColorFormat) -> Self {
        Self { color_format }
    }

    /// Exports one collection by name.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::CollectionNotFound`] if the snapshot has no
    /// collection with that name.
    pub fn export_collection(
        &self,
        snapshot: &StoreSnapshot,
        name: &str,
    ) -> Result<Collection, ExportError> {
        let source = snapshot
            .collection_named(name)
            .ok_or_else(|| ExportError::CollectionNotFound(name.to_string()))?;
        let keys = snapshot.keys_by_id();

        let mut collection = Collection::new(
            source.name.clone(),
            source.modes.iter().map(|mode| mode.name.clone()),
        );

        for variable in snapshot.variables_in(&source.id) {
            let var_type = VariableType::from(variable.resolved_type);
            let mut value = VariableValue::new(var_type);
            value.description.clone_from(&variable.description);

            for mode in &source.modes {
                let Some(stored) = variable.values_by_mode.get(&mode.id) else {
                    continue;
                };
                let raw = match stored {
                    StoreValue::Alias(target) => RawValue::String(
                        keys.get(target)
                            .map(ToString::to_string)
                            .unwrap_or_default(),
                    ),
                    literal => literal
                        .as_scalar()
                        .map_or(RawValue::String(String::new()), |scalar| {
                            scalar.to_raw(self.color_format)
                        }),
                };
                value = value.with_value(mode.name.clone(), raw);
            }

            if let Err(error) = collection.variables.insert_at(&variable.name, value) {
                tracing::warn!(variable = %variable.name, %error, "skipping variable on export");
            }
        }

        tracing::debug!(
            collection = name,
            variables = collection.variables.len(),
            "exported collection"
        );
        Ok(collection)
    }

    /// Exports every collection in store order.
    #[must_use]
    pub fn export_all(&self, snapshot: &StoreSnapshot) -> Document {
        let mut seen = std::collections::HashSet::new();
        let collections = snapshot
            .collections
            .iter()
            .filter(|collection| seen.insert(collection.name.as_str()))
            .filter_map(|collection| self.export_collection(snapshot, &collection.name).ok())
            .collect();
        Document::new(collections)
    }
}
