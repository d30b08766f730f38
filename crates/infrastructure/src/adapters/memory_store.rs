//! In-process variable store.
//!
//! Behaves like a host store: ids are opaque, new collections come with one
//! default mode, and each collection holds a bounded number of modes.

use async_trait::async_trait;
use indexmap::IndexMap;
use uuid::Uuid;
use varsync_application::ports::{StoreError, VariableStore};
use varsync_domain::{
    CollectionId, ModeId, StoreCollection, StoreMode, StoreSnapshot, StoreValue, StoreVariable,
    StoreVariableType, VariableId,
};

/// Default number of modes a collection may hold.
pub const DEFAULT_MODE_LIMIT: usize = 4;

/// Name the host gives to the mode of a new collection.
pub const DEFAULT_MODE_NAME: &str = "Mode 1";

fn generate_id() -> String {
    Uuid::now_v7().to_string()
}

/// Variable store held in memory.
#[derive(Debug, Clone)]
pub struct MemoryVariableStore {
    state: StoreSnapshot,
    mode_limit: usize,
}

impl Default for MemoryVariableStore {
    fn default() -> Self {
        Self::new(DEFAULT_MODE_LIMIT)
    }
}

impl MemoryVariableStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(mode_limit: usize) -> Self {
        Self::from_snapshot(StoreSnapshot::default(), mode_limit)
    }

    /// Creates a store holding `snapshot`.
    #[must_use]
    pub const fn from_snapshot(snapshot: StoreSnapshot, mode_limit: usize) -> Self {
        Self {
            state: snapshot,
            mode_limit,
        }
    }

    /// Current contents.
    #[must_use]
    pub const fn state(&self) -> &StoreSnapshot {
        &self.state
    }

    /// Maximum number of modes per collection.
    #[must_use]
    pub const fn mode_limit(&self) -> usize {
        self.mode_limit
    }

    fn collection_mut(&mut self, id: &CollectionId) -> Result<&mut StoreCollection, StoreError> {
        self.state
            .collections
            .iter_mut()
            .find(|collection| &collection.id == id)
            .ok_or_else(|| StoreError::CollectionNotFound(id.clone()))
    }

    fn variable_mut(&mut self, id: &VariableId) -> Result<&mut StoreVariable, StoreError> {
        self.state
            .variables
            .iter_mut()
            .find(|variable| &variable.id == id)
            .ok_or_else(|| StoreError::VariableNotFound(id.clone()))
    }
}

fn accepts(var_type: StoreVariableType, value: &StoreValue) -> bool {
    matches!(
        (var_type, value),
        (_, StoreValue::Alias(_))
            | (StoreVariableType::Boolean, StoreValue::Boolean(_))
            | (StoreVariableType::Float, StoreValue::Float(_))
            | (StoreVariableType::String, StoreValue::String(_))
            | (StoreVariableType::Color, StoreValue::Color(_))
    )
}

#[async_trait]
impl VariableStore for MemoryVariableStore {
    async fn snapshot(&self) -> Result<StoreSnapshot, StoreError> {
        Ok(self.state.clone())
    }

    async fn create_collection(&mut self, name: &str) -> Result<StoreCollection, StoreError> {
        let collection = StoreCollection {
            id: CollectionId::new(generate_id()),
            name: name.to_string(),
            modes: vec![StoreMode {
                id: ModeId::new(generate_id()),
                name: DEFAULT_MODE_NAME.to_string(),
            }],
        };
        tracing::debug!(collection = name, id = %collection.id, "created collection");
        self.state.collections.push(collection.clone());
        Ok(collection)
    }

    async fn add_mode(&mut self, collection: &CollectionId, name: &str) -> Result<ModeId, StoreError> {
        let limit = self.mode_limit;
        let collection = self.collection_mut(collection)?;
        if collection.modes.len() >= limit {
            return Err(StoreError::ModeLimitReached {
                collection: collection.name.clone(),
                limit,
            });
        }

        let id = ModeId::new(generate_id());
        collection.modes.push(StoreMode {
            id: id.clone(),
            name: name.to_string(),
        });
        Ok(id)
    }

    async fn rename_mode(
        &mut self,
        collection: &CollectionId,
        mode: &ModeId,
        name: &str,
    ) -> Result<(), StoreError> {
        let collection = self.collection_mut(collection)?;
        let target = collection
            .modes
            .iter_mut()
            .find(|candidate| &candidate.id == mode)
            .ok_or_else(|| StoreError::ModeNotFound(mode.clone()))?;
        target.name = name.to_string();
        Ok(())
    }

    async fn create_variable(
        &mut self,
        collection: &CollectionId,
        name: &str,
        var_type: StoreVariableType,
    ) -> Result<VariableId, StoreError> {
        self.collection_mut(collection)?;

        let id = VariableId::new(generate_id());
        self.state.variables.push(StoreVariable {
            id: id.clone(),
            collection_id: collection.clone(),
            name: name.to_string(),
            resolved_type: var_type,
            description: None,
            values_by_mode: IndexMap::new(),
        });
        Ok(id)
    }

    async fn set_description(
        &mut self,
        variable: &VariableId,
        description: &str,
    ) -> Result<(), StoreError> {
        self.variable_mut(variable)?.description = Some(description.to_string());
        Ok(())
    }

    async fn set_value(
        &mut self,
        variable: &VariableId,
        mode: &ModeId,
        value: StoreValue,
    ) -> Result<(), StoreError> {
        if let StoreValue::Alias(target) = &value
            && !self.state.variables.iter().any(|candidate| &candidate.id == target)
        {
            return Err(StoreError::VariableNotFound(target.clone()));
        }

        let collection_id = {
            let entry = self.variable_mut(variable)?;
            if !accepts(entry.resolved_type, &value) {
                return Err(StoreError::InvalidValue {
                    variable: variable.clone(),
                    reason: format!("{value:?} does not fit a {:?} variable", entry.resolved_type),
                });
            }
            entry.collection_id.clone()
        };

        let owns_mode = self
            .state
            .collection(&collection_id)
            .is_some_and(|collection| collection.modes.iter().any(|m| &m.id == mode));
        if !owns_mode {
            return Err(StoreError::ModeNotFound(mode.clone()));
        }

        self.variable_mut(variable)?
            .values_by_mode
            .insert(mode.clone(), value);
        Ok(())
    }
}
