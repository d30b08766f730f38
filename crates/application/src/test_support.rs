//! Test doubles for the application ports.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use varsync_domain::{
    CollectionId, ModeId, StoreCollection, StoreMode, StoreSnapshot, StoreValue, StoreVariable,
    StoreVariableType, VariableId,
};

use crate::ports::{ClientStorage, ClientStorageError, StoreError, VariableStore};

/// In-memory store with sequential ids and a mode cap.
pub struct MockStore {
    snapshot: StoreSnapshot,
    mode_limit: usize,
    next_id: usize,
}

impl MockStore {
    pub fn new(mode_limit: usize) -> Self {
        Self {
            snapshot: StoreSnapshot::default(),
            mode_limit,
            next_id: 0,
        }
    }

    pub fn snapshot_now(&self) -> StoreSnapshot {
        self.snapshot.clone()
    }

    fn next(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{}", self.next_id)
    }

    fn collection_mut(&mut self, id: &CollectionId) -> Result<&mut StoreCollection, StoreError> {
        self.snapshot
            .collections
            .iter_mut()
            .find(|collection| &collection.id == id)
            .ok_or_else(|| StoreError::CollectionNotFound(id.clone()))
    }

    fn variable_mut(&mut self, id: &VariableId) -> Result<&mut StoreVariable, StoreError> {
        self.snapshot
            .variables
            .iter_mut()
            .find(|variable| &variable.id == id)
            .ok_or_else(|| StoreError::VariableNotFound(id.clone()))
    }
}

#[async_trait]
impl VariableStore for MockStore {
    async fn snapshot(&self) -> Result<StoreSnapshot, StoreError> {
        Ok(self.snapshot.clone())
    }

    async fn create_collection(&mut self, name: &str) -> Result<StoreCollection, StoreError> {
        let collection = StoreCollection {
            id: CollectionId::new(self.next("c")),
            name: name.to_string(),
            modes: vec![StoreMode {
                id: ModeId::new(self.next("m")),
                name: "Mode 1".to_string(),
            }],
        };
        self.snapshot.collections.push(collection.clone());
        Ok(collection)
    }

    async fn add_mode(&mut self, collection: &CollectionId, name: &str) -> Result<ModeId, StoreError> {
        let id = ModeId::new(self.next("m"));
        let limit = self.mode_limit;
        let collection = self.collection_mut(collection)?;
        if collection.modes.len() >= limit {
            return Err(StoreError::ModeLimitReached {
                collection: collection.name.clone(),
                limit,
            });
        }
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
        let mode = collection
            .modes
            .iter_mut()
            .find(|candidate| &candidate.id == mode)
            .ok_or_else(|| StoreError::ModeNotFound(mode.clone()))?;
        mode.name = name.to_string();
        Ok(())
    }

    async fn create_variable(
        &mut self,
        collection: &CollectionId,
        name: &str,
        var_type: StoreVariableType,
    ) -> Result<VariableId, StoreError> {
        self.collection_mut(collection)?;
        let id = VariableId::new(self.next("v"));
        self.snapshot.variables.push(StoreVariable {
            id: id.clone(),
            collection_id: collection.clone(),
            name: name.to_string(),
            resolved_type: var_type,
            description: None,
            values_by_mode: indexmap::IndexMap::new(),
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
        self.variable_mut(variable)?
            .values_by_mode
            .insert(mode.clone(), value);
        Ok(())
    }
}

/// Client storage backed by a map.
#[derive(Default)]
pub struct MockClientStorage {
    values: Mutex<HashMap<String, Value>>,
}

impl MockClientStorage {
    pub fn with(key: &str, value: Value) -> Self {
        let storage = Self::default();
        storage
            .values
            .lock()
            .expect("Lock poisoned")
            .insert(key.to_string(), value);
        storage
    }

    pub fn value(&self, key: &str) -> Option<Value> {
        self.values.lock().expect("Lock poisoned").get(key).cloned()
    }
}

#[async_trait]
impl ClientStorage for MockClientStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, ClientStorageError> {
        Ok(self.value(key))
    }

    async fn set(&self, key: &str, value: &Value) -> Result<(), ClientStorageError> {
        self.values
            .lock()
            .expect("Lock poisoned")
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), ClientStorageError> {
        self.values.lock().expect("Lock poisoned").remove(key);
        Ok(())
    }
}
