//! Variable store port
//!
//! Defines the interface to the host's variable and collection storage.

use async_trait::async_trait;

use varsync_domain::{
    CollectionId, ModeId, StoreCollection, StoreSnapshot, StoreValue, StoreVariableType,
    VariableId,
};

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Collection not found.
    #[error("Collection not found: {0}")]
    CollectionNotFound(CollectionId),

    /// Variable not found.
    #[error("Variable not found: {0}")]
    VariableNotFound(VariableId),

    /// Mode not found in the collection.
    #[error("Mode not found: {0}")]
    ModeNotFound(ModeId),

    /// The collection already holds as many modes as the host allows.
    #[error("Collection '{collection}' cannot hold more than {limit} modes")]
    ModeLimitReached {
        /// Collection name.
        collection: String,
        /// Host mode cap.
        limit: usize,
    },

    /// The host rejected a value.
    #[error("Invalid value for variable {variable}: {reason}")]
    InvalidValue {
        /// Target variable.
        variable: VariableId,
        /// Why the host rejected it.
        reason: String,
    },

    /// Backend failure.
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Port to the host variable store.
///
/// Mutating operations take `&mut self`: one import owns its store session
/// and no two mutations can overlap.
#[async_trait]
pub trait VariableStore: Send + Sync {
    /// Enumerates every collection and variable.
    async fn snapshot(&self) -> Result<StoreSnapshot, StoreError>;

    /// Creates a collection. The host gives it one default mode.
    async fn create_collection(&mut self, name: &str) -> Result<StoreCollection, StoreError>;

    /// Adds a mode to a collection.
    ///
    /// # Errors
    /// Returns `StoreError::ModeLimitReached` when the host's mode cap is hit.
    async fn add_mode(
        &mut self,
        collection: &CollectionId,
        name: &str,
    ) -> Result<ModeId, StoreError>;

    /// Renames a mode.
    async fn rename_mode(
        &mut self,
        collection: &CollectionId,
        mode: &ModeId,
        name: &str,
    ) -> Result<(), StoreError>;

    /// Creates a variable at `name` (slash-separated path) in a collection.
    async fn create_variable(
        &mut self,
        collection: &CollectionId,
        name: &str,
        var_type: StoreVariableType,
    ) -> Result<VariableId, StoreError>;

    /// Sets the free-text description of a variable.
    async fn set_description(
        &mut self,
        variable: &VariableId,
        description: &str,
    ) -> Result<(), StoreError>;

    /// Sets the value of a variable for one mode.
    async fn set_value(
        &mut self,
        variable: &VariableId,
        mode: &ModeId,
        value: StoreValue,
    ) -> Result<(), StoreError>;

    /// Points a variable at another variable for one mode.
    async fn set_alias(
        &mut self,
        variable: &VariableId,
        mode: &ModeId,
        target: &VariableId,
    ) -> Result<(), StoreError> {
        self.set_value(variable, mode, StoreValue::Alias(target.clone()))
            .await
    }
}
