//! Client storage port
//!
//! A small key-value store for user preferences.

use async_trait::async_trait;
use serde_json::Value;

/// Errors that can occur during client storage operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientStorageError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Key-value storage for JSON documents.
#[async_trait]
pub trait ClientStorage: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// # Returns
    /// `None` if nothing is stored under the key.
    async fn get(&self, key: &str) -> Result<Option<Value>, ClientStorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &Value) -> Result<(), ClientStorageError>;

    /// Removes the value stored under `key`. Removing a missing key is not an
    /// error.
    async fn remove(&self, key: &str) -> Result<(), ClientStorageError>;
}

#[async_trait]
impl<T: ClientStorage + ?Sized> ClientStorage for &T {
    async fn get(&self, key: &str) -> Result<Option<Value>, ClientStorageError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &Value) -> Result<(), ClientStorageError> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), ClientStorageError> {
        (**self).remove(key).await
    }
}
