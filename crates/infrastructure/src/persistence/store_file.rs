//! Variable store persistence.
//!
//! The store is saved as its snapshot, so ids survive between runs and
//! aliases written by one import can be followed by the next.

use std::io;
use std::path::Path;

use tokio::fs;
use varsync_domain::StoreSnapshot;

use crate::adapters::MemoryVariableStore;
use crate::serialization::{SerializationError, from_json_bytes, to_json_stable_bytes};

/// Error type for store file operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreFileError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),
}

/// Loads a store from `path`.
///
/// A missing file yields an empty store.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub async fn load_store(path: &Path, mode_limit: usize) -> Result<MemoryVariableStore, StoreFileError> {
    let content = match fs::read(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no store file, starting empty");
            return Ok(MemoryVariableStore::new(mode_limit));
        }
        Err(e) => return Err(e.into()),
    };

    let snapshot: StoreSnapshot = from_json_bytes(&content)?;
    tracing::debug!(
        collections = snapshot.collections.len(),
        variables = snapshot.variables.len(),
        "loaded store"
    );
    Ok(MemoryVariableStore::from_snapshot(snapshot, mode_limit))
}

/// Saves `store` to `path`, creating parent directories as needed.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub async fn save_store(path: &Path, store: &MemoryVariableStore) -> Result<(), StoreFileError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let content = to_json_stable_bytes(store.state())?;
    fs::write(path, content).await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::adapters::DEFAULT_MODE_LIMIT;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use varsync_application::ports::VariableStore;
    use varsync_domain::{Rgba, StoreValue, StoreVariableType};

    #[tokio::test]
    async fn test_missing_file_is_empty_store() {
        let temp = TempDir::new().unwrap();
        let store = load_store(&temp.path().join("store.json"), DEFAULT_MODE_LIMIT)
            .await
            .unwrap();
        assert!(store.state().collections.is_empty());
    }

    #[tokio::test]
    async fn test_save_and_load_keeps_ids() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data/store.json");

        let mut store = MemoryVariableStore::default();
        let collection = store.create_collection("Colors").await.unwrap();
        let variable = store
            .create_variable(&collection.id, "primary", StoreVariableType::Color)
            .await
            .unwrap();
        store
            .set_value(
                &variable,
                &collection.modes[0].id,
                StoreValue::Color(Rgba::from_rgb8(255, 0, 0)),
            )
            .await
            .unwrap();
        save_store(&path, &store).await.unwrap();

        let loaded = load_store(&path, 2).await.unwrap();
        assert_eq!(loaded.state(), store.state());
        assert_eq!(loaded.mode_limit(), 2);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("store.json");
        std::fs::write(&path, b"[1, 2").unwrap();

        assert!(matches!(
            load_store(&path, DEFAULT_MODE_LIMIT).await,
            Err(StoreFileError::Serialization(_))
        ));
    }
}
