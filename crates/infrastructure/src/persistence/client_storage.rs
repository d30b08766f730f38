//! File-backed client storage.
//!
//! Each key is stored as `<dir>/<key>.json`.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;
use varsync_application::ports::{ClientStorage, ClientStorageError};

use crate::serialization::{from_json_bytes, to_json_stable_bytes};

/// Client storage keeping one JSON file per key.
#[derive(Debug, Clone)]
pub struct FileClientStorage {
    dir: PathBuf,
}

impl FileClientStorage {
    /// Creates a storage rooted at `dir`. The directory is created on first
    /// write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the key files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> Result<PathBuf, ClientStorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(ClientStorageError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid storage key '{key}'"),
            )));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl ClientStorage for FileClientStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, ClientStorageError> {
        let path = self.key_path(key)?;
        let content = match fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        from_json_bytes(&content)
            .map(Some)
            .map_err(|e| ClientStorageError::Serialization(e.to_string()))
    }

    async fn set(&self, key: &str, value: &Value) -> Result<(), ClientStorageError> {
        let path = self.key_path(key)?;
        fs::create_dir_all(&self.dir).await?;

        let content =
            to_json_stable_bytes(value).map_err(|e| ClientStorageError::Serialization(e.to_string()))?;
        fs::write(&path, content).await?;
        tracing::debug!(path = %path.display(), "wrote client storage key");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), ClientStorageError> {
        let path = self.key_path(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
