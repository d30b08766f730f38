//! Paths and adapters shared by every command.

use std::path::{Path, PathBuf};

use varsync_application::{ClientStorageError, LoadSettings};
use varsync_domain::Settings;
use varsync_infrastructure::{
    FileClientStorage, MemoryVariableStore, NoConfigDir, STORE_FILE_NAME, StoreFileError,
    default_config_dir, load_store, save_store,
};

use crate::cli::Cli;

/// Resolved locations for one invocation.
#[derive(Debug, Clone)]
pub struct Context {
    config_dir: PathBuf,
    store_path: PathBuf,
    mode_limit: usize,
}

impl Context {
    /// Resolves locations from the command line, falling back to the platform
    /// config directory.
    pub fn from_cli(cli: &Cli) -> Result<Self, NoConfigDir> {
        let config_dir = match &cli.config_dir {
            Some(dir) => dir.clone(),
            None => default_config_dir()?,
        };
        let store_path = cli
            .store
            .clone()
            .unwrap_or_else(|| config_dir.join(STORE_FILE_NAME));

        Ok(Self {
            config_dir,
            store_path,
            mode_limit: cli.mode_limit,
        })
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    pub fn client_storage(&self) -> FileClientStorage {
        FileClientStorage::new(&self.config_dir)
    }

    pub async fn settings(&self) -> Result<Settings, ClientStorageError> {
        LoadSettings::new(self.client_storage()).execute().await
    }

    pub async fn load_store(&self) -> Result<MemoryVariableStore, StoreFileError> {
        load_store(&self.store_path, self.mode_limit).await
    }

    pub async fn save_store(&self, store: &MemoryVariableStore) -> Result<(), StoreFileError> {
        save_store(&self.store_path, store).await?;
        tracing::info!(path = %self.store_path.display(), "saved store");
        Ok(())
    }
}
