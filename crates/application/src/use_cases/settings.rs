//! Settings use cases

use varsync_domain::{SETTINGS_KEY, Settings};

use crate::ApplicationResult;
use crate::ports::{ClientStorage, ClientStorageError};

/// Loads import settings from client storage.
///
/// Missing or unparseable settings fall back to the defaults.
pub struct LoadSettings<C> {
    storage: C,
}

impl<C: ClientStorage> LoadSettings<C> {
    /// Creates a new `LoadSettings` use case.
    pub const fn new(storage: C) -> Self {
        Self { storage }
    }

    /// Executes the use case.
    ///
    /// # Errors
    /// Returns an error only if the storage itself cannot be read.
    pub async fn execute(&self) -> Result<Settings, ClientStorageError> {
        let Some(raw) = self.storage.get(SETTINGS_KEY).await? else {
            tracing::debug!("no stored settings, using defaults");
            return Ok(Settings::default());
        };

        match serde_json::from_value(raw) {
            Ok(settings) => Ok(settings),
            Err(error) => {
                tracing::warn!(%error, "stored settings are invalid, using defaults");
                Ok(Settings::default())
            }
        }
    }
}

/// Saves import settings to client storage.
pub struct SaveSettings<C> {
    storage: C,
}

impl<C: ClientStorage> SaveSettings<C> {
    /// Creates a new `SaveSettings` use case.
    pub const fn new(storage: C) -> Self {
        Self { storage }
    }

    /// Executes the use case.
    ///
    /// # Errors
    /// Returns an error if the settings cannot be written.
    pub async fn execute(&self, settings: &Settings) -> ApplicationResult<()> {
        let value = serde_json::to_value(settings)
            .map_err(|e| ClientStorageError::Serialization(e.to_string()))?;
        self.storage.set(SETTINGS_KEY, &value).await?;
        tracing::info!("saved settings");
        Ok(())
    }

    /// Removes stored settings so the defaults apply again.
    ///
    /// # Errors
    /// Returns an error if the storage cannot be written.
    pub async fn reset(&self) -> ApplicationResult<()> {
        self.storage.remove(SETTINGS_KEY).await?;
        tracing::info!("reset settings to defaults");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::test_support::MockClientStorage;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn test_load_defaults_when_absent() {
        let load = LoadSettings::new(MockClientStorage::default());
        assert_eq!(load.execute().await.unwrap(), Settings::default());
    }

    #[tokio::test]
    async fn test_load_defaults_when_unparseable() {
        let storage = MockClientStorage::with(SETTINGS_KEY, json!("not an object"));
        let load = LoadSettings::new(storage);
        assert_eq!(load.execute().await.unwrap(), Settings::default());
    }

    #[tokio::test]
    async fn test_load_merges_partial_settings() {
        let storage = MockClientStorage::with(
            SETTINGS_KEY,
            json!({ "failOnNullAlias": false, "colorFallback": "#ffffff" }),
        );
        let settings = LoadSettings::new(storage).execute().await.unwrap();
        assert!(!settings.fail_on_null_alias);
        assert_eq!(settings.color_fallback, "#ffffff");
        assert!(settings.extend_existing_collections);
    }

    #[tokio::test]
    async fn test_save_then_reset() {
        let storage = MockClientStorage::default();
        let save = SaveSettings::new(&storage);
        let settings = Settings {
            string_fallback: "?".to_string(),
            ..Settings::default()
        };

        save.execute(&settings).await.unwrap();
        assert_eq!(
            storage.value(SETTINGS_KEY).unwrap()["stringFallback"],
            json!("?")
        );

        save.reset().await.unwrap();
        assert!(storage.value(SETTINGS_KEY).is_none());
    }
}
