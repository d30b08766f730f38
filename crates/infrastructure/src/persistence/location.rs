//! Default on-disk locations.
//!
//! Everything lives in the platform-specific config directory:
//! - Linux: ~/.config/varsync/
//! - macOS: ~/Library/Application Support/varsync/
//! - Windows: %APPDATA%/varsync/

use std::path::PathBuf;

/// Name of the application directory inside the config directory.
pub const APP_DIR_NAME: &str = "varsync";

/// File name of the persisted variable store.
pub const STORE_FILE_NAME: &str = "store.json";

/// Error raised when no config directory can be determined.
#[derive(Debug, thiserror::Error)]
#[error("Could not determine config directory")]
pub struct NoConfigDir;

/// Returns the varsync config directory.
///
/// # Errors
/// Returns [`NoConfigDir`] if the platform has no config directory.
pub fn default_config_dir() -> Result<PathBuf, NoConfigDir> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or(NoConfigDir)
}
