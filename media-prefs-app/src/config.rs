//! Store location configuration

use std::path::{Path, PathBuf};

use media_prefs_core::error::{PrefsError, PrefsResult};

const APP_DIR_NAME: &str = "media-prefs";
const STORE_FILE_NAME: &str = "prefs.json";

/// Where the JSON preferences file lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    path: PathBuf,
}

impl StoreConfig {
    /// Platform config directory:
    /// - macOS: `~/Library/Application Support/media-prefs/prefs.json`
    /// - Windows: `%APPDATA%/media-prefs/prefs.json`
    /// - Linux: `~/.config/media-prefs/prefs.json`
    pub fn default_location() -> PrefsResult<Self> {
        let dir = dirs::config_dir().ok_or_else(|| {
            PrefsError::StorageError("Failed to determine config directory".to_string())
        })?;
        Ok(Self::with_path(dir.join(APP_DIR_NAME).join(STORE_FILE_NAME)))
    }

    #[must_use]
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
