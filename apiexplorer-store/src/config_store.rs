//! JSON file implementation of [`ConfigStore`].

use std::path::{Path, PathBuf};

use apiexplorer_core::{ConfigStore, ConnectionConfig, CoreError};
use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::persistence::{default_config_path, load_json, remove_file, save_json};

/// Config store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonConfigStore {
    path: PathBuf,
}

impl JsonConfigStore {
    /// Creates a store for the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store at the default location.
    pub fn at_default_path() -> Self {
        Self::new(default_config_path())
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if the file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Reads the stored config. A missing file yields `None`.
    pub async fn read(&self) -> Result<Option<ConnectionConfig>, StoreError> {
        match load_json(&self.path).await {
            Ok(config) => Ok(Some(config)),
            Err(e) if e.is_not_found() => {
                debug!(path = %self.path.display(), "No config file");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Writes the config.
    pub async fn write(&self, config: &ConnectionConfig) -> Result<(), StoreError> {
        save_json(&self.path, config).await
    }

    /// Deletes the stored config. Returns true if a file was removed.
    pub async fn reset(&self) -> Result<bool, StoreError> {
        let removed = remove_file(&self.path).await?;
        if removed {
            info!(path = %self.path.display(), "Config reset");
        }
        Ok(removed)
    }
}

impl Default for JsonConfigStore {
    fn default() -> Self {
        Self::at_default_path()
    }
}

#[async_trait]
impl ConfigStore for JsonConfigStore {
    async fn load(&self) -> Result<Option<ConnectionConfig>, CoreError> {
        Ok(self.read().await?)
    }

    async fn save(&self, config: &ConnectionConfig) -> Result<(), CoreError> {
        Ok(self.write(config).await?)
    }
}
