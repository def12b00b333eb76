//! Configuration file management.
//!
//! Handles loading, validating and saving the JSON configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{AppError, PageConfig, Result};

/// A loaded configuration together with the file it came from.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
    config: PageConfig,
}

impl ConfigFile {
    /// Load and validate a configuration file.
    ///
    /// # Errors
    /// Returns error if the file cannot be read, is not valid JSON, or lacks
    /// `pageId` / `shortLivedToken`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::io(format!("Failed to read config file: {}", path.display()), e)
        })?;

        let config: PageConfig = serde_json::from_str(&content).map_err(|e| AppError::Config {
            message: format!("Failed to parse config file: {e}"),
        })?;
        config.validate()?;

        tracing::debug!(path = %path.display(), page_id = %config.page_id, "Configuration loaded");

        Ok(Self {
            path: path.to_path_buf(),
            config,
        })
    }

    /// The loaded configuration.
    #[must_use]
    pub const fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Mutable access, for recording a newly obtained token.
    pub fn config_mut(&mut self) -> &mut PageConfig {
        &mut self.config
    }

    /// Path the configuration was loaded from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the configuration back to its file, pretty-printed.
    ///
    /// # Errors
    /// Returns error if serialization or the write fails.
    pub fn save(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.config).map_err(AppError::json_parse)?;

        fs::write(&self.path, content).map_err(|e| {
            AppError::io(
                format!("Failed to write config file: {}", self.path.display()),
                e,
            )
        })?;

        tracing::info!(path = %self.path.display(), "Configuration saved");

        Ok(())
    }
}
