//! Application configuration management

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use super::autosave::DEFAULT_AUTOSAVE_DELAY;
use super::storage::FileStorage;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Autosave settings
    pub autosave: AutosaveConfig,
    /// Where editor state is kept
    pub storage: StorageConfig,
    /// Export settings
    pub export: ExportConfig,
    /// UI settings
    pub ui: UiConfig,
}

/// Autosave settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutosaveConfig {
    /// Quiet period before a change is written, in milliseconds
    pub delay_ms: u64,
}

/// Storage settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Override for the storage directory
    pub dir: Option<PathBuf>,
}

/// Export settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory for exported files (defaults to the downloads folder)
    pub dir: Option<PathBuf>,
    /// Open the PDF with the system viewer once written
    pub open_after_export: bool,
}

/// UI settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Show the theme panel on startup
    pub show_theme_panel: bool,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_AUTOSAVE_DELAY.as_millis() as u64,
        }
    }
}

impl AutosaveConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "resume-editor", "ResumeEditor")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Result<Self> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        // Ensure config directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Storage directory: the configured override or the platform data dir
    pub fn storage_dir(&self) -> Option<PathBuf> {
        self.storage.dir.clone().or_else(FileStorage::default_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.autosave.delay(), Duration::from_millis(1000));
        assert!(!config.export.open_after_export);
        assert!(config.export.dir.is_none());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config = AppConfig::from_json(r#"{"export":{"open_after_export":true}}"#).unwrap();
        assert!(config.export.open_after_export);
        assert_eq!(config.autosave.delay_ms, 1000);
    }

    #[test]
    fn test_storage_dir_override() {
        let mut config = AppConfig::default();
        config.storage.dir = Some(PathBuf::from("/tmp/resume"));
        assert_eq!(config.storage_dir(), Some(PathBuf::from("/tmp/resume")));
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        assert!(AppConfig::from_json("{\"autosave\":{\"delay_ms\":\"soon\"}}").is_err());
    }
}
