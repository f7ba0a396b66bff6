//! Configuration management for comicopt.
//!
//! Configuration is loaded from the platform config directory with defaults
//! for everything. The pipeline itself never reads it: callers turn it into
//! explicit [`crate::ProcessOptions`].

mod types;
mod validate;

pub use types::*;
pub use validate::validate_output_extension;

use crate::error::ConfigError;
use crate::preset::Presets;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for comicopt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Processing settings
    pub processing: ProcessingConfig,

    /// Optimizer presets
    pub presets: Presets,

    /// Worker hand-off settings
    pub pipeline: PipelineConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.comicopt.comicopt/config.toml
    /// - Linux: ~/.config/comicopt/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\comicopt\config\config.toml
    ///
    /// Falls back to ~/.comicopt/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "comicopt", "comicopt")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".comicopt").join("config.toml")
            })
    }

    /// The last processed root with `~` expanded, if one was recorded.
    pub fn last_root_dir(&self) -> Option<PathBuf> {
        self.general.last_root_dir.as_ref().map(|dir| {
            let path_str = dir.to_string_lossy();
            PathBuf::from(shellexpand::tilde(&path_str).into_owned())
        })
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.processing.output_extension, ".cbz");
        assert_eq!(config.processing.default_preset, "lossless");
        assert_eq!(config.processing.image_extensions.len(), 6);
        assert_eq!(config.processing.disposal, DisposalMode::Trash);
        assert!(config.processing.verify_archives);
        assert_eq!(config.pipeline.event_buffer, 64);
        assert_eq!(config.presets.len(), 2);
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[processing]"));
        assert!(toml.contains("[presets]"));
        assert!(toml.contains("lossless"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            [processing]
            output_extension = ".zip"
            disposal = "delete"

            [presets]
            quick = ["pingo", "-s0"]
            "#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.processing.output_extension, ".zip");
        assert_eq!(config.processing.disposal, DisposalMode::Delete);
        assert_eq!(config.processing.default_preset, "lossless");
        // A [presets] table replaces the defaults wholesale
        assert_eq!(config.presets.len(), 1);
        assert!(config.presets.resolve("quick").is_ok());
    }

    #[test]
    fn test_load_from_rejects_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[processing]\noutput_extension = \"cbz\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[processing\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_last_root_dir_expands_tilde() {
        let mut config = Config::default();
        assert!(config.last_root_dir().is_none());

        config.general.last_root_dir = Some(PathBuf::from("/srv/comics"));
        assert_eq!(config.last_root_dir(), Some(PathBuf::from("/srv/comics")));

        config.general.last_root_dir = Some(PathBuf::from("~/comics"));
        let expanded = config.last_root_dir().unwrap();
        assert!(!expanded.to_string_lossy().starts_with('~'));
    }
}
