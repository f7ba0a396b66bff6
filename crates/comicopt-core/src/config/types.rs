//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// General settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Root directory of the last successful run (supports `~`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_root_dir: Option<PathBuf>,
}

/// Processing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Extensions treated as page images (without the dot, case-insensitive)
    pub image_extensions: Vec<String>,

    /// Suffix for written archives, used verbatim
    pub output_extension: String,

    /// Preset used when none is given on the command line
    pub default_preset: String,

    /// Skip the external optimizer entirely
    pub skip_optimizer: bool,

    /// How archived source folders are removed
    pub disposal: DisposalMode,

    /// Reopen each archive and check its entry count before disposal
    pub verify_archives: bool,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            image_extensions: vec![
                "png".to_string(),
                "jpg".to_string(),
                "jpeg".to_string(),
                "webp".to_string(),
                "avif".to_string(),
                "gif".to_string(),
            ],
            output_extension: ".cbz".to_string(),
            default_preset: "lossless".to_string(),
            skip_optimizer: false,
            disposal: DisposalMode::Trash,
            verify_archives: true,
        }
    }
}

/// How a folder is removed once its archive exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisposalMode {
    /// Send to the OS trash, falling back to deletion
    #[default]
    Trash,
    /// Delete without trying the trash
    Delete,
}

impl std::fmt::Display for DisposalMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisposalMode::Trash => write!(f, "trash"),
            DisposalMode::Delete => write!(f, "delete"),
        }
    }
}

/// Settings for the background worker hand-off.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Max batch events buffered between the worker and the consumer
    pub event_buffer: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { event_buffer: 64 }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
