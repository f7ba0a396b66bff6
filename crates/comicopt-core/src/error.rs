//! Error types for the comicopt folder pipeline.
//!
//! Errors are organized by stage so a failed batch names the folder, the file
//! and the step that stopped it.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for comicopt operations.
#[derive(Error, Debug)]
pub enum ComicOptError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// The requested preset does not exist
    #[error("Preset '{name}' not found in user settings")]
    UnknownPreset { name: String },

    /// The requested preset has no command tokens
    #[error("Preset '{name}' has no command")]
    EmptyPreset { name: String },
}

/// Pipeline processing errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The batch root is missing or not a directory
    #[error("Root directory not found: {0}")]
    RootNotFound(PathBuf),

    /// Listing a directory failed
    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Deleting a non-image file failed
    #[error("Failed to delete non-image file {path}: {source}")]
    Filter {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Renumbering pages failed
    #[error("Failed to renumber {path}: {message}")]
    Sequence { path: PathBuf, message: String },

    /// The optimizer process could not be started
    #[error("Failed to run optimizer '{program}' on {path}: {source}")]
    OptimizerSpawn {
        program: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Deleting a superseded raster failed
    #[error("Failed to remove redundant image {path}: {source}")]
    Redundancy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing or verifying the archive failed
    #[error("Failed to archive into {path}: {message}")]
    Archive { path: PathBuf, message: String },
}

/// Convenience type alias for comicopt results.
pub type Result<T> = std::result::Result<T, ComicOptError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_preset_names_the_preset() {
        let err = ComicOptError::from(ConfigError::UnknownPreset {
            name: "ultra".to_string(),
        });
        let message = err.to_string();
        assert!(message.starts_with("Configuration error"));
        assert!(message.contains("'ultra'"));
    }

    #[test]
    fn test_filter_error_keeps_source() {
        use std::error::Error as _;

        let err = PipelineError::Filter {
            path: PathBuf::from("/comics/Issue 01/notes.txt"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("notes.txt"));
        assert!(err.source().is_some());
    }
}
