//! Configuration validation.

use crate::error::ConfigError;

use super::Config;

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

impl Config {
    /// Validate configuration values.
    ///
    /// Presets with empty command lists are accepted here; they only fail
    /// when a run actually selects them.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.processing.image_extensions.is_empty() {
            return Err(ConfigError::ValidationError(
                "processing.image_extensions must not be empty".into(),
            ));
        }
        if self
            .processing
            .image_extensions
            .iter()
            .any(|ext| ext.is_empty() || ext.starts_with('.'))
        {
            return Err(ConfigError::ValidationError(
                "processing.image_extensions entries must be non-empty and written without a leading dot".into(),
            ));
        }
        validate_output_extension(&self.processing.output_extension)?;
        if self.pipeline.event_buffer == 0 {
            return Err(ConfigError::ValidationError(
                "pipeline.event_buffer must be > 0".into(),
            ));
        }
        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level must be one of {}",
                LOG_LEVELS.join(", ")
            )));
        }
        Ok(())
    }
}

/// Check an archive suffix such as `.cbz`.
pub fn validate_output_extension(ext: &str) -> Result<(), ConfigError> {
    if !ext.starts_with('.') || ext.len() < 2 {
        return Err(ConfigError::ValidationError(format!(
            "output extension must start with '.' and name a suffix, got '{ext}'"
        )));
    }
    if ext.contains(|c: char| c == '/' || c == '\\') {
        return Err(ConfigError::ValidationError(format!(
            "output extension must not contain path separators, got '{ext}'"
        )));
    }
    Ok(())
}
