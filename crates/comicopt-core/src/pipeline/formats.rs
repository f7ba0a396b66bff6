//! Recognized page image formats.

use std::collections::HashSet;
use std::path::Path;

use crate::config::ProcessingConfig;

/// The transcoded format that supersedes other rasters of the same stem.
pub const WEBP: &str = "webp";

/// Case-insensitive set of page image extensions.
#[derive(Debug, Clone)]
pub struct ImageFormats {
    extensions: HashSet<String>,
}

impl Default for ImageFormats {
    fn default() -> Self {
        Self::from_config(&ProcessingConfig::default())
    }
}

impl ImageFormats {
    /// Build the set from `processing.image_extensions`.
    pub fn from_config(config: &ProcessingConfig) -> Self {
        Self::new(config.image_extensions.iter().map(String::as_str))
    }

    pub fn new<'a>(extensions: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            extensions: extensions
                .into_iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    /// Check if a path has a recognized image extension.
    pub fn is_image(&self, path: &Path) -> bool {
        extension_lower(path)
            .map(|ext| self.extensions.contains(&ext))
            .unwrap_or(false)
    }

    /// A recognized image that is not WebP.
    pub fn is_superseded_by_webp(&self, path: &Path) -> bool {
        self.is_image(path) && !is_webp(path)
    }
}

/// Lower-cased extension of a path, if it has a UTF-8 one.
pub fn extension_lower(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

pub fn is_webp(path: &Path) -> bool {
    extension_lower(path).as_deref() == Some(WEBP)
}
