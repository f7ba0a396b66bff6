//! Image filter: permanently removes every file that is not a page image.

use std::path::Path;
use walkdir::WalkDir;

use crate::error::{PipelineError, PipelineResult};

use super::formats::ImageFormats;

/// Recursively delete all non-image files under `dir`.
///
/// Directories are left in place, even when they end up empty. Returns the
/// number of deleted files. The first failure aborts the walk.
pub fn strip_non_images(dir: &Path, formats: &ImageFormats) -> PipelineResult<usize> {
    let mut removed = 0;

    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|e| walk_error(dir, e))?;
        // Symlinked files count as files; the link itself is what gets removed
        if !entry.path().is_file() || formats.is_image(entry.path()) {
            continue;
        }

        std::fs::remove_file(entry.path()).map_err(|source| PipelineError::Filter {
            path: entry.path().to_path_buf(),
            source,
        })?;
        tracing::trace!("Deleted non-image {:?}", entry.path());
        removed += 1;
    }

    Ok(removed)
}

/// Convert a walkdir failure into a pipeline error.
pub(crate) fn walk_error(root: &Path, err: walkdir::Error) -> PipelineError {
    let path = err
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.to_path_buf());
    let source = err
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
    PipelineError::Walk { path, source }
}
