//! Redundancy resolver: drops rasters that a same-stem WebP now replaces.
//!
//! Matching is per directory. A WebP in one folder never removes a file in
//! another.

use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{PipelineError, PipelineResult};

use super::filter::walk_error;
use super::formats::{is_webp, ImageFormats};

/// Remove every non-WebP image whose stem has a WebP sibling.
///
/// Returns the number of removed files. Running it again removes nothing.
pub fn remove_redundant(dir: &Path, formats: &ImageFormats) -> PipelineResult<usize> {
    let mut removed = 0;

    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|e| walk_error(dir, e))?;
        if entry.file_type().is_dir() {
            removed += resolve_directory(entry.path(), formats)?;
        }
    }

    Ok(removed)
}

/// Resolve one directory level.
fn resolve_directory(dir: &Path, formats: &ImageFormats) -> PipelineResult<usize> {
    let files = list_files(dir)?;

    let webp_stems: HashSet<OsString> = files
        .iter()
        .filter(|path| is_webp(path))
        .filter_map(|path| path.file_stem().map(|s| s.to_os_string()))
        .collect();
    if webp_stems.is_empty() {
        return Ok(0);
    }

    let mut removed = 0;
    for path in &files {
        let superseded = formats.is_superseded_by_webp(path)
            && path
                .file_stem()
                .map(|stem| webp_stems.contains(stem))
                .unwrap_or(false);
        if !superseded {
            continue;
        }

        std::fs::remove_file(path).map_err(|source| PipelineError::Redundancy {
            path: path.clone(),
            source,
        })?;
        tracing::trace!("Removed {:?} (WebP sibling exists)", path);
        removed += 1;
    }
    Ok(removed)
}

fn list_files(dir: &Path) -> PipelineResult<Vec<PathBuf>> {
    let walk_err = |source| PipelineError::Walk {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(walk_err)? {
        let entry = entry.map_err(walk_err)?;
        if entry.file_type().map_err(walk_err)?.is_file() {
            files.push(entry.path());
        }
    }
    Ok(files)
}
