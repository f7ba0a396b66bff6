//! Disposal: removes a source folder once its archive exists.
//!
//! Disposal never fails the batch. Each fallback is weaker than the last and
//! the outcome is reported instead of raised.

use serde::{Deserialize, Serialize};
use std::path::Path;
use walkdir::WalkDir;

use crate::config::DisposalMode;

/// How a folder was disposed of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposal {
    /// Moved to the OS trash
    Trashed,
    /// Removed as an empty directory
    Removed,
    /// Removed recursively
    ForceRemoved,
    /// Some entries could not be removed
    Incomplete,
}

impl Disposal {
    /// True when the folder no longer exists at its original path.
    pub fn is_complete(self) -> bool {
        self != Disposal::Incomplete
    }
}

impl std::fmt::Display for Disposal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Disposal::Trashed => "moved to trash",
            Disposal::Removed => "removed",
            Disposal::ForceRemoved => "force removed",
            Disposal::Incomplete => "partially removed",
        };
        f.write_str(label)
    }
}

/// Dispose of `dir` according to `mode`.
pub fn dispose(dir: &Path, mode: DisposalMode) -> Disposal {
    if mode == DisposalMode::Trash {
        match trash::delete(dir) {
            Ok(()) => {
                tracing::debug!("Moved {:?} to trash", dir);
                return Disposal::Trashed;
            }
            Err(e) => {
                tracing::warn!("Trash unavailable for {:?}, deleting instead: {}", dir, e);
            }
        }
    }

    if std::fs::remove_dir(dir).is_ok() {
        tracing::debug!("Removed {:?}", dir);
        return Disposal::Removed;
    }

    force_remove(dir)
}

/// Delete everything under `dir`, children first, ignoring failures.
fn force_remove(dir: &Path) -> Disposal {
    let mut failures = 0usize;

    for entry in WalkDir::new(dir).contents_first(true) {
        let Ok(entry) = entry else {
            failures += 1;
            continue;
        };
        let path = entry.path();
        let removed = if entry.file_type().is_dir() {
            std::fs::remove_dir(path)
        } else {
            std::fs::remove_file(path)
        };
        if let Err(e) = removed {
            tracing::trace!("Could not remove {:?}: {}", path, e);
            failures += 1;
        }
    }

    if dir.exists() {
        tracing::warn!(
            "Could not fully remove {:?} ({} entries left behind)",
            dir,
            failures
        );
        Disposal::Incomplete
    } else {
        tracing::debug!("Force removed {:?}", dir);
        Disposal::ForceRemoved
    }
}
