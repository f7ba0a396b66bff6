//! Archiver: packs a folder into a store-only zip comic container.
//!
//! Pages are already compressed images, so entries are stored as-is. The
//! archive is written next to its destination and moved into place only once
//! complete.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Component, Path};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{PipelineError, PipelineResult};

/// Files at or above this size need zip64 headers.
const ZIP64_THRESHOLD: u64 = u32::MAX as u64;

/// Archive entry name for a path relative to the folder root.
///
/// Components are joined with `/` regardless of platform.
pub fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Write every file under `src` into a new archive at `dest`.
///
/// An existing file at `dest` is replaced. Returns the number of entries.
pub fn write_archive(src: &Path, dest: &Path) -> PipelineResult<usize> {
    let archive_err = |message: String| PipelineError::Archive {
        path: dest.to_path_buf(),
        message,
    };

    let parent = dest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut builder = tempfile::Builder::new();
    builder.prefix(".comicopt-").suffix(".part");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // Same mode as File::create, so the umask decides who can read it
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    let staging = builder
        .tempfile_in(parent)
        .map_err(|e| archive_err(format!("cannot create archive in {:?}: {e}", parent)))?;

    let mut zip = ZipWriter::new(BufWriter::new(staging.as_file()));
    let mut entries = 0;

    let walker = WalkDir::new(src).sort_by_file_name();
    for entry in walker {
        let entry = entry.map_err(|e| archive_err(format!("cannot walk {:?}: {e}", src)))?;
        // Follows symlinked files; linked directories are not descended into
        if !entry.path().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path
            .strip_prefix(src)
            .map_err(|e| archive_err(format!("{:?} is outside {:?}: {e}", path, src)))?;
        let name = entry_name(relative);

        let mut file = File::open(path)
            .map_err(|e| archive_err(format!("cannot read {:?}: {e}", path)))?;
        let size = file
            .metadata()
            .map_err(|e| archive_err(format!("cannot stat {:?}: {e}", path)))?
            .len();
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Stored)
            .large_file(size >= ZIP64_THRESHOLD);

        zip.start_file(name.as_str(), options)
            .map_err(|e| archive_err(format!("cannot add {name}: {e}")))?;
        std::io::copy(&mut file, &mut zip)
            .map_err(|e| archive_err(format!("cannot copy {:?}: {e}", path)))?;

        tracing::trace!("Stored {}", name);
        entries += 1;
    }

    let mut writer = zip
        .finish()
        .map_err(|e| archive_err(format!("cannot finish archive: {e}")))?;
    std::io::Write::flush(&mut writer)
        .map_err(|e| archive_err(format!("cannot flush archive: {e}")))?;
    drop(writer);

    staging
        .persist(dest)
        .map_err(|e| archive_err(format!("cannot move archive into place: {}", e.error)))?;

    Ok(entries)
}

/// Reopen `dest` and check it holds `expected` entries.
pub fn verify_archive(dest: &Path, expected: usize) -> PipelineResult<()> {
    let archive_err = |message: String| PipelineError::Archive {
        path: dest.to_path_buf(),
        message,
    };

    let file = File::open(dest).map_err(|e| archive_err(format!("cannot reopen archive: {e}")))?;
    let archive = ZipArchive::new(BufReader::new(file))
        .map_err(|e| archive_err(format!("archive is unreadable: {e}")))?;

    if archive.len() != expected {
        return Err(archive_err(format!(
            "archive holds {} entries, expected {expected}",
            archive.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Read;

    fn read_entries(path: &Path) -> Vec<(String, Vec<u8>, CompressionMethod)> {
        let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
        let mut out = Vec::new();
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).unwrap();
            let mut bytes = Vec::new();
            entry.read_to_end(&mut bytes).unwrap();
            out.push((entry.name().to_string(), bytes, entry.compression()));
        }
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    #[test]
    fn test_entry_name_uses_forward_slashes() {
        let relative: std::path::PathBuf = ["extras", "covers", "1.png"].iter().collect();
        assert_eq!(entry_name(&relative), "extras/covers/1.png");
        assert_eq!(entry_name(Path::new("1.png")), "1.png");
    }

    #[test]
    fn test_round_trip_two_files() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("Issue 01");
        fs::create_dir(&src).unwrap();
        fs::write(src.join("a.png"), b"\x89PNG page a").unwrap();
        fs::write(src.join("b.webp"), b"RIFF page b").unwrap();
        let dest = dir.path().join("Issue 01.cbz");

        let count = write_archive(&src, &dest).unwrap();

        assert_eq!(count, 2);
        let entries = read_entries(&dest);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "a.png");
        assert_eq!(entries[0].1, b"\x89PNG page a");
        assert_eq!(entries[1].0, "b.webp");
        assert_eq!(entries[1].1, b"RIFF page b");
        assert!(entries
            .iter()
            .all(|(_, _, method)| *method == CompressionMethod::Stored));
    }

    #[test]
    fn test_nested_paths_have_no_folder_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("Vol 2");
        fs::create_dir_all(src.join("bonus")).unwrap();
        fs::write(src.join("1.png"), b"one").unwrap();
        fs::write(src.join("bonus/1.webp"), b"bonus").unwrap();
        let dest = dir.path().join("Vol 2.zip");

        write_archive(&src, &dest).unwrap();

        let names: Vec<String> = read_entries(&dest).into_iter().map(|e| e.0).collect();
        assert_eq!(names, vec!["1.png", "bonus/1.webp"]);
    }

    #[test]
    fn test_empty_folder_gives_valid_empty_archive() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("empty");
        fs::create_dir(&src).unwrap();
        let dest = dir.path().join("empty.cbz");

        let count = write_archive(&src, &dest).unwrap();

        assert_eq!(count, 0);
        assert!(dest.exists());
        assert!(read_entries(&dest).is_empty());
        verify_archive(&dest, 0).unwrap();
    }

    #[test]
    fn test_overwrites_existing_archive() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir(&src).unwrap();
        fs::write(src.join("1.png"), b"new").unwrap();
        let dest = dir.path().join("src.cbz");
        fs::write(&dest, b"stale, not a zip").unwrap();

        write_archive(&src, &dest).unwrap();

        let entries = read_entries(&dest);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].1, b"new");
    }

    #[test]
    fn test_missing_source_leaves_no_archive() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("ghost.cbz");

        let err = write_archive(&dir.path().join("ghost"), &dest).unwrap_err();

        assert!(matches!(err, PipelineError::Archive { .. }));
        assert!(!dest.exists());
        // The staging file is cleaned up too
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_destination_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir(&src).unwrap();

        let err = write_archive(&src, &dir.path().join("nope/src.cbz")).unwrap_err();
        assert!(matches!(err, PipelineError::Archive { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_archive_mode_matches_plain_create() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir(&src).unwrap();
        fs::write(src.join("1.png"), b"1").unwrap();
        let dest = dir.path().join("src.cbz");
        let plain = dir.path().join("plain");
        File::create(&plain).unwrap();

        write_archive(&src, &dest).unwrap();

        let mode = |p: &Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&dest), mode(&plain));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_page_is_stored() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir(&src).unwrap();
        fs::write(dir.path().join("real.png"), b"linked").unwrap();
        std::os::unix::fs::symlink(dir.path().join("real.png"), src.join("1.png")).unwrap();
        let dest = dir.path().join("src.cbz");

        let count = write_archive(&src, &dest).unwrap();

        assert_eq!(count, 1);
        let entries = read_entries(&dest);
        assert_eq!(entries[0].0, "1.png");
        assert_eq!(entries[0].1, b"linked");
    }

    #[test]
    fn test_verify_archive_detects_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir(&src).unwrap();
        fs::write(src.join("1.png"), b"1").unwrap();
        let dest = dir.path().join("src.cbz");
        write_archive(&src, &dest).unwrap();

        assert!(verify_archive(&dest, 1).is_ok());
        let err = verify_archive(&dest, 2).unwrap_err();
        assert!(err.to_string().contains("expected 2"));
    }
}
