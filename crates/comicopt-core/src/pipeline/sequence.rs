//! Sequencer: renumbers top-level pages into a zero-padded natural sequence.
//!
//! Pages that need a new name are first moved into a freshly created scratch
//! directory and only then back out under their final name, so no rename ever
//! lands on a name still held by another page.

use std::collections::HashSet;
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};

use super::formats::ImageFormats;
use super::natural::natural_cmp;

const SCRATCH_PREFIX: &str = ".comicopt-stage-";

/// One page's old and new file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renamed {
    pub from: String,
    pub to: String,
}

/// Digits needed for `count` page numbers (`len(str(count))`, at least 1).
pub fn padding_for(count: usize) -> usize {
    count.to_string().len()
}

/// Planned final name for a page.
fn target_name(index: usize, padding: usize, original: &str) -> String {
    let ext = Path::new(original)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    format!("{index:0padding$}{ext}")
}

/// Compute the renames for a list of page names without touching disk.
pub fn plan(mut names: Vec<String>) -> Vec<Renamed> {
    names.sort_by(|a, b| natural_cmp(a, b));
    let padding = padding_for(names.len());

    names
        .into_iter()
        .enumerate()
        .map(|(i, from)| {
            let to = target_name(i + 1, padding, &from);
            Renamed { from, to }
        })
        .collect()
}

/// Top-level image files of `dir`, by name.
fn list_pages(dir: &Path, formats: &ImageFormats) -> PipelineResult<(Vec<String>, HashSet<String>)> {
    let read_dir = std::fs::read_dir(dir).map_err(|source| PipelineError::Walk {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut pages = Vec::new();
    let mut others = HashSet::new();
    for entry in read_dir {
        let entry = entry.map_err(|source| PipelineError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        let name = entry.file_name().to_string_lossy().into_owned();
        // Follows symlinks, so a linked page is renumbered like any other
        let path = entry.path();
        if path.is_file() && formats.is_image(&path) {
            pages.push(name);
        } else {
            others.insert(name);
        }
    }
    Ok((pages, others))
}

/// Renumber the top-level pages of `dir` to `1..N`, zero-padded.
///
/// Returns the renames in page order, including pages whose name was
/// already correct. With no pages this is a no-op.
pub fn renumber(dir: &Path, formats: &ImageFormats) -> PipelineResult<Vec<Renamed>> {
    let (pages, others) = list_pages(dir, formats)?;
    let plan = plan(pages);

    let pending: Vec<&Renamed> = plan.iter().filter(|r| r.from != r.to).collect();
    if pending.is_empty() {
        return Ok(plan);
    }

    // Refuse before mutating anything if a final name belongs to an entry we
    // are not renumbering, such as a directory called "1.png".
    for r in &pending {
        if others.contains(r.to.as_str()) {
            return Err(PipelineError::Sequence {
                path: dir.to_path_buf(),
                message: format!("'{}' is already taken by another entry", r.to),
            });
        }
    }

    // Created exclusively, so its name cannot belong to any existing entry.
    // Kept on failure: pages still inside it must not be deleted with it.
    let scratch = tempfile::Builder::new()
        .prefix(SCRATCH_PREFIX)
        .tempdir_in(dir)
        .map_err(|e| PipelineError::Sequence {
            path: dir.to_path_buf(),
            message: format!("cannot create staging directory: {e}"),
        })?
        .keep();

    for r in &pending {
        rename(&dir.join(&r.from), &scratch.join(&r.to), dir)?;
    }

    for r in &pending {
        rename(&scratch.join(&r.to), &dir.join(&r.to), dir)?;
        tracing::trace!("Renamed {:?} -> {:?}", r.from, r.to);
    }

    std::fs::remove_dir(&scratch).map_err(|e| PipelineError::Sequence {
        path: dir.to_path_buf(),
        message: format!("cannot remove staging directory {:?}: {e}", scratch),
    })?;

    Ok(plan)
}

fn rename(from: &Path, to: &Path, dir: &Path) -> PipelineResult<()> {
    std::fs::rename(from, to).map_err(|e| PipelineError::Sequence {
        path: dir.to_path_buf(),
        message: format!("rename {:?} -> {:?}: {e}", from, to),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn names_in(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_padding_for() {
        assert_eq!(padding_for(0), 1);
        assert_eq!(padding_for(3), 1);
        assert_eq!(padding_for(9), 1);
        assert_eq!(padding_for(10), 2);
        assert_eq!(padding_for(120), 3);
    }

    #[test]
    fn test_plan_natural_order() {
        let plan = plan(vec![
            "page2.png".to_string(),
            "page10.png".to_string(),
            "page1.png".to_string(),
        ]);
        let pairs: Vec<(&str, &str)> = plan
            .iter()
            .map(|r| (r.from.as_str(), r.to.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("page1.png", "1.png"),
                ("page2.png", "2.png"),
                ("page10.png", "3.png"),
            ]
        );
    }

    #[test]
    fn test_plan_keeps_extension_text() {
        let plan = plan(vec!["Cover.JPG".to_string(), "noext".to_string()]);
        assert_eq!(plan[0].to, "1.JPG");
        assert_eq!(plan[1].to, "2");
    }

    #[test]
    fn test_renumber_pads_and_preserves_content() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        for i in 1..=12 {
            fs::write(root.join(format!("scan_{i}.png")), format!("page {i}")).unwrap();
        }

        let renamed = renumber(root, &ImageFormats::default()).unwrap();
        assert_eq!(renamed.len(), 12);

        for i in 1..=12 {
            let content = fs::read_to_string(root.join(format!("{i:02}.png"))).unwrap();
            assert_eq!(content, format!("page {i}"));
        }
        assert_eq!(names_in(root).len(), 12);
    }

    #[test]
    fn test_renumber_old_names_collide_with_new_names() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        // Natural order is 2, 3, 10 -> 1, 2, 3: "2.png" must move to 1 and
        // "3.png" to 2 without overwriting each other.
        fs::write(root.join("2.png"), b"two").unwrap();
        fs::write(root.join("3.png"), b"three").unwrap();
        fs::write(root.join("10.png"), b"ten").unwrap();

        renumber(root, &ImageFormats::default()).unwrap();

        assert_eq!(names_in(root), vec!["1.png", "2.png", "3.png"]);
        assert_eq!(fs::read(root.join("1.png")).unwrap(), b"two");
        assert_eq!(fs::read(root.join("2.png")).unwrap(), b"three");
        assert_eq!(fs::read(root.join("3.png")).unwrap(), b"ten");
    }

    #[test]
    fn test_renumber_mixed_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("b.webp"), b"b").unwrap();
        fs::write(root.join("a.jpg"), b"a").unwrap();
        fs::write(root.join("c.PNG"), b"c").unwrap();

        renumber(root, &ImageFormats::default()).unwrap();

        assert_eq!(names_in(root), vec!["1.jpg", "2.webp", "3.PNG"]);
    }

    #[test]
    fn test_renumber_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("x.png"), b"x").unwrap();
        fs::write(root.join("y.png"), b"y").unwrap();

        renumber(root, &ImageFormats::default()).unwrap();
        let second = renumber(root, &ImageFormats::default()).unwrap();

        assert!(second.iter().all(|r| r.from == r.to));
        assert_eq!(names_in(root), vec!["1.png", "2.png"]);
    }

    #[test]
    fn test_renumber_empty_dir_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let renamed = renumber(dir.path(), &ImageFormats::default()).unwrap();
        assert!(renamed.is_empty());
    }

    #[test]
    fn test_renumber_ignores_subfolders() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("extras")).unwrap();
        fs::write(root.join("extras/zz.png"), b"nested").unwrap();
        fs::write(root.join("zz.png"), b"top").unwrap();

        renumber(root, &ImageFormats::default()).unwrap();

        assert!(root.join("1.png").exists());
        assert!(root.join("extras/zz.png").exists());
    }

    #[test]
    fn test_renumber_keeps_page_named_like_staging_entry() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        // A page left behind by an interrupted run
        fs::write(root.join(".comicopt-stage-0-5.png"), b"leftover").unwrap();
        fs::write(root.join("5.png"), b"five").unwrap();

        renumber(root, &ImageFormats::default()).unwrap();

        // Digit runs sort before text, so "5.png" comes first
        assert_eq!(names_in(root), vec!["1.png", "2.png"]);
        assert_eq!(fs::read(root.join("1.png")).unwrap(), b"five");
        assert_eq!(fs::read(root.join("2.png")).unwrap(), b"leftover");
    }

    #[cfg(unix)]
    #[test]
    fn test_renumber_follows_symlinked_pages() {
        let dir = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(outside.path().join("real.png"), b"linked").unwrap();
        std::os::unix::fs::symlink(outside.path().join("real.png"), root.join("b.png")).unwrap();
        fs::write(root.join("a.png"), b"a").unwrap();

        renumber(root, &ImageFormats::default()).unwrap();

        assert_eq!(names_in(root), vec!["1.png", "2.png"]);
        assert_eq!(fs::read(root.join("2.png")).unwrap(), b"linked");
    }

    #[test]
    fn test_renumber_refuses_when_target_is_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("1.png")).unwrap();
        fs::write(root.join("a.png"), b"a").unwrap();

        let err = renumber(root, &ImageFormats::default()).unwrap_err();

        assert!(matches!(err, PipelineError::Sequence { .. }));
        // Nothing moved
        assert!(root.join("a.png").exists());
    }
}
