//! Remembers the last processed root in the config file.

use std::path::Path;
use toml_edit::DocumentMut;

/// Record `root` as `general.last_root_dir` in the config file at `path`.
///
/// The file is edited in place so comments and layout survive. Returns
/// `Ok(false)` without creating anything when there is no config file.
pub fn record_last_root(path: &Path, root: &Path) -> anyhow::Result<bool> {
    if !path.exists() {
        return Ok(false);
    }

    let content = std::fs::read_to_string(path)?;
    let mut doc: DocumentMut = content.parse()?;

    let general = doc.entry("general").or_insert(toml_edit::table());
    let Some(table) = general.as_table_like_mut() else {
        anyhow::bail!("`general` in {} is not a table", path.display());
    };
    table.insert(
        "last_root_dir",
        toml_edit::value(root.to_string_lossy().as_ref()),
    );

    std::fs::write(path, doc.to_string())?;
    Ok(true)
}
