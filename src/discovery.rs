//! Recursive discovery of input files under a data root.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recursively collect the absolute paths of all `*.json` files under `root`.
///
/// Entries are visited in file-name order so runs are deterministic. A root
/// that does not exist or contains no matches yields an empty list, not an
/// error; an unreadable entry under an existing root is an error.
pub fn discover_json_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry =
            entry.with_context(|| format!("Failed to walk data root {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        files.push(std::path::absolute(&path).unwrap_or(path));
    }
    Ok(files)
}
