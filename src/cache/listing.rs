// ABOUTME: Read-only cross-reference of the cache against a published tree.
// ABOUTME: Yields entries whose image has no counterpart under the published root.

use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::cache::entry::CacheError;
use crate::cache::is_reserved;

/// Cache entries whose image is absent from the published root.
///
/// Comparison is by image, not exact file: a published entry under the
/// same relative directory counts for any tag of that image. The cache
/// tree is never modified.
pub fn unpublished_entries(
    cache_root: &Path,
    published_root: &Path,
) -> Result<Vec<PathBuf>, CacheError> {
    let mut missing = Vec::new();
    for entry in WalkDir::new(cache_root) {
        let entry = entry.map_err(io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if !name.ends_with(".json") || is_reserved(name) {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(cache_root) else {
            continue;
        };

        let stem = image_stem(name);
        let published_dir = match relative.parent() {
            Some(parent) => published_root.join(parent),
            None => published_root.to_path_buf(),
        };
        if !dir_has_image(&published_dir, stem)? {
            missing.push(entry.path().to_path_buf());
        }
    }
    missing.sort();
    Ok(missing)
}

/// The repository portion of an entry filename, without tag or extension.
fn image_stem(name: &str) -> &str {
    match name.split_once(':') {
        Some((stem, _)) => stem,
        None => name.trim_end_matches(".json"),
    }
}

fn dir_has_image(dir: &Path, stem: &str) -> Result<bool, CacheError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e.into()),
    };
    let tagged = format!("{stem}:");
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.ends_with(".json") && (name.starts_with(&tagged) || image_stem(name) == stem) {
            return Ok(true);
        }
    }
    Ok(false)
}
