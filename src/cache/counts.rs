// ABOUTME: Global alias frequency table over the cache tree.
// ABOUTME: Full recomputation; presence in a file counts once per file.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::cache::entry::{AliasMap, CacheError};
use crate::cache::is_reserved;

/// Alias name to the number of cache entries that mention it.
pub type AliasCounts = BTreeMap<String, u64>;

/// Recompute alias counts over every entry under the root.
///
/// The reserved `skips.json` and `counts.json` files are ignored wherever
/// they appear. An alias counts once per file regardless of its path, so
/// recomputing over an unchanged tree reproduces the same table.
pub fn compute_counts(root: &Path) -> Result<AliasCounts, CacheError> {
    let mut counts = AliasCounts::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if !name.ends_with(".json") || is_reserved(name) {
            continue;
        }
        let content = fs::read_to_string(entry.path())?;
        let aliases: AliasMap = serde_json::from_str(&content)?;
        for alias in aliases.keys() {
            *counts.entry(alias.clone()).or_insert(0) += 1;
        }
    }
    Ok(counts)
}

/// Read a persisted counts table, empty if the file does not exist.
pub fn read_counts(path: &Path) -> Result<AliasCounts, CacheError> {
    if !path.exists() {
        return Ok(AliasCounts::new());
    }
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Persist a counts table, key-sorted by the map ordering.
pub fn write_counts(path: &Path, counts: &AliasCounts) -> Result<(), CacheError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(counts)?)?;
    Ok(())
}
