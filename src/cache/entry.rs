// ABOUTME: Cache entry lifecycle: load, build from a diff, persist.
// ABOUTME: get_or_create reuses other-tag entries before computing a diff.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::cache::CacheLayout;
use crate::cache::filter::include_path;
use crate::runtime::{DiffError, FilesystemDiff};
use crate::types::ImageReference;

/// Alias name to absolute path, unique names within one entry.
pub type AliasMap = BTreeMap<String, String>;

/// One persisted alias mapping for an image tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub path: PathBuf,
    pub aliases: AliasMap,
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed cache file: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error(transparent)]
    Diff(#[from] DiffError),
}

/// Load a persisted entry from disk.
pub fn load_entry(path: &Path) -> Result<CacheEntry, CacheError> {
    let content = fs::read_to_string(path)?;
    let aliases: AliasMap = serde_json::from_str(&content)?;
    Ok(CacheEntry {
        path: path.to_path_buf(),
        aliases,
    })
}

/// Build the alias mapping from a diff's unique paths.
///
/// Basenames become alias names and filtered paths are dropped. A
/// duplicate name overwrites the earlier path: last write wins in the
/// reported path order, with a warning.
pub fn build_aliases<I, S>(unique_paths: I) -> AliasMap
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut aliases = AliasMap::new();
    for path in unique_paths {
        let path = path.as_ref();
        if !include_path(path) {
            continue;
        }
        let name = path.rsplit('/').next().unwrap_or(path);
        if name.is_empty() {
            continue;
        }
        if aliases.contains_key(name) {
            warn!(alias = name, "duplicate alias, keeping the later path");
        }
        aliases.insert(name.to_string(), path.to_string());
    }
    aliases
}

/// Persist an alias mapping, creating parent directories as needed.
pub fn write_aliases(path: &Path, aliases: &AliasMap) -> Result<(), CacheError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(aliases)?)?;
    Ok(())
}

/// Fetch the cached aliases for an image tag, computing them at most once.
///
/// Resolution order: the exact (image, tag) file, then any entry cached
/// under another tag of the same image, then a fresh diff. Only the last
/// arm touches the diff collaborator; reusing another tag's entry is an
/// accepted staleness trade-off.
pub async fn get_or_create<D: FilesystemDiff + ?Sized>(
    layout: &CacheLayout,
    image: &ImageReference,
    tag: &str,
    diff: &D,
) -> Result<CacheEntry, CacheError> {
    let path = layout.entry_path(image, tag);
    if path.exists() {
        return load_entry(&path);
    }

    let matches = layout.search_prefix(image)?;
    if let Some(existing) = matches.first() {
        debug!(path = %existing.display(), "reusing entry from another tag");
        return load_entry(existing);
    }

    let reference = image.with_tag(tag);
    let report = diff.diff(&reference).await?;
    let aliases = build_aliases(&report.unique_paths);

    info!(path = %path.display(), aliases = aliases.len(), "writing cache entry");
    write_aliases(&path, &aliases)?;
    Ok(CacheEntry { path, aliases })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_aliases_filters_and_names_by_basename() {
        let aliases = build_aliases([
            "/usr/local/bin/samtools",
            "/usr/bin/ls",
            "/opt/lib/libfoo.so",
            "/opt/conda/bin/blastn",
        ]);
        assert_eq!(aliases.len(), 2);
        assert_eq!(aliases["samtools"], "/usr/local/bin/samtools");
        assert_eq!(aliases["blastn"], "/opt/conda/bin/blastn");
    }

    #[test]
    fn duplicate_alias_last_write_wins() {
        let aliases = build_aliases(["/opt/a/bin/tool", "/opt/b/bin/tool"]);
        assert_eq!(aliases.len(), 1);
        assert_eq!(aliases["tool"], "/opt/b/bin/tool");
    }

    #[test]
    fn round_trip_preserves_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep").join("entry:1.0.json");

        let mut aliases = AliasMap::new();
        aliases.insert("samtools".to_string(), "/usr/local/bin/samtools".to_string());
        aliases.insert("bgzip".to_string(), "/usr/local/bin/bgzip".to_string());

        write_aliases(&path, &aliases).unwrap();
        let loaded = load_entry(&path).unwrap();
        assert_eq!(loaded.aliases, aliases);
    }
}
