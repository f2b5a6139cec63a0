// ABOUTME: Persisted denylist of images that failed processing.
// ABOUTME: Stored as a sorted JSON array, rewritten after every image.

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use crate::cache::entry::CacheError;

/// Images not worth retrying, keyed by identifier without tag.
#[derive(Debug, Default, Clone)]
pub struct SkipSet {
    path: PathBuf,
    entries: BTreeSet<String>,
}

impl SkipSet {
    /// Load the skip set, starting empty if the file does not exist.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let path = path.into();
        let mut entries = BTreeSet::new();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let listed: Vec<String> = serde_json::from_str(&content)?;
            entries.extend(listed);
        }
        Ok(Self { path, entries })
    }

    pub fn contains(&self, image: &str) -> bool {
        self.entries.contains(image)
    }

    pub fn record(&mut self, image: impl Into<String>) {
        self.entries.insert(image.into());
    }

    /// Rewrite the skip file; output is sorted by the set ordering.
    pub fn flush(&self) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let listed: Vec<&String> = self.entries.iter().collect();
        fs::write(&self.path, serde_json::to_string_pretty(&listed)?)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
