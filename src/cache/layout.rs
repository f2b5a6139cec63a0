// ABOUTME: Deterministic mapping from image references to cache paths.
// ABOUTME: Implements the optional single-letter directory prefix policies.

use std::io;
use std::path::{Path, PathBuf};

use crate::config::PrefixPolicy;
use crate::types::ImageReference;

/// Derives on-disk locations for cache entries under a fixed root.
#[derive(Debug, Clone)]
pub struct CacheLayout {
    root: PathBuf,
    policy: PrefixPolicy,
}

impl CacheLayout {
    pub fn new(root: impl Into<PathBuf>, policy: PrefixPolicy) -> Self {
        Self {
            root: root.into(),
            policy,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Cache prefix for an image, without any tag or extension.
    ///
    /// Empty components collapse to nothing. A policy whose target
    /// component is empty silently falls back to the default layout;
    /// otherwise exactly one letter directory is inserted before the
    /// target component.
    pub fn prefix(&self, image: &ImageReference) -> PathBuf {
        let registry = image.registry();
        let namespace = image.namespace();
        let repository = image.repository();

        let segments: Vec<String> = match self.policy {
            PrefixPolicy::Org if !namespace.is_empty() => vec![
                registry.to_string(),
                letter(namespace),
                namespace.to_string(),
                repository.to_string(),
            ],
            PrefixPolicy::Registry if !registry.is_empty() => vec![
                letter(registry),
                registry.to_string(),
                namespace.to_string(),
                repository.to_string(),
            ],
            // the repository component is never empty
            PrefixPolicy::Repo => vec![
                registry.to_string(),
                namespace.to_string(),
                letter(repository),
                repository.to_string(),
            ],
            _ => vec![
                registry.to_string(),
                namespace.to_string(),
                repository.to_string(),
            ],
        };

        let mut path = self.root.clone();
        for segment in segments.into_iter().filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path
    }

    /// Entry location for an exact (image, tag) pair.
    ///
    /// The tag is a `:`-joined filename suffix, not a directory level.
    pub fn entry_path(&self, image: &ImageReference, tag: &str) -> PathBuf {
        let mut path = self.prefix(image).into_os_string();
        path.push(format!(":{tag}.json"));
        PathBuf::from(path)
    }

    /// All cached entries for this image under any tag, sorted.
    ///
    /// Matches the filename shape `<prefix>*.json` in the prefix's parent
    /// directory, the same set a shell glob over the prefix would find.
    pub fn search_prefix(&self, image: &ImageReference) -> io::Result<Vec<PathBuf>> {
        let prefix = self.prefix(image);
        let Some(parent) = prefix.parent() else {
            return Ok(Vec::new());
        };
        let Some(stem) = prefix.file_name().and_then(|name| name.to_str()) else {
            return Ok(Vec::new());
        };

        let entries = match std::fs::read_dir(parent) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut matches = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.starts_with(stem) && name.ends_with(".json") {
                matches.push(entry.path());
            }
        }
        matches.sort();
        Ok(matches)
    }

    /// Whether any tag of this image is already cached.
    pub fn has_entry(&self, image: &ImageReference) -> io::Result<bool> {
        Ok(!self.search_prefix(image)?.is_empty())
    }
}

fn letter(component: &str) -> String {
    component
        .chars()
        .next()
        .map(|c| c.to_lowercase().to_string())
        .unwrap_or_default()
}
