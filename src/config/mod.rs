// ABOUTME: Validated settings for cache updates.
// ABOUTME: The letter-prefix policy is a single enum, not three flags.

use std::path::PathBuf;

use crate::cache::SKIPS_FILENAME;
use crate::error::{Error, Result};

/// Where the optional single-letter directory is inserted in cache paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrefixPolicy {
    /// No letter directory: `root/registry/namespace/repository`.
    #[default]
    Default,
    /// Letter from the namespace, before the namespace.
    Org,
    /// Letter from the registry, before the registry.
    Registry,
    /// Letter from the repository, before the repository.
    Repo,
}

impl PrefixPolicy {
    /// Collapse the three CLI switches into one policy.
    ///
    /// Requesting more than one kind of prefix is fatal before any
    /// processing starts.
    pub fn from_flags(org: bool, registry: bool, repo: bool) -> Result<Self> {
        match (org, registry, repo) {
            (false, false, false) => Ok(Self::Default),
            (true, false, false) => Ok(Self::Org),
            (false, true, false) => Ok(Self::Registry),
            (false, false, true) => Ok(Self::Repo),
            _ => Err(Error::PolicyConflict),
        }
    }
}

/// Settings for one batch update of the cache.
#[derive(Debug, Clone)]
pub struct UpdateSettings {
    /// Cache tree root.
    pub root: PathBuf,
    pub policy: PrefixPolicy,
    /// Namespace prepended to every identifier in the batch, e.g.
    /// `quay.io/biocontainers`.
    pub namespace: Option<String>,
    /// Skip list location, `skips.json` in the root by default.
    pub skips_file: PathBuf,
    /// Leave containers and working directories behind on failure.
    pub no_cleanup: bool,
}

impl UpdateSettings {
    pub fn new(root: impl Into<PathBuf>, policy: PrefixPolicy) -> Self {
        let root = root.into();
        let skips_file = root.join(SKIPS_FILENAME);
        Self {
            root,
            policy,
            namespace: None,
            skips_file,
            no_cleanup: false,
        }
    }

    pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace = namespace;
        self
    }

    pub fn with_skips_file(mut self, skips_file: Option<PathBuf>) -> Self {
        if let Some(skips_file) = skips_file {
            self.skips_file = skips_file;
        }
        self
    }

    pub fn with_no_cleanup(mut self, no_cleanup: bool) -> Self {
        self.no_cleanup = no_cleanup;
        self
    }
}
