// ABOUTME: Fake collaborators for orchestrator and cache tests.
// ABOUTME: Scripted tag sources, orderings, diffs, and a recording cleanup.

// not every test binary uses every fake
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use binscout::registry::ordering::{OrderingError, TagOrdering};
use binscout::registry::{TagError, TagSource};
use binscout::runtime::{DiffError, DiffReport, EnvironmentCleanup, FilesystemDiff};

/// Tag source answering from a fixed table and recording every lookup.
#[derive(Default)]
pub struct FakeTags {
    responses: HashMap<String, Vec<String>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeTags {
    pub fn new(responses: &[(&str, &[&str])]) -> Self {
        let responses = responses
            .iter()
            .map(|(image, tags)| {
                (
                    image.to_string(),
                    tags.iter().map(|t| t.to_string()).collect(),
                )
            })
            .collect();
        Self {
            responses,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl TagSource for FakeTags {
    async fn list_tags(&self, image: &str) -> Result<Vec<String>, TagError> {
        self.calls.lock().unwrap().push(image.to_string());
        Ok(self.responses.get(image).cloned().unwrap_or_default())
    }
}

/// Ordering with scripted behavior for the three outcome branches.
pub enum ScriptedOrdering {
    /// Lexicographic ascending passthrough.
    Ascending,
    /// Always errors, the soft retry-later case.
    Fails,
    /// Always returns an empty ordering, the persisted-skip case.
    Empty,
}

impl TagOrdering for ScriptedOrdering {
    fn order(&self, tags: &[String]) -> Result<Vec<String>, OrderingError> {
        match self {
            Self::Ascending => {
                let mut ordered = tags.to_vec();
                ordered.sort();
                Ok(ordered)
            }
            Self::Fails => Err(OrderingError::Failed("scripted failure".to_string())),
            Self::Empty => Ok(Vec::new()),
        }
    }
}

/// Diff reporting a fixed path set, counting invocations.
#[derive(Default)]
pub struct FakeDiff {
    paths: Vec<String>,
    pub calls: AtomicUsize,
}

impl FakeDiff {
    pub fn new(paths: &[&str]) -> Self {
        Self {
            paths: paths.iter().map(|p| p.to_string()).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FilesystemDiff for FakeDiff {
    async fn diff(&self, _reference: &str) -> Result<DiffReport, DiffError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(DiffReport {
            unique_paths: self.paths.clone(),
        })
    }
}

/// Diff that always fails.
pub struct FailingDiff;

#[async_trait]
impl FilesystemDiff for FailingDiff {
    async fn diff(&self, reference: &str) -> Result<DiffReport, DiffError> {
        Err(DiffError::Export(format!("scripted failure for {reference}")))
    }
}

/// Cleanup that only records whether it ran.
#[derive(Default)]
pub struct RecordingCleanup {
    pub calls: AtomicUsize,
}

impl RecordingCleanup {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EnvironmentCleanup for RecordingCleanup {
    async fn cleanup(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}
