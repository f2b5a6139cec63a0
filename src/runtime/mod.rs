// ABOUTME: Container runtime collaborators: filesystem diff and cleanup.
// ABOUTME: The docker submodule provides the bollard-backed implementation.

mod docker;

pub use docker::DockerRuntime;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Paths a container image introduces relative to a baseline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiffReport {
    pub unique_paths: Vec<String>,
}

#[derive(Debug, Error)]
pub enum DiffError {
    #[error("runtime connection failed: {0}")]
    Connection(String),

    #[error("image pull failed for {image}: {message}")]
    Pull { image: String, message: String },

    #[error("container export failed: {0}")]
    Export(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Computes the filesystem paths unique to an image tag.
#[async_trait]
pub trait FilesystemDiff: Send + Sync {
    /// Diff `image:tag` against the baseline and report its unique paths.
    async fn diff(&self, reference: &str) -> Result<DiffReport, DiffError>;
}

/// Best-effort teardown of runtime state after a failed image.
#[async_trait]
pub trait EnvironmentCleanup: Send + Sync {
    /// Stop and remove containers, prune images, sweep working
    /// directories. Failures are logged and swallowed.
    async fn cleanup(&self);
}
