// ABOUTME: Bollard-backed filesystem diff and environment cleanup.
// ABOUTME: Exports a created container and enumerates its executables.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use bollard::Docker;
use bollard::models::ContainerCreateBody;
use bollard::query_parameters::{
    CreateContainerOptions, CreateImageOptions, ListContainersOptions, PruneImagesOptions,
    RemoveContainerOptions, StopContainerOptions,
};
use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use super::{DiffError, DiffReport, EnvironmentCleanup, FilesystemDiff};

/// Prefix of the working directories this runtime creates under the
/// system temp dir; cleanup sweeps anything matching it.
pub const WORK_DIR_PREFIX: &str = "binscout-";

/// Paths assumed to come from the base layers rather than the image's own
/// payload. A coarse stand-in for a layer-accurate baseline; the path
/// filter catches most of the same territory downstream.
const BASELINE_PREFIXES: &[&str] = &[
    "/bin/",
    "/boot/",
    "/dev/",
    "/etc/",
    "/lib/",
    "/lib32/",
    "/lib64/",
    "/proc/",
    "/run/",
    "/sbin/",
    "/sys/",
    "/usr/bin/",
    "/usr/lib/",
    "/usr/libexec/",
    "/usr/sbin/",
    "/usr/share/",
    "/var/",
];

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

fn map_pull_error(e: bollard::errors::Error, image: &str) -> DiffError {
    DiffError::Pull {
        image: image.to_string(),
        message: e.to_string(),
    }
}

/// Diff and cleanup against a local Docker-compatible daemon.
///
/// The daemon connection is established on first use, so a run whose
/// images are all cached or skipped needs no socket at all.
#[derive(Default)]
pub struct DockerRuntime {
    client: OnceCell<Docker>,
}

impl DockerRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Daemon handle via the local defaults (socket or DOCKER_HOST),
    /// connected on first call.
    async fn client(&self) -> Result<&Docker, DiffError> {
        self.client
            .get_or_try_init(|| async {
                Docker::connect_with_local_defaults()
                    .map_err(|e| DiffError::Connection(e.to_string()))
            })
            .await
    }

    async fn pull_image(&self, reference: &str) -> Result<(), DiffError> {
        let opts = CreateImageOptions {
            from_image: Some(reference.to_string()),
            ..Default::default()
        };
        let mut stream = self.client().await?.create_image(Some(opts), None, None);
        while let Some(progress) = stream.next().await {
            progress.map_err(|e| map_pull_error(e, reference))?;
        }
        Ok(())
    }

    async fn create_stopped_container(&self, reference: &str) -> Result<String, DiffError> {
        let name = format!(
            "{WORK_DIR_PREFIX}diff-{}-{}",
            std::process::id(),
            NEXT_ID.fetch_add(1, Ordering::Relaxed)
        );
        let body = ContainerCreateBody {
            image: Some(reference.to_string()),
            cmd: Some(vec!["true".to_string()]),
            ..Default::default()
        };
        let opts = CreateContainerOptions {
            name: Some(name),
            ..Default::default()
        };
        let response = self
            .client()
            .await?
            .create_container(Some(opts), body)
            .await
            .map_err(|e| DiffError::Export(e.to_string()))?;
        Ok(response.id)
    }

    async fn export_to_file(&self, container_id: &str, archive: &Path) -> Result<(), DiffError> {
        let mut file = tokio::fs::File::create(archive).await?;
        let mut stream = self.client().await?.export_container(container_id);
        while let Some(chunk) = stream.next().await {
            let chunk: bytes::Bytes = chunk.map_err(|e| DiffError::Export(e.to_string()))?;
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        Ok(())
    }

    async fn remove_container(&self, container_id: &str) {
        let Ok(client) = self.client().await else {
            return;
        };
        let opts = RemoveContainerOptions {
            force: true,
            ..Default::default()
        };
        if let Err(e) = client.remove_container(container_id, Some(opts)).await {
            warn!(container = container_id, error = %e, "failed to remove diff container");
        }
    }
}

/// Executable regular files in the archive, outside the baseline, in
/// archive order.
fn scan_archive(archive: &Path) -> Result<Vec<String>, DiffError> {
    let file = std::fs::File::open(archive)?;
    let mut tar = tar::Archive::new(file);

    let mut paths = Vec::new();
    for entry in tar.entries()? {
        let entry = entry?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let mode = entry.header().mode()?;
        if mode & 0o111 == 0 {
            continue;
        }
        let path = entry.path()?;
        let Some(path) = path.to_str() else { continue };
        let path = format!("/{}", path.trim_start_matches('/'));
        if BASELINE_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
            continue;
        }
        paths.push(path);
    }
    Ok(paths)
}

fn work_dir() -> PathBuf {
    std::env::temp_dir().join(format!(
        "{WORK_DIR_PREFIX}{}-{}",
        std::process::id(),
        NEXT_ID.fetch_add(1, Ordering::Relaxed)
    ))
}

#[async_trait]
impl FilesystemDiff for DockerRuntime {
    async fn diff(&self, reference: &str) -> Result<DiffReport, DiffError> {
        self.pull_image(reference).await?;
        let container_id = self.create_stopped_container(reference).await?;

        let dir = work_dir();
        tokio::fs::create_dir_all(&dir).await?;
        let archive = dir.join("export.tar");

        let exported = self.export_to_file(&container_id, &archive).await;
        self.remove_container(&container_id).await;
        if let Err(e) = exported {
            let _ = tokio::fs::remove_dir_all(&dir).await;
            return Err(e);
        }

        let scan = tokio::task::spawn_blocking(move || scan_archive(&archive))
            .await
            .map_err(|e| DiffError::Export(e.to_string()))?;
        let _ = tokio::fs::remove_dir_all(&dir).await;

        let unique_paths = scan?;
        debug!(reference, paths = unique_paths.len(), "diff complete");
        Ok(DiffReport { unique_paths })
    }
}

#[async_trait]
impl EnvironmentCleanup for DockerRuntime {
    async fn cleanup(&self) {
        match self.client().await {
            Ok(client) => {
                let opts = ListContainersOptions {
                    all: true,
                    ..Default::default()
                };
                match client.list_containers(Some(opts)).await {
                    Ok(containers) => {
                        for container in containers {
                            let Some(id) = container.id else { continue };
                            let stop = StopContainerOptions {
                                t: Some(2),
                                signal: None,
                            };
                            if let Err(e) = client.stop_container(&id, Some(stop)).await {
                                debug!(container = %id, error = %e, "stop failed during cleanup");
                            }
                            let remove = RemoveContainerOptions {
                                force: true,
                                ..Default::default()
                            };
                            if let Err(e) = client.remove_container(&id, Some(remove)).await {
                                warn!(container = %id, error = %e, "remove failed during cleanup");
                            }
                        }
                    }
                    Err(e) => warn!(error = %e, "could not list containers during cleanup"),
                }

                if let Err(e) = client.prune_images(None::<PruneImagesOptions>).await {
                    warn!(error = %e, "image prune failed during cleanup");
                }
            }
            Err(e) => warn!(error = %e, "could not reach the daemon during cleanup"),
        }

        sweep_work_dirs().await;
    }
}

/// Remove leftover working directories under the system temp dir.
async fn sweep_work_dirs() {
    let temp = std::env::temp_dir();
    let Ok(mut entries) = tokio::fs::read_dir(&temp).await else {
        return;
    };
    while let Ok(Some(entry)) = entries.next_entry().await {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if !name.starts_with(WORK_DIR_PREFIX) {
            continue;
        }
        if let Err(e) = tokio::fs::remove_dir_all(entry.path()).await {
            warn!(path = %entry.path().display(), error = %e, "failed to sweep work dir");
        }
    }
}
