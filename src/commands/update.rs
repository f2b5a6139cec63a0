// ABOUTME: Batch orchestrator updating the alias cache from a container list.
// ABOUTME: Per-image failures become skips; parse and policy errors are fatal.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use tracing::warn;

use crate::cache::{CacheLayout, SkipSet, get_or_create};
use crate::config::UpdateSettings;
use crate::error::{Error, Result};
use crate::registry::ordering::TagOrdering;
use crate::registry::{TagSource, is_unauthorized};
use crate::runtime::{DockerRuntime, EnvironmentCleanup, FilesystemDiff};
use crate::types::{ImageReference, strip_tag};

/// What one batch run touched.
#[derive(Debug, Default)]
pub struct UpdateOutcome {
    /// Image identifier to the raw tags fetched for it this run.
    pub processed: BTreeMap<String, Vec<String>>,
    /// Total entries in the skip set after the run.
    pub skipped: usize,
}

/// Drive a batch of container identifiers through the cache.
///
/// Identifiers are deduped in first-seen order and optionally prefixed
/// with a namespace. Per image: skip when already cached under any tag,
/// already in the skip set, or already handled this run; otherwise fetch
/// tags, order them, and `get_or_create` the entry for the latest tag.
/// The skip set is flushed after every image so an interrupted run loses
/// nothing.
pub async fn run_update<T, O, D, C>(
    settings: &UpdateSettings,
    containers: &[String],
    tag_source: &T,
    ordering: &O,
    diff: &D,
    cleanup: &C,
) -> Result<UpdateOutcome>
where
    T: TagSource + ?Sized,
    O: TagOrdering + ?Sized,
    D: FilesystemDiff + ?Sized,
    C: EnvironmentCleanup + ?Sized,
{
    fs::create_dir_all(&settings.root)?;
    let layout = CacheLayout::new(&settings.root, settings.policy);
    let mut skips = SkipSet::load(&settings.skips_file)?;
    let mut processed: BTreeMap<String, Vec<String>> = BTreeMap::new();

    let mut seen = HashSet::new();
    let identifiers: Vec<String> = containers
        .iter()
        .map(|raw| match &settings.namespace {
            Some(namespace) => format!("{namespace}/{raw}"),
            None => raw.clone(),
        })
        .filter(|identifier| seen.insert(identifier.clone()))
        .collect();

    for identifier in &identifiers {
        let image = strip_tag(identifier);
        let image_ref = ImageReference::parse(image)?;

        if layout.has_entry(&image_ref)? || processed.contains_key(image) || skips.contains(image)
        {
            continue;
        }
        println!("Contender image {image}");

        println!("Retrieving tags for {image}");
        let tags = match tag_source.list_tags(image).await {
            Ok(tags) => tags,
            Err(e) => {
                // transport trouble is worth retrying next run, not a skip
                warn!(image, error = %e, "tag listing failed");
                continue;
            }
        };
        processed.insert(image.to_string(), tags.clone());

        if tags.is_empty() || is_unauthorized(&tags) {
            println!("Skipping {image}, no usable tag listing.");
            skips.record(image);
            skips.flush()?;
            continue;
        }

        let ordered = match ordering.order(&tags) {
            Ok(ordered) => ordered,
            Err(e) => {
                // left unrecorded so a future run retries it
                warn!(image, error = %e, "ordering of tags failed");
                continue;
            }
        };
        let Some(tag) = ordered.last() else {
            println!("No ordered tags for {image}, skipping.");
            skips.record(image);
            skips.flush()?;
            continue;
        };

        println!("Looking up aliases for {image}:{tag}");
        match get_or_create(&layout, &image_ref, tag, diff).await {
            Ok(entry) => {
                println!("{} aliases for {image}:{tag}", entry.aliases.len());
            }
            Err(e) => {
                warn!(image, tag = %tag, error = %e, "alias generation failed");
                skips.record(image);
                if !settings.no_cleanup {
                    cleanup.cleanup().await;
                }
            }
        }
        skips.flush()?;
    }

    skips.flush()?;
    Ok(UpdateOutcome {
        processed,
        skipped: skips.len(),
    })
}

/// Handler for the `update` subcommand: real collaborators, containers
/// read from a plain text file.
pub async fn run(settings: UpdateSettings, containers_file: &Path) -> Result<()> {
    if !containers_file.exists() {
        return Err(Error::InputNotFound(containers_file.to_path_buf()));
    }
    let content = fs::read_to_string(containers_file)?;
    let containers: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    let tag_source = crate::registry::CraneTagSource::new();
    let ordering = crate::registry::ordering::VersionOrdering;
    // connects to the daemon lazily; a fully cached run needs no socket
    let runtime = DockerRuntime::new();

    let outcome = run_update(
        &settings,
        &containers,
        &tag_source,
        &ordering,
        &runtime,
        &runtime,
    )
    .await?;

    println!("Found {} container identifiers.", outcome.processed.len());
    println!("Skipped {} identifiers.", outcome.skipped);
    Ok(())
}
