// ABOUTME: Integration tests for the cache entry store.
// ABOUTME: Covers at-most-once diffing and other-tag entry reuse.

mod support;

use std::fs;

use binscout::cache::{CacheLayout, get_or_create, load_entry, write_aliases};
use binscout::config::PrefixPolicy;
use binscout::types::ImageReference;
use support::{FailingDiff, FakeDiff};

fn samtools() -> ImageReference {
    ImageReference::parse("biocontainers/samtools").unwrap()
}

#[tokio::test]
async fn diff_runs_at_most_once_per_image_tag() {
    let dir = tempfile::tempdir().unwrap();
    let layout = CacheLayout::new(dir.path(), PrefixPolicy::Default);
    let diff = FakeDiff::new(&["/opt/conda/bin/samtools"]);

    let first = get_or_create(&layout, &samtools(), "1.9", &diff).await.unwrap();
    let second = get_or_create(&layout, &samtools(), "1.9", &diff).await.unwrap();

    assert_eq!(diff.call_count(), 1);
    assert_eq!(first.aliases, second.aliases);
    assert_eq!(first.path, second.path);
}

#[tokio::test]
async fn another_tags_entry_is_reused_instead_of_diffing() {
    let dir = tempfile::tempdir().unwrap();
    let layout = CacheLayout::new(dir.path(), PrefixPolicy::Default);
    let diff = FakeDiff::new(&["/opt/conda/bin/samtools"]);

    let old = get_or_create(&layout, &samtools(), "1.9", &diff).await.unwrap();
    let reused = get_or_create(&layout, &samtools(), "1.16", &diff).await.unwrap();

    assert_eq!(diff.call_count(), 1);
    assert_eq!(reused.path, old.path);
    assert_eq!(reused.aliases, old.aliases);
    assert!(!layout.entry_path(&samtools(), "1.16").exists());
}

#[tokio::test]
async fn diff_failure_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let layout = CacheLayout::new(dir.path(), PrefixPolicy::Default);

    let result = get_or_create(&layout, &samtools(), "1.9", &FailingDiff).await;
    assert!(result.is_err());
    assert!(!layout.has_entry(&samtools()).unwrap());
}

#[tokio::test]
async fn filtered_paths_never_reach_the_entry() {
    let dir = tempfile::tempdir().unwrap();
    let layout = CacheLayout::new(dir.path(), PrefixPolicy::Default);
    let diff = FakeDiff::new(&[
        "/opt/conda/bin/samtools",
        "/usr/bin/env",
        "/opt/conda/lib/libhts.so",
        "/opt/conda/bin/.samtools-post-link.sh",
    ]);

    let entry = get_or_create(&layout, &samtools(), "1.9", &diff).await.unwrap();
    assert_eq!(entry.aliases.len(), 1);
    assert!(entry.aliases.contains_key("samtools"));
}

#[test]
fn persisted_entries_are_pretty_printed_objects() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ns/tool:1.0.json");

    let mut aliases = std::collections::BTreeMap::new();
    aliases.insert("tool".to_string(), "/opt/bin/tool".to_string());
    write_aliases(&path, &aliases).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains('\n'), "entries are pretty-printed");

    let reloaded = load_entry(&path).unwrap();
    assert_eq!(reloaded.aliases, aliases);
}
