// ABOUTME: Integration tests for the binscout CLI commands.
// ABOUTME: Validates help output and the offline subcommands.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn binscout_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("binscout"))
}

fn write_entry(path: &Path, aliases: &[(&str, &str)]) {
    let map: std::collections::BTreeMap<_, _> = aliases
        .iter()
        .map(|(name, p)| (name.to_string(), p.to_string()))
        .collect();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, serde_json::to_string_pretty(&map).unwrap()).unwrap();
}

#[test]
fn help_shows_commands() {
    binscout_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("update"))
        .stdout(predicate::str::contains("counts"))
        .stdout(predicate::str::contains("keepers"))
        .stdout(predicate::str::contains("missing"));
}

#[test]
fn counts_writes_the_counts_file() {
    let dir = tempfile::tempdir().unwrap();
    write_entry(
        &dir.path().join("bio/samtools:1.9.json"),
        &[("samtools", "/opt/conda/bin/samtools")],
    );

    binscout_cmd()
        .arg("counts")
        .arg("--root")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1 aliases counted"));

    let content = fs::read_to_string(dir.path().join("counts.json")).unwrap();
    let counts: std::collections::BTreeMap<String, u64> = serde_json::from_str(&content).unwrap();
    assert_eq!(counts.get("samtools"), Some(&1));
}

#[test]
fn keepers_prints_the_selection() {
    let dir = tempfile::tempdir().unwrap();
    write_entry(
        &dir.path().join("bio/samtools:1.9.json"),
        &[
            ("samtools", "/opt/conda/bin/samtools"),
            ("python", "/opt/conda/bin/python"),
        ],
    );
    fs::write(dir.path().join("counts.json"), "{\"python\": 5000}").unwrap();

    binscout_cmd()
        .arg("keepers")
        .arg("bio/samtools")
        .arg("--root")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("samtools"))
        .stdout(predicate::str::contains("python").not());
}

#[test]
fn keepers_without_entry_fails() {
    let dir = tempfile::tempdir().unwrap();

    binscout_cmd()
        .arg("keepers")
        .arg("bio/absent")
        .arg("--root")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no cache entry"));
}

#[test]
fn missing_lists_unpublished_entries() {
    let cache = tempfile::tempdir().unwrap();
    let published = tempfile::tempdir().unwrap();
    write_entry(
        &cache.path().join("bio/bwa:0.7.json"),
        &[("bwa", "/opt/conda/bin/bwa")],
    );

    binscout_cmd()
        .arg("missing")
        .arg("--root")
        .arg(cache.path())
        .arg("--published")
        .arg(published.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("bwa:0.7.json"))
        .stdout(predicate::str::contains("1 entries not yet published"));
}

#[test]
fn update_rejects_conflicting_prefix_flags() {
    let dir = tempfile::tempdir().unwrap();
    let containers = dir.path().join("containers.txt");
    fs::write(&containers, "bio/samtools\n").unwrap();

    binscout_cmd()
        .arg("update")
        .arg(&containers)
        .arg("--root")
        .arg(dir.path())
        .arg("--org-letter-prefix")
        .arg("--repo-letter-prefix")
        .assert()
        .failure()
        .stderr(predicate::str::contains("one type of letter prefix"));
}

#[test]
fn update_requires_the_containers_file() {
    let dir = tempfile::tempdir().unwrap();

    binscout_cmd()
        .arg("update")
        .arg(dir.path().join("nope.txt"))
        .arg("--root")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn update_with_fully_cached_list_touches_no_collaborators() {
    let dir = tempfile::tempdir().unwrap();
    write_entry(
        &dir.path().join("bio/samtools:1.9.json"),
        &[("samtools", "/opt/conda/bin/samtools")],
    );
    let containers = dir.path().join("containers.txt");
    fs::write(&containers, "bio/samtools\n").unwrap();

    // a daemon connection here would fail loudly
    binscout_cmd()
        .env("DOCKER_HOST", "unix:///nonexistent/docker.sock")
        .arg("update")
        .arg(&containers)
        .arg("--root")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped 0 identifiers"));
}
