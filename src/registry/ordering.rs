// ABOUTME: Version-aware tag ordering collaborator.
// ABOUTME: Scrubs commit-ish suffixes and sorts parseable tags ascending.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrderingError {
    #[error("tag ordering failed: {0}")]
    Failed(String),
}

/// Orders raw tags ascending by version awareness.
///
/// The caller takes the last element as "latest". An empty result is a
/// valid outcome distinct from an error: none of the tags carried a
/// usable version.
pub trait TagOrdering: Send + Sync {
    fn order(&self, tags: &[String]) -> Result<Vec<String>, OrderingError>;
}

/// Default ordering: strip trailing commit fragments, key on the leading
/// dotted numeric components, and drop tags without any.
#[derive(Debug, Default, Clone, Copy)]
pub struct VersionOrdering;

impl TagOrdering for VersionOrdering {
    fn order(&self, tags: &[String]) -> Result<Vec<String>, OrderingError> {
        let mut keyed: Vec<(Vec<u64>, &String)> = tags
            .iter()
            .filter_map(|tag| version_key(tag).map(|key| (key, tag)))
            .collect();
        keyed.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
        Ok(keyed.into_iter().map(|(_, tag)| tag.clone()).collect())
    }
}

/// Numeric sort key for a tag, None when nothing version-like is present.
fn version_key(tag: &str) -> Option<Vec<u64>> {
    // Build-string suffixes ("1.9--h91f7f9a_11") and v prefixes are noise
    // for comparison purposes.
    let cleaned = clean_commit(tag);
    let cleaned = cleaned.split("--").next().unwrap_or(&cleaned);
    let cleaned = cleaned.trim_start_matches('v');

    let mut key = Vec::new();
    for part in cleaned.split(['.', '-', '_']) {
        let digits: String = part.chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            break;
        }
        key.push(digits.parse().ok()?);
    }
    if key.is_empty() { None } else { Some(key) }
}

/// Drop a trailing `-<hash>` or `-g<hash>` commit fragment from a tag.
fn clean_commit(tag: &str) -> String {
    match tag.rsplit_once('-') {
        Some((rest, last)) if is_commit_fragment(last) => rest.to_string(),
        _ => tag.to_string(),
    }
}

fn is_commit_fragment(part: &str) -> bool {
    let part = part.strip_prefix('g').unwrap_or(part);
    part.len() >= 7
        && part.chars().all(|c| c.is_ascii_hexdigit())
        && part.chars().any(|c| c.is_ascii_alphabetic())
}
