// ABOUTME: Frequency-based retention heuristic for publishing aliases.
// ABOUTME: Self-matches and rare aliases always survive; common ones are budgeted.

use crate::cache::counts::AliasCounts;
use crate::cache::entry::AliasMap;
use crate::cache::filter::include_path;

/// Bounds for the retention selector.
#[derive(Debug, Clone, Copy)]
pub struct RetentionThresholds {
    /// Budget of additional aliases admitted by increasing count.
    pub add_count: usize,
    /// Aliases at or below this global count are always kept.
    pub min_count: u64,
    /// Aliases at or above this global count are never admitted by the budget.
    pub max_count: u64,
}

impl Default for RetentionThresholds {
    fn default() -> Self {
        Self {
            add_count: 25,
            min_count: 10,
            max_count: 1000,
        }
    }
}

/// Select the aliases of one entry worth publishing.
///
/// Aliases whose path mentions the image name (case-insensitive) and
/// globally rare aliases are kept unconditionally; an alias absent from
/// the counts table counts as zero. The rest are admitted rarest-first
/// until the `add_count` budget runs out, and nothing at `max_count` or
/// beyond is ever admitted that way. Paths the filter rejects are dropped
/// before any of this.
pub fn select_keepers(
    aliases: &AliasMap,
    image_name: &str,
    counts: &AliasCounts,
    thresholds: &RetentionThresholds,
) -> AliasMap {
    let image_name = image_name.to_lowercase();
    let mut keepers = AliasMap::new();
    let mut remainder: Vec<(&String, &String, u64)> = Vec::new();

    for (alias, path) in aliases {
        if !include_path(path) {
            continue;
        }
        let count = counts.get(alias).copied().unwrap_or(0);
        if path.to_lowercase().contains(&image_name) || count <= thresholds.min_count {
            keepers.insert(alias.clone(), path.clone());
        } else {
            remainder.push((alias, path, count));
        }
    }

    // ties broken by name so output is reproducible
    remainder.sort_by(|a, b| a.2.cmp(&b.2).then_with(|| a.0.cmp(b.0)));

    let mut budget = thresholds.add_count;
    for (alias, path, count) in remainder {
        if budget == 0 || count >= thresholds.max_count {
            break;
        }
        keepers.insert(alias.clone(), path.clone());
        budget -= 1;
    }

    keepers
}
