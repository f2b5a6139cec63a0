// ABOUTME: Alias cache tree: layout, entries, counts, retention, skips.
// ABOUTME: Every file under the root is a whole-file JSON rewrite.

mod counts;
mod entry;
mod filter;
mod layout;
mod listing;
mod retention;
mod skips;

pub use counts::{AliasCounts, compute_counts, read_counts, write_counts};
pub use entry::{AliasMap, CacheEntry, CacheError, build_aliases, get_or_create, load_entry, write_aliases};
pub use filter::include_path;
pub use layout::CacheLayout;
pub use listing::unpublished_entries;
pub use retention::{RetentionThresholds, select_keepers};
pub use skips::SkipSet;

/// Reserved filenames, never treated as cache entries at any depth.
pub const SKIPS_FILENAME: &str = "skips.json";
pub const COUNTS_FILENAME: &str = "counts.json";

pub(crate) fn is_reserved(name: &str) -> bool {
    name == SKIPS_FILENAME || name == COUNTS_FILENAME
}
