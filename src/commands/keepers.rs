// ABOUTME: Handler for the keepers subcommand.
// ABOUTME: Runs the retention selector against one cached image.

use std::path::Path;

use crate::cache::{
    COUNTS_FILENAME, CacheLayout, RetentionThresholds, load_entry, read_counts, select_keepers,
};
use crate::config::PrefixPolicy;
use crate::error::{Error, Result};
use crate::types::{ImageReference, strip_tag};

pub fn run(
    identifier: &str,
    root: &Path,
    policy: PrefixPolicy,
    thresholds: RetentionThresholds,
) -> Result<()> {
    let image = ImageReference::parse(strip_tag(identifier))?;
    let layout = CacheLayout::new(root, policy);

    let matches = layout.search_prefix(&image)?;
    let Some(path) = matches.first() else {
        return Err(Error::NoEntry(image.to_string()));
    };

    let entry = load_entry(path)?;
    let counts = read_counts(&root.join(COUNTS_FILENAME))?;
    let keepers = select_keepers(&entry.aliases, &image.base_name(), &counts, &thresholds);

    println!("{}", serde_json::to_string_pretty(&keepers)?);
    Ok(())
}
