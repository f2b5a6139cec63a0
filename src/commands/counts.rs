// ABOUTME: Handler for the counts subcommand.
// ABOUTME: Recomputes the global alias frequency table and persists it.

use std::path::{Path, PathBuf};

use crate::cache::{COUNTS_FILENAME, compute_counts, write_counts};
use crate::error::{Error, Result};

pub fn run(root: &Path, counts_json: Option<PathBuf>) -> Result<()> {
    if !root.exists() {
        return Err(Error::InputNotFound(root.to_path_buf()));
    }
    let counts_json = counts_json.unwrap_or_else(|| root.join(COUNTS_FILENAME));

    let counts = compute_counts(root)?;

    println!("Writing counts to {}", counts_json.display());
    write_counts(&counts_json, &counts)?;
    println!("{} aliases counted.", counts.len());
    Ok(())
}
