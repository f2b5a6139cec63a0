// ABOUTME: Handler for the missing subcommand.
// ABOUTME: Lists cache entries absent from a published tree.

use std::path::Path;

use crate::cache::unpublished_entries;
use crate::error::{Error, Result};

pub fn run(root: &Path, published: &Path) -> Result<()> {
    if !root.exists() {
        return Err(Error::InputNotFound(root.to_path_buf()));
    }

    let missing = unpublished_entries(root, published)?;
    for path in &missing {
        println!("{}", path.display());
    }
    println!("{} entries not yet published.", missing.len());
    Ok(())
}
