// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "binscout")]
#[command(about = "Container executable discovery and alias cache")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Update the alias cache from a container list file
    Update {
        /// Text file with one container identifier per line
        containers: PathBuf,

        /// Cache root directory
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Namespace prefix added to every container, e.g. quay.io/biocontainers
        #[arg(long)]
        namespace: Option<String>,

        /// Skip list location (defaults to skips.json in the root)
        #[arg(long)]
        skips_file: Option<PathBuf>,

        /// Insert a letter directory derived from the org name
        #[arg(long)]
        org_letter_prefix: bool,

        /// Insert a letter directory derived from the registry name
        #[arg(long)]
        registry_letter_prefix: bool,

        /// Insert a letter directory derived from the repository name
        #[arg(long)]
        repo_letter_prefix: bool,

        /// Don't run cleanup after failures (e.g., if doing local work)
        #[arg(long)]
        no_cleanup: bool,
    },

    /// Recompute the global alias counts file
    Counts {
        /// Cache root with json files to discover and count
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Counts file (defaults to counts.json in the root)
        #[arg(long)]
        counts_json: Option<PathBuf>,
    },

    /// Show the publishable aliases for one cached image
    Keepers {
        /// Image identifier, with or without a tag
        image: String,

        /// Cache root directory
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Budget of additional aliases admitted by increasing count
        #[arg(long, default_value_t = 25)]
        add_count: usize,

        /// Aliases at or below this global count are always kept
        #[arg(long, default_value_t = 10)]
        min_count: u64,

        /// Aliases at or above this global count are never budget-admitted
        #[arg(long, default_value_t = 1000)]
        max_count: u64,

        /// Insert a letter directory derived from the org name
        #[arg(long)]
        org_letter_prefix: bool,

        /// Insert a letter directory derived from the registry name
        #[arg(long)]
        registry_letter_prefix: bool,

        /// Insert a letter directory derived from the repository name
        #[arg(long)]
        repo_letter_prefix: bool,
    },

    /// List cache entries not yet present under a published tree
    Missing {
        /// Cache root directory
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Published tree to compare against
        #[arg(long)]
        published: PathBuf,
    },
}
