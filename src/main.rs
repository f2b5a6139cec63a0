// ABOUTME: Entry point for the binscout CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;

use binscout::cache::RetentionThresholds;
use binscout::commands;
use binscout::config::{PrefixPolicy, UpdateSettings};
use binscout::error::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let result = run(cli).await;

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Update {
            containers,
            root,
            namespace,
            skips_file,
            org_letter_prefix,
            registry_letter_prefix,
            repo_letter_prefix,
            no_cleanup,
        } => {
            let policy = PrefixPolicy::from_flags(
                org_letter_prefix,
                registry_letter_prefix,
                repo_letter_prefix,
            )?;
            let settings = UpdateSettings::new(root, policy)
                .with_namespace(namespace)
                .with_skips_file(skips_file)
                .with_no_cleanup(no_cleanup);
            commands::update::run(settings, &containers).await
        }
        Commands::Counts { root, counts_json } => commands::counts::run(&root, counts_json),
        Commands::Keepers {
            image,
            root,
            add_count,
            min_count,
            max_count,
            org_letter_prefix,
            registry_letter_prefix,
            repo_letter_prefix,
        } => {
            let policy = PrefixPolicy::from_flags(
                org_letter_prefix,
                registry_letter_prefix,
                repo_letter_prefix,
            )?;
            let thresholds = RetentionThresholds {
                add_count,
                min_count,
                max_count,
            };
            commands::keepers::run(&image, &root, policy, thresholds)
        }
        Commands::Missing { root, published } => commands::missing::run(&root, &published),
    }
}
