// ABOUTME: Command handlers for the binscout CLI.
// ABOUTME: The update module holds the batch orchestrator.

pub mod counts;
pub mod keepers;
pub mod missing;
pub mod update;
