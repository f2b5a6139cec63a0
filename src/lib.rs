// ABOUTME: Library root for binscout - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod cache;
pub mod commands;
pub mod config;
pub mod error;
pub mod registry;
pub mod runtime;
pub mod types;
