// ABOUTME: Application-wide error types for binscout.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

use crate::cache::CacheError;
use crate::types::ParseImageError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseImageError),

    #[error("only one type of letter prefix is allowed")]
    PolicyConflict,

    #[error("input file not found: {0}")]
    InputNotFound(PathBuf),

    #[error("no cache entry for {0}")]
    NoEntry(String),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
