// ABOUTME: Registry tag listing collaborator and its crane-backed client.
// ABOUTME: Tag ordering lives in the ordering submodule.

pub mod ordering;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

/// Marker the registry returns in place of a tag when access is denied.
pub const UNAUTHORIZED_MARKER: &str = "UNAUTHORIZED";

const CRANE_LS_URL: &str = "https://crane.ggcr.dev/ls";

#[derive(Debug, Error)]
pub enum TagError {
    #[error("tag request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Lists the tags a registry knows for an image.
#[async_trait]
pub trait TagSource: Send + Sync {
    /// Fetch all tags for an image identifier without a tag.
    async fn list_tags(&self, image: &str) -> Result<Vec<String>, TagError>;
}

/// Whether a tag listing is really an access-denied response.
///
/// The marker arrives in the first line of the body rather than as an
/// HTTP error, so it survives the newline split as a bogus tag.
pub fn is_unauthorized(tags: &[String]) -> bool {
    tags.first()
        .is_some_and(|tag| tag.contains(UNAUTHORIZED_MARKER))
}

/// Tag listing via the crane `ls` endpoint.
#[derive(Debug, Clone)]
pub struct CraneTagSource {
    client: reqwest::Client,
    base_url: String,
}

impl CraneTagSource {
    pub fn new() -> Self {
        Self::with_base_url(CRANE_LS_URL)
    }

    /// Point at a different endpoint, e.g. a local stub in tests.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for CraneTagSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TagSource for CraneTagSource {
    async fn list_tags(&self, image: &str) -> Result<Vec<String>, TagError> {
        let url = format!("{}/{}", self.base_url, image);
        debug!(%url, "requesting tags");
        let body = self.client.get(&url).send().await?.text().await?;
        Ok(body
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_marker_is_detected_in_first_line() {
        let denied = vec!["UNAUTHORIZED: access to the requested resource".to_string()];
        assert!(is_unauthorized(&denied));

        let fine = vec!["1.9".to_string(), "1.16".to_string()];
        assert!(!is_unauthorized(&fine));

        assert!(!is_unauthorized(&[]));
    }
}
