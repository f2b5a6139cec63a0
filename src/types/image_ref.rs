// ABOUTME: Container image identifier parsing.
// ABOUTME: Splits identifiers into registry, namespace, and repository.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseImageError {
    #[error("image identifier cannot be empty")]
    Empty,

    #[error("cannot parse {0}, not properly formatted with namespace")]
    TooManyComponents(String),
}

/// A container image identifier split into its path components.
///
/// `samtools` is a bare repository; `biocontainers/samtools` adds a
/// namespace; `quay.io/biocontainers/samtools` adds a registry. More than
/// two separators is a malformed identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    registry: String,
    namespace: String,
    repository: String,
}

impl ImageReference {
    pub fn parse(identifier: &str) -> Result<Self, ParseImageError> {
        if identifier.is_empty() {
            return Err(ParseImageError::Empty);
        }

        let parts: Vec<&str> = identifier.split('/').collect();
        let (registry, namespace, repository) = match parts.as_slice() {
            [repo] => ("", "", *repo),
            [namespace, repo] => ("", *namespace, *repo),
            [registry, namespace, repo] => (*registry, *namespace, *repo),
            _ => return Err(ParseImageError::TooManyComponents(identifier.to_string())),
        };

        if repository.is_empty() {
            return Err(ParseImageError::Empty);
        }

        Ok(Self {
            registry: registry.to_string(),
            namespace: namespace.to_string(),
            repository: repository.to_string(),
        })
    }

    pub fn registry(&self) -> &str {
        &self.registry
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Lower-cased repository name, used for self-match retention.
    pub fn base_name(&self) -> String {
        self.repository.to_lowercase()
    }

    /// The identifier joined with a tag, e.g. for a diff request.
    pub fn with_tag(&self, tag: &str) -> String {
        format!("{self}:{tag}")
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.registry.is_empty() {
            write!(f, "{}/", self.registry)?;
        }
        if !self.namespace.is_empty() {
            write!(f, "{}/", self.namespace)?;
        }
        write!(f, "{}", self.repository)
    }
}

/// Drop a trailing `:tag` from a raw identifier.
///
/// Container list files may pin tags; the cache is keyed on the image
/// alone, with the tag chosen separately.
pub fn strip_tag(identifier: &str) -> &str {
    identifier
        .split_once(':')
        .map_or(identifier, |(image, _)| image)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_repository() {
        let image = ImageReference::parse("samtools").unwrap();
        assert_eq!(image.registry(), "");
        assert_eq!(image.namespace(), "");
        assert_eq!(image.repository(), "samtools");
    }

    #[test]
    fn namespace_and_repository() {
        let image = ImageReference::parse("biocontainers/samtools").unwrap();
        assert_eq!(image.registry(), "");
        assert_eq!(image.namespace(), "biocontainers");
        assert_eq!(image.repository(), "samtools");
    }

    #[test]
    fn full_reference() {
        let image = ImageReference::parse("quay.io/biocontainers/samtools").unwrap();
        assert_eq!(image.registry(), "quay.io");
        assert_eq!(image.namespace(), "biocontainers");
        assert_eq!(image.repository(), "samtools");
    }

    #[test]
    fn too_many_components_is_an_error() {
        assert!(matches!(
            ImageReference::parse("a/b/c/d"),
            Err(ParseImageError::TooManyComponents(_))
        ));
    }

    #[test]
    fn empty_identifier_is_an_error() {
        assert!(matches!(
            ImageReference::parse(""),
            Err(ParseImageError::Empty)
        ));
    }

    #[test]
    fn display_round_trips() {
        for identifier in ["samtools", "biocontainers/samtools", "quay.io/biocontainers/samtools"]
        {
            let image = ImageReference::parse(identifier).unwrap();
            assert_eq!(image.to_string(), identifier);
        }
    }

    #[test]
    fn strip_tag_drops_suffix() {
        assert_eq!(strip_tag("samtools:1.9"), "samtools");
        assert_eq!(strip_tag("biocontainers/samtools"), "biocontainers/samtools");
    }
}
