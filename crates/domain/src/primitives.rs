//! Domain primitives with validation at construction time.

use jgs_chroma_shared::{ErrorCode, ErrorEnvelope};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;

const MIN_COLLECTION_NAME_LEN: usize = 3;
const MAX_COLLECTION_NAME_LEN: usize = 512;

/// Errors raised when parsing domain primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimitiveError {
    /// `CollectionName` is empty after trimming.
    EmptyCollectionName {
        /// Length of the raw input before trimming.
        input_length: usize,
    },
    /// `CollectionName` length is outside the accepted range.
    CollectionNameLength {
        /// Trimmed collection name.
        input: String,
    },
    /// `CollectionName` violates the character rules.
    InvalidCollectionName {
        /// Trimmed collection name that failed validation.
        input: String,
    },
    /// `DocumentId` is empty after trimming.
    InvalidDocumentId {
        /// Length of the raw input before trimming.
        input_length: usize,
    },
}

impl PrimitiveError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyCollectionName { .. }
            | Self::CollectionNameLength { .. }
            | Self::InvalidCollectionName { .. } => {
                ErrorCode::new("domain", "invalid_collection_name")
            },
            Self::InvalidDocumentId { .. } => ErrorCode::new("domain", "invalid_document_id"),
        }
    }
}

impl fmt::Display for PrimitiveError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCollectionName { .. } => {
                formatter.write_str("CollectionName must be non-empty")
            },
            Self::CollectionNameLength { .. } => write!(
                formatter,
                "CollectionName must be between {MIN_COLLECTION_NAME_LEN} and {MAX_COLLECTION_NAME_LEN} characters"
            ),
            Self::InvalidCollectionName { .. } => formatter.write_str(
                "CollectionName must use [a-zA-Z0-9._-], start and end with an alphanumeric, contain no '..', and not be an IPv4 address",
            ),
            Self::InvalidDocumentId { .. } => formatter.write_str("DocumentId must be non-empty"),
        }
    }
}

impl std::error::Error for PrimitiveError {}

impl From<PrimitiveError> for ErrorEnvelope {
    fn from(error: PrimitiveError) -> Self {
        let mut envelope = Self::expected(error.error_code(), error.to_string());

        match error {
            PrimitiveError::EmptyCollectionName { input_length }
            | PrimitiveError::InvalidDocumentId { input_length } => {
                envelope = envelope.with_metadata("input_length", input_length.to_string());
            },
            PrimitiveError::CollectionNameLength { input }
            | PrimitiveError::InvalidCollectionName { input } => {
                envelope = envelope.with_metadata("input", input);
            },
        }

        envelope
    }
}

/// Name of a Chroma collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionName(Box<str>);

impl CollectionName {
    /// Parse a collection name that satisfies Chroma's naming rules.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, PrimitiveError> {
        let raw = input.as_ref();
        let Some(trimmed) = trimmed_non_empty(raw) else {
            return Err(PrimitiveError::EmptyCollectionName {
                input_length: raw.len(),
            });
        };

        let len = trimmed.chars().count();
        if !(MIN_COLLECTION_NAME_LEN..=MAX_COLLECTION_NAME_LEN).contains(&len) {
            return Err(PrimitiveError::CollectionNameLength {
                input: trimmed.to_owned(),
            });
        }

        if !is_valid_collection_name(trimmed) {
            return Err(PrimitiveError::InvalidCollectionName {
                input: trimmed.to_owned(),
            });
        }

        Ok(Self(trimmed.to_owned().into_boxed_str()))
    }

    /// Access the underlying string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the underlying string.
    #[must_use]
    pub fn into_inner(self) -> Box<str> {
        self.0
    }
}

impl AsRef<str> for CollectionName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Identifier for a stored document record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Box<str>);

impl DocumentId {
    /// Parse a `DocumentId` from user input.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, PrimitiveError> {
        let raw = input.as_ref();
        let Some(trimmed) = trimmed_non_empty(raw) else {
            return Err(PrimitiveError::InvalidDocumentId {
                input_length: raw.len(),
            });
        };

        Ok(Self(trimmed.to_owned().into_boxed_str()))
    }

    /// Generate a fresh random (UUID v4) identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().to_string().into_boxed_str())
    }

    /// Access the underlying string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the underlying string.
    #[must_use]
    pub fn into_inner(self) -> Box<str> {
        self.0
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

fn trimmed_non_empty(input: &str) -> Option<&str> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn is_valid_collection_name(name: &str) -> bool {
    let allowed = name
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-'));
    let bounded = name.starts_with(|ch: char| ch.is_ascii_alphanumeric())
        && name.ends_with(|ch: char| ch.is_ascii_alphanumeric());

    allowed && bounded && !name.contains("..") && name.parse::<Ipv4Addr>().is_err()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_name_accepts_database_style_names() -> Result<(), PrimitiveError> {
        assert_eq!(CollectionName::parse("jgs_db")?.as_str(), "jgs_db");
        assert_eq!(CollectionName::parse(" default ")?.as_str(), "default");
        assert_eq!(CollectionName::parse("docs-v1.2")?.as_str(), "docs-v1.2");
        Ok(())
    }

    #[test]
    fn collection_name_rejects_rule_violations() {
        assert!(matches!(
            CollectionName::parse("  "),
            Err(PrimitiveError::EmptyCollectionName { input_length: 2 })
        ));
        assert!(matches!(
            CollectionName::parse("ab"),
            Err(PrimitiveError::CollectionNameLength { .. })
        ));
        for name in ["_docs", "docs-", "a..b", "has space", "10.0.0.1"] {
            assert!(
                matches!(
                    CollectionName::parse(name),
                    Err(PrimitiveError::InvalidCollectionName { .. })
                ),
                "expected {name} to be rejected"
            );
        }
    }

    #[test]
    fn random_document_ids_are_distinct_uuids() {
        let first = DocumentId::random();
        let second = DocumentId::random();
        assert_ne!(first, second);
        assert!(uuid::Uuid::parse_str(first.as_str()).is_ok());
    }

    #[test]
    fn primitive_errors_map_to_domain_codes() {
        let envelope: ErrorEnvelope = PrimitiveError::InvalidCollectionName {
            input: "a..b".to_owned(),
        }
        .into();
        assert_eq!(
            envelope.code,
            ErrorCode::new("domain", "invalid_collection_name")
        );
        assert_eq!(envelope.metadata.get("input").map(String::as_str), Some("a..b"));
    }
}
