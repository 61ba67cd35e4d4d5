//! Secret detection and redaction utilities.
//!
//! Provides consistent logic for detecting sensitive keys/variables and
//! redacting their values in error messages, logs, and serialized output.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The redacted placeholder string.
pub const REDACTED: &str = "[REDACTED]";

/// Checks if a key/variable name likely refers to a secret.
///
/// Uses case-insensitive pattern matching to detect common secret-related
/// naming conventions, including HTTP auth header names.
///
/// # Examples
///
/// ```
/// use jgs_chroma_shared::is_secret_key;
///
/// assert!(is_secret_key("CHROMA_API_KEY"));
/// assert!(is_secret_key("X-Chroma-Token"));
/// assert!(is_secret_key("Authorization"));
/// assert!(!is_secret_key("CHROMA_HOST"));
/// ```
pub fn is_secret_key(key: &str) -> bool {
    let key = key.to_ascii_uppercase();
    key.contains("KEY")
        || key.contains("TOKEN")
        || key.contains("SECRET")
        || key.contains("PASSWORD")
        || key.contains("CREDENTIAL")
        || key.contains("AUTH")
}

/// Redacts a value if the key is likely a secret.
///
/// # Examples
///
/// ```
/// use jgs_chroma_shared::redact_if_secret;
///
/// assert_eq!(redact_if_secret("CHROMA_API_KEY", "ck-123"), "[REDACTED]");
/// assert_eq!(redact_if_secret("CHROMA_PORT", "8000"), "8000");
/// ```
pub fn redact_if_secret(key: &str, value: &str) -> String {
    if is_secret_key(key) {
        REDACTED.to_string()
    } else {
        value.to_string()
    }
}

/// A secret string wrapper that redacts on Display/Debug/Serialize.
///
/// Deserialization is transparent so secrets can arrive through JSON
/// overrides; serialization always writes the placeholder.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SecretString(Box<str>);

impl SecretString {
    /// Wrap a secret value.
    pub fn new(value: impl Into<Box<str>>) -> Self {
        Self(value.into())
    }

    /// Borrow the underlying secret.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Consume and return the underlying secret.
    pub fn into_inner(self) -> Box<str> {
        self.0
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(REDACTED)
    }
}

impl std::fmt::Display for SecretString {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(REDACTED)
    }
}

impl Serialize for SecretString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(REDACTED)
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

impl AsRef<str> for SecretString {
    fn as_ref(&self) -> &str {
        self.expose()
    }
}

impl From<Box<str>> for SecretString {
    fn from(value: Box<str>) -> Self {
        Self(value)
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self(value.into_boxed_str())
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_chroma_secret_names() {
        assert!(is_secret_key("CHROMA_API_KEY"));
        assert!(is_secret_key("CHROMADB_API_KEY"));
        assert!(is_secret_key("x-chroma-token"));
        assert!(is_secret_key("Authorization"));
        assert!(is_secret_key("authSettings"));
    }

    #[test]
    fn rejects_non_secret_names() {
        assert!(!is_secret_key("CHROMA_HOST"));
        assert!(!is_secret_key("CHROMA_PORT"));
        assert!(!is_secret_key("CHROMA_SSL"));
        assert!(!is_secret_key("CHROMA_TENANT"));
        assert!(!is_secret_key("CHROMA_DATABASE"));
    }

    #[test]
    fn redacts_secret_values() {
        assert_eq!(redact_if_secret("CHROMA_API_KEY", "ck-123456"), REDACTED);
        assert_eq!(redact_if_secret("CHROMA_TENANT", "acme"), "acme");
    }

    #[test]
    fn secret_string_redacts_display_and_debug() {
        let secret = SecretString::new("shh");
        assert_eq!(secret.to_string(), REDACTED);
        assert_eq!(format!("{secret:?}"), REDACTED);
        assert_eq!(secret.expose(), "shh");
    }

    #[test]
    fn secret_string_serializes_redacted_but_deserializes_raw() -> Result<(), serde_json::Error> {
        let secret: SecretString = serde_json::from_str("\"ck-live\"")?;
        assert_eq!(secret.expose(), "ck-live");
        assert_eq!(serde_json::to_string(&secret)?, format!("\"{REDACTED}\""));
        Ok(())
    }
}
