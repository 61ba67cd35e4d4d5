//! Configuration errors.

use jgs_chroma_shared::{ErrorCode, ErrorEnvelope, redact_if_secret};

/// Errors raised while resolving a Chroma connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Port text was not an integer.
    #[error("{var} must be an integer")]
    InvalidPort {
        /// Env var or override key.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
    /// Port was an integer outside 1-65535.
    #[error("{var} must be between 1 and 65535")]
    PortOutOfRange {
        /// Env var or override key.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
    /// A URL-form host could not be parsed.
    #[error("{var} is not a valid URL: {reason}")]
    InvalidHostUrl {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
        /// Parser message.
        reason: String,
    },
    /// Cloud loading needs an API key and a tenant.
    #[error(
        "Set CHROMA_API_KEY and CHROMA_TENANT (and optional CHROMA_DATABASE) before loading data."
    )]
    MissingCredentials {
        /// Primary names of the missing variables.
        missing: Vec<&'static str>,
    },
    /// Override payload was malformed.
    #[error("invalid connection overrides: {message}")]
    InvalidOverrides {
        /// Parser message.
        message: String,
    },
}

impl ConfigError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidPort { .. } => ErrorCode::new("config", "invalid_port"),
            Self::PortOutOfRange { .. } => ErrorCode::new("config", "port_out_of_range"),
            Self::InvalidHostUrl { .. } => ErrorCode::new("config", "invalid_host_url"),
            Self::MissingCredentials { .. } => ErrorCode::new("config", "missing_credentials"),
            Self::InvalidOverrides { .. } => ErrorCode::new("config", "invalid_overrides"),
        }
    }
}

impl From<ConfigError> for ErrorEnvelope {
    fn from(error: ConfigError) -> Self {
        let mut envelope = Self::expected(error.error_code(), error.to_string());

        match error {
            ConfigError::InvalidPort { var, value } | ConfigError::PortOutOfRange { var, value } => {
                envelope = envelope
                    .with_metadata("env_var", var)
                    .with_metadata("value", redact_if_secret(var, &value));
            },
            ConfigError::InvalidHostUrl { var, value, reason } => {
                envelope = envelope
                    .with_metadata("env_var", var)
                    .with_metadata("value", redact_if_secret(var, &value))
                    .with_metadata("reason", reason);
            },
            ConfigError::MissingCredentials { missing } => {
                envelope = envelope.with_metadata("missing", missing.join(","));
            },
            ConfigError::InvalidOverrides { message } => {
                envelope = envelope.with_metadata("reason", message);
            },
        }

        envelope
    }
}
