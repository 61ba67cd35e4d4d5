//! Client options derived from a resolved connection descriptor.

use jgs_chroma_config::ConnectionDescriptor;
use jgs_chroma_shared::{ErrorCode, ErrorEnvelope, Result, SecretString};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use std::collections::BTreeMap;

/// Tenant used when the descriptor carries none.
pub const DEFAULT_TENANT: &str = "default_tenant";
/// Database used when the options carry none.
pub const DEFAULT_DATABASE: &str = "default_database";
/// Request timeout applied by the factory.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Everything a Chroma client needs to connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromaClientOptions {
    /// Hostname without scheme.
    pub host: Box<str>,
    /// TCP port.
    pub port: u16,
    /// Whether to connect over TLS.
    pub use_tls: bool,
    /// Headers sent with every request.
    pub headers: BTreeMap<String, SecretString>,
    /// Tenant identifier.
    pub tenant: Box<str>,
    /// Database name.
    pub database: Box<str>,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl ChromaClientOptions {
    /// Build options from a descriptor, dropping absent optional fields.
    ///
    /// The token transport header from the auth settings is merged over the
    /// explicit auth headers.
    #[must_use]
    pub fn from_descriptor(descriptor: &ConnectionDescriptor) -> Self {
        let mut headers = descriptor.auth_headers.clone().unwrap_or_default();
        if let Some(settings) = descriptor.auth_settings.as_ref() {
            let transport = settings.token_transport_header;
            headers.insert(
                transport.header_name().to_owned(),
                SecretString::from(
                    transport.header_value(settings.client_auth_credentials.expose()),
                ),
            );
        }

        Self {
            host: descriptor.host.clone(),
            port: descriptor.port,
            use_tls: descriptor.use_tls,
            headers,
            tenant: descriptor
                .tenant
                .clone()
                .unwrap_or_else(|| DEFAULT_TENANT.into()),
            database: non_blank(&descriptor.database).unwrap_or_else(|| DEFAULT_DATABASE.into()),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Validates option invariants.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(ErrorEnvelope::expected(
                ErrorCode::invalid_input(),
                "Chroma host is required",
            ));
        }
        if self.timeout_ms == 0 {
            return Err(ErrorEnvelope::expected(
                ErrorCode::invalid_input(),
                "Chroma timeout must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Default request headers: configured headers, JSON content type, and a
    /// user agent.
    pub fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("jgs-chroma/", env!("CARGO_PKG_VERSION"))),
        );

        for (name, value) in &self.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
                ErrorEnvelope::expected(
                    ErrorCode::invalid_input(),
                    format!("Chroma header name is invalid: {name}"),
                )
            })?;
            let mut header_value = HeaderValue::from_str(value.expose()).map_err(|_| {
                ErrorEnvelope::expected(
                    ErrorCode::invalid_input(),
                    format!("Chroma header {name} contains invalid characters"),
                )
            })?;
            header_value.set_sensitive(true);
            headers.insert(header_name, header_value);
        }

        Ok(headers)
    }
}

fn non_blank(value: &str) -> Option<Box<str>> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jgs_chroma_config::{AuthSettings, TokenTransportHeader, token_auth_headers};

    fn descriptor() -> ConnectionDescriptor {
        ConnectionDescriptor {
            host: "localhost".into(),
            port: 8000,
            use_tls: false,
            auth_headers: None,
            tenant: None,
            database: "default".into(),
            auth_settings: None,
        }
    }

    #[test]
    fn absent_fields_take_client_defaults() {
        let options = ChromaClientOptions::from_descriptor(&descriptor());
        assert_eq!(options.tenant.as_ref(), DEFAULT_TENANT);
        assert_eq!(options.database.as_ref(), "default");
        assert!(options.headers.is_empty());
        assert_eq!(options.timeout_ms, DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn auth_settings_header_is_merged() -> Result<()> {
        let key = SecretString::new("ck-9");
        let mut settings = AuthSettings::token(key.clone());
        settings.token_transport_header = TokenTransportHeader::Authorization;
        let descriptor = ConnectionDescriptor {
            auth_headers: Some(token_auth_headers(&key)),
            auth_settings: Some(settings),
            ..descriptor()
        };

        let options = ChromaClientOptions::from_descriptor(&descriptor);
        let headers = options.default_headers()?;
        assert_eq!(
            headers.get("x-chroma-token").and_then(|value| value.to_str().ok()),
            Some("ck-9")
        );
        assert_eq!(
            headers.get("authorization").and_then(|value| value.to_str().ok()),
            Some("Bearer ck-9")
        );
        assert!(headers.get("authorization").is_some_and(HeaderValue::is_sensitive));
        assert!(headers.contains_key(USER_AGENT));
        Ok(())
    }

    #[test]
    fn invalid_header_values_are_rejected() {
        let mut options = ChromaClientOptions::from_descriptor(&descriptor());
        options
            .headers
            .insert("X-Chroma-Token".to_owned(), SecretString::new("bad\nvalue"));
        let error = options.default_headers().err();
        assert_eq!(error.map(|error| error.code), Some(ErrorCode::invalid_input()));
    }
}
