//! Cloud-mode connection resolution used by the document loader.

use crate::connection::{AuthSettings, ConnectionDescriptor, token_auth_headers};
use crate::env::{ChromaEnv, ENV_CHROMA_API_KEY, ENV_CHROMA_TENANT};
use crate::error::ConfigError;

/// Host used when `CHROMA_HOST` is unset.
pub const DEFAULT_CLOUD_HOST: &str = "https://api.trychroma.com";
/// Database (and collection) used when none is configured.
pub const DEFAULT_CLOUD_DATABASE: &str = "jgs_db";

const HTTPS_PREFIX: &str = "https://";
const HTTP_PREFIX: &str = "http://";

/// Cloud host classified by prefix.
///
/// The remainder after the prefix is kept verbatim as the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloudHost {
    /// `https://` host.
    Https(Box<str>),
    /// `http://` host.
    Http(Box<str>),
    /// Starts with `http` but not with a recognized scheme; TLS is forced on.
    Implicit(Box<str>),
}

impl CloudHost {
    /// Classify a raw cloud host, prefixing `https://` when it does not start
    /// with `http`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let normalized = if raw.starts_with("http") {
            raw.to_owned()
        } else {
            format!("{HTTPS_PREFIX}{raw}")
        };

        if let Some(rest) = normalized.strip_prefix(HTTPS_PREFIX) {
            Self::Https(rest.into())
        } else if let Some(rest) = normalized.strip_prefix(HTTP_PREFIX) {
            Self::Http(rest.into())
        } else {
            Self::Implicit(normalized.into_boxed_str())
        }
    }

    /// Host without scheme.
    #[must_use]
    pub fn host(&self) -> &str {
        match self {
            Self::Https(host) | Self::Http(host) | Self::Implicit(host) => host,
        }
    }

    /// Whether the connection uses TLS.
    #[must_use]
    pub const fn use_tls(&self) -> bool {
        !matches!(self, Self::Http(_))
    }

    /// Port used when `CHROMA_PORT` is unset.
    #[must_use]
    pub const fn default_port(&self) -> u16 {
        match self {
            Self::Http(_) => 80,
            Self::Https(_) | Self::Implicit(_) => 443,
        }
    }
}

/// Resolve an authenticated cloud descriptor.
///
/// Fails with [`ConfigError::MissingCredentials`] before any network call when
/// the API key or tenant is missing.
pub fn resolve_cloud_connection(env: &ChromaEnv) -> Result<ConnectionDescriptor, ConfigError> {
    let (Some(api_key), Some(tenant)) = (&env.api_key, &env.tenant) else {
        let mut missing = Vec::new();
        if env.api_key.is_none() {
            missing.push(ENV_CHROMA_API_KEY);
        }
        if env.tenant.is_none() {
            missing.push(ENV_CHROMA_TENANT);
        }
        return Err(ConfigError::MissingCredentials { missing });
    };

    let cloud_host = CloudHost::parse(env.host.as_deref().unwrap_or(DEFAULT_CLOUD_HOST));
    let descriptor = ConnectionDescriptor {
        host: cloud_host.host().into(),
        port: env.port.unwrap_or_else(|| cloud_host.default_port()),
        use_tls: cloud_host.use_tls(),
        auth_headers: Some(token_auth_headers(api_key)),
        tenant: Some(tenant.clone()),
        database: env
            .database
            .clone()
            .unwrap_or_else(|| DEFAULT_CLOUD_DATABASE.into()),
        auth_settings: Some(AuthSettings::token(api_key.clone())),
    };

    tracing::debug!(
        event = "chroma.resolve_cloud",
        host = %descriptor.host,
        port = descriptor.port,
        use_tls = descriptor.use_tls,
        database = %descriptor.database,
        "resolved chroma cloud connection"
    );

    Ok(descriptor)
}
