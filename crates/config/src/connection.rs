//! Connection descriptor resolution.

use crate::env::ChromaEnv;
use crate::error::ConfigError;
use crate::host::HostInput;
use jgs_chroma_shared::SecretString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Host used when no host is configured.
pub const DEFAULT_HOST: &str = "localhost";
/// Database used when no database is configured.
pub const DEFAULT_DATABASE: &str = "default";
/// Port for loopback hosts.
pub const LOCAL_PORT: u16 = 8000;
/// Port for every other host.
pub const REMOTE_PORT: u16 = 443;
/// Token header sent to Chroma.
pub const CHROMA_TOKEN_HEADER: &str = "X-Chroma-Token";
/// Standard bearer header.
pub const AUTHORIZATION_HEADER: &str = "Authorization";
/// Client auth provider used for token credentials.
pub const TOKEN_AUTH_PROVIDER: &str = "chromadb.auth.token_authn.TokenAuthClientProvider";

const LOOPBACK_HOSTS: [&str; 2] = ["localhost", "127.0.0.1"];

/// Header name to header value; values are credentials.
pub type AuthHeaders = BTreeMap<String, SecretString>;

/// Header that carries the token credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenTransportHeader {
    /// `X-Chroma-Token: <token>`
    #[serde(rename = "X-Chroma-Token")]
    XChromaToken,
    /// `Authorization: Bearer <token>`
    #[serde(rename = "Authorization")]
    Authorization,
}

impl TokenTransportHeader {
    /// Header name on the wire.
    #[must_use]
    pub const fn header_name(self) -> &'static str {
        match self {
            Self::XChromaToken => CHROMA_TOKEN_HEADER,
            Self::Authorization => AUTHORIZATION_HEADER,
        }
    }

    /// Header value for a token.
    #[must_use]
    pub fn header_value(self, token: &str) -> String {
        match self {
            Self::XChromaToken => token.to_owned(),
            Self::Authorization => format!("Bearer {token}"),
        }
    }
}

/// Token authentication settings handed to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSettings {
    /// Client auth provider identifier.
    pub client_auth_provider: Box<str>,
    /// Token credential.
    pub client_auth_credentials: SecretString,
    /// Header that carries the credential.
    pub token_transport_header: TokenTransportHeader,
}

impl AuthSettings {
    /// Token auth bound to `token` and the `X-Chroma-Token` header.
    #[must_use]
    pub fn token(token: SecretString) -> Self {
        Self {
            client_auth_provider: TOKEN_AUTH_PROVIDER.into(),
            client_auth_credentials: token,
            token_transport_header: TokenTransportHeader::XChromaToken,
        }
    }
}

/// Both auth headers for an API key.
#[must_use]
pub fn token_auth_headers(api_key: &SecretString) -> AuthHeaders {
    let key = api_key.expose();
    BTreeMap::from([
        (CHROMA_TOKEN_HEADER.to_owned(), SecretString::from(key)),
        (
            AUTHORIZATION_HEADER.to_owned(),
            SecretString::from(format!("Bearer {key}")),
        ),
    ])
}

/// Canonical connection parameters.
///
/// Resolved from the environment, `auth_headers` and `auth_settings` are both
/// present or both absent. Overrides may replace either one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDescriptor {
    /// Hostname without scheme.
    pub host: Box<str>,
    /// TCP port.
    pub port: u16,
    /// Whether to connect over TLS.
    #[serde(rename = "useTLS")]
    pub use_tls: bool,
    /// Auth headers sent with every request.
    pub auth_headers: Option<AuthHeaders>,
    /// Tenant identifier.
    pub tenant: Option<Box<str>>,
    /// Database name.
    pub database: Box<str>,
    /// Token auth settings.
    pub auth_settings: Option<AuthSettings>,
}

impl ConnectionDescriptor {
    /// True when credentials are attached.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.auth_headers.is_some() || self.auth_settings.is_some()
    }
}

/// Caller-supplied replacements for descriptor fields.
///
/// `None` leaves the resolved value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionOverrides {
    /// Host replacement, used verbatim.
    pub host: Option<Box<str>>,
    /// Port replacement.
    pub port: Option<u16>,
    /// TLS replacement.
    #[serde(alias = "useTLS", alias = "ssl")]
    pub use_tls: Option<bool>,
    /// Auth headers replacement.
    pub auth_headers: Option<AuthHeaders>,
    /// Tenant replacement.
    pub tenant: Option<Box<str>>,
    /// Database replacement.
    pub database: Option<Box<str>>,
    /// Auth settings replacement.
    pub auth_settings: Option<AuthSettings>,
}

impl ConnectionOverrides {
    /// Parse overrides from a JSON object. Nulls and unknown keys are ignored.
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        let overrides: Self =
            serde_json::from_str(input).map_err(|error| ConfigError::InvalidOverrides {
                message: error.to_string(),
            })?;
        overrides.validate()?;
        Ok(overrides)
    }

    /// Reject values that can never form a valid descriptor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == Some(0) {
            return Err(ConfigError::PortOutOfRange {
                var: "port",
                value: "0".to_owned(),
            });
        }
        Ok(())
    }

    /// Replace every descriptor field that has an override.
    #[must_use]
    pub fn apply(&self, mut descriptor: ConnectionDescriptor) -> ConnectionDescriptor {
        if let Some(host) = &self.host {
            descriptor.host.clone_from(host);
        }
        if let Some(port) = self.port {
            descriptor.port = port;
        }
        if let Some(use_tls) = self.use_tls {
            descriptor.use_tls = use_tls;
        }
        if let Some(headers) = &self.auth_headers {
            descriptor.auth_headers = Some(headers.clone());
        }
        if let Some(tenant) = &self.tenant {
            descriptor.tenant = Some(tenant.clone());
        }
        if let Some(database) = &self.database {
            descriptor.database.clone_from(database);
        }
        if let Some(settings) = &self.auth_settings {
            descriptor.auth_settings = Some(settings.clone());
        }
        descriptor
    }
}

/// True for hosts that get local defaults.
#[must_use]
pub fn is_loopback(host: &str) -> bool {
    LOOPBACK_HOSTS.contains(&host)
}

/// Resolve a descriptor from an env snapshot plus caller overrides.
pub fn resolve_connection(
    env: &ChromaEnv,
    overrides: &ConnectionOverrides,
) -> Result<ConnectionDescriptor, ConfigError> {
    overrides.validate()?;

    let raw_host = env.host.as_deref().unwrap_or(DEFAULT_HOST);
    let (host, url_port, url_tls) = match HostInput::parse(raw_host)? {
        HostInput::Bare(host) => (host, None, None),
        HostInput::Url { scheme, host, port } => (host, port, Some(scheme.is_tls())),
    };

    let port = env
        .port
        .or(url_port)
        .unwrap_or_else(|| if is_loopback(&host) { LOCAL_PORT } else { REMOTE_PORT });
    let use_tls = env.ssl.or(url_tls).unwrap_or_else(|| !is_loopback(&host));

    let (auth_headers, auth_settings) = env.api_key.as_ref().map_or((None, None), |key| {
        (
            Some(token_auth_headers(key)),
            Some(AuthSettings::token(key.clone())),
        )
    });

    let descriptor = overrides.apply(ConnectionDescriptor {
        host,
        port,
        use_tls,
        auth_headers,
        tenant: env.tenant.clone(),
        database: env.database.clone().unwrap_or_else(|| DEFAULT_DATABASE.into()),
        auth_settings,
    });

    tracing::debug!(
        event = "chroma.resolve",
        host = %descriptor.host,
        port = descriptor.port,
        use_tls = descriptor.use_tls,
        authenticated = descriptor.is_authenticated(),
        "resolved chroma connection"
    );

    Ok(descriptor)
}
