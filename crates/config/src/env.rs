//! Environment variable snapshot for Chroma connections.
//!
//! Parsing works on an injected key/value map; only `from_std_env` touches the
//! process environment. Blank values count as unset so aliases and defaults
//! apply.

use crate::error::ConfigError;
use jgs_chroma_shared::SecretString;
use std::collections::BTreeMap;

/// Env var: host name or full `http(s)://` URL.
pub const ENV_CHROMA_HOST: &str = "CHROMA_HOST";
/// Env var: explicit port.
pub const ENV_CHROMA_PORT: &str = "CHROMA_PORT";
/// Env var: explicit TLS flag.
pub const ENV_CHROMA_SSL: &str = "CHROMA_SSL";
/// Env var: API key (secret).
pub const ENV_CHROMA_API_KEY: &str = "CHROMA_API_KEY";
/// Env var: API key (alias).
pub const ENV_CHROMA_API_KEY_ALIAS: &str = "CHROMADB_API_KEY";
/// Env var: tenant.
pub const ENV_CHROMA_TENANT: &str = "CHROMA_TENANT";
/// Env var: tenant (alias).
pub const ENV_CHROMA_TENANT_ALIAS: &str = "CHROMADB_TENANT";
/// Env var: database.
pub const ENV_CHROMA_DATABASE: &str = "CHROMA_DATABASE";
/// Env var: database (alias).
pub const ENV_CHROMA_DATABASE_ALIAS: &str = "CHROMADB_DATABASE";

/// Every variable read by [`ChromaEnv`].
pub const KNOWN_ENV_VARS: [&str; 9] = [
    ENV_CHROMA_HOST,
    ENV_CHROMA_PORT,
    ENV_CHROMA_SSL,
    ENV_CHROMA_API_KEY,
    ENV_CHROMA_API_KEY_ALIAS,
    ENV_CHROMA_TENANT,
    ENV_CHROMA_TENANT_ALIAS,
    ENV_CHROMA_DATABASE,
    ENV_CHROMA_DATABASE_ALIAS,
];

const TRUTHY_FLAGS: [&str; 5] = ["1", "true", "yes", "y", "on"];

/// Parsed snapshot of the Chroma environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChromaEnv {
    /// Raw host input (bare name or URL).
    pub host: Option<Box<str>>,
    /// Explicit port.
    pub port: Option<u16>,
    /// Explicit TLS flag.
    pub ssl: Option<bool>,
    /// API key.
    pub api_key: Option<SecretString>,
    /// Tenant identifier.
    pub tenant: Option<Box<str>>,
    /// Database name.
    pub database: Option<Box<str>>,
}

impl ChromaEnv {
    /// Parse env values from a key/value map (useful for tests and fixtures).
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, ConfigError> {
        Ok(Self {
            host: first_present(map, &[ENV_CHROMA_HOST]),
            port: parse_port(map)?,
            ssl: map.get(ENV_CHROMA_SSL).map(|raw| parse_flag(raw)),
            api_key: first_present(map, &[ENV_CHROMA_API_KEY, ENV_CHROMA_API_KEY_ALIAS])
                .map(SecretString::from),
            tenant: first_present(map, &[ENV_CHROMA_TENANT, ENV_CHROMA_TENANT_ALIAS]),
            database: first_present(map, &[ENV_CHROMA_DATABASE, ENV_CHROMA_DATABASE_ALIAS]),
        })
    }

    /// Parse env values from the current process environment.
    pub fn from_std_env() -> Result<Self, ConfigError> {
        Self::from_map(&std_env_snapshot())
    }
}

/// Collect the known Chroma variables from the process environment.
#[must_use]
pub fn std_env_snapshot() -> BTreeMap<String, String> {
    KNOWN_ENV_VARS
        .iter()
        .filter_map(|name| {
            std::env::var(name)
                .ok()
                .map(|value| ((*name).to_owned(), value))
        })
        .collect()
}

/// Return the first non-blank value among `vars`, trimmed.
pub fn first_present(map: &BTreeMap<String, String>, vars: &[&str]) -> Option<Box<str>> {
    vars.iter()
        .filter_map(|var| map.get(*var))
        .map(|raw| raw.trim())
        .find(|trimmed| !trimmed.is_empty())
        .map(Box::from)
}

/// Interpret a TLS flag; anything outside the truthy set is false.
#[must_use]
pub fn parse_flag(raw: &str) -> bool {
    let lowered = raw.trim().to_ascii_lowercase();
    TRUTHY_FLAGS.contains(&lowered.as_str())
}

fn parse_port(map: &BTreeMap<String, String>) -> Result<Option<u16>, ConfigError> {
    let Some(raw) = first_present(map, &[ENV_CHROMA_PORT]) else {
        return Ok(None);
    };

    let value = raw
        .parse::<i64>()
        .map_err(|_| ConfigError::InvalidPort {
            var: ENV_CHROMA_PORT,
            value: raw.to_string(),
        })?;

    match u16::try_from(value) {
        Ok(port) if port != 0 => Ok(Some(port)),
        _ => Err(ConfigError::PortOutOfRange {
            var: ENV_CHROMA_PORT,
            value: raw.to_string(),
        }),
    }
}
