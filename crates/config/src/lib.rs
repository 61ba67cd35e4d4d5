//! # jgs-chroma-config
//!
//! Resolution of Chroma connection settings from environment variables and
//! caller overrides. Resolution is pure: the process environment is read only
//! through [`ChromaEnv::from_std_env`].
//! This crate depends on `shared` only.

/// Cloud-mode resolution for the document loader.
pub mod cloud;
/// Connection descriptor, auth settings, overrides, and resolution.
pub mod connection;
/// Environment variable snapshot.
pub mod env;
/// Configuration errors.
pub mod error;
/// Host input parsing.
pub mod host;

pub use cloud::{CloudHost, DEFAULT_CLOUD_DATABASE, DEFAULT_CLOUD_HOST, resolve_cloud_connection};
pub use connection::{
    AUTHORIZATION_HEADER, AuthHeaders, AuthSettings, CHROMA_TOKEN_HEADER, ConnectionDescriptor,
    ConnectionOverrides, DEFAULT_DATABASE, DEFAULT_HOST, LOCAL_PORT, REMOTE_PORT,
    TOKEN_AUTH_PROVIDER, TokenTransportHeader, is_loopback, resolve_connection,
    token_auth_headers,
};
pub use env::{ChromaEnv, KNOWN_ENV_VARS, std_env_snapshot};
pub use error::ConfigError;
pub use host::{HostInput, UrlScheme};

/// Returns the config crate version.
#[must_use]
pub const fn config_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
