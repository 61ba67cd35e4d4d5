//! Chroma client construction from the environment plus caller overrides.

use crate::InfraResult;
use jgs_chroma_adapters::chroma::{AsyncChromaClient, ChromaClient, ChromaClientOptions};
use jgs_chroma_config::{
    ChromaEnv, ConnectionDescriptor, ConnectionOverrides, resolve_cloud_connection,
    resolve_connection,
};
use jgs_chroma_shared::{ErrorClass, ErrorCode, ErrorEnvelope};
use serde::Serialize;
use std::collections::BTreeMap;

/// Which resolution rules to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMode {
    /// Local-aware defaults with caller overrides.
    Standard,
    /// Authenticated cloud defaults used by the loader.
    Cloud,
}

/// Resolved connection together with the rules that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveConnection {
    /// Resolution rules applied.
    pub mode: ResolutionMode,
    /// Resolved descriptor (secrets redacted when serialized).
    pub connection: ConnectionDescriptor,
}

/// Resolve a descriptor from an env snapshot plus caller overrides.
pub fn resolve_descriptor(
    env: &BTreeMap<String, String>,
    overrides: &ConnectionOverrides,
) -> InfraResult<ConnectionDescriptor> {
    let env = ChromaEnv::from_map(env).map_err(ErrorEnvelope::from)?;
    resolve_connection(&env, overrides).map_err(ErrorEnvelope::from)
}

/// Resolve the authenticated cloud descriptor from an env snapshot.
pub fn resolve_cloud_descriptor(env: &BTreeMap<String, String>) -> InfraResult<ConnectionDescriptor> {
    let env = ChromaEnv::from_map(env).map_err(ErrorEnvelope::from)?;
    resolve_cloud_connection(&env).map_err(ErrorEnvelope::from)
}

/// Resolve the connection for `mode`.
///
/// Cloud resolution ignores overrides.
pub fn effective_connection(
    env: &BTreeMap<String, String>,
    overrides: &ConnectionOverrides,
    mode: ResolutionMode,
) -> InfraResult<EffectiveConnection> {
    let connection = match mode {
        ResolutionMode::Standard => resolve_descriptor(env, overrides)?,
        ResolutionMode::Cloud => resolve_cloud_descriptor(env)?,
    };
    Ok(EffectiveConnection { mode, connection })
}

/// Deterministic pretty JSON for an effective connection.
pub fn effective_connection_json(effective: &EffectiveConnection) -> InfraResult<String> {
    serde_json::to_string_pretty(effective).map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::internal(),
            format!("failed to serialize effective connection: {error}"),
            ErrorClass::NonRetriable,
        )
    })
}

/// Client options for a descriptor; absent optional fields fall back to client defaults.
#[must_use]
pub fn client_options(descriptor: &ConnectionDescriptor) -> ChromaClientOptions {
    ChromaClientOptions::from_descriptor(descriptor)
}

/// Build a blocking client from the environment plus overrides.
///
/// Must be called outside an async runtime.
pub fn get_client(
    env: &BTreeMap<String, String>,
    overrides: &ConnectionOverrides,
) -> InfraResult<ChromaClient> {
    let descriptor = resolve_descriptor(env, overrides)?;
    ChromaClient::connect(client_options(&descriptor))
}

/// Build an async client from the environment plus overrides.
pub async fn get_async_client(
    env: &BTreeMap<String, String>,
    overrides: &ConnectionOverrides,
) -> InfraResult<AsyncChromaClient> {
    let descriptor = resolve_descriptor(env, overrides)?;
    AsyncChromaClient::connect(client_options(&descriptor)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect()
    }

    #[test]
    fn options_fill_client_defaults_for_absent_tenant() -> InfraResult<()> {
        let descriptor = resolve_descriptor(&env(&[]), &ConnectionOverrides::default())?;
        let options = client_options(&descriptor);
        assert_eq!(options.host.as_ref(), "localhost");
        assert_eq!(options.port, 8000);
        assert!(!options.use_tls);
        assert_eq!(options.tenant.as_ref(), "default_tenant");
        assert_eq!(options.database.as_ref(), "default");
        assert!(options.headers.is_empty());
        Ok(())
    }

    #[test]
    fn options_carry_both_token_headers() -> InfraResult<()> {
        let descriptor = resolve_descriptor(
            &env(&[("CHROMA_API_KEY", "ck-1"), ("CHROMA_TENANT", "acme")]),
            &ConnectionOverrides::default(),
        )?;
        let options = client_options(&descriptor);
        assert_eq!(
            options.headers.get("X-Chroma-Token").map(|value| value.expose()),
            Some("ck-1")
        );
        assert_eq!(options.tenant.as_ref(), "acme");
        Ok(())
    }

    #[test]
    fn malformed_port_surfaces_as_config_error() {
        let error = resolve_descriptor(&env(&[("CHROMA_PORT", "abc")]), &ConnectionOverrides::default())
            .err();
        assert_eq!(
            error.map(|error| error.code),
            Some(ErrorCode::new("config", "invalid_port"))
        );
    }

    #[test]
    fn cloud_json_hides_the_api_key() -> InfraResult<()> {
        let effective = effective_connection(
            &env(&[("CHROMA_API_KEY", "ck-secret"), ("CHROMA_TENANT", "acme")]),
            &ConnectionOverrides::default(),
            ResolutionMode::Cloud,
        )?;
        let json = effective_connection_json(&effective)?;
        assert!(json.contains("\"mode\": \"cloud\""));
        assert!(json.contains("api.trychroma.com"));
        assert!(!json.contains("ck-secret"));
        Ok(())
    }
}
