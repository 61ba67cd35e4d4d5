//! Chroma v2 REST endpoint construction.

use jgs_chroma_shared::{ErrorCode, ErrorEnvelope, Result};
use std::net::Ipv6Addr;
use url::Url;

/// Base URL for the Chroma v2 API: `{http|https}://{host}:{port}/api/v2`.
///
/// IPv6 literals are bracketed. Any other host containing `:` is rejected,
/// since the port always comes from `port`.
pub fn chroma_base_url(host: &str, port: u16, use_tls: bool) -> Result<Url> {
    let host = host.trim();
    let scheme = if use_tls { "https" } else { "http" };
    let host = if host.parse::<Ipv6Addr>().is_ok() {
        format!("[{host}]")
    } else if host.contains(':') && !host.starts_with('[') {
        return Err(ErrorEnvelope::expected(
            ErrorCode::invalid_input(),
            "Chroma host must not include a port; set CHROMA_PORT instead",
        )
        .with_metadata("host", host.to_owned()));
    } else {
        host.to_owned()
    };

    Url::parse(&format!("{scheme}://{host}:{port}/api/v2")).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::invalid_input(),
            format!("Chroma base URL is invalid: {error}"),
        )
        .with_metadata("host", host)
    })
}

/// Endpoint builder scoped to a tenant and database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromaEndpoints {
    base: Url,
    tenant: Box<str>,
    database: Box<str>,
}

impl ChromaEndpoints {
    /// Create an endpoint builder.
    #[must_use]
    pub fn new(base: Url, tenant: &str, database: &str) -> Self {
        Self {
            base,
            tenant: tenant.into(),
            database: database.into(),
        }
    }

    /// Tenant the endpoints are scoped to.
    #[must_use]
    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    /// Database the endpoints are scoped to.
    #[must_use]
    pub fn database(&self) -> &str {
        &self.database
    }

    /// `GET /heartbeat`
    pub fn heartbeat(&self) -> Result<Url> {
        self.join(&["heartbeat"])
    }

    /// `GET /pre-flight-checks`
    pub fn pre_flight_checks(&self) -> Result<Url> {
        self.join(&["pre-flight-checks"])
    }

    /// `GET /tenants/{tenant}`
    pub fn tenant_info(&self) -> Result<Url> {
        self.join(&["tenants", &self.tenant])
    }

    /// `GET /tenants/{tenant}/databases/{database}`
    pub fn database_info(&self) -> Result<Url> {
        self.join(&["tenants", &self.tenant, "databases", &self.database])
    }

    /// `POST /tenants/{tenant}/databases/{database}/collections`
    pub fn collections(&self) -> Result<Url> {
        self.join(&[
            "tenants",
            &self.tenant,
            "databases",
            &self.database,
            "collections",
        ])
    }

    /// `/tenants/{tenant}/databases/{database}/collections/{id}/{action}`
    pub fn collection_action(&self, collection_id: &str, action: &str) -> Result<Url> {
        self.join(&[
            "tenants",
            &self.tenant,
            "databases",
            &self.database,
            "collections",
            collection_id,
            action,
        ])
    }

    fn join(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ErrorEnvelope::expected(
                    ErrorCode::invalid_input(),
                    "Chroma base URL cannot carry a path",
                )
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}
