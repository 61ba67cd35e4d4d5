//! Blocking Chroma v2 REST client.
//!
//! Must not be constructed or used from inside an async runtime; wrap calls in
//! `spawn_blocking` there.

use crate::chroma::endpoints::{ChromaEndpoints, chroma_base_url};
use crate::chroma::error::{
    ChromaErrorContext, connect_error, decode_response, map_transport_error,
};
use crate::chroma::options::ChromaClientOptions;
use crate::chroma::wire::{
    AddRequest, CollectionModel, CreateCollectionRequest, GetRequest, GetResponse,
    HeartbeatResponse, PreflightResponse,
};
use jgs_chroma_domain::CollectionName;
use jgs_chroma_ports::{CollectionHandle, DocumentRecord, PeekResult, RecordMetadata};
use jgs_chroma_shared::{ErrorClass, ErrorCode, ErrorEnvelope, Result};
use serde::de::{DeserializeOwned, IgnoredAny};
use std::time::Duration;

/// Synchronous Chroma client bound to a tenant and database.
#[derive(Debug, Clone)]
pub struct ChromaClient {
    http: reqwest::blocking::Client,
    endpoints: ChromaEndpoints,
}

impl ChromaClient {
    /// Build a client and validate that its tenant and database exist.
    pub fn connect(options: ChromaClientOptions) -> Result<Self> {
        options.validate()?;
        let base_url = chroma_base_url(&options.host, options.port, options.use_tls)?;
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(options.timeout_ms))
            .default_headers(options.default_headers()?)
            .build()
            .map_err(|error| {
                ErrorEnvelope::unexpected(
                    ErrorCode::new("vector", "vdb_client_init_failed"),
                    format!("failed to build Chroma client: {error}"),
                    ErrorClass::NonRetriable,
                )
            })?;

        let client = Self {
            http,
            endpoints: ChromaEndpoints::new(base_url, &options.tenant, &options.database),
        };
        client.validate_scope()?;
        tracing::info!(
            event = "chroma.connect",
            host = %options.host,
            port = options.port,
            use_tls = options.use_tls,
            tenant = client.endpoints.tenant(),
            database = client.endpoints.database(),
            blocking = true,
            "connected to chroma"
        );
        Ok(client)
    }

    fn validate_scope(&self) -> Result<()> {
        let tenant = self.endpoints.tenant();
        let database = self.endpoints.database();

        self.send::<IgnoredAny>(
            self.http.get(self.endpoints.tenant_info()?),
            ChromaErrorContext::operation("chroma.get_tenant"),
        )
        .map_err(|error| {
            connect_error(
                error,
                format!("Could not connect to tenant {tenant}. Are you sure it exists?"),
            )
        })?;

        self.send::<IgnoredAny>(
            self.http.get(self.endpoints.database_info()?),
            ChromaErrorContext::operation("chroma.get_database"),
        )
        .map_err(|error| {
            connect_error(
                error,
                format!(
                    "Could not connect to database {database} for tenant {tenant}. Are you sure it exists?"
                ),
            )
        })?;

        Ok(())
    }

    fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::blocking::RequestBuilder,
        ctx: ChromaErrorContext,
    ) -> Result<T> {
        let response = request
            .send()
            .map_err(|error| map_transport_error(&error, &ctx))?;
        let ctx = ctx.with_endpoint(response.url().path());
        let status = response.status().as_u16();
        let payload = response
            .bytes()
            .map_err(|error| map_transport_error(&error, &ctx))?;

        tracing::debug!(
            event = "chroma.request",
            operation = ctx.operation,
            status,
            bytes = payload.len(),
            blocking = true,
            "chroma request completed"
        );

        decode_response(status, &payload, &ctx)
    }

    /// Server heartbeat in nanoseconds.
    pub fn heartbeat(&self) -> Result<u64> {
        let response: HeartbeatResponse = self.send(
            self.http.get(self.endpoints.heartbeat()?),
            ChromaErrorContext::operation("chroma.heartbeat"),
        )?;
        Ok(response.nanosecond_heartbeat)
    }

    /// Largest `add` batch accepted by the server.
    pub fn max_batch_size(&self) -> Result<Option<usize>> {
        let response: PreflightResponse = self.send(
            self.http.get(self.endpoints.pre_flight_checks()?),
            ChromaErrorContext::operation("chroma.pre_flight_checks"),
        )?;
        Ok(response.limit())
    }

    /// Return the named collection, creating it when missing.
    pub fn get_or_create_collection(
        &self,
        name: &CollectionName,
        metadata: Option<&RecordMetadata>,
    ) -> Result<CollectionHandle> {
        let body = CreateCollectionRequest {
            name: name.as_str(),
            metadata,
            get_or_create: true,
        };
        let model: CollectionModel = self.send(
            self.http.post(self.endpoints.collections()?).json(&body),
            ChromaErrorContext::operation("chroma.get_or_create_collection")
                .with_collection(name.as_str()),
        )?;
        model.into_handle()
    }

    /// Insert records into a collection.
    pub fn add(&self, collection: &CollectionHandle, records: &[DocumentRecord]) -> Result<()> {
        let url = self.endpoints.collection_action(&collection.id, "add")?;
        self.send::<IgnoredAny>(
            self.http.post(url).json(&AddRequest::from_records(records)),
            ChromaErrorContext::operation("chroma.add").with_collection(collection.name.as_str()),
        )?;
        Ok(())
    }

    /// Read the first `limit` records of a collection.
    pub fn peek(&self, collection: &CollectionHandle, limit: u32) -> Result<PeekResult> {
        let url = self.endpoints.collection_action(&collection.id, "get")?;
        let response: GetResponse = self.send(
            self.http.post(url).json(&GetRequest::peek(limit)),
            ChromaErrorContext::operation("chroma.peek").with_collection(collection.name.as_str()),
        )?;
        Ok(response.into_peek())
    }

    /// Count records in a collection.
    pub fn count(&self, collection: &CollectionHandle) -> Result<u64> {
        let url = self.endpoints.collection_action(&collection.id, "count")?;
        self.send(
            self.http.get(url),
            ChromaErrorContext::operation("chroma.count").with_collection(collection.name.as_str()),
        )
    }
}
