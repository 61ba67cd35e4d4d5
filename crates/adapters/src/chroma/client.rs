//! Asynchronous Chroma v2 REST client.

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
use jgs_chroma_ports::{
    BoxFuture, CollectionHandle, CollectionPort, DocumentRecord, PeekResult, RecordMetadata,
};
use jgs_chroma_shared::{ErrorClass, ErrorCode, ErrorEnvelope, Result};
use serde::de::{DeserializeOwned, IgnoredAny};
use std::time::Duration;

/// Asynchronous Chroma client bound to a tenant and database.
#[derive(Debug, Clone)]
pub struct AsyncChromaClient {
    http: reqwest::Client,
    endpoints: ChromaEndpoints,
}

impl AsyncChromaClient {
    /// Build a client and validate that its tenant and database exist.
    pub async fn connect(options: ChromaClientOptions) -> Result<Self> {
        let client = Self::build(&options)?;
        client.validate_scope().await?;
        tracing::info!(
            event = "chroma.connect",
            host = %options.host,
            port = options.port,
            use_tls = options.use_tls,
            tenant = client.endpoints.tenant(),
            database = client.endpoints.database(),
            "connected to chroma"
        );
        Ok(client)
    }

    fn build(options: &ChromaClientOptions) -> Result<Self> {
        options.validate()?;
        let base_url = chroma_base_url(&options.host, options.port, options.use_tls)?;
        let http = reqwest::Client::builder()
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

        Ok(Self {
            http,
            endpoints: ChromaEndpoints::new(base_url, &options.tenant, &options.database),
        })
    }

    async fn validate_scope(&self) -> Result<()> {
        let tenant = self.endpoints.tenant();
        let database = self.endpoints.database();

        let ctx = ChromaErrorContext::operation("chroma.get_tenant");
        let _: IgnoredAny = self
            .send(self.http.get(self.endpoints.tenant_info()?), ctx)
            .await
            .map_err(|error| {
                connect_error(
                    error,
                    format!("Could not connect to tenant {tenant}. Are you sure it exists?"),
                )
            })?;

        let ctx = ChromaErrorContext::operation("chroma.get_database");
        let _: IgnoredAny = self
            .send(self.http.get(self.endpoints.database_info()?), ctx)
            .await
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

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        ctx: ChromaErrorContext,
    ) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(|error| map_transport_error(&error, &ctx))?;
        let ctx = ctx.with_endpoint(response.url().path());
        let status = response.status().as_u16();
        let payload = response
            .bytes()
            .await
            .map_err(|error| map_transport_error(&error, &ctx))?;

        tracing::debug!(
            event = "chroma.request",
            operation = ctx.operation,
            status,
            bytes = payload.len(),
            "chroma request completed"
        );

        decode_response(status, &payload, &ctx)
    }

    /// Server heartbeat in nanoseconds.
    pub async fn heartbeat(&self) -> Result<u64> {
        let ctx = ChromaErrorContext::operation("chroma.heartbeat");
        let response: HeartbeatResponse = self
            .send(self.http.get(self.endpoints.heartbeat()?), ctx)
            .await?;
        Ok(response.nanosecond_heartbeat)
    }

    /// Largest `add` batch accepted by the server.
    pub async fn max_batch_size(&self) -> Result<Option<usize>> {
        let ctx = ChromaErrorContext::operation("chroma.pre_flight_checks");
        let response: PreflightResponse = self
            .send(self.http.get(self.endpoints.pre_flight_checks()?), ctx)
            .await?;
        Ok(response.limit())
    }

    /// Return the named collection, creating it when missing.
    pub async fn get_or_create_collection(
        &self,
        name: &CollectionName,
        metadata: Option<&RecordMetadata>,
    ) -> Result<CollectionHandle> {
        let ctx = ChromaErrorContext::operation("chroma.get_or_create_collection")
            .with_collection(name.as_str());
        let body = CreateCollectionRequest {
            name: name.as_str(),
            metadata,
            get_or_create: true,
        };
        let model: CollectionModel = self
            .send(self.http.post(self.endpoints.collections()?).json(&body), ctx)
            .await?;
        model.into_handle()
    }

    /// Insert records into a collection.
    pub async fn add(&self, collection: &CollectionHandle, records: &[DocumentRecord]) -> Result<()> {
        let ctx = ChromaErrorContext::operation("chroma.add").with_collection(collection.name.as_str());
        let url = self.endpoints.collection_action(&collection.id, "add")?;
        let _: IgnoredAny = self
            .send(self.http.post(url).json(&AddRequest::from_records(records)), ctx)
            .await?;
        Ok(())
    }

    /// Read the first `limit` records of a collection.
    pub async fn peek(&self, collection: &CollectionHandle, limit: u32) -> Result<PeekResult> {
        let ctx = ChromaErrorContext::operation("chroma.peek").with_collection(collection.name.as_str());
        let url = self.endpoints.collection_action(&collection.id, "get")?;
        let response: GetResponse = self
            .send(self.http.post(url).json(&GetRequest::peek(limit)), ctx)
            .await?;
        Ok(response.into_peek())
    }

    /// Count records in a collection.
    pub async fn count(&self, collection: &CollectionHandle) -> Result<u64> {
        let ctx = ChromaErrorContext::operation("chroma.count").with_collection(collection.name.as_str());
        let url = self.endpoints.collection_action(&collection.id, "count")?;
        self.send(self.http.get(url), ctx).await
    }
}

impl CollectionPort for AsyncChromaClient {
    fn get_or_create_collection(
        &self,
        name: CollectionName,
        metadata: Option<RecordMetadata>,
    ) -> BoxFuture<'_, Result<CollectionHandle>> {
        Box::pin(async move { Self::get_or_create_collection(self, &name, metadata.as_ref()).await })
    }

    fn max_batch_size(&self) -> BoxFuture<'_, Result<Option<usize>>> {
        Box::pin(Self::max_batch_size(self))
    }

    fn add(
        &self,
        collection: CollectionHandle,
        records: Vec<DocumentRecord>,
    ) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move { Self::add(self, &collection, &records).await })
    }

    fn peek(&self, collection: CollectionHandle, limit: u32) -> BoxFuture<'_, Result<PeekResult>> {
        Box::pin(async move { Self::peek(self, &collection, limit).await })
    }

    fn count(&self, collection: CollectionHandle) -> BoxFuture<'_, Result<u64>> {
        Box::pin(async move { Self::count(self, &collection).await })
    }
}
