//! Chroma v2 REST payloads.

use jgs_chroma_domain::CollectionName;
use jgs_chroma_ports::{
    CollectionHandle, DocumentRecord, PeekResult, RecordMetadata, StoredRecord,
};
use jgs_chroma_shared::{ErrorClass, ErrorCode, ErrorEnvelope, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(crate) struct HeartbeatResponse {
    #[serde(rename = "nanosecond heartbeat")]
    pub nanosecond_heartbeat: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PreflightResponse {
    pub max_batch_size: Option<i64>,
}

impl PreflightResponse {
    /// Non-positive or missing limits mean "no limit".
    pub fn limit(&self) -> Option<usize> {
        self.max_batch_size
            .filter(|size| *size > 0)
            .and_then(|size| usize::try_from(size).ok())
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateCollectionRequest<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<&'a RecordMetadata>,
    pub get_or_create: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CollectionModel {
    pub id: String,
    pub name: String,
}

impl CollectionModel {
    pub fn into_handle(self) -> Result<CollectionHandle> {
        let name = CollectionName::parse(&self.name).map_err(|error| {
            ErrorEnvelope::unexpected(
                ErrorCode::new("vector", "vdb_invalid_response"),
                format!("Chroma returned an invalid collection name: {error}"),
                ErrorClass::NonRetriable,
            )
        })?;
        Ok(CollectionHandle {
            id: self.id.into_boxed_str(),
            name,
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AddRequest<'a> {
    pub ids: Vec<&'a str>,
    pub documents: Vec<&'a str>,
    pub metadatas: Vec<&'a RecordMetadata>,
}

impl<'a> AddRequest<'a> {
    pub fn from_records(records: &'a [DocumentRecord]) -> Self {
        Self {
            ids: records.iter().map(|record| record.id.as_str()).collect(),
            documents: records.iter().map(|record| record.document.as_ref()).collect(),
            metadatas: records.iter().map(|record| &record.metadata).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct GetRequest {
    pub limit: u32,
    pub include: [&'static str; 2],
}

impl GetRequest {
    pub const fn peek(limit: u32) -> Self {
        Self {
            limit,
            include: ["documents", "metadatas"],
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GetResponse {
    pub ids: Vec<String>,
    #[serde(default)]
    pub documents: Option<Vec<Option<String>>>,
    #[serde(default)]
    pub metadatas: Option<Vec<Option<RecordMetadata>>>,
}

impl GetResponse {
    pub fn into_peek(self) -> PeekResult {
        let mut documents = self.documents.unwrap_or_default().into_iter();
        let mut metadatas = self.metadatas.unwrap_or_default().into_iter();
        let records = self
            .ids
            .into_iter()
            .map(|id| StoredRecord {
                id: id.into_boxed_str(),
                document: documents.next().flatten().map(String::into_boxed_str),
                metadata: metadatas.next().flatten(),
            })
            .collect();
        PeekResult { records }
    }
}
