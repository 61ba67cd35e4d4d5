//! Document collection boundary contract.

use crate::BoxFuture;
use jgs_chroma_domain::{CollectionName, DocumentId};
use jgs_chroma_shared::Result;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Number of records returned by `peek` when callers do not choose.
pub const DEFAULT_PEEK_LIMIT: u32 = 10;

/// Per-record metadata, as accepted by Chroma.
pub type RecordMetadata = BTreeMap<String, Value>;

/// Server-side handle for a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionHandle {
    /// Server-assigned collection identifier.
    pub id: Box<str>,
    /// Collection name.
    pub name: CollectionName,
}

/// A document record to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRecord {
    /// Record identifier.
    pub id: DocumentId,
    /// Document text.
    pub document: Box<str>,
    /// Metadata stored next to the document.
    pub metadata: RecordMetadata,
}

/// A record read back from a collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredRecord {
    /// Record identifier.
    pub id: Box<str>,
    /// Document text, when stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<Box<str>>,
    /// Metadata, when stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RecordMetadata>,
}

/// First records of a collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PeekResult {
    /// Records in server order.
    pub records: Vec<StoredRecord>,
}

impl PeekResult {
    /// Number of records returned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the peek returned nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Boundary contract for collection storage.
pub trait CollectionPort: Send + Sync {
    /// Return the named collection, creating it when missing.
    fn get_or_create_collection(
        &self,
        name: CollectionName,
        metadata: Option<RecordMetadata>,
    ) -> BoxFuture<'_, Result<CollectionHandle>>;

    /// Largest number of records accepted by a single `add`; `None` when the
    /// server reports no limit.
    fn max_batch_size(&self) -> BoxFuture<'_, Result<Option<usize>>>;

    /// Insert records into a collection.
    fn add(
        &self,
        collection: CollectionHandle,
        records: Vec<DocumentRecord>,
    ) -> BoxFuture<'_, Result<()>>;

    /// Read the first `limit` records of a collection.
    fn peek(&self, collection: CollectionHandle, limit: u32) -> BoxFuture<'_, Result<PeekResult>>;

    /// Count records in a collection.
    fn count(&self, collection: CollectionHandle) -> BoxFuture<'_, Result<u64>>;
}
