//! Load a line-oriented document into a collection.

use jgs_chroma_domain::{CollectionName, DocumentId, LineDocument, split_lines};
use jgs_chroma_ports::{
    CollectionHandle, CollectionPort, DocumentRecord, PeekResult, RecordMetadata,
};
use jgs_chroma_shared::Result;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// Input payload for loading a document.
#[derive(Debug, Clone)]
pub struct LoadDocumentInput {
    /// Target collection (created when missing).
    pub collection_name: CollectionName,
    /// Full document text.
    pub contents: String,
    /// Number of records to read back after loading.
    pub peek_limit: u32,
}

/// Dependencies required by load-document.
#[derive(Clone)]
pub struct LoadDocumentDeps {
    /// Collection storage.
    pub collection: Arc<dyn CollectionPort>,
}

/// Result of a load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadDocumentOutput {
    /// Collection the records went into.
    pub collection: CollectionHandle,
    /// Records inserted.
    pub inserted: usize,
    /// `add` requests sent.
    pub batches: usize,
    /// First records of the collection after loading.
    pub peek: PeekResult,
}

/// One record per line: random id, the line text, and `{"line": index}`.
#[must_use]
pub fn line_records(lines: Vec<LineDocument>) -> Vec<DocumentRecord> {
    lines
        .into_iter()
        .map(|line| DocumentRecord {
            id: DocumentId::random(),
            document: line.text,
            metadata: RecordMetadata::from([("line".to_owned(), Value::from(line.index))]),
        })
        .collect()
}

/// Insert every line of the document, then peek at the collection.
#[tracing::instrument(
    name = "load_document",
    skip_all,
    fields(collection = %input.collection_name)
)]
pub async fn load_document(
    deps: &LoadDocumentDeps,
    input: LoadDocumentInput,
) -> Result<LoadDocumentOutput> {
    let started_at = Instant::now();
    let collection = deps
        .collection
        .get_or_create_collection(input.collection_name.clone(), None)
        .await?;
    tracing::info!(
        event = "loader.collection_ready",
        collection_id = %collection.id,
        "collection ready"
    );

    let records = line_records(split_lines(&input.contents));
    let inserted = records.len();
    let mut batches = 0;

    if records.is_empty() {
        tracing::warn!(
            event = "loader.empty_document",
            "document has no lines; nothing to insert"
        );
    } else {
        let batch_size = deps
            .collection
            .max_batch_size()
            .await?
            .unwrap_or(inserted)
            .max(1);

        let mut remaining = records;
        while !remaining.is_empty() {
            let rest = remaining.split_off(batch_size.min(remaining.len()));
            let batch_len = remaining.len();
            deps.collection.add(collection.clone(), remaining).await?;
            batches += 1;
            tracing::info!(
                event = "loader.batch_inserted",
                batch = batches,
                records = batch_len,
                "batch inserted"
            );
            remaining = rest;
        }
    }

    let peek = deps
        .collection
        .peek(collection.clone(), input.peek_limit)
        .await?;

    tracing::info!(
        event = "loader.completed",
        inserted,
        batches,
        duration_ms = duration_ms(started_at),
        "document loaded"
    );

    Ok(LoadDocumentOutput {
        collection,
        inserted,
        batches,
        peek,
    })
}

fn duration_ms(started_at: Instant) -> u64 {
    u64::try_from(started_at.elapsed().as_millis()).unwrap_or(u64::MAX)
}
