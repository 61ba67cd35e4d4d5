//! Cloud-mode document loader wiring.

use crate::InfraResult;
use crate::client_factory::{client_options, resolve_cloud_descriptor};
use jgs_chroma_adapters::chroma::AsyncChromaClient;
use jgs_chroma_app::{LoadDocumentDeps, LoadDocumentInput, LoadDocumentOutput, load_document};
use jgs_chroma_domain::CollectionName;
use jgs_chroma_ports::DEFAULT_PEEK_LIMIT;
use jgs_chroma_shared::{ErrorCode, ErrorEnvelope};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// File read by the loader when no path is given.
pub const DEFAULT_DOCUMENT_PATH: &str = "jgs_doc.txt";

/// Load a text file into the cloud collection named after the database.
///
/// Credentials are checked before the file is read or any request is sent.
#[tracing::instrument(name = "cloud_load", skip_all, fields(path = %path.display()))]
pub async fn run_cloud_load(
    env: &BTreeMap<String, String>,
    path: &Path,
) -> InfraResult<LoadDocumentOutput> {
    let descriptor = resolve_cloud_descriptor(env)?;
    let collection_name =
        CollectionName::parse(descriptor.database.as_ref()).map_err(ErrorEnvelope::from)?;
    let contents = read_document(path).await?;

    let client = AsyncChromaClient::connect(client_options(&descriptor)).await?;
    let deps = LoadDocumentDeps {
        collection: Arc::new(client),
    };
    load_document(
        &deps,
        LoadDocumentInput {
            collection_name,
            contents,
            peek_limit: DEFAULT_PEEK_LIMIT,
        },
    )
    .await
}

async fn read_document(path: &Path) -> InfraResult<String> {
    tokio::fs::read_to_string(path).await.map_err(|error| {
        let code = if error.kind() == std::io::ErrorKind::NotFound {
            ErrorCode::not_found()
        } else {
            ErrorCode::io()
        };
        ErrorEnvelope::expected(code, format!("failed to read document: {error}"))
            .with_metadata("path", path.display().to_string())
    })
}
