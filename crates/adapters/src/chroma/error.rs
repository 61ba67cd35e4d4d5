//! Chroma error mapping helpers.

use jgs_chroma_shared::{ErrorClass, ErrorCode, ErrorEnvelope};
use serde::Deserialize;

/// Context payload attached to Chroma error envelopes.
#[derive(Debug, Clone)]
pub struct ChromaErrorContext {
    /// Operation label for tracing failures.
    pub operation: &'static str,
    /// Collection name, when the request is collection-scoped.
    pub collection_name: Option<String>,
    /// REST endpoint path, when available.
    pub endpoint: Option<String>,
}

impl ChromaErrorContext {
    /// Context for an operation without a collection.
    #[must_use]
    pub const fn operation(operation: &'static str) -> Self {
        Self {
            operation,
            collection_name: None,
            endpoint: None,
        }
    }

    /// Attach the collection name.
    #[must_use]
    pub fn with_collection(mut self, collection: &str) -> Self {
        self.collection_name = Some(collection.to_owned());
        self
    }

    /// Attach the endpoint path.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = Some(endpoint.to_owned());
        self
    }

    fn annotate(&self, mut envelope: ErrorEnvelope) -> ErrorEnvelope {
        envelope = envelope
            .with_metadata("provider", "chroma")
            .with_metadata("operation", self.operation);
        if let Some(collection) = self.collection_name.as_ref() {
            envelope = envelope.with_metadata("collection", collection.to_owned());
        }
        if let Some(endpoint) = self.endpoint.as_ref() {
            envelope = envelope.with_metadata("endpoint", endpoint.to_owned());
        }
        envelope
    }
}

#[derive(Debug, Deserialize)]
struct ChromaErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Maps a non-success HTTP response into a shared envelope.
pub fn map_http_error(http_status: u16, body: &[u8], ctx: &ChromaErrorContext) -> ErrorEnvelope {
    let detail = serde_json::from_slice::<ChromaErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message.or(parsed.error))
        .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_owned());
    let code = code_from_status(http_status);
    let class = class_for(&code);

    ctx.annotate(ErrorEnvelope::unexpected(
        code,
        format!("HTTP {http_status}: {detail}"),
        class,
    ))
    .with_metadata("http_status", http_status.to_string())
}

/// Maps reqwest transport errors into shared error envelopes.
pub fn map_transport_error(error: &reqwest::Error, ctx: &ChromaErrorContext) -> ErrorEnvelope {
    let envelope = if error.is_timeout() {
        ErrorEnvelope::unexpected(
            vdb_timeout_code(),
            format!("Chroma request timed out: {error}"),
            ErrorClass::Retriable,
        )
    } else if error.is_connect() {
        ErrorEnvelope::unexpected(
            vdb_connection_code(),
            format!("Chroma connection failed: {error}"),
            ErrorClass::Retriable,
        )
    } else {
        ErrorEnvelope::unexpected(
            vdb_unknown_code(),
            format!("Chroma request failed: {error}"),
            ErrorClass::NonRetriable,
        )
    };

    ctx.annotate(envelope)
}

/// Maps a body that failed to decode.
pub fn map_decode_error(error: &serde_json::Error, ctx: &ChromaErrorContext) -> ErrorEnvelope {
    ctx.annotate(ErrorEnvelope::unexpected(
        ErrorCode::new("vector", "vdb_invalid_response"),
        format!("invalid Chroma response: {error}"),
        ErrorClass::NonRetriable,
    ))
}

/// Replace the message of a connect-time validation failure, keeping the
/// original as metadata.
pub fn connect_error(error: ErrorEnvelope, message: String) -> ErrorEnvelope {
    let cause = error.message.clone();
    ErrorEnvelope { message, ..error }.with_metadata("cause", cause)
}

/// Decode a response body or map its failure status.
pub fn decode_response<T: for<'de> Deserialize<'de>>(
    http_status: u16,
    body: &[u8],
    ctx: &ChromaErrorContext,
) -> jgs_chroma_shared::Result<T> {
    if !(200..300).contains(&http_status) {
        return Err(map_http_error(http_status, body, ctx));
    }
    serde_json::from_slice(body).map_err(|error| map_decode_error(&error, ctx))
}

fn code_from_status(status: u16) -> ErrorCode {
    match status {
        401 | 403 => vdb_auth_code(),
        404 => ErrorCode::new("vector", "vdb_not_found"),
        408 | 504 => vdb_timeout_code(),
        502 | 503 => vdb_connection_code(),
        _ => vdb_unknown_code(),
    }
}

fn class_for(code: &ErrorCode) -> ErrorClass {
    match code.code() {
        "vdb_timeout" | "vdb_connection" => ErrorClass::Retriable,
        _ => ErrorClass::NonRetriable,
    }
}

fn vdb_timeout_code() -> ErrorCode {
    ErrorCode::new("vector", "vdb_timeout")
}

fn vdb_connection_code() -> ErrorCode {
    ErrorCode::new("vector", "vdb_connection")
}

fn vdb_auth_code() -> ErrorCode {
    ErrorCode::new("vector", "vdb_auth")
}

fn vdb_unknown_code() -> ErrorCode {
    ErrorCode::new("vector", "vdb_unknown")
}
