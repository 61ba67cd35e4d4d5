//! Chroma v2 REST adapters (async and blocking).

mod blocking;
mod client;
mod endpoints;
mod error;
mod options;
mod wire;

pub use blocking::ChromaClient;
pub use client::AsyncChromaClient;
pub use endpoints::{ChromaEndpoints, chroma_base_url};
pub use error::{ChromaErrorContext, map_http_error};
pub use options::{ChromaClientOptions, DEFAULT_DATABASE, DEFAULT_TENANT, DEFAULT_TIMEOUT_MS};
