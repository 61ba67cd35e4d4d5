//! # jgs-chroma-infra
//!
//! Composition root: turns environment snapshots into Chroma clients and
//! wires the cloud document loader.
//! This crate depends on `app`, `adapters`, `config`, and `shared`.

/// Client construction from env plus overrides.
pub mod client_factory;
/// Cloud document loader.
pub mod loader;

pub use client_factory::{
    EffectiveConnection, ResolutionMode, client_options, effective_connection,
    effective_connection_json, get_async_client, get_client, resolve_cloud_descriptor,
    resolve_descriptor,
};
pub use jgs_chroma_app::LoadDocumentOutput;
pub use loader::{DEFAULT_DOCUMENT_PATH, run_cloud_load};

/// Infra-level error type (shared error envelope).
pub type InfraError = jgs_chroma_shared::ErrorEnvelope;

/// Infra-level result type.
pub type InfraResult<T> = Result<T, InfraError>;

/// Returns the infra crate version.
#[must_use]
pub const fn infra_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
