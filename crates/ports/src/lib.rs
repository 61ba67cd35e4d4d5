//! # jgs-chroma-ports
//!
//! Port traits for the jgs-chroma hexagonal architecture.
//!
//! This crate defines the interfaces between the domain and infrastructure
//! layers. It depends only on `domain` and `shared`.

use std::future::Future;
use std::pin::Pin;

/// Boxed future used by port traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Returns the ports crate version.
#[must_use]
pub const fn ports_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub mod collection;

pub use collection::*;

// Re-export domain types used in port signatures so adapters can implement
// ports without depending on `jgs-chroma-domain` directly.
pub use jgs_chroma_domain::{CollectionName, DocumentId};
