//! # jgs-chroma-domain
//!
//! Domain primitives and value objects for loading documents into Chroma.
//!
//! - **Primitives** - `CollectionName`, `DocumentId`
//! - **Documents** - `LineDocument` and line splitting
//!
//! ## Dependency Rules
//!
//! - Depends only on `shared` crate
//! - No infrastructure or adapter dependencies
//! - Pure domain logic with no I/O

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

// Re-export shared types for convenience
pub use jgs_chroma_shared::shared_crate_version;

// =============================================================================
// DOMAIN MODULES
// =============================================================================

pub mod document;
pub mod primitives;

pub use document::{LineDocument, split_lines};
pub use primitives::{CollectionName, DocumentId, PrimitiveError};

/// Returns the domain crate version.
#[must_use]
pub const fn domain_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// =============================================================================
// TESTS
// =============================================================================
