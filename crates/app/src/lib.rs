//! # jgs-chroma-app
//!
//! Application use cases for loading documents into Chroma collections.
//! This crate depends on `ports`, `domain`, and `shared`.

pub mod load_document;

pub use load_document::{
    LoadDocumentDeps, LoadDocumentInput, LoadDocumentOutput, line_records, load_document,
};

/// Returns the app crate version.
#[must_use]
pub const fn app_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
