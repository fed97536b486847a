//! Storage module
//!
//! The blob storage collaborator: `get`, `put` and `list` keyed by
//! bucket and object key.
//!
//! # Overview
//!
//! - [`BlobStorage`] is the seam the orchestrator and query depend on
//! - [`ObjectStorage`] implements it over named `object_store` backends
//! - [`open_store`] builds a backend from a URL (S3, R2, GCS, Azure,
//!   in-memory or local filesystem)

mod backend;
mod object;
mod types;

pub use backend::open_store;
pub use object::ObjectStorage;
pub use types::{BlobStorage, ObjectInfo, ObjectRef};

#[cfg(test)]
mod tests;
