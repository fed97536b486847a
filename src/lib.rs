// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # log-ingest
//!
//! Validates line-delimited JSON logs read from object storage and splits
//! them into a clean Parquet artifact and a JSONL error journal. A small
//! query reports today's login count from the newest clean artifact.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use log_ingest::ingest::{Destinations, Orchestrator};
//! use log_ingest::storage::ObjectStorage;
//! use log_ingest::trigger::TriggerEnvelope;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> log_ingest::Result<()> {
//!     let storage = Arc::new(
//!         ObjectStorage::new()
//!             .with_bucket("input-logs", log_ingest::storage::open_store("s3://input-logs")?)
//!             .with_bucket("clean-logs", log_ingest::storage::open_store("./data/clean")?)
//!             .with_bucket("error-logs", log_ingest::storage::open_store("./data/errors")?),
//!     );
//!
//!     let trigger = TriggerEnvelope::from_paths(["input-logs/logs1.jsonl"])?;
//!     let summary = Orchestrator::new(storage, Destinations::new("clean-logs", "error-logs"))
//!         .run(&trigger)
//!         .await?;
//!     println!("{summary:?}");
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//!  trigger ──► Orchestrator ──► BlobStorage::get ──► lines
//!                                                     │
//!                                  validate (per line)│
//!                                                     ▼
//!                        Partitioner ──► valid ──► Parquet ──► clean/<base>.parquet
//!                                   └──► rejected ──► JSONL ──► errors/<base>.jsonl
//!
//!  LoginQuery ──► latest clean/*.parquet ──► count(today, action = "login")
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Per-line validation and normalization
pub mod validate;

/// Splitting blobs into valid and rejected lines
pub mod partition;

/// Parquet and JSONL serialization
pub mod output;

/// Blob storage collaborator
pub mod storage;

/// Trigger envelopes
pub mod trigger;

/// Ingestion orchestrator
pub mod ingest;

/// Login aggregate query
pub mod query;

/// Pipeline configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use ingest::{Destinations, IngestSummary, Orchestrator};
pub use query::{LoginCount, LoginQuery};
pub use trigger::TriggerEnvelope;
pub use validate::{validate, NormalizedRecord, RejectionReason};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
