//! Batch partitioning module
//!
//! Splits source blobs into lines, validates each line and routes the
//! outcome into one of two ordered sequences.
//!
//! # Overview
//!
//! - Blank or whitespace-only lines are skipped and produce nothing
//! - Every other line becomes exactly one [`NormalizedRecord`](crate::validate::NormalizedRecord)
//!   or one [`RejectionRecord`]
//! - Both sequences keep encounter order across blobs and within a blob

mod partitioner;
mod types;

pub use partitioner::{partition, Partitioner};
pub use types::{IngestionBatch, RejectionRecord};
