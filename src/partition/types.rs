//! Partition output types

use crate::validate::{NormalizedRecord, RejectionReason};
use serde::{Deserialize, Serialize};

/// A line that failed validation
///
/// Serializes as `{"raw": .., "error": .., "source_key": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionRecord {
    /// The line exactly as read from the source blob
    pub raw: String,
    /// Why the line was rejected
    pub error: RejectionReason,
    /// Key of the blob the line came from
    pub source_key: String,
}

impl RejectionRecord {
    /// Create a new rejection record
    pub fn new(raw: impl Into<String>, error: RejectionReason, source_key: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            error,
            source_key: source_key.into(),
        }
    }
}

/// Valid and rejected lines from one ingestion run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestionBatch {
    /// Records that passed validation, in encounter order
    pub valid: Vec<NormalizedRecord>,
    /// Rejected lines, in encounter order
    pub rejected: Vec<RejectionRecord>,
}

impl IngestionBatch {
    /// Total number of classified lines
    pub fn processed(&self) -> usize {
        self.valid.len() + self.rejected.len()
    }

    /// Whether no line was classified
    pub fn is_empty(&self) -> bool {
        self.valid.is_empty() && self.rejected.is_empty()
    }
}
