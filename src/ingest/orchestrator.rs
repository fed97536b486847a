//! Ingestion orchestrator

use crate::error::{Error, Result};
use crate::output::{serialize_clean, serialize_errors, ParquetWriterConfig};
use crate::partition::Partitioner;
use crate::storage::BlobStorage;
use crate::trigger::TriggerEnvelope;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Key prefix for clean artifacts
pub const CLEAN_PREFIX: &str = "clean/";

/// Key prefix for error artifacts
pub const ERROR_PREFIX: &str = "errors/";

/// Buckets receiving the two artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destinations {
    /// Bucket for Parquet artifacts
    pub clean_bucket: String,
    /// Bucket for JSONL error journals
    pub error_bucket: String,
}

impl Destinations {
    /// Create a destination pair
    pub fn new(clean_bucket: impl Into<String>, error_bucket: impl Into<String>) -> Self {
        Self {
            clean_bucket: clean_bucket.into(),
            error_bucket: error_bucket.into(),
        }
    }
}

/// Line counts from one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestSummary {
    /// Lines classified (valid + errors)
    pub processed: usize,
    /// Lines that became clean records
    pub valid: usize,
    /// Lines that were rejected
    pub errors: usize,
}

/// File name of `key` without directory or extension
///
/// Leading dots do not start an extension, so `.hidden` stays `.hidden`.
pub fn base_name(key: &str) -> &str {
    let file = key.rsplit('/').next().unwrap_or(key);
    let leading_dots = file.len() - file.trim_start_matches('.').len();

    match file[leading_dots..].rfind('.') {
        Some(idx) => &file[..leading_dots + idx],
        None => file,
    }
}

/// Key of the clean artifact derived from a source key
pub fn clean_artifact_key(source_key: &str) -> String {
    format!("{CLEAN_PREFIX}{}.parquet", base_name(source_key))
}

/// Key of the error artifact derived from a source key
pub fn error_artifact_key(source_key: &str) -> String {
    format!("{ERROR_PREFIX}{}.jsonl", base_name(source_key))
}

/// Runs ingestion against a storage backend
#[derive(Clone)]
pub struct Orchestrator {
    storage: Arc<dyn BlobStorage>,
    destinations: Destinations,
    parquet: ParquetWriterConfig,
}

impl Orchestrator {
    /// Create an orchestrator writing to the given destinations
    pub fn new(storage: Arc<dyn BlobStorage>, destinations: Destinations) -> Self {
        Self {
            storage,
            destinations,
            parquet: ParquetWriterConfig::default(),
        }
    }

    /// Set the Parquet encoding used for clean artifacts
    #[must_use]
    pub fn with_parquet_config(mut self, config: ParquetWriterConfig) -> Self {
        self.parquet = config;
        self
    }

    /// Configured destinations
    pub fn destinations(&self) -> &Destinations {
        &self.destinations
    }

    /// Ingest every object the trigger names
    ///
    /// Fetch, decode and write failures abort the run. The two artifact
    /// writes are independent: if the error write fails, an already written
    /// clean artifact stays in place.
    pub async fn run(&self, trigger: &TriggerEnvelope) -> Result<IngestSummary> {
        let Some(last) = trigger.objects.last() else {
            tracing::warn!("No source objects to process");
            return Ok(IngestSummary::default());
        };

        let mut partitioner = Partitioner::new();
        for object in &trigger.objects {
            let data = self.storage.get(&object.bucket, &object.key).await?;
            let text = String::from_utf8(data.to_vec()).map_err(|source| Error::Decode {
                key: object.key.clone(),
                source,
            })?;

            let before = partitioner.processed();
            partitioner.push_blob(&object.key, &text);
            tracing::debug!(
                object = %object,
                lines = partitioner.processed() - before,
                "Partitioned source object"
            );
        }
        let batch = partitioner.finish();

        if let Some(data) = serialize_clean(&batch.valid, &self.parquet)? {
            let key = clean_artifact_key(&last.key);
            self.storage
                .put(&self.destinations.clean_bucket, &key, data)
                .await?;
            tracing::debug!(bucket = %self.destinations.clean_bucket, key = %key, "Wrote clean artifact");
        }

        if let Some(data) = serialize_errors(&batch.rejected)? {
            let key = error_artifact_key(&last.key);
            self.storage
                .put(&self.destinations.error_bucket, &key, data)
                .await?;
            tracing::debug!(bucket = %self.destinations.error_bucket, key = %key, "Wrote error artifact");
        }

        let summary = IngestSummary {
            processed: batch.processed(),
            valid: batch.valid.len(),
            errors: batch.rejected.len(),
        };
        tracing::info!(
            processed = summary.processed,
            valid = summary.valid,
            errors = summary.errors,
            "Ingestion run complete"
        );
        Ok(summary)
    }
}
