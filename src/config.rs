//! Pipeline configuration
//!
//! Loaded from YAML. Every field has a default, so an empty document is a
//! valid (if storage-less) configuration.
//!
//! ```yaml
//! clean_bucket: clean-logs
//! error_bucket: error-logs
//! buckets:
//!   input-logs: s3://input-logs
//!   clean-logs: ./data/clean-logs
//!   error-logs: ./data/error-logs
//! parquet:
//!   compression: zstd
//! server:
//!   port: 8080
//! ```

use crate::error::{Error, Result, ResultExt};
use crate::ingest::Destinations;
use crate::output::ParquetWriterConfig;
use crate::storage::ObjectStorage;
use crate::types::ParquetCompression;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Bucket receiving clean Parquet artifacts
    #[serde(default = "default_clean_bucket")]
    pub clean_bucket: String,

    /// Bucket receiving JSONL error journals
    #[serde(default = "default_error_bucket")]
    pub error_bucket: String,

    /// Bucket name -> storage URL
    #[serde(default)]
    pub buckets: BTreeMap<String, String>,

    /// Parquet encoding options
    #[serde(default)]
    pub parquet: ParquetSettings,

    /// HTTP server options
    #[serde(default)]
    pub server: ServerSettings,
}

fn default_clean_bucket() -> String {
    "clean-logs".to_string()
}

fn default_error_bucket() -> String {
    "error-logs".to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            clean_bucket: default_clean_bucket(),
            error_bucket: default_error_bucket(),
            buckets: BTreeMap::new(),
            parquet: ParquetSettings::default(),
            server: ServerSettings::default(),
        }
    }
}

// ============================================================================
// Sections
// ============================================================================

/// Parquet encoding options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParquetSettings {
    /// Compression codec
    #[serde(default)]
    pub compression: ParquetCompression,

    /// Maximum rows per row group
    #[serde(default)]
    pub row_group_size: Option<usize>,

    /// Dictionary-encode columns
    #[serde(default = "default_true")]
    pub dictionary: bool,

    /// Write column statistics
    #[serde(default = "default_true")]
    pub statistics: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ParquetSettings {
    fn default() -> Self {
        Self {
            compression: ParquetCompression::default(),
            row_group_size: None,
            dictionary: true,
            statistics: true,
        }
    }
}

impl ParquetSettings {
    /// Build the writer configuration
    pub fn writer_config(&self) -> ParquetWriterConfig {
        let config = ParquetWriterConfig::from(self.compression)
            .with_dictionary(self.dictionary)
            .with_statistics(self.statistics);
        match self.row_group_size {
            Some(size) => config.with_row_group_size(size),
            None => config,
        }
    }
}

/// HTTP server options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSettings {
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

impl PipelineConfig {
    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_yaml(&contents)
    }

    /// Check that destinations are named and backed by storage
    pub fn validate(&self) -> Result<()> {
        if self.clean_bucket.trim().is_empty() {
            return Err(Error::missing_field("clean_bucket"));
        }
        if self.error_bucket.trim().is_empty() {
            return Err(Error::missing_field("error_bucket"));
        }
        for bucket in [&self.clean_bucket, &self.error_bucket] {
            if !self.buckets.contains_key(bucket) {
                return Err(Error::config(format!(
                    "No storage URL configured for destination bucket '{bucket}'"
                )));
            }
        }
        Ok(())
    }

    /// Destination pair for the orchestrator
    pub fn destinations(&self) -> Destinations {
        Destinations::new(&self.clean_bucket, &self.error_bucket)
    }

    /// Open every configured bucket
    pub fn open_storage(&self) -> Result<ObjectStorage> {
        ObjectStorage::from_urls(&self.buckets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = PipelineConfig::from_yaml("{}").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.clean_bucket, "clean-logs");
        assert_eq!(config.error_bucket, "error-logs");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.parquet.compression, ParquetCompression::Snappy);
        assert!(config.parquet.dictionary);
        assert!(config.parquet.statistics);
    }

    #[test]
    fn test_full_document() {
        let yaml = r"
clean_bucket: curated
error_bucket: rejects
buckets:
  raw: memory://
  curated: memory://
  rejects: memory://
parquet:
  compression: zstd
  row_group_size: 5000
  dictionary: false
  statistics: false
server:
  port: 9000
";
        let config = PipelineConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.destinations(), Destinations::new("curated", "rejects"));
        assert_eq!(config.buckets.len(), 3);
        assert_eq!(config.server.port, 9000);
        let writer = config.parquet.writer_config();
        assert_eq!(writer.row_group_size(), 5000);
        assert!(!writer.dictionary_enabled());
        assert!(!writer.statistics_enabled());
        config.validate().unwrap();

        let storage = config.open_storage().unwrap();
        assert!(storage.has_bucket("raw"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = PipelineConfig::from_yaml("clean_bukcet: oops");
        assert!(matches!(result, Err(Error::YamlParse(_))));
    }

    #[test]
    fn test_validate_requires_destination_storage() {
        let config = PipelineConfig::default();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("'clean-logs'"));

        let mut config = PipelineConfig::default();
        config.error_bucket = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(Error::MissingConfigField { .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.yaml");
        std::fs::write(&path, "error_bucket: rejects\n").unwrap();

        let config = PipelineConfig::load(&path).unwrap();
        assert_eq!(config.error_bucket, "rejects");

        let missing = PipelineConfig::load(dir.path().join("nope.yaml"));
        assert!(missing.unwrap_err().to_string().contains("Failed to read config"));
    }
}
