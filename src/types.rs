//! Common types used throughout log-ingest
//!
//! Shared type aliases and small serde enums referenced by configuration
//! and output code.

use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type, preserving key order
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Parquet Compression
// ============================================================================

/// Compression codec for clean artifacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParquetCompression {
    /// Snappy (default)
    #[default]
    Snappy,
    /// Zstandard
    Zstd,
    /// Gzip
    Gzip,
    /// No compression
    None,
}

impl From<ParquetCompression> for Compression {
    fn from(codec: ParquetCompression) -> Self {
        match codec {
            ParquetCompression::Snappy => Compression::SNAPPY,
            ParquetCompression::Zstd => Compression::ZSTD(ZstdLevel::default()),
            ParquetCompression::Gzip => Compression::GZIP(GzipLevel::default()),
            ParquetCompression::None => Compression::UNCOMPRESSED,
        }
    }
}
