//! Error types for log-ingest
//!
//! Fatal errors abort an ingestion run or a query and propagate to the caller.
//! Per-line validation failures are not errors; see
//! [`RejectionReason`](crate::validate::RejectionReason).

use thiserror::Error;

/// The main error type for log-ingest
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    /// Invalid or inconsistent configuration
    #[error("Configuration error: {message}")]
    Config {
        /// What is wrong
        message: String,
    },

    /// A required configuration field is empty
    #[error("Missing required config field: {field}")]
    MissingConfigField {
        /// Field name
        field: String,
    },

    /// YAML configuration did not parse
    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// JSON encoding or decoding failed
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Storage Errors
    // ============================================================================
    /// Object store operation failed
    #[error("Storage error: {0}")]
    Storage(#[from] object_store::Error),

    /// No store registered under the bucket name
    #[error("No storage configured for bucket '{bucket}'")]
    UnknownBucket {
        /// Requested bucket
        bucket: String,
    },

    /// A bucket URL could not be opened
    #[error("Invalid storage URL '{url}': {message}")]
    InvalidStorageUrl {
        /// The URL as configured
        url: String,
        /// Why it was rejected
        message: String,
    },

    // ============================================================================
    // Decoding Errors
    // ============================================================================
    /// A source object is not UTF-8 text
    #[error("Object '{key}' is not valid UTF-8: {source}")]
    Decode {
        /// Source object key
        key: String,
        /// Underlying decode error
        #[source]
        source: std::string::FromUtf8Error,
    },

    // ============================================================================
    // Arrow/Parquet Errors
    // ============================================================================
    /// Arrow array construction or cast failed
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Parquet encoding or decoding failed
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Artifact serialization failed
    #[error("Output error: {message}")]
    Output {
        /// What failed
        message: String,
    },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    /// Local I/O failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    /// Anything else
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an unknown bucket error
    pub fn unknown_bucket(bucket: impl Into<String>) -> Self {
        Self::UnknownBucket {
            bucket: bucket.into(),
        }
    }

    /// Create an invalid storage URL error
    pub fn invalid_url(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidStorageUrl {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Whether the error came from the storage collaborator
    pub fn is_storage(&self) -> bool {
        matches!(self, Error::Storage(_) | Error::UnknownBucket { .. })
    }
}

/// Result type alias for log-ingest
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
