//! Storage types and traits

use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A bucket + key reference to one stored object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
    /// Bucket name
    pub bucket: String,
    /// Object key within the bucket
    pub key: String,
}

impl ObjectRef {
    /// Create a new object reference
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

/// Listing entry for a stored object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    /// Object key within the bucket
    pub key: String,
    /// Last modification time reported by the backend
    pub last_modified: DateTime<Utc>,
    /// Size in bytes
    pub size: usize,
}

/// Byte-blob storage addressed by bucket and key
#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// Fetch an object's bytes
    async fn get(&self, bucket: &str, key: &str) -> Result<Bytes>;

    /// Write an object, replacing any existing one with the same key
    async fn put(&self, bucket: &str, key: &str, data: Bytes) -> Result<()>;

    /// List objects whose key starts with `prefix`
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectInfo>>;
}
