//! `object_store`-backed storage

use super::types::{BlobStorage, ObjectInfo};
use super::backend::open_store;
use crate::error::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use futures::TryStreamExt;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Registry of bucket name -> object store
#[derive(Clone, Default)]
pub struct ObjectStorage {
    buckets: HashMap<String, Arc<dyn ObjectStore>>,
}

impl fmt::Debug for ObjectStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.buckets.keys().collect();
        names.sort();
        f.debug_struct("ObjectStorage").field("buckets", &names).finish()
    }
}

impl ObjectStorage {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a store under a bucket name
    #[must_use]
    pub fn with_bucket(mut self, name: impl Into<String>, store: Arc<dyn ObjectStore>) -> Self {
        self.insert(name, store);
        self
    }

    /// Register a store under a bucket name
    pub fn insert(&mut self, name: impl Into<String>, store: Arc<dyn ObjectStore>) {
        self.buckets.insert(name.into(), store);
    }

    /// Build a registry from bucket name -> storage URL pairs
    pub fn from_urls<'a, I>(urls: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut storage = Self::new();
        for (bucket, url) in urls {
            tracing::debug!(bucket = %bucket, url = %url, "Opening bucket");
            storage.insert(bucket.clone(), open_store(url)?);
        }
        Ok(storage)
    }

    /// Whether a bucket is registered
    pub fn has_bucket(&self, name: &str) -> bool {
        self.buckets.contains_key(name)
    }

    fn store(&self, bucket: &str) -> Result<&Arc<dyn ObjectStore>> {
        self.buckets
            .get(bucket)
            .ok_or_else(|| Error::unknown_bucket(bucket))
    }
}

#[async_trait]
impl BlobStorage for ObjectStorage {
    async fn get(&self, bucket: &str, key: &str) -> Result<Bytes> {
        let store = self.store(bucket)?;
        let data = store.get(&ObjectPath::from(key)).await?.bytes().await?;
        Ok(data)
    }

    async fn put(&self, bucket: &str, key: &str, data: Bytes) -> Result<()> {
        let store = self.store(bucket)?;
        store.put(&ObjectPath::from(key), data.into()).await?;
        Ok(())
    }

    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectInfo>> {
        let store = self.store(bucket)?;
        let prefix_path = (!prefix.is_empty()).then(|| ObjectPath::from(prefix));
        let listing: Vec<_> = store.list(prefix_path.as_ref()).try_collect().await?;

        Ok(listing
            .into_iter()
            .map(|meta| ObjectInfo {
                key: meta.location.to_string(),
                last_modified: meta.last_modified,
                size: meta.size,
            })
            .collect())
    }
}
