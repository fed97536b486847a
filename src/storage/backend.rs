//! Object store backends opened from URLs (S3, R2, GCS, Azure, memory, local)

use crate::error::{Error, Result};
use object_store::aws::AmazonS3Builder;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::prefix::PrefixStore;
use object_store::ObjectStore;
use std::sync::Arc;
use url::Url;

/// Open an object store from a URL
///
/// Supported formats:
/// - `s3://bucket/path/` - AWS S3
/// - `r2://bucket/path/` - Cloudflare R2 (S3-compatible)
/// - `gs://bucket/path/` - Google Cloud Storage
/// - `az://container/path/` - Azure Blob Storage
/// - `memory://` - process-local, lost on exit
/// - `/local/path/`, `./path/` or `file:///path` - Local filesystem
///
/// A path after the bucket becomes a key prefix. Cloud credentials are read
/// from each backend's usual environment variables.
pub fn open_store(url: &str) -> Result<Arc<dyn ObjectStore>> {
    let Some((scheme, _)) = url.split_once("://") else {
        return open_local(url);
    };

    match scheme {
        "file" => open_local(&url["file://".len()..]),
        "memory" => Ok(Arc::new(InMemory::new())),
        "s3" | "r2" | "gs" | "az" => open_cloud(url),
        other => Err(Error::invalid_url(url, format!("unsupported scheme '{other}'"))),
    }
}

fn open_cloud(raw: &str) -> Result<Arc<dyn ObjectStore>> {
    let parsed = Url::parse(raw).map_err(|e| Error::invalid_url(raw, e.to_string()))?;
    let bucket = parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| Error::invalid_url(raw, "missing bucket name"))?;
    let prefix = parsed.path().trim_matches('/').to_string();

    let client_err = |e: object_store::Error| Error::invalid_url(raw, format!("failed to create client: {e}"));

    let store: Arc<dyn ObjectStore> = match parsed.scheme() {
        "s3" => Arc::new(
            AmazonS3Builder::from_env()
                .with_bucket_name(bucket)
                .build()
                .map_err(client_err)?,
        ),
        "r2" => {
            let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);
            // R2 endpoint: https://<account_id>.r2.cloudflarestorage.com
            if let Ok(endpoint) = std::env::var("R2_ENDPOINT_URL") {
                builder = builder.with_endpoint(endpoint);
            }
            Arc::new(builder.build().map_err(client_err)?)
        }
        "gs" => Arc::new(
            GoogleCloudStorageBuilder::from_env()
                .with_bucket_name(bucket)
                .build()
                .map_err(client_err)?,
        ),
        "az" => Arc::new(
            MicrosoftAzureBuilder::from_env()
                .with_container_name(bucket)
                .build()
                .map_err(client_err)?,
        ),
        other => {
            return Err(Error::invalid_url(raw, format!("unsupported scheme '{other}'")));
        }
    };

    Ok(with_prefix(store, &prefix))
}

fn open_local(path: &str) -> Result<Arc<dyn ObjectStore>> {
    if path.is_empty() {
        return Err(Error::invalid_url(path, "empty local path"));
    }

    std::fs::create_dir_all(path)
        .map_err(|e| Error::invalid_url(path, format!("failed to create directory: {e}")))?;

    let store = LocalFileSystem::new_with_prefix(path)
        .map_err(|e| Error::invalid_url(path, format!("failed to open local store: {e}")))?;
    Ok(Arc::new(store))
}

fn with_prefix(store: Arc<dyn ObjectStore>, prefix: &str) -> Arc<dyn ObjectStore> {
    if prefix.is_empty() {
        store
    } else {
        Arc::new(PrefixStore::new(store, prefix))
    }
}
