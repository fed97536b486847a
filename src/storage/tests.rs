//! Tests for storage module

use super::*;
use bytes::Bytes;
use object_store::memory::InMemory;
use std::sync::Arc;

fn memory_storage() -> ObjectStorage {
    ObjectStorage::new()
        .with_bucket("input-logs", Arc::new(InMemory::new()))
        .with_bucket("clean-logs", Arc::new(InMemory::new()))
}

// ============================================================================
// ObjectStorage Tests
// ============================================================================

#[tokio::test]
async fn test_put_then_get() {
    let storage = memory_storage();
    storage
        .put("input-logs", "logs1.jsonl", Bytes::from_static(b"hello"))
        .await
        .unwrap();

    let data = storage.get("input-logs", "logs1.jsonl").await.unwrap();
    assert_eq!(data, Bytes::from_static(b"hello"));
}

#[tokio::test]
async fn test_put_overwrites() {
    let storage = memory_storage();
    storage
        .put("clean-logs", "clean/a.parquet", Bytes::from_static(b"one"))
        .await
        .unwrap();
    storage
        .put("clean-logs", "clean/a.parquet", Bytes::from_static(b"two"))
        .await
        .unwrap();

    let listing = storage.list("clean-logs", "clean/").await.unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(
        storage.get("clean-logs", "clean/a.parquet").await.unwrap(),
        Bytes::from_static(b"two")
    );
}

#[tokio::test]
async fn test_buckets_are_isolated() {
    let storage = memory_storage();
    storage
        .put("input-logs", "k", Bytes::from_static(b"x"))
        .await
        .unwrap();

    let err = storage.get("clean-logs", "k").await.unwrap_err();
    assert!(err.is_storage());
}

#[tokio::test]
async fn test_list_by_prefix() {
    let storage = memory_storage();
    for key in ["clean/a.parquet", "clean/b.parquet", "errors/a.jsonl"] {
        storage
            .put("clean-logs", key, Bytes::from_static(b"x"))
            .await
            .unwrap();
    }

    let mut keys: Vec<String> = storage
        .list("clean-logs", "clean/")
        .await
        .unwrap()
        .into_iter()
        .map(|info| info.key)
        .collect();
    keys.sort();
    assert_eq!(keys, vec!["clean/a.parquet", "clean/b.parquet"]);

    assert!(storage.list("input-logs", "clean/").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_bucket() {
    let storage = memory_storage();
    let err = storage.get("nope", "k").await.unwrap_err();
    assert!(matches!(err, crate::Error::UnknownBucket { ref bucket } if bucket == "nope"));
    assert!(!storage.has_bucket("nope"));
    assert!(storage.has_bucket("input-logs"));
}

#[test]
fn test_missing_object_is_error() {
    let storage = memory_storage();
    let result = tokio_test::block_on(storage.get("input-logs", "missing.jsonl"));
    assert!(matches!(result, Err(crate::Error::Storage(_))));
}

// ============================================================================
// Backend URL Tests
// ============================================================================

#[tokio::test]
async fn test_local_directory_backend() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path().join("clean");
    let url = root.to_str().unwrap().to_string();

    let mut urls = std::collections::BTreeMap::new();
    urls.insert("clean-logs".to_string(), url);
    let storage = ObjectStorage::from_urls(&urls).unwrap();

    storage
        .put("clean-logs", "clean/logs1.parquet", Bytes::from_static(b"pq"))
        .await
        .unwrap();
    assert!(root.join("clean").join("logs1.parquet").exists());

    let listing = storage.list("clean-logs", "clean/").await.unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].size, 2);
}

#[test]
fn test_file_scheme_backend() {
    let temp_dir = tempfile::tempdir().unwrap();
    let url = format!("file://{}", temp_dir.path().display());
    assert!(open_store(&url).is_ok());
}

#[test]
fn test_memory_backend() {
    assert!(open_store("memory://").is_ok());
}

#[test]
fn test_unsupported_scheme() {
    let err = open_store("ftp://host/path").unwrap_err();
    assert!(err.to_string().contains("unsupported scheme 'ftp'"));
}

#[test]
fn test_object_ref_display() {
    let object = ObjectRef::new("input-logs", "2025/09/logs1.jsonl");
    assert_eq!(object.to_string(), "input-logs/2025/09/logs1.jsonl");
}
