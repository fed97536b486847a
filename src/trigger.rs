//! Trigger envelopes
//!
//! A trigger names the objects one ingestion run should read, in order.
//! The JSON form follows the S3 event-notification layout:
//!
//! ```json
//! {"Records": [{"s3": {"bucket": {"name": "input-logs"}, "object": {"key": "logs1.jsonl"}}}]}
//! ```

use crate::error::{Error, Result};
use crate::storage::ObjectRef;
use serde::{Deserialize, Serialize};

/// Ordered list of objects to ingest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerEnvelope {
    /// Objects in processing order
    pub objects: Vec<ObjectRef>,
}

impl TriggerEnvelope {
    /// Create an envelope from object references
    pub fn new(objects: Vec<ObjectRef>) -> Self {
        Self { objects }
    }

    /// Parse an S3 event-notification JSON document
    ///
    /// A document without `Records` is an empty trigger.
    pub fn from_event_json(json: &str) -> Result<Self> {
        let event: S3Event = serde_json::from_str(json)?;
        Ok(event.into())
    }

    /// Parse `bucket/key` shorthand strings
    pub fn from_paths<I, S>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let objects = paths
            .into_iter()
            .map(|path| {
                let path = path.as_ref();
                match path.split_once('/') {
                    Some((bucket, key)) if !bucket.is_empty() && !key.is_empty() => {
                        Ok(ObjectRef::new(bucket, key))
                    }
                    _ => Err(Error::config(format!(
                        "Expected BUCKET/KEY, got '{path}'"
                    ))),
                }
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(objects))
    }

    /// Number of objects named
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the trigger names no objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

// ============================================================================
// S3 Event Shape
// ============================================================================

/// S3 event notification (only the fields ingestion reads)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S3Event {
    /// One record per created object; absent means none
    #[serde(rename = "Records", default)]
    pub records: Vec<S3EventRecord>,
}

/// A single notification record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3EventRecord {
    /// Bucket and object the record refers to
    pub s3: S3Entity,
}

/// The `s3` block of a record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Entity {
    /// Source bucket
    pub bucket: S3Bucket,
    /// Source object
    pub object: S3Object,
}

/// Bucket reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Bucket {
    /// Bucket name
    pub name: String,
}

/// Object reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Object {
    /// Object key, used as given
    pub key: String,
}

impl From<S3Event> for TriggerEnvelope {
    fn from(event: S3Event) -> Self {
        let objects = event
            .records
            .into_iter()
            .map(|record| ObjectRef::new(record.s3.bucket.name, record.s3.object.key))
            .collect();
        Self::new(objects)
    }
}

impl From<&TriggerEnvelope> for S3Event {
    fn from(trigger: &TriggerEnvelope) -> Self {
        let records = trigger
            .objects
            .iter()
            .map(|object| S3EventRecord {
                s3: S3Entity {
                    bucket: S3Bucket {
                        name: object.bucket.clone(),
                    },
                    object: S3Object {
                        key: object.key.clone(),
                    },
                },
            })
            .collect();
        Self { records }
    }
}
