//! Daily login count over the latest clean artifact

use crate::error::{Error, Result};
use crate::ingest::CLEAN_PREFIX;
use crate::output::read_parquet;
use crate::storage::{BlobStorage, ObjectInfo};
use arrow::array::{Array, ArrayRef, StringArray};
use arrow::compute::{can_cast_types, cast};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Action value counted as a login
pub const LOGIN_ACTION: &str = "login";

/// Query response body
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCount {
    /// Login records dated today
    pub logins_today: u64,
}

/// Login counter over a clean bucket
#[derive(Clone)]
pub struct LoginQuery {
    storage: Arc<dyn BlobStorage>,
    bucket: String,
}

impl LoginQuery {
    /// Create a query reading clean artifacts from `bucket`
    pub fn new(storage: Arc<dyn BlobStorage>, bucket: impl Into<String>) -> Self {
        Self {
            storage,
            bucket: bucket.into(),
        }
    }

    /// Count logins dated today in the process's local time zone
    pub async fn logins_today(&self) -> Result<LoginCount> {
        self.logins_on(Local::now().date_naive()).await
    }

    /// Count logins dated `date` in the latest clean artifact
    ///
    /// No artifact at all yields zero.
    pub async fn logins_on(&self, date: NaiveDate) -> Result<LoginCount> {
        let Some(latest) = self.latest_artifact().await? else {
            tracing::debug!(bucket = %self.bucket, "No clean artifacts found");
            return Ok(LoginCount::default());
        };

        let data = self.storage.get(&self.bucket, &latest.key).await?;
        let batches = read_parquet(data)?;
        let logins_today = count_logins(&batches, date)?;

        tracing::debug!(key = %latest.key, %date, logins_today, "Counted logins");
        Ok(LoginCount { logins_today })
    }

    /// The clean artifact with the newest modification time
    ///
    /// Only objects directly under `clean/` count. Ties go to the greatest
    /// key so the choice is stable.
    pub async fn latest_artifact(&self) -> Result<Option<ObjectInfo>> {
        let listing = self.storage.list(&self.bucket, CLEAN_PREFIX).await?;
        Ok(listing
            .into_iter()
            .filter(|info| is_top_level_artifact(&info.key))
            .max_by(|a, b| {
                a.last_modified
                    .cmp(&b.last_modified)
                    .then_with(|| a.key.cmp(&b.key))
            }))
    }
}

/// Count rows whose `timestamp` starts with `date` and whose `action` is `login`
///
/// A batch without either column, or whose column has no string rendering
/// (e.g. a struct of nested objects), contributes nothing.
pub fn count_logins(batches: &[RecordBatch], date: NaiveDate) -> Result<u64> {
    let day = date.format("%Y-%m-%d").to_string();
    let mut count = 0;

    for batch in batches {
        let (Some(timestamps), Some(actions)) = (
            string_column(batch, "timestamp")?,
            string_column(batch, "action")?,
        ) else {
            continue;
        };

        let timestamps = as_strings(timestamps.as_ref())?;
        let actions = as_strings(actions.as_ref())?;

        count += (0..batch.num_rows())
            .filter(|&row| {
                timestamps.is_valid(row)
                    && actions.is_valid(row)
                    && timestamps.value(row).starts_with(&day)
                    && actions.value(row) == LOGIN_ACTION
            })
            .count() as u64;
    }

    Ok(count)
}

fn is_top_level_artifact(key: &str) -> bool {
    key.strip_prefix(CLEAN_PREFIX)
        .is_some_and(|name| !name.contains('/') && name.ends_with(".parquet"))
}

/// Column `name` cast to Utf8, or `None` when absent or not castable
fn string_column(batch: &RecordBatch, name: &str) -> Result<Option<ArrayRef>> {
    match batch.column_by_name(name) {
        Some(column) if can_cast_types(column.data_type(), &DataType::Utf8) => {
            Ok(Some(cast(column, &DataType::Utf8)?))
        }
        Some(column) => {
            tracing::debug!(
                column = name,
                data_type = %column.data_type(),
                "Column has no string form"
            );
            Ok(None)
        }
        None => Ok(None),
    }
}

fn as_strings(array: &dyn Array) -> Result<&StringArray> {
    array
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| Error::output("Failed to downcast to StringArray"))
}
