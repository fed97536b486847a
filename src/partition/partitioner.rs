//! Line partitioner

use super::types::{IngestionBatch, RejectionRecord};
use crate::validate::validate;

/// Accumulates validation outcomes across one or more blobs
#[derive(Debug, Default)]
pub struct Partitioner {
    batch: IngestionBatch,
}

impl Partitioner {
    /// Create an empty partitioner
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate every non-blank line of `text`, tagging rejections with `source_key`
    ///
    /// Lines end at `\n`, `\r\n` or a lone `\r`. The empty piece between
    /// `\r` and `\n` is dropped with the other blank lines.
    pub fn push_blob(&mut self, source_key: &str, text: &str) {
        for line in text.split(['\n', '\r']) {
            self.push_line(source_key, line);
        }
    }

    /// Validate a single line
    ///
    /// Returns `false` if the line was blank and skipped.
    pub fn push_line(&mut self, source_key: &str, line: &str) -> bool {
        if line.trim().is_empty() {
            return false;
        }

        match validate(line) {
            Ok(record) => self.batch.valid.push(record),
            Err(reason) => self
                .batch
                .rejected
                .push(RejectionRecord::new(line, reason, source_key)),
        }
        true
    }

    /// Lines classified so far
    pub fn processed(&self) -> usize {
        self.batch.processed()
    }

    /// Finish and return the accumulated batch
    pub fn finish(self) -> IngestionBatch {
        self.batch
    }
}

/// Partition an ordered sequence of `(source key, blob text)` pairs
pub fn partition<I, K, T>(blobs: I) -> IngestionBatch
where
    I: IntoIterator<Item = (K, T)>,
    K: AsRef<str>,
    T: AsRef<str>,
{
    let mut partitioner = Partitioner::new();
    for (key, text) in blobs {
        partitioner.push_blob(key.as_ref(), text.as_ref());
    }
    partitioner.finish()
}
