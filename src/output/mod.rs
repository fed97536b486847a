//! Output module
//!
//! Serializes ingestion batches into artifact bytes and reads clean
//! artifacts back.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Building an Arrow schema from heterogeneous JSON records
//! - Converting JSON records to Arrow RecordBatches and back
//! - Encoding and decoding Parquet in memory
//! - Encoding rejections as JSON Lines

mod schema;
mod serialize;
mod writer;

pub use schema::{arrow_to_json, batches_to_records, infer_schema, json_to_arrow, SchemaBuilder};
pub use serialize::{serialize_clean, serialize_errors};
pub use writer::{read_parquet, write_parquet_bytes, ParquetWriterConfig};
