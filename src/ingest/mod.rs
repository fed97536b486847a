//! Ingestion module
//!
//! Drives one ingestion run: fetch every object a trigger names, partition
//! their lines, then write the clean and error artifacts.
//!
//! # Artifact names
//!
//! Both artifacts are named after the last object processed, using its
//! file name without directory or extension:
//!
//! - `clean/<base>.parquet` in the clean bucket
//! - `errors/<base>.jsonl` in the error bucket
//!
//! Rerunning with the same last key overwrites the previous artifacts.

mod orchestrator;

pub use orchestrator::{
    base_name, clean_artifact_key, error_artifact_key, Destinations, IngestSummary, Orchestrator,
    CLEAN_PREFIX, ERROR_PREFIX,
};
