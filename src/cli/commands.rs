//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Log ingestion pipeline CLI
#[derive(Parser, Debug)]
#[command(name = "log-ingest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Pipeline configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Bucket for clean Parquet artifacts (overrides config)
    #[arg(long, global = true, env = "CLEAN_BUCKET")]
    pub clean_bucket: Option<String>,

    /// Bucket for JSONL error journals (overrides config)
    #[arg(long, global = true, env = "ERROR_BUCKET")]
    pub error_bucket: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest source objects into clean and error artifacts
    Ingest {
        /// S3 event notification JSON naming the objects
        #[arg(long, conflicts_with = "objects")]
        event: Option<PathBuf>,

        /// Source object as BUCKET/KEY (repeatable, processed in order)
        #[arg(long = "object", value_name = "BUCKET/KEY")]
        objects: Vec<String>,
    },

    /// Print today's login count
    Logins,

    /// Start HTTP server mode
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
}
