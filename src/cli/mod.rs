//! CLI module
//!
//! Command-line interface for running ingestion and queries.
//!
//! # Commands
//!
//! - `ingest` - Process the objects named by an event file or `--object` flags
//! - `logins` - Print today's login count from the latest clean artifact
//! - `serve` - Start HTTP server mode

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands};
pub use runner::Runner;
pub use server::{router, serve, serve_on, AppState};
