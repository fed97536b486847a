//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::PipelineConfig;
use crate::error::{Result, ResultExt};
use crate::ingest::Orchestrator;
use crate::query::LoginQuery;
use crate::storage::BlobStorage;
use crate::trigger::TriggerEnvelope;
use std::path::Path;
use std::sync::Arc;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;
        config.validate()?;
        let storage: Arc<dyn BlobStorage> = Arc::new(config.open_storage()?);

        match &self.cli.command {
            Commands::Ingest { event, objects } => {
                let trigger = match event {
                    Some(path) => Self::read_event(path)?,
                    None => TriggerEnvelope::from_paths(objects)?,
                };
                let orchestrator = Orchestrator::new(storage, config.destinations())
                    .with_parquet_config(config.parquet.writer_config());
                let summary = orchestrator.run(&trigger).await?;
                println!("{}", serde_json::to_string(&summary)?);
                Ok(())
            }
            Commands::Logins => {
                let query = LoginQuery::new(storage, &config.clean_bucket);
                let count = query.logins_today().await?;
                println!("{}", serde_json::to_string(&count)?);
                Ok(())
            }
            Commands::Serve { port } => {
                let port = port.unwrap_or(config.server.port);
                let orchestrator = Orchestrator::new(storage.clone(), config.destinations())
                    .with_parquet_config(config.parquet.writer_config());
                let query = LoginQuery::new(storage, &config.clean_bucket);
                crate::cli::serve(orchestrator, query, port).await
            }
        }
    }

    /// Load the config file (or defaults) and apply CLI overrides
    fn load_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.cli.config {
            Some(path) => PipelineConfig::load(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(bucket) = &self.cli.clean_bucket {
            config.clean_bucket.clone_from(bucket);
        }
        if let Some(bucket) = &self.cli.error_bucket {
            config.error_bucket.clone_from(bucket);
        }

        tracing::debug!(
            clean_bucket = %config.clean_bucket,
            error_bucket = %config.error_bucket,
            buckets = config.buckets.len(),
            "Loaded pipeline config"
        );
        Ok(config)
    }

    fn read_event(path: &Path) -> Result<TriggerEnvelope> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read event {}", path.display()))?;
        TriggerEnvelope::from_event_json(&contents)
    }
}
