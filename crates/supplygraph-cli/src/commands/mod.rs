//! CLI command definitions and handlers.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use supplygraph_core::AppConfig;
use supplygraph_graph::GraphClient;

pub mod load;
pub mod status;
pub mod verify;

/// Load supply-chain CSV files into a Neo4j graph
#[derive(Parser)]
#[command(name = "supplygraph")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the configuration file (TOML or YAML)
    #[arg(
        short,
        long,
        global = true,
        env = "SUPPLYGRAPH_CONFIG",
        default_value = "config/supplygraph.toml"
    )]
    pub config: PathBuf,

    /// Directory holding the CSV files (overrides import.dir)
    #[arg(long, global = true)]
    pub import_dir: Option<PathBuf>,

    /// Without a subcommand, runs `load`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Recreate the database, load all CSV files and run the verification queries
    Load(load::LoadArgs),

    /// Run the verification queries against the loaded database
    Verify(verify::VerifyArgs),

    /// Show node and relationship counts
    Status,
}

impl Cli {
    /// Whether stdout is reserved for JSON output.
    pub fn json_output(&self) -> bool {
        match &self.command {
            Some(Commands::Load(args)) => args.verify.json,
            Some(Commands::Verify(args)) => args.json,
            _ => false,
        }
    }

    pub async fn execute(self) -> Result<()> {
        let mut config = AppConfig::load(&self.config)
            .with_context(|| format!("Failed to load configuration from {}", self.config.display()))?;
        if let Some(dir) = self.import_dir {
            config.import.dir = dir;
        }

        match self.command {
            None => load::execute(load::LoadArgs::default(), &config).await,
            Some(Commands::Load(args)) => load::execute(args, &config).await,
            Some(Commands::Verify(args)) => verify::execute(args, &config).await,
            Some(Commands::Status) => status::execute(&config).await,
        }
    }
}

/// Connect to the configured server, logging the failure before returning it.
pub(crate) async fn connect(config: &AppConfig) -> Result<GraphClient> {
    match GraphClient::connect(&config.database).await {
        Ok(client) => Ok(client),
        Err(e) => {
            tracing::error!(error = %e, "Failed to create the driver");
            Err(e).context("Cannot reach the graph database")
        }
    }
}
