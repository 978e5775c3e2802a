//! Full destructive load.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use supplygraph_core::{AppConfig, EdgePolicy, FailurePolicy};
use supplygraph_graph::{run_ingest, IngestError, IngestOptions, SupplyTables};

use crate::output;

use super::verify::{self, VerifyArgs};

#[derive(Args, Default)]
pub struct LoadArgs {
    /// Treat edge rows whose endpoints do not exist as failures
    #[arg(long)]
    pub strict: bool,

    /// Stop at the first failed row
    #[arg(long)]
    pub fail_fast: bool,

    /// Do not run the verification queries after loading
    #[arg(long)]
    pub skip_verify: bool,

    #[command(flatten)]
    pub verify: VerifyArgs,
}

pub async fn execute(args: LoadArgs, config: &AppConfig) -> Result<()> {
    let tables = SupplyTables::load(&config.import).context("Failed to read input files")?;

    let mut options = IngestOptions::from_config(config);
    if args.strict {
        options.edge_policy = EdgePolicy::Strict;
    }
    if args.fail_fast {
        options.failure_policy = FailurePolicy::Abort;
    }

    let client = super::connect(config).await?;

    if !args.verify.json {
        println!(
            "{} {}",
            "Loading into database".bold(),
            options.database.cyan()
        );
    }

    let report = match run_ingest(&client, &tables, &options).await {
        Ok(report) => report,
        Err(IngestError::Aborted { report, table, line, reason }) => {
            if !args.verify.json {
                output::print_report(&report);
            }
            anyhow::bail!("Ingestion aborted at {} line {}: {}", table, line, reason);
        }
        Err(e) => return Err(e.into()),
    };

    if !args.verify.json {
        output::print_report(&report);
    }

    if !args.skip_verify {
        verify::run(&client, &args.verify, config, Some(&report)).await?;
    }

    client.close();
    Ok(())
}
