//! SupplyGraph CLI - supply-chain CSV to Neo4j loader.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

use commands::Cli;

/// Initialize tracing.
///
/// When `json_mode` is true, all tracing output goes to stderr with ANSI disabled
/// so stdout carries nothing but the JSON document.
fn init_tracing(verbose: bool, json_mode: bool) {
    let default_filter = if verbose {
        "supplygraph=debug,supplygraph_core=debug,supplygraph_graph=debug"
    } else {
        "supplygraph=info,supplygraph_core=info,supplygraph_graph=info"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    if json_mode {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.json_output());

    cli.execute().await
}
