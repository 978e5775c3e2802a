//! Verification queries.

use anyhow::{Context, Result};
use clap::Args;

use supplygraph_core::AppConfig;
use supplygraph_graph::queries;
use supplygraph_graph::{GraphClient, IngestReport};

use crate::output;

#[derive(Args, Default)]
pub struct VerifyArgs {
    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// Company whose supplier subgraph is shown (overrides ingest.subgraph_company)
    #[arg(long)]
    pub company: Option<String>,

    /// Upstream depth of the subgraph (overrides ingest.subgraph_depth)
    #[arg(long)]
    pub depth: Option<u32>,
}

pub async fn execute(args: VerifyArgs, config: &AppConfig) -> Result<()> {
    let client = super::connect(config).await?;
    run(&client, &args, config, None).await?;
    client.close();
    Ok(())
}

/// Run both queries and print their results.
pub(crate) async fn run(
    client: &GraphClient,
    args: &VerifyArgs,
    config: &AppConfig,
    report: Option<&IngestReport>,
) -> Result<()> {
    let database = config.database.name();
    let company = args
        .company
        .as_deref()
        .unwrap_or(&config.ingest.subgraph_company);
    let depth = args.depth.unwrap_or(config.ingest.subgraph_depth);

    let links = queries::all_supply_links(client, database)
        .await
        .context("Supply link query failed")?;
    let subgraph = queries::company_subgraph(client, database, company, depth)
        .await
        .context("Company subgraph query failed")?;

    if args.json {
        let doc = serde_json::json!({
            "report": report,
            "supply_links": links,
            "subgraph": {
                "company": company,
                "depth": depth,
                "rows": subgraph,
            },
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        output::print_supply_links(&links);
        output::print_subgraph(company, &subgraph);
    }

    Ok(())
}
