//! Database status.

use anyhow::Result;
use colored::Colorize;

use supplygraph_core::AppConfig;

/// Show node and relationship counts of the target database.
pub async fn execute(config: &AppConfig) -> Result<()> {
    let client = super::connect(config).await?;
    let database = config.database.name();

    println!("{} {}", "Graph Status".bold(), database.cyan());
    println!("{}", "─".repeat(40));

    let counts = client.get_counts(Some(database)).await?;
    println!("  Nodes:         {}", counts.nodes.to_string().cyan());
    println!("  Relationships: {}", counts.relationships.to_string().cyan());

    println!("{}", "─".repeat(40));

    client.close();
    Ok(())
}
