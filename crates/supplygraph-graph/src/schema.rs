//! Target database lifecycle and schema initialization.

use tracing::info;

use supplygraph_core::format;

use crate::client::StatementRunner;
use crate::error::GraphResult;

/// Administrative database that accepts `CREATE DATABASE` commands.
pub const SYSTEM_DATABASE: &str = "system";

/// Drop and recreate `name`. Destructive: every node and edge in it is lost.
pub async fn recreate_database(runner: &dyn StatementRunner, name: &str) -> GraphResult<()> {
    info!(database = name, "Recreating database");
    runner
        .run(&format::create_or_replace_database(name), Some(SYSTEM_DATABASE))
        .await
}

/// Create the uniqueness constraints on the node ids.
///
/// Safe to run multiple times - uses IF NOT EXISTS clauses.
pub async fn initialize_schema(runner: &dyn StatementRunner, name: &str) -> GraphResult<()> {
    let statements = format::id_constraints();
    for statement in &statements {
        runner.run(statement, Some(name)).await?;
    }
    info!(database = name, "Schema initialized ({} statements)", statements.len());
    Ok(())
}
