//! Row-by-row application of one table.

use tracing::{debug, info, warn};

use supplygraph_core::{EdgePolicy, FailurePolicy, Statement, Table, TableRow};

use super::report::{IngestReport, TableKind};
use super::{IngestError, IngestOptions};
use crate::client::StatementRunner;

/// Apply every row of `table` in file order, one round trip per row.
pub(crate) async fn sync_table<T>(
    runner: &dyn StatementRunner,
    table: &Table<T>,
    kind: TableKind,
    to_statement: fn(&T) -> Statement,
    options: &IngestOptions,
    report: &mut IngestReport,
) -> Result<(), IngestError> {
    info!(table = %kind, rows = table.len(), "Loading table");

    for row in &table.rows {
        report.stats_mut(kind).rows += 1;

        let failure = match row {
            TableRow::Invalid { line, reason } => Some((*line, reason.clone())),
            TableRow::Valid { line, record } => {
                apply_row(runner, &to_statement(record), kind, *line, options, report).await
            }
        };

        if let Some((line, reason)) = failure {
            warn!(table = %kind, line, reason = %reason, "Row failed");
            report.record_failure(kind, line, reason.clone());
            if options.failure_policy == FailurePolicy::Abort {
                return Err(IngestError::Aborted {
                    table: kind,
                    line,
                    reason,
                    report: Box::new(report.clone()),
                });
            }
        }
    }

    let stats = report.stats(kind);
    info!(
        table = %kind,
        loaded = stats.loaded,
        skipped = stats.skipped,
        failed = stats.failed,
        "Table loaded"
    );
    Ok(())
}

/// Run one row's statement. Returns the failure, if any, as `(line, reason)`.
async fn apply_row(
    runner: &dyn StatementRunner,
    statement: &Statement,
    kind: TableKind,
    line: u64,
    options: &IngestOptions,
    report: &mut IngestReport,
) -> Option<(u64, String)> {
    let count = match runner.query_count(statement, Some(&options.database)).await {
        Ok(count) => count,
        Err(e) => return Some((line, e.to_string())),
    };

    if count > 0 || !kind.is_edge() {
        report.stats_mut(kind).loaded += 1;
        debug!(table = %kind, line, "Row loaded");
        return None;
    }

    match options.edge_policy {
        EdgePolicy::Lenient => {
            report.stats_mut(kind).skipped += 1;
            debug!(table = %kind, line, "Edge endpoint not found, no edge created");
            None
        }
        EdgePolicy::Strict => Some((line, "edge endpoint not found".to_string())),
    }
}
