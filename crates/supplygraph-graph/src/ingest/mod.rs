//! CSV to Neo4j ingestion pipeline.
//!
//! Recreates the target database, then loads companies, suppliers,
//! company-supplier edges and supplier-supplier edges in that order. Edges
//! need their endpoints, so the order is fixed. Every row is its own round
//! trip; nothing is batched or run concurrently.

pub mod report;
mod sync;

use thiserror::Error;
use tracing::{info, warn};

use supplygraph_core::format;
use supplygraph_core::table::{read_table, ReadOptions};
use supplygraph_core::{
    AppConfig, Company, CompanySupply, EdgePolicy, FailurePolicy, ImportConfig, Supplier,
    SupplierSupply, SupplyError, Table,
};

use crate::client::StatementRunner;
use crate::error::{GraphError, GraphResult};
use crate::schema;

pub use report::{IngestReport, RowFailure, TableKind, TableStats};

/// Errors that stop an ingestion run.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error(transparent)]
    Input(#[from] SupplyError),

    #[error("Failed to prepare database '{database}': {source}")]
    Database {
        database: String,
        #[source]
        source: GraphError,
    },

    #[error("Ingestion aborted at {table} line {line}: {reason}")]
    Aborted {
        table: TableKind,
        line: u64,
        reason: String,
        report: Box<IngestReport>,
    },
}

/// How a run treats its target and its failures.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub database: String,
    pub edge_policy: EdgePolicy,
    pub failure_policy: FailurePolicy,
}

impl IngestOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            database: config.database.name().to_string(),
            edge_policy: config.ingest.edge_policy,
            failure_policy: config.ingest.failure_policy,
        }
    }
}

/// The four input tables, fully read into memory.
#[derive(Debug, Clone)]
pub struct SupplyTables {
    pub companies: Table<Company>,
    pub suppliers: Table<Supplier>,
    pub company_supplier: Table<CompanySupply>,
    pub supplier_supplier: Table<SupplierSupply>,
}

impl SupplyTables {
    /// Read all four files. A missing file or header column fails the whole load.
    pub fn load(import: &ImportConfig) -> Result<Self, SupplyError> {
        let options = ReadOptions::from_import(import)?;
        let tables = Self {
            companies: read_table(&import.companies_path(), &options)?,
            suppliers: read_table(&import.suppliers_path(), &options)?,
            company_supplier: read_table(&import.company_supplier_path(), &options)?,
            supplier_supplier: read_table(&import.supplier_supplier_path(), &options)?,
        };
        info!(
            companies = tables.companies.len(),
            suppliers = tables.suppliers.len(),
            company_supplier = tables.company_supplier.len(),
            supplier_supplier = tables.supplier_supplier.len(),
            "Input tables read"
        );
        Ok(tables)
    }
}

/// Run a full, destructive ingestion of `tables` into `options.database`.
pub async fn run_ingest(
    runner: &dyn StatementRunner,
    tables: &SupplyTables,
    options: &IngestOptions,
) -> Result<IngestReport, IngestError> {
    let database = options.database.as_str();
    info!(database, "Starting ingestion");

    let mut report = IngestReport::default();

    let recreated = schema::recreate_database(runner, database).await;
    setup_step(recreated, "recreate database", options, &mut report)?;
    let initialized = schema::initialize_schema(runner, database).await;
    setup_step(initialized, "initialize schema", options, &mut report)?;

    sync::sync_table(
        runner,
        &tables.companies,
        TableKind::Companies,
        format::merge_company,
        options,
        &mut report,
    )
    .await?;
    sync::sync_table(
        runner,
        &tables.suppliers,
        TableKind::Suppliers,
        format::merge_supplier,
        options,
        &mut report,
    )
    .await?;
    sync::sync_table(
        runner,
        &tables.company_supplier,
        TableKind::CompanySupplier,
        format::link_company_supplier,
        options,
        &mut report,
    )
    .await?;
    sync::sync_table(
        runner,
        &tables.supplier_supplier,
        TableKind::SupplierSupplier,
        format::link_supplier_supplier,
        options,
        &mut report,
    )
    .await?;

    info!(
        nodes = report.nodes_loaded(),
        edges = report.edges_loaded(),
        skipped = report.skipped(),
        failed = report.failures.len(),
        "Ingestion complete"
    );
    Ok(report)
}

/// Apply the failure policy to one preparation step.
///
/// Under `Abort` the step's error ends the run. Under `Continue` it is logged,
/// kept on the report, and the rows are loaded into whatever the database holds.
fn setup_step(
    result: GraphResult<()>,
    step: &str,
    options: &IngestOptions,
    report: &mut IngestReport,
) -> Result<(), IngestError> {
    let Err(source) = result else {
        return Ok(());
    };
    if options.failure_policy == FailurePolicy::Abort {
        return Err(IngestError::Database {
            database: options.database.clone(),
            source,
        });
    }
    warn!(database = %options.database, step, error = %source, "Database preparation failed, continuing");
    report.setup_failures.push(format!("{}: {}", step, source));
    Ok(())
}
