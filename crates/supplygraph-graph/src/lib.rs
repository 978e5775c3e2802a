//! # SupplyGraph Graph
//!
//! Neo4j side of the supply-chain loader: connection handling, database
//! lifecycle, the row-by-row ingestion pipeline and the verification queries.

pub mod client;
pub mod error;
pub mod ingest;
pub mod queries;
pub mod schema;

pub use client::{GraphClient, GraphCounts, StatementRunner};
pub use error::{GraphError, GraphResult};
pub use ingest::{run_ingest, IngestError, IngestOptions, IngestReport, RowFailure, SupplyTables, TableKind, TableStats};
