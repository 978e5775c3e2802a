//! # SupplyGraph Core
//!
//! Configuration, CSV input and record formatting for the supply-chain
//! graph loader. Nothing in this crate talks to the database; the graph
//! crate turns the [`format::Statement`] values built here into Cypher
//! queries.

pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod table;

pub use config::{AppConfig, DatabaseConfig, EdgePolicy, FailurePolicy, ImportConfig, IngestConfig};
pub use error::{SupplyError, SupplyResult};
pub use format::{Statement, StatementKind, Value};
pub use model::{Company, CompanySupply, Supplier, SupplierSupply};
pub use table::{Table, TableRow};
