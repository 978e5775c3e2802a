//! Per-run accounting of loaded, skipped and failed rows.

use std::fmt;

use serde::Serialize;

/// The four input tables, in load order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TableKind {
    Companies,
    Suppliers,
    CompanySupplier,
    SupplierSupplier,
}

impl TableKind {
    pub const ALL: [TableKind; 4] = [
        TableKind::Companies,
        TableKind::Suppliers,
        TableKind::CompanySupplier,
        TableKind::SupplierSupplier,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TableKind::Companies => "companies",
            TableKind::Suppliers => "suppliers",
            TableKind::CompanySupplier => "company-supplier",
            TableKind::SupplierSupplier => "supplier-supplier",
        }
    }

    /// Whether rows of this table become edges rather than nodes.
    pub fn is_edge(&self) -> bool {
        matches!(self, TableKind::CompanySupplier | TableKind::SupplierSupplier)
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row counters for one table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableStats {
    pub rows: usize,
    pub loaded: usize,
    /// Edge rows whose endpoints did not exist, under the lenient edge policy.
    pub skipped: usize,
    pub failed: usize,
}

/// A row that could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowFailure {
    pub table: TableKind,
    pub line: u64,
    pub reason: String,
}

impl fmt::Display for RowFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} line {}: {}", self.table, self.line, self.reason)
    }
}

/// Outcome of an ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub companies: TableStats,
    pub suppliers: TableStats,
    pub company_supplier: TableStats,
    pub supplier_supplier: TableStats,
    pub failures: Vec<RowFailure>,
    /// Database preparation steps that failed under the continue policy.
    pub setup_failures: Vec<String>,
}

impl IngestReport {
    pub fn stats(&self, table: TableKind) -> &TableStats {
        match table {
            TableKind::Companies => &self.companies,
            TableKind::Suppliers => &self.suppliers,
            TableKind::CompanySupplier => &self.company_supplier,
            TableKind::SupplierSupplier => &self.supplier_supplier,
        }
    }

    pub(crate) fn stats_mut(&mut self, table: TableKind) -> &mut TableStats {
        match table {
            TableKind::Companies => &mut self.companies,
            TableKind::Suppliers => &mut self.suppliers,
            TableKind::CompanySupplier => &mut self.company_supplier,
            TableKind::SupplierSupplier => &mut self.supplier_supplier,
        }
    }

    pub(crate) fn record_failure(&mut self, table: TableKind, line: u64, reason: String) {
        self.stats_mut(table).failed += 1;
        self.failures.push(RowFailure { table, line, reason });
    }

    pub fn nodes_loaded(&self) -> usize {
        self.companies.loaded + self.suppliers.loaded
    }

    pub fn edges_loaded(&self) -> usize {
        self.company_supplier.loaded + self.supplier_supplier.loaded
    }

    pub fn skipped(&self) -> usize {
        TableKind::ALL.iter().map(|t| self.stats(*t).skipped).sum()
    }

    /// True when no row and no preparation step failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.setup_failures.is_empty()
    }
}
