//! Delimited file reader.
//!
//! Reads a CSV file with a header row into an in-memory [`Table`]. A missing
//! header column is fatal; a row that cannot be decoded is kept as
//! [`TableRow::Invalid`] so the caller can report it and move on. Rows shorter
//! than the header are padded with missing cells; longer rows are invalid.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::config::ImportConfig;
use crate::error::{SupplyError, SupplyResult};

/// A record type that can be built from one row of a table.
pub trait FromRow: Sized {
    /// Columns that must be present in the header.
    const COLUMNS: &'static [&'static str];

    fn from_row(row: &RowCells<'_>) -> SupplyResult<Self>;
}

/// Options controlling how a file is split and how cells are normalized.
#[derive(Debug, Clone)]
pub struct ReadOptions {
    pub delimiter: u8,
    pub missing_values: Vec<String>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        let import = ImportConfig::default();
        Self {
            delimiter: b';',
            missing_values: import.missing_values,
        }
    }
}

impl ReadOptions {
    pub fn from_import(import: &ImportConfig) -> SupplyResult<Self> {
        Ok(Self {
            delimiter: import.delimiter_byte()?,
            missing_values: import.missing_values.clone(),
        })
    }

    /// Whether a trimmed cell value stands for "no value".
    pub fn is_missing(&self, value: &str) -> bool {
        value.is_empty() || self.missing_values.iter().any(|m| m == value)
    }
}

/// One data row of a table, keyed by its line in the source file.
#[derive(Debug, Clone, PartialEq)]
pub enum TableRow<T> {
    Valid { line: u64, record: T },
    Invalid { line: u64, reason: String },
}

impl<T> TableRow<T> {
    pub fn line(&self) -> u64 {
        match self {
            TableRow::Valid { line, .. } | TableRow::Invalid { line, .. } => *line,
        }
    }
}

/// All rows of one input file, in file order.
#[derive(Debug, Clone)]
pub struct Table<T> {
    pub path: PathBuf,
    pub rows: Vec<TableRow<T>>,
}

impl<T> Table<T> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows that failed to decode.
    pub fn invalid_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| matches!(r, TableRow::Invalid { .. }))
            .count()
    }
}

/// Cells of one row, looked up by column name.
pub struct RowCells<'a> {
    record: &'a StringRecord,
    columns: &'a HashMap<&'static str, usize>,
    options: &'a ReadOptions,
}

impl<'a> RowCells<'a> {
    /// The cell for `column`, or `None` when it is blank or a missing-value marker.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let idx = *self.columns.get(column)?;
        let value = self.record.get(idx)?.trim();
        if self.options.is_missing(value) {
            None
        } else {
            Some(value)
        }
    }

    /// The cell for `column` as an owned string.
    pub fn text(&self, column: &str) -> Option<String> {
        self.get(column).map(str::to_string)
    }
}

/// Read a table from a file on disk.
pub fn read_table<T: FromRow>(path: &Path, options: &ReadOptions) -> SupplyResult<Table<T>> {
    let file = File::open(path).map_err(|e| {
        SupplyError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })?;
    let table = read_table_from_reader(file, path, options)?;
    debug!(
        path = %path.display(),
        rows = table.len(),
        invalid = table.invalid_count(),
        "Read table"
    );
    Ok(table)
}

/// Read a table from any reader; `path` is only used for error messages.
pub fn read_table_from_reader<T: FromRow, R: Read>(
    reader: R,
    path: &Path,
    options: &ReadOptions,
) -> SupplyResult<Table<T>> {
    let csv_err = |source: csv::Error| SupplyError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);

    let headers = reader.headers().map_err(csv_err)?.clone();
    let mut columns = HashMap::with_capacity(T::COLUMNS.len());
    for column in T::COLUMNS {
        let idx = headers
            .iter()
            .position(|h| h == *column)
            .ok_or_else(|| SupplyError::MissingColumn {
                path: path.to_path_buf(),
                column: column.to_string(),
            })?;
        columns.insert(*column, idx);
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(csv_err(e)),
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                rows.push(TableRow::Invalid {
                    line,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let line = record.position().map(|p| p.line()).unwrap_or(0);
        if record.len() > headers.len() {
            rows.push(TableRow::Invalid {
                line,
                reason: format!("found record with {} fields, but the header has {}", record.len(), headers.len()),
            });
            continue;
        }
        let cells = RowCells {
            record: &record,
            columns: &columns,
            options,
        };
        rows.push(match T::from_row(&cells) {
            Ok(record) => TableRow::Valid { line, record },
            Err(e) => TableRow::Invalid {
                line,
                reason: e.to_string(),
            },
        });
    }

    Ok(Table {
        path: path.to_path_buf(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Pair {
        key: String,
        value: Option<String>,
    }

    impl FromRow for Pair {
        const COLUMNS: &'static [&'static str] = &["key", "value"];

        fn from_row(row: &RowCells<'_>) -> SupplyResult<Self> {
            Ok(Self {
                key: row.text("key").ok_or(SupplyError::MissingField("key"))?,
                value: row.text("value"),
            })
        }
    }

    fn read(input: &str) -> SupplyResult<Table<Pair>> {
        read_table_from_reader(input.as_bytes(), Path::new("pairs.csv"), &ReadOptions::default())
    }

    #[test]
    fn test_reads_rows_in_order_with_lines() {
        let table = read("key;value\na;1\nb;2\n").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.rows[0],
            TableRow::Valid {
                line: 2,
                record: Pair { key: "a".into(), value: Some("1".into()) }
            }
        );
        assert_eq!(table.rows[1].line(), 3);
    }

    #[test]
    fn test_blank_and_marker_cells_are_missing() {
        let table = read("key;value\na;\nb;nan\nc;  NaN \nd;x\n").unwrap();
        let values: Vec<Option<String>> = table
            .rows
            .into_iter()
            .map(|r| match r {
                TableRow::Valid { record, .. } => record.value,
                TableRow::Invalid { reason, .. } => panic!("unexpected invalid row: {}", reason),
            })
            .collect();
        assert_eq!(values, vec![None, None, None, Some("x".to_string())]);
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let err = read("key;other\na;1\n").unwrap_err();
        match err {
            SupplyError::MissingColumn { column, .. } => assert_eq!(column, "value"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_header_order_does_not_matter() {
        let table = read("value;extra;key\n1;z;a\n").unwrap();
        assert_eq!(
            table.rows[0],
            TableRow::Valid {
                line: 2,
                record: Pair { key: "a".into(), value: Some("1".into()) }
            }
        );
    }

    #[test]
    fn test_bad_rows_are_kept_as_invalid() {
        let table = read("key;value\n;1\na;1;extra\nb;2\n").unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.invalid_count(), 2);
        assert!(matches!(table.rows[0], TableRow::Invalid { line: 2, .. }));
        assert!(matches!(table.rows[2], TableRow::Valid { line: 4, .. }));
    }

    #[test]
    fn test_short_rows_are_padded_with_missing_cells() {
        let table = read("key;value\na\nb;2\n").unwrap();
        assert_eq!(table.invalid_count(), 0);
        assert_eq!(
            table.rows[0],
            TableRow::Valid {
                line: 2,
                record: Pair { key: "a".into(), value: None }
            }
        );
    }

    #[test]
    fn test_short_supplier_row_keeps_its_node() {
        let input = "supplierid;supplier_name;supplier_type;founded;country;energylabel\n\
                     5;supplier_5;manufacturer;;PL\n";
        let table: Table<crate::Supplier> = read_table_from_reader(
            input.as_bytes(),
            Path::new("suppliers.csv"),
            &ReadOptions::default(),
        )
        .unwrap();
        match &table.rows[0] {
            TableRow::Valid { record, .. } => {
                assert_eq!(record.supplier_id, 5);
                assert_eq!(record.country.as_deref(), Some("PL"));
                assert_eq!(record.energy_label, None);
            }
            TableRow::Invalid { reason, .. } => panic!("unexpected invalid row: {}", reason),
        }
    }

    #[test]
    fn test_comma_delimiter() {
        let options = ReadOptions {
            delimiter: b',',
            ..ReadOptions::default()
        };
        let table: Table<Pair> =
            read_table_from_reader("key,value\na,b\n".as_bytes(), Path::new("p.csv"), &options).unwrap();
        assert_eq!(table.invalid_count(), 0);
    }
}
