//! Typed records for the four input tables.
//!
//! Ids are required integers. Every other field is optional; a missing
//! cell becomes `None` and is stored as null in the graph.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::warn;

use crate::error::{SupplyError, SupplyResult};
use crate::table::{FromRow, RowCells};

/// A company node.
#[derive(Debug, Clone, PartialEq)]
pub struct Company {
    pub company_id: i64,
    pub name: Option<String>,
}

/// A supplier node.
#[derive(Debug, Clone, PartialEq)]
pub struct Supplier {
    pub supplier_id: i64,
    pub name: Option<String>,
    pub supplier_type: Option<String>,
    /// ISO-8601 local date-time, already normalized by [`normalize_timestamp`].
    pub founded: Option<String>,
    pub country: Option<String>,
    pub energy_label: Option<String>,
}

/// A `SUPPLIES_TO` edge from a supplier to a company.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanySupply {
    pub supplier_id: i64,
    pub company_id: i64,
    pub transport_via: Option<String>,
    pub quantity: Option<i64>,
}

/// A `SUPPLIES_TO` edge between two suppliers.
#[derive(Debug, Clone, PartialEq)]
pub struct SupplierSupply {
    pub from_id: i64,
    pub to_id: i64,
    pub quantity: Option<i64>,
}

impl FromRow for Company {
    const COLUMNS: &'static [&'static str] = &["companyid", "company_name"];

    fn from_row(row: &RowCells<'_>) -> SupplyResult<Self> {
        Ok(Self {
            company_id: required_id(row, "companyid")?,
            name: row.text("company_name"),
        })
    }
}

impl FromRow for Supplier {
    const COLUMNS: &'static [&'static str] = &[
        "supplierid",
        "supplier_name",
        "supplier_type",
        "founded",
        "country",
        "energylabel",
    ];

    fn from_row(row: &RowCells<'_>) -> SupplyResult<Self> {
        Ok(Self {
            supplier_id: required_id(row, "supplierid")?,
            name: row.text("supplier_name"),
            supplier_type: row.text("supplier_type"),
            founded: row.get("founded").map(normalize_timestamp),
            country: row.text("country"),
            energy_label: row.text("energylabel"),
        })
    }
}

impl FromRow for CompanySupply {
    const COLUMNS: &'static [&'static str] =
        &["supplierid", "companyid", "transport_via", "supply_amount"];

    fn from_row(row: &RowCells<'_>) -> SupplyResult<Self> {
        Ok(Self {
            supplier_id: required_id(row, "supplierid")?,
            company_id: required_id(row, "companyid")?,
            transport_via: row.text("transport_via"),
            quantity: optional_quantity(row, "supply_amount")?,
        })
    }
}

impl FromRow for SupplierSupply {
    const COLUMNS: &'static [&'static str] = &["supplierid_from", "supplierid_to", "quantity"];

    fn from_row(row: &RowCells<'_>) -> SupplyResult<Self> {
        Ok(Self {
            from_id: required_id(row, "supplierid_from")?,
            to_id: required_id(row, "supplierid_to")?,
            quantity: optional_quantity(row, "quantity")?,
        })
    }
}

fn required_id(row: &RowCells<'_>, column: &'static str) -> SupplyResult<i64> {
    let value = row.get(column).ok_or(SupplyError::MissingField(column))?;
    parse_integer(column, value)
}

fn optional_quantity(row: &RowCells<'_>, column: &'static str) -> SupplyResult<Option<i64>> {
    row.get(column).map(|v| parse_quantity(column, v)).transpose()
}

/// Parse an integer cell.
///
/// Float text with a zero fraction (`"25.0"`) is accepted because data-frame
/// exports write integer columns that contain blanks as floats. Exponent
/// notation and special values such as `inf` are not numbers here.
pub fn parse_integer(field: &'static str, value: &str) -> SupplyResult<i64> {
    if let Ok(n) = value.parse::<i64>() {
        return Ok(n);
    }
    let f = parse_decimal(field, value)?;
    if f.fract() != 0.0 {
        return Err(SupplyError::invalid(field, value, "not a whole number"));
    }
    Ok(f as i64)
}

/// Parse a quantity cell, truncating any fraction toward zero the way
/// Cypher's `toInteger` does (`"100.5"` becomes 100, `"-2.7"` becomes -2).
pub fn parse_quantity(field: &'static str, value: &str) -> SupplyResult<i64> {
    if let Ok(n) = value.parse::<i64>() {
        return Ok(n);
    }
    parse_decimal(field, value).map(|f| f.trunc() as i64)
}

/// Plain decimal text (optional sign, digits, at most one `.`) that fits an `i64`.
fn parse_decimal(field: &'static str, value: &str) -> SupplyResult<f64> {
    let digits = value.strip_prefix(['+', '-']).unwrap_or(value);
    let plain = digits.chars().any(|c| c.is_ascii_digit())
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.matches('.').count() <= 1;
    if !plain {
        return Err(SupplyError::invalid(field, value, "not a number"));
    }
    match value.parse::<f64>() {
        Ok(f) if f.abs() < i64::MAX as f64 => Ok(f),
        _ => Err(SupplyError::invalid(field, value, "out of range")),
    }
}

/// Turn a `yyyy-mm-dd hh:mm:ss` timestamp into the `T`-separated form the
/// database's `datetime()` function accepts.
///
/// Every space becomes `T`. Values that still do not look like a date or
/// date-time are logged and passed through; the database decides.
pub fn normalize_timestamp(value: &str) -> String {
    let normalized = value.replace(' ', "T");
    let recognized = NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M").is_ok()
        || NaiveDate::parse_from_str(&normalized, "%Y-%m-%d").is_ok();
    if !recognized {
        warn!(value, "Unrecognized timestamp format");
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{read_table_from_reader, ReadOptions, Table, TableRow};
    use std::path::Path;

    fn read<T: FromRow>(input: &str) -> Table<T> {
        read_table_from_reader(input.as_bytes(), Path::new("test.csv"), &ReadOptions::default())
            .unwrap()
    }

    fn valid<T: std::fmt::Debug>(table: Table<T>) -> Vec<T> {
        table
            .rows
            .into_iter()
            .map(|r| match r {
                TableRow::Valid { record, .. } => record,
                TableRow::Invalid { line, reason } => panic!("line {}: {}", line, reason),
            })
            .collect()
    }

    #[test]
    fn test_company_row() {
        let companies = valid(read::<Company>("companyid;company_name\n1;Acme\n2;nan\n"));
        assert_eq!(companies[0], Company { company_id: 1, name: Some("Acme".into()) });
        assert_eq!(companies[1], Company { company_id: 2, name: None });
    }

    #[test]
    fn test_supplier_row_normalizes_founded() {
        let input = "supplierid;supplier_name;supplier_type;founded;country;energylabel\n\
                     7;Steel Co;raw;2020-01-01 00:00:00;NL;\n";
        let suppliers = valid(read::<Supplier>(input));
        assert_eq!(suppliers[0].founded.as_deref(), Some("2020-01-01T00:00:00"));
        assert_eq!(suppliers[0].country.as_deref(), Some("NL"));
        assert_eq!(suppliers[0].energy_label, None);
    }

    #[test]
    fn test_company_supply_missing_amount() {
        let input = "supplierid;companyid;transport_via;supply_amount\n1;1;truck;nan\n2;1;ship;25.0\n";
        let links = valid(read::<CompanySupply>(input));
        assert_eq!(
            links[0],
            CompanySupply { supplier_id: 1, company_id: 1, transport_via: Some("truck".into()), quantity: None }
        );
        assert_eq!(links[1].quantity, Some(25));
    }

    #[test]
    fn test_supplier_supply_rejects_bad_ids() {
        let input = "supplierid_from;supplierid_to;quantity\n1;2;10\nx;2;10\n3;;10\n4.5;5;1\n";
        let table = read::<SupplierSupply>(input);
        assert_eq!(table.invalid_count(), 3);
        assert!(matches!(
            &table.rows[0],
            TableRow::Valid { record: SupplierSupply { from_id: 1, to_id: 2, quantity: Some(10) }, .. }
        ));
    }

    #[test]
    fn test_fractional_quantity_is_truncated() {
        let input = "supplierid;companyid;transport_via;supply_amount\n1;1;truck;100.5\n2;1;ship;-2.7\n";
        let links = valid(read::<CompanySupply>(input));
        assert_eq!(links[0].quantity, Some(100));
        assert_eq!(links[1].quantity, Some(-2));

        let input = "supplierid_from;supplierid_to;quantity\n4;5;1.5\n";
        let links = valid(read::<SupplierSupply>(input));
        assert_eq!(links[0].quantity, Some(1));
    }

    #[test]
    fn test_data_frame_placeholders_are_missing() {
        let input = "supplierid;supplier_name;supplier_type;founded;country;energylabel\n\
                     1;S;NA;2020-01-01 00:00:00;N/A;None\n\
                     2;<NA>;#N/A;;n/a;-nan\n";
        let suppliers = valid(read::<Supplier>(input));
        assert_eq!(suppliers[0].supplier_type, None);
        assert_eq!(suppliers[0].country, None);
        assert_eq!(suppliers[0].energy_label, None);
        assert_eq!(suppliers[0].name.as_deref(), Some("S"));
        assert_eq!(suppliers[1].name, None);
        assert_eq!(suppliers[1].supplier_type, None);
        assert_eq!(suppliers[1].country, None);
        assert_eq!(suppliers[1].energy_label, None);
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("n", "42").unwrap(), 42);
        assert_eq!(parse_integer("n", "-3").unwrap(), -3);
        assert_eq!(parse_integer("n", "100.0").unwrap(), 100);
        assert!(parse_integer("n", "1.25").is_err());
        assert!(parse_integer("n", "inf").is_err());
        assert!(parse_integer("n", "abc").is_err());
        assert!(parse_integer("n", "1e3").is_err());
        assert!(parse_integer("n", "1E3").is_err());
        assert!(parse_integer("n", "1.0e2").is_err());
        assert!(parse_integer("n", ".").is_err());
        assert!(parse_integer("n", "1.2.0").is_err());
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("q", "7").unwrap(), 7);
        assert_eq!(parse_quantity("q", "100.5").unwrap(), 100);
        assert_eq!(parse_quantity("q", "0.99").unwrap(), 0);
        assert!(parse_quantity("q", "1e3").is_err());
        assert!(parse_quantity("q", "NaN").is_err());
        assert!(parse_quantity("q", "99999999999999999999.5").is_err());
    }

    #[test]
    fn test_normalize_timestamp() {
        assert_eq!(normalize_timestamp("2020-01-01 00:00:00"), "2020-01-01T00:00:00");
        assert_eq!(normalize_timestamp("2020-01-01T10:30:00"), "2020-01-01T10:30:00");
        assert_eq!(normalize_timestamp("2020-01-01"), "2020-01-01");
        assert_eq!(normalize_timestamp("last year"), "lastTyear");
    }
}
