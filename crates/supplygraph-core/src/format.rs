//! Record formatter: one typed record in, one executable Cypher statement out.
//!
//! Statements carry their values as bind parameters, so free text with quotes
//! or backslashes reaches the database unchanged. [`Statement::render`] gives
//! the interpolated text for log output only.

use std::fmt;

use crate::model::{Company, CompanySupply, Supplier, SupplierSupply};

/// A bind parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Text(String),
    Null,
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<Option<i64>> for Value {
    fn from(n: Option<i64>) -> Self {
        n.map(Value::Int).unwrap_or(Value::Null)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<Option<&str>> for Value {
    fn from(s: Option<&str>) -> Self {
        s.map(Value::from).unwrap_or(Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(&string_literal(s)),
            Value::Null => f.write_str("null"),
        }
    }
}

/// What a statement does; lets callers and test doubles tell statements apart
/// without parsing Cypher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Ping,
    CreateDatabase,
    Constraint,
    MergeCompany,
    MergeSupplier,
    LinkCompanySupplier,
    LinkSupplierSupplier,
    Read,
}

/// A Cypher statement with named bind parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub cypher: String,
    pub params: Vec<(&'static str, Value)>,
}

impl Statement {
    pub fn new(kind: StatementKind, cypher: impl Into<String>) -> Self {
        Self {
            kind,
            cypher: cypher.into(),
            params: Vec::new(),
        }
    }

    pub fn param(mut self, name: &'static str, value: impl Into<Value>) -> Self {
        self.params.push((name, value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.params.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    /// The statement with every `$name` replaced by its literal value.
    ///
    /// The cypher text is scanned once, so text inside a substituted value is
    /// never read as a parameter. Unknown names are left as written.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.cypher.len());
        let mut rest = self.cypher.as_str();

        while let Some(start) = rest.find('$') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            let len = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            let name = &after[..len];

            match self.get(name) {
                Some(value) if !name.is_empty() => out.push_str(&value.to_string()),
                _ => {
                    out.push('$');
                    out.push_str(name);
                }
            }
            rest = &after[len..];
        }
        out.push_str(rest);
        out
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Wrap text in single quotes, escaping backslashes and quotes.
pub fn string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Backtick-quote an identifier such as a database name, which cannot be bound.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Cheapest possible round trip, used to force the connection handshake.
pub fn ping() -> Statement {
    Statement::new(StatementKind::Ping, "RETURN 1")
}

/// Drop and recreate the target database. Runs against the `system` database.
pub fn create_or_replace_database(name: &str) -> Statement {
    Statement::new(
        StatementKind::CreateDatabase,
        format!("CREATE OR REPLACE DATABASE {} WAIT", quote_identifier(name)),
    )
}

/// Uniqueness constraints backing the MERGE keys.
pub fn id_constraints() -> Vec<Statement> {
    [
        "CREATE CONSTRAINT company_id IF NOT EXISTS FOR (c:Company) REQUIRE c.company_id IS UNIQUE",
        "CREATE CONSTRAINT supplier_id IF NOT EXISTS FOR (s:Supplier) REQUIRE s.supplier_id IS UNIQUE",
    ]
    .into_iter()
    .map(|cypher| Statement::new(StatementKind::Constraint, cypher))
    .collect()
}

pub fn merge_company(company: &Company) -> Statement {
    Statement::new(
        StatementKind::MergeCompany,
        "MERGE (c:Company {company_id: $company_id}) \
         SET c.company_name = $company_name \
         RETURN count(c) AS count",
    )
    .param("company_id", company.company_id)
    .param("company_name", company.name.as_deref())
}

pub fn merge_supplier(supplier: &Supplier) -> Statement {
    Statement::new(
        StatementKind::MergeSupplier,
        "MERGE (s:Supplier {supplier_id: $supplier_id}) \
         SET s.country = $country, \
             s.energy_label = $energy_label, \
             s.supplier_name = $supplier_name, \
             s.supplier_type = $supplier_type, \
             s.founded = datetime($founded) \
         RETURN count(s) AS count",
    )
    .param("supplier_id", supplier.supplier_id)
    .param("country", supplier.country.as_deref())
    .param("energy_label", supplier.energy_label.as_deref())
    .param("supplier_name", supplier.name.as_deref())
    .param("supplier_type", supplier.supplier_type.as_deref())
    .param("founded", supplier.founded.as_deref())
}

/// Edge from supplier to company. Produces `count = 0` when either endpoint is missing.
pub fn link_company_supplier(link: &CompanySupply) -> Statement {
    Statement::new(
        StatementKind::LinkCompanySupplier,
        "MATCH (c:Company {company_id: $company_id}) \
         MATCH (s:Supplier {supplier_id: $supplier_id}) \
         MERGE (s)-[rel:SUPPLIES_TO]->(c) \
         SET rel.transport_via = $transport_via, \
             rel.quantity = $quantity \
         RETURN count(rel) AS count",
    )
    .param("company_id", link.company_id)
    .param("supplier_id", link.supplier_id)
    .param("transport_via", link.transport_via.as_deref())
    .param("quantity", link.quantity)
}

/// Edge between two suppliers. Produces `count = 0` when either endpoint is missing.
pub fn link_supplier_supplier(link: &SupplierSupply) -> Statement {
    Statement::new(
        StatementKind::LinkSupplierSupplier,
        "MATCH (from:Supplier {supplier_id: $from_id}) \
         MATCH (to:Supplier {supplier_id: $to_id}) \
         MERGE (from)-[rel:SUPPLIES_TO]->(to) \
         SET rel.quantity = $quantity \
         RETURN count(rel) AS count",
    )
    .param("from_id", link.from_id)
    .param("to_id", link.to_id)
    .param("quantity", link.quantity)
}

/// Every supply edge with both endpoints.
pub fn all_supply_links() -> Statement {
    Statement::new(
        StatementKind::Read,
        "MATCH (a)-[rel:SUPPLIES_TO]->(b) \
         RETURN labels(a)[0] AS from_label, \
                coalesce(a.company_id, a.supplier_id) AS from_id, \
                coalesce(a.company_name, a.supplier_name) AS from_name, \
                labels(b)[0] AS to_label, \
                coalesce(b.company_id, b.supplier_id) AS to_id, \
                coalesce(b.company_name, b.supplier_name) AS to_name, \
                rel.transport_via AS transport_via, \
                rel.quantity AS quantity \
         ORDER BY from_id, to_id",
    )
}

/// Deepest upstream hop count accepted by [`company_subgraph`].
pub const MAX_SUBGRAPH_DEPTH: u32 = 10;

/// Suppliers upstream of the named company, with their own suppliers up to `depth` hops.
pub fn company_subgraph(company_name: &str, depth: u32) -> Statement {
    let depth = depth.min(MAX_SUBGRAPH_DEPTH);
    Statement::new(
        StatementKind::Read,
        format!(
            "MATCH (company)<-[*]-(supplier)<-[*0..{}]-(children) \
             WHERE company.company_name = $company_name \
             RETURN company.company_id AS company_id, \
                    company.company_name AS company_name, \
                    supplier.supplier_id AS supplier_id, \
                    supplier.supplier_name AS supplier_name, \
                    children.supplier_id AS child_id, \
                    children.supplier_name AS child_name",
            depth
        ),
    )
    .param("company_name", company_name)
}

pub fn count_nodes() -> Statement {
    Statement::new(StatementKind::Read, "MATCH (n) RETURN count(n) AS count")
}

pub fn count_relationships() -> Statement {
    Statement::new(StatementKind::Read, "MATCH ()-[r]->() RETURN count(r) AS count")
}
