//! The two fixed verification queries.
//!
//! Both are for manual inspection after a load: every supply edge, and the
//! upstream supplier tree of one company.

use std::fmt;

use neo4rs::Row;
use serde::de::DeserializeOwned;
use serde::Serialize;

use supplygraph_core::format;

use crate::client::GraphClient;
use crate::error::{GraphError, GraphResult};

/// One end of an edge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NodeRef {
    pub label: Option<String>,
    pub id: Option<i64>,
    pub name: Option<String>,
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.label.as_deref().unwrap_or("?");
        let name = self.name.as_deref().unwrap_or("<unnamed>");
        match self.id {
            Some(id) => write!(f, "{}#{} {}", label, id, name),
            None => write!(f, "{} {}", label, name),
        }
    }
}

/// A `SUPPLIES_TO` edge with its endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupplyLink {
    pub from: NodeRef,
    pub to: NodeRef,
    pub transport_via: Option<String>,
    pub quantity: Option<i64>,
}

impl fmt::Display for SupplyLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})-[SUPPLIES_TO", self.from)?;
        if let Some(via) = &self.transport_via {
            write!(f, " via {}", via)?;
        }
        if let Some(quantity) = self.quantity {
            write!(f, " qty {}", quantity)?;
        }
        write!(f, "]->({})", self.to)
    }
}

/// One path of the company subgraph: the company, a supplier upstream of it,
/// and a supplier upstream of that one (possibly the supplier itself).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubgraphRow {
    pub company: NodeRef,
    pub supplier: NodeRef,
    pub child: NodeRef,
}

impl fmt::Display for SubgraphRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) <- ({}) <- ({})", self.company, self.supplier, self.child)
    }
}

/// Every supply edge in `database`.
pub async fn all_supply_links(client: &GraphClient, database: &str) -> GraphResult<Vec<SupplyLink>> {
    let rows = client.execute(&format::all_supply_links(), Some(database)).await?;

    rows.iter()
        .map(|row| -> GraphResult<SupplyLink> {
            Ok(SupplyLink {
                from: NodeRef {
                    label: field(row, "from_label")?,
                    id: field(row, "from_id")?,
                    name: field(row, "from_name")?,
                },
                to: NodeRef {
                    label: field(row, "to_label")?,
                    id: field(row, "to_id")?,
                    name: field(row, "to_name")?,
                },
                transport_via: field(row, "transport_via")?,
                quantity: field(row, "quantity")?,
            })
        })
        .collect()
}

/// Suppliers upstream of `company_name`, each with its own suppliers up to `depth` hops.
pub async fn company_subgraph(
    client: &GraphClient,
    database: &str,
    company_name: &str,
    depth: u32,
) -> GraphResult<Vec<SubgraphRow>> {
    let statement = format::company_subgraph(company_name, depth);
    let rows = client.execute(&statement, Some(database)).await?;

    rows.iter()
        .map(|row| -> GraphResult<SubgraphRow> {
            Ok(SubgraphRow {
                company: NodeRef {
                    label: Some("Company".to_string()),
                    id: field(row, "company_id")?,
                    name: field(row, "company_name")?,
                },
                supplier: NodeRef {
                    label: Some("Supplier".to_string()),
                    id: field(row, "supplier_id")?,
                    name: field(row, "supplier_name")?,
                },
                child: NodeRef {
                    label: Some("Supplier".to_string()),
                    id: field(row, "child_id")?,
                    name: field(row, "child_name")?,
                },
            })
        })
        .collect()
}

fn field<T: DeserializeOwned>(row: &Row, name: &str) -> GraphResult<T> {
    row.get(name).map_err(|e| GraphError::Field {
        field: name.to_string(),
        message: format!("{:?}", e),
    })
}
