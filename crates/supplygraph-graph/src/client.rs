//! Neo4j connection client.

use async_trait::async_trait;
use neo4rs::{BoltNull, BoltType, ConfigBuilder, Graph, Query, Row};
use tracing::{debug, info, warn};

use supplygraph_core::{DatabaseConfig, Statement, Value};
use supplygraph_core::format;

use crate::error::{GraphError, GraphResult};

/// Anything that can run statements for the ingestion pipeline.
///
/// Implemented by [`GraphClient`]; the pipeline only depends on this trait.
#[async_trait]
pub trait StatementRunner: Send + Sync {
    /// Run a statement and discard its result.
    async fn run(&self, statement: &Statement, database: Option<&str>) -> GraphResult<()>;

    /// Run a statement that returns a `count` column and read it from the first row.
    async fn query_count(&self, statement: &Statement, database: Option<&str>) -> GraphResult<i64>;
}

/// Client for a single Neo4j server.
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Connect and verify the server answers.
    ///
    /// `Graph::connect` only creates a lazy pool; the `RETURN 1` ping forces the
    /// bolt handshake so bad credentials or an unreachable host fail here.
    pub async fn connect(config: &DatabaseConfig) -> GraphResult<Self> {
        let connection_err = |source| GraphError::Connection {
            uri: config.url().to_string(),
            source,
        };

        let neo4j_config = ConfigBuilder::default()
            .uri(config.url())
            .user(config.user())
            .password(config.password())
            .max_connections(1)
            .fetch_size(500)
            .build()
            .map_err(connection_err)?;

        let graph = Graph::connect(neo4j_config).await.map_err(connection_err)?;

        graph
            .run(to_query(&format::ping()))
            .await
            .map_err(connection_err)?;

        info!(uri = config.url(), user = config.user(), "Connected to Neo4j");
        Ok(Self { graph })
    }

    /// Run a statement on `database` (or the server default) and collect every row.
    ///
    /// The session is released once the stream is drained, or dropped on error.
    pub async fn execute(&self, statement: &Statement, database: Option<&str>) -> GraphResult<Vec<Row>> {
        let query = to_query(statement);
        let stream = match database {
            Some(db) => self.graph.execute_on(db, query).await,
            None => self.graph.execute(query).await,
        };
        let mut stream = stream.map_err(|e| query_failed(statement, e))?;

        let mut rows = Vec::new();
        while let Some(row) = stream.next().await.map_err(|e| query_failed(statement, e))? {
            rows.push(row);
        }
        debug!(kind = ?statement.kind, rows = rows.len(), "Statement executed");
        Ok(rows)
    }

    /// Node and relationship counts of `database`.
    pub async fn get_counts(&self, database: Option<&str>) -> GraphResult<GraphCounts> {
        let nodes = self.query_count(&format::count_nodes(), database).await?;
        let relationships = self.query_count(&format::count_relationships(), database).await?;

        Ok(GraphCounts {
            nodes: nodes as usize,
            relationships: relationships as usize,
        })
    }

    /// Release the connection pool.
    pub fn close(self) {
        drop(self.graph);
        debug!("Neo4j connection closed");
    }
}

#[async_trait]
impl StatementRunner for GraphClient {
    async fn run(&self, statement: &Statement, database: Option<&str>) -> GraphResult<()> {
        let query = to_query(statement);
        let result = match database {
            Some(db) => self.graph.run_on(db, query).await,
            None => self.graph.run(query).await,
        };
        result.map_err(|e| query_failed(statement, e))
    }

    async fn query_count(&self, statement: &Statement, database: Option<&str>) -> GraphResult<i64> {
        let rows = self.execute(statement, database).await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| GraphError::NoRows(statement.render()))?;
        row.get::<i64>("count").map_err(|e| GraphError::Field {
            field: "count".to_string(),
            message: format!("{:?}", e),
        })
    }
}

/// Node and relationship counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphCounts {
    pub nodes: usize,
    pub relationships: usize,
}

fn query_failed(statement: &Statement, source: neo4rs::Error) -> GraphError {
    let query = statement.render();
    warn!(query = %query, error = %source, "Query failed");
    GraphError::Query { query, source }
}

/// Convert a statement into a driver query, binding every parameter.
pub(crate) fn to_query(statement: &Statement) -> Query {
    statement
        .params
        .iter()
        .fold(Query::new(statement.cypher.clone()), |query, (name, value)| {
            query.param(name, to_bolt(value))
        })
}

fn to_bolt(value: &Value) -> BoltType {
    match value {
        Value::Int(n) => BoltType::from(*n),
        Value::Text(s) => BoltType::from(s.as_str()),
        Value::Null => BoltType::Null(BoltNull),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use supplygraph_core::CompanySupply;

    #[test]
    fn test_to_query_binds_all_params() {
        let stmt = format::link_company_supplier(&CompanySupply {
            supplier_id: 4,
            company_id: 9,
            transport_via: None,
            quantity: Some(12),
        });
        let query = to_query(&stmt);
        for name in ["company_id", "supplier_id", "transport_via", "quantity"] {
            assert!(query.has_param_key(name), "missing param {}", name);
        }
    }

    #[test]
    fn test_to_bolt_null() {
        assert!(matches!(to_bolt(&Value::Null), BoltType::Null(_)));
        assert!(matches!(to_bolt(&Value::Int(3)), BoltType::Integer(_)));
        assert!(matches!(to_bolt(&Value::Text("x".into())), BoltType::String(_)));
    }
}
