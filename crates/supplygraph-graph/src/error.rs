//! Error types for graph operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Failed to connect to {uri}: {source}")]
    Connection {
        uri: String,
        #[source]
        source: neo4rs::Error,
    },

    #[error("Query failed: {query}: {source}")]
    Query {
        query: String,
        #[source]
        source: neo4rs::Error,
    },

    #[error("Failed to read field '{field}': {message}")]
    Field { field: String, message: String },

    #[error("Query returned no rows: {0}")]
    NoRows(String),
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;
