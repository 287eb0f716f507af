//! Query execution tool.
//!
//! Implements `query_database`: route by database id, reject statements that
//! start with a forbidden keyword or hold more than one statement, run the
//! rest unchanged.

use crate::db::ConnectionManager;
use crate::error::DbResult;
use crate::tools::{guard, statement};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::info;

/// Input for the query_database tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct QueryInput {
    /// The user's question in natural language
    #[serde(default)]
    pub query: String,
    /// Target database id (e.g. "db1"). Required.
    #[serde(rename = "dbId", default)]
    pub db_id: String,
    /// SQL statement to run. DROP/DELETE/TRUNCATE/ALTER/UPDATE are rejected.
    pub sql: String,
}

/// Output from the query_database tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct QueryOutput {
    /// Database name on the server
    pub database: String,
    pub database_id: String,
    pub row_count: usize,
    pub rows: Vec<serde_json::Map<String, JsonValue>>,
}

pub struct QueryToolHandler {
    connection_manager: Arc<ConnectionManager>,
}

impl QueryToolHandler {
    pub fn new(connection_manager: Arc<ConnectionManager>) -> Self {
        Self { connection_manager }
    }

    /// Handle the query_database tool call.
    ///
    /// The id is checked before the statement, so an unknown id is reported
    /// even for a statement the guard would reject.
    pub async fn query(&self, input: QueryInput) -> DbResult<QueryOutput> {
        let (config, pool) = self.connection_manager.resolve(&input.db_id)?;
        guard::check_query(&input.sql)?;
        statement::check_single_statement(&input.sql, pool.db_type())?;

        info!(
            database_id = %config.id,
            question = %input.query,
            "Executing query"
        );

        let result = self
            .connection_manager
            .execute(&config.id, &input.sql, &[])
            .await?;

        info!(
            database_id = %config.id,
            row_count = result.row_count(),
            execution_time_ms = result.execution_time_ms,
            "Query finished"
        );

        Ok(QueryOutput {
            database: config.database.clone(),
            database_id: config.id.clone(),
            row_count: result.row_count(),
            rows: result.rows,
        })
    }
}
