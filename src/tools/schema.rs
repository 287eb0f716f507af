//! Schema introspection tools.
//!
//! Implements `list_databases`, `list_tables` and `describe_table`. Table
//! lookups always hit the database; the startup cache only feeds the tool
//! description.

use crate::db::{ConnectionManager, SchemaInspector};
use crate::error::DbResult;
use crate::models::{ColumnDescriptor, DatabaseSummary, ForeignKeyDescriptor};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Input for the list_tables tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListTablesInput {
    /// Database id (e.g. "db1")
    pub database: String,
}

/// Output from the list_tables tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ListTablesOutput {
    pub database_id: String,
    /// Database name on the server
    pub database: String,
    pub tables: Vec<String>,
    pub count: usize,
}

/// Input for the describe_table tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DescribeTableInput {
    /// Database id (e.g. "db1")
    pub database: String,
    /// Name of the table to describe
    pub table: String,
}

/// Output from the describe_table tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct DescribeTableOutput {
    pub database_id: String,
    pub table: String,
    /// Columns in declaration order
    pub columns: Vec<ColumnDescriptor>,
    pub foreign_keys: Vec<ForeignKeyDescriptor>,
}

pub struct SchemaToolHandler {
    connection_manager: Arc<ConnectionManager>,
    inspector: SchemaInspector,
}

impl SchemaToolHandler {
    pub fn new(connection_manager: Arc<ConnectionManager>) -> Self {
        let inspector = SchemaInspector::new(connection_manager.executor());
        Self {
            connection_manager,
            inspector,
        }
    }

    /// Configured databases in configuration order. Passwords are never included.
    pub fn list_databases(&self) -> Vec<DatabaseSummary> {
        self.connection_manager
            .databases()
            .iter()
            .map(DatabaseSummary::from)
            .collect()
    }

    pub async fn list_tables(&self, input: ListTablesInput) -> DbResult<ListTablesOutput> {
        let (config, pool) = self.connection_manager.resolve(&input.database)?;
        let tables = self.inspector.list_tables(pool, &config.database).await?;
        let count = tables.len();

        info!(database_id = %config.id, count = count, "Listed tables");

        Ok(ListTablesOutput {
            database_id: config.id.clone(),
            database: config.database.clone(),
            tables,
            count,
        })
    }

    pub async fn describe_table(&self, input: DescribeTableInput) -> DbResult<DescribeTableOutput> {
        let (config, pool) = self.connection_manager.resolve(&input.database)?;
        let table = input.table.trim();
        let schema = self
            .inspector
            .describe_table(pool, &config.database, table)
            .await?;

        info!(
            database_id = %config.id,
            table = %table,
            columns = schema.columns.len(),
            "Described table"
        );

        Ok(DescribeTableOutput {
            database_id: config.id.clone(),
            table: table.to_string(),
            columns: schema.columns,
            foreign_keys: schema.foreign_keys,
        })
    }
}
