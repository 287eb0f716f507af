//! Schema introspection.
//!
//! SQL lives in the `queries` submodule, one set per driver. Every lookup that
//! takes a table name binds it as a parameter; nothing is interpolated into
//! the statement text.

use crate::db::executor::QueryExecutor;
use crate::db::pool::DbPool;
use crate::error::{DbError, DbResult};
use crate::models::{
    ColumnDescriptor, ForeignKeyDescriptor, KeyRole, QueryParam, QueryResult, TableSchema,
};
use serde_json::{Map, Value as JsonValue};
use tracing::debug;

/// Reads table and column metadata through a [`QueryExecutor`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaInspector {
    executor: QueryExecutor,
}

impl SchemaInspector {
    pub fn new(executor: QueryExecutor) -> Self {
        Self { executor }
    }

    /// List table names. `database` is the MySQL schema; SQLite ignores it.
    pub async fn list_tables(&self, pool: &DbPool, database: &str) -> DbResult<Vec<String>> {
        let tables = match pool {
            DbPool::MySql(_) => {
                let result = self
                    .executor
                    .fetch_all(pool, queries::mysql::LIST_TABLES, &[])
                    .await?;
                mysql::table_names(&result)
            }
            DbPool::SQLite(_) => {
                let result = self
                    .executor
                    .fetch_all(pool, queries::sqlite::LIST_TABLES, &[])
                    .await?;
                result.string_column("name").map(String::from).collect()
            }
        };

        debug!(database = %database, count = tables.len(), "Listed tables");
        Ok(tables)
    }

    /// Describe a table: columns in declaration order plus foreign keys.
    ///
    /// A table with no columns does not exist and yields a schema error.
    pub async fn describe_table(
        &self,
        pool: &DbPool,
        database: &str,
        table: &str,
    ) -> DbResult<TableSchema> {
        let schema = match pool {
            DbPool::MySql(_) => {
                let params = [QueryParam::from(database), QueryParam::from(table)];
                let columns = self
                    .executor
                    .fetch_all(pool, queries::mysql::DESCRIBE_COLUMNS, &params)
                    .await?;
                let foreign_keys = self
                    .executor
                    .fetch_all(pool, queries::mysql::DESCRIBE_FOREIGN_KEYS, &params)
                    .await?;
                TableSchema::new(
                    mysql::columns(&columns),
                    mysql::foreign_keys(&foreign_keys),
                )
            }
            DbPool::SQLite(_) => {
                let params = [QueryParam::from(table)];
                let columns = self
                    .executor
                    .fetch_all(pool, queries::sqlite::DESCRIBE_COLUMNS, &params)
                    .await?;
                let foreign_keys = self
                    .executor
                    .fetch_all(pool, queries::sqlite::DESCRIBE_FOREIGN_KEYS, &params)
                    .await?;
                let foreign_keys = sqlite::foreign_keys(&foreign_keys);
                TableSchema::new(sqlite::columns(&columns, &foreign_keys), foreign_keys)
            }
        };

        if schema.columns.is_empty() {
            return Err(DbError::schema(
                format!("Table '{}' doesn't exist", table),
                table,
            ));
        }
        Ok(schema)
    }
}

fn text(row: &Map<String, JsonValue>, column: &str) -> Option<String> {
    match row.get(column)? {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn integer(row: &Map<String, JsonValue>, column: &str) -> i64 {
    match row.get(column) {
        Some(JsonValue::Number(n)) => n.as_i64().unwrap_or_default(),
        Some(JsonValue::String(s)) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    }
}

mod queries {
    pub mod mysql {
        pub const LIST_TABLES: &str = "SHOW TABLES";

        pub const DESCRIBE_COLUMNS: &str = r#"
        SELECT
            CONVERT(COLUMN_NAME USING utf8mb4) AS COLUMN_NAME,
            CONVERT(COLUMN_TYPE USING utf8mb4) AS COLUMN_TYPE,
            CONVERT(IS_NULLABLE USING utf8mb4) AS IS_NULLABLE,
            CONVERT(COLUMN_KEY USING utf8mb4) AS COLUMN_KEY,
            CONVERT(COLUMN_DEFAULT USING utf8mb4) AS COLUMN_DEFAULT,
            CONVERT(EXTRA USING utf8mb4) AS EXTRA
        FROM information_schema.COLUMNS
        WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?
        ORDER BY ORDINAL_POSITION
        "#;

        pub const DESCRIBE_FOREIGN_KEYS: &str = r#"
        SELECT
            CONVERT(COLUMN_NAME USING utf8mb4) AS COLUMN_NAME,
            CONVERT(REFERENCED_TABLE_NAME USING utf8mb4) AS REFERENCED_TABLE_NAME,
            CONVERT(REFERENCED_COLUMN_NAME USING utf8mb4) AS REFERENCED_COLUMN_NAME
        FROM information_schema.KEY_COLUMN_USAGE
        WHERE TABLE_SCHEMA = ?
        AND TABLE_NAME = ?
        AND REFERENCED_TABLE_NAME IS NOT NULL
        ORDER BY CONSTRAINT_NAME, ORDINAL_POSITION
        "#;
    }

    pub mod sqlite {
        pub const LIST_TABLES: &str = r#"
            SELECT name FROM sqlite_master
            WHERE type IN ('table', 'view')
            AND name NOT LIKE 'sqlite_%'
            ORDER BY name
            "#;

        pub const DESCRIBE_COLUMNS: &str = r#"
            SELECT cid, name, type, "notnull", dflt_value, pk
            FROM pragma_table_info(?)
            ORDER BY cid
            "#;

        pub const DESCRIBE_FOREIGN_KEYS: &str = r#"
            SELECT id, seq, "table", "from", "to"
            FROM pragma_foreign_key_list(?)
            ORDER BY id, seq
            "#;
    }
}

mod mysql {
    use super::*;

    /// SHOW TABLES names its only column after the schema (`Tables_in_shop`).
    pub fn table_names(result: &QueryResult) -> Vec<String> {
        result
            .rows
            .iter()
            .filter_map(|row| row.values().next())
            .filter_map(|value| value.as_str().map(String::from))
            .collect()
    }

    pub fn columns(result: &QueryResult) -> Vec<ColumnDescriptor> {
        result
            .rows
            .iter()
            .map(|row| {
                let name = text(row, "COLUMN_NAME").unwrap_or_default();
                let column_type = text(row, "COLUMN_TYPE").unwrap_or_default();
                let nullable = text(row, "IS_NULLABLE").is_some_and(|v| v.eq_ignore_ascii_case("YES"));
                let key = text(row, "COLUMN_KEY").unwrap_or_default();

                ColumnDescriptor::new(name, column_type)
                    .nullable(nullable)
                    .key_role(KeyRole::from_mysql(&key))
                    .default_value(text(row, "COLUMN_DEFAULT"))
                    .extra(text(row, "EXTRA").unwrap_or_default())
            })
            .collect()
    }

    pub fn foreign_keys(result: &QueryResult) -> Vec<ForeignKeyDescriptor> {
        result
            .rows
            .iter()
            .map(|row| {
                ForeignKeyDescriptor::new(
                    text(row, "COLUMN_NAME").unwrap_or_default(),
                    text(row, "REFERENCED_TABLE_NAME").unwrap_or_default(),
                    text(row, "REFERENCED_COLUMN_NAME").unwrap_or_default(),
                )
            })
            .collect()
    }
}

mod sqlite {
    use super::*;

    pub fn columns(
        result: &QueryResult,
        foreign_keys: &[ForeignKeyDescriptor],
    ) -> Vec<ColumnDescriptor> {
        result
            .rows
            .iter()
            .map(|row| {
                let name = text(row, "name").unwrap_or_default();
                let primary = integer(row, "pk") > 0;
                let not_null = integer(row, "notnull") != 0;

                let key_role = if primary {
                    KeyRole::Primary
                } else if foreign_keys.iter().any(|fk| fk.column_name == name) {
                    KeyRole::Foreign
                } else {
                    KeyRole::None
                };

                ColumnDescriptor::new(name, text(row, "type").unwrap_or_default())
                    .nullable(!not_null && !primary)
                    .key_role(key_role)
                    .default_value(text(row, "dflt_value"))
            })
            .collect()
    }

    /// `to` is NULL when the reference targets the parent's primary key
    /// implicitly; it is reported as an empty column name.
    pub fn foreign_keys(result: &QueryResult) -> Vec<ForeignKeyDescriptor> {
        result
            .rows
            .iter()
            .map(|row| {
                ForeignKeyDescriptor::new(
                    text(row, "from").unwrap_or_default(),
                    text(row, "table").unwrap_or_default(),
                    text(row, "to").unwrap_or_default(),
                )
            })
            .collect()
    }
}
