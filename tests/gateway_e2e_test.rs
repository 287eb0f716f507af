//! End-to-end tests for the gateway tools over a SQLite database.
//!
//! The database file is prepared with a writable sqlx pool; the gateway then
//! opens it read-only, as it does in production.

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::CallToolResult;
use schema_gateway_mcp::catalog::{SchemaLoader, build_schema_description};
use schema_gateway_mcp::config::{DatabaseConfig, DatabaseSet, PoolSettings};
use schema_gateway_mcp::db::{ConnectionManager, SchemaInspector};
use schema_gateway_mcp::error::DbError;
use schema_gateway_mcp::mcp::GatewayService;
use schema_gateway_mcp::models::KeyRole;
use schema_gateway_mcp::tools::query::{QueryInput, QueryToolHandler};
use schema_gateway_mcp::tools::schema::{DescribeTableInput, ListTablesInput, SchemaToolHandler};
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Create `shop.db` with a populated `users` table and return its path.
async fn create_shop_db(dir: &Path) -> String {
    let path = dir.join("shop.db");
    let options = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(options).await.unwrap();

    sqlx::query("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL, email TEXT)")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query(
        "INSERT INTO users (id, name, email) VALUES \
         (1, 'Alice', 'alice@example.com'), (2, 'Bob', NULL)",
    )
    .execute(&pool)
    .await
    .unwrap();
    pool.close().await;

    path.to_string_lossy().into_owned()
}

async fn setup() -> (TempDir, Arc<ConnectionManager>) {
    let dir = TempDir::new().unwrap();
    let shop = create_shop_db(dir.path()).await;
    let set = DatabaseSet::from_configs([
        DatabaseConfig::sqlite("db1", shop),
        DatabaseConfig::sqlite("db2", dir.path().join("missing.db").to_string_lossy()),
    ])
    .unwrap();
    let manager = ConnectionManager::initialize(Arc::new(set), PoolSettings::default()).unwrap();
    (dir, Arc::new(manager))
}

fn query_input(db_id: &str, sql: &str) -> QueryInput {
    QueryInput {
        query: "test question".to_string(),
        db_id: db_id.to_string(),
        sql: sql.to_string(),
    }
}

fn text(result: &CallToolResult) -> String {
    result.content[0].as_text().unwrap().text.clone()
}

#[tokio::test]
async fn test_list_and_describe_tables() {
    let (_dir, manager) = setup().await;
    let handler = SchemaToolHandler::new(manager);

    let tables = handler
        .list_tables(ListTablesInput {
            database: "db1".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(tables.tables, vec!["users"]);
    assert_eq!(tables.count, 1);
    assert_eq!(tables.database_id, "db1");

    let described = handler
        .describe_table(DescribeTableInput {
            database: "DB1".to_string(),
            table: "users".to_string(),
        })
        .await
        .unwrap();
    let names: Vec<&str> = described.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["id", "name", "email"]);
    assert_eq!(described.columns[0].key_role, KeyRole::Primary);
    assert!(!described.columns[1].nullable);
    assert!(described.columns[2].nullable);
    assert!(described.foreign_keys.is_empty());
}

#[tokio::test]
async fn test_describe_missing_table_is_error() {
    let (_dir, manager) = setup().await;
    let service = GatewayService::new(manager, String::new());

    let result = service
        .describe_table(Parameters(DescribeTableInput {
            database: "db1".to_string(),
            table: "orders".to_string(),
        }))
        .await
        .unwrap();
    assert_eq!(result.is_error, Some(true));
    assert!(text(&result).contains("orders"));
}

#[tokio::test]
async fn test_unknown_database_is_guidance() {
    let (_dir, manager) = setup().await;
    let handler = QueryToolHandler::new(manager.clone());

    let err = handler
        .query(query_input("db9", "SELECT * FROM users"))
        .await
        .unwrap_err();
    match err {
        DbError::UnknownDatabase {
            database_id,
            available,
        } => {
            assert_eq!(database_id, "db9");
            assert_eq!(available, vec!["db1", "db2"]);
        }
        other => panic!("expected UnknownDatabase, got {other:?}"),
    }

    let service = GatewayService::new(manager, String::new());
    let result = service
        .query_database(Parameters(query_input("db9", "SELECT * FROM users")))
        .await
        .unwrap();
    assert_ne!(result.is_error, Some(true));
    assert!(text(&result).contains("Available databases: db1, db2"));
}

#[tokio::test]
async fn test_unknown_database_guidance_for_every_tool() {
    let (_dir, manager) = setup().await;
    let service = GatewayService::new(manager, String::new());

    let results = [
        service
            .query_database(Parameters(query_input("nope", "SELECT 1")))
            .await
            .unwrap(),
        service
            .list_tables(Parameters(ListTablesInput {
                database: "nope".to_string(),
            }))
            .await
            .unwrap(),
        service
            .describe_table(Parameters(DescribeTableInput {
                database: "nope".to_string(),
                table: "users".to_string(),
            }))
            .await
            .unwrap(),
    ];

    for result in &results {
        assert_ne!(result.is_error, Some(true));
        assert!(text(result).ends_with("Available databases: db1, db2"));
    }
}

#[tokio::test]
async fn test_missing_database_id_is_guidance() {
    let (_dir, manager) = setup().await;
    let service = GatewayService::new(manager, String::new());

    let result = service
        .query_database(Parameters(query_input("  ", "SELECT 1")))
        .await
        .unwrap();
    assert_ne!(result.is_error, Some(true));
    assert!(text(&result).starts_with("Database ID (dbId) was not specified."));
}

#[tokio::test]
async fn test_delete_is_rejected_without_touching_data() {
    let (_dir, manager) = setup().await;
    let handler = QueryToolHandler::new(manager);

    let err = handler
        .query(query_input("db1", "DELETE FROM users"))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::DangerousQuery { ref keyword } if keyword == "DELETE"));

    let count = handler
        .query(query_input("db1", "SELECT COUNT(*) AS n FROM users"))
        .await
        .unwrap();
    assert_eq!(count.rows[0]["n"], 2);
}

#[tokio::test]
async fn test_rejection_happens_before_any_connection() {
    let (_dir, manager) = setup().await;
    let handler = QueryToolHandler::new(manager);

    // db2 points at a file that does not exist; reaching the pool would fail.
    let err = handler
        .query(query_input("db2", "drop table users"))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::DangerousQuery { .. }));
}

#[tokio::test]
async fn test_select_returns_rows() {
    let (_dir, manager) = setup().await;
    let service = GatewayService::new(manager, String::new());

    let result = service
        .query_database(Parameters(query_input(
            "db1",
            "SELECT id, name FROM users WHERE id = 1",
        )))
        .await
        .unwrap();
    assert_ne!(result.is_error, Some(true));

    let body = text(&result);
    let (header, json) = body.split_once("\n\n").unwrap();
    assert!(header.ends_with("Rows: 1"));

    let parsed: serde_json::Value = serde_json::from_str(json).unwrap();
    assert_eq!(parsed["database_id"], "db1");
    assert_eq!(parsed["row_count"], 1);
    assert_eq!(parsed["rows"][0]["id"], 1);
    assert_eq!(parsed["rows"][0]["name"], "Alice");
}

#[tokio::test]
async fn test_null_values_are_json_null() {
    let (_dir, manager) = setup().await;
    let handler = QueryToolHandler::new(manager);

    let output = handler
        .query(query_input("db1", "SELECT email FROM users WHERE id = 2"))
        .await
        .unwrap();
    assert_eq!(output.row_count, 1);
    assert!(output.rows[0]["email"].is_null());
}

#[tokio::test]
async fn test_database_error_is_error_result() {
    let (_dir, manager) = setup().await;
    let service = GatewayService::new(manager, String::new());

    let result = service
        .query_database(Parameters(query_input("db1", "SELECT * FROM orders")))
        .await
        .unwrap();
    assert_eq!(result.is_error, Some(true));
    let body = text(&result);
    assert!(body.starts_with("Error: "));
    assert!(body.contains("orders"));
}

#[tokio::test]
async fn test_insert_is_not_filtered_but_pool_is_read_only() {
    let (_dir, manager) = setup().await;
    let handler = QueryToolHandler::new(manager);

    let err = handler
        .query(query_input("db1", "INSERT INTO users (id, name) VALUES (3, 'Carol')"))
        .await
        .unwrap_err();
    assert!(!err.is_guidance());
}

#[tokio::test]
async fn test_published_description_lists_loaded_schema() {
    let (_dir, manager) = setup().await;
    let inspector = SchemaInspector::new(manager.executor());
    let (cache, report) = SchemaLoader::new(&manager, inspector).load().await;
    assert_eq!(report.failures(), 1);

    let summary = build_schema_description(manager.databases(), &cache);
    let service = GatewayService::new(manager, summary);
    let description = service.tool_description("query_database").unwrap();
    assert!(description.contains("  - users(id, name, email)"));
}

#[tokio::test]
async fn test_multiple_statements_refused_before_any_connection() {
    let (_dir, manager) = setup().await;
    let handler = QueryToolHandler::new(manager);

    // db2 points at a file that does not exist; reaching the pool would fail.
    let err = handler
        .query(query_input("db2", "SELECT 1 AS a; SELECT 2 AS a"))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::InvalidQuery { .. }), "{err:?}");
    assert!(!err.is_guidance());
}

#[tokio::test]
async fn test_trailing_statement_after_select_never_runs() {
    let (_dir, manager) = setup().await;
    let service = GatewayService::new(manager.clone(), String::new());

    for sql in [
        "SELECT 1 AS a; SELECT 2 AS a",
        "SELECT 1; DROP TABLE users",
        "SELECT * FROM users;\nDELETE FROM users;",
    ] {
        let result = service
            .query_database(Parameters(query_input("db1", sql)))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true), "{sql:?}");
        assert!(text(&result).contains("Multiple statements"), "{sql:?}");
    }

    let count = QueryToolHandler::new(manager)
        .query(query_input("db1", "SELECT COUNT(*) AS n FROM users;"))
        .await
        .unwrap();
    assert_eq!(count.rows[0]["n"], 2);
}

#[tokio::test]
async fn test_row_keys_follow_select_order() {
    let (_dir, manager) = setup().await;
    let handler = QueryToolHandler::new(manager.clone());

    let output = handler
        .query(query_input("db1", "SELECT name, id FROM users WHERE id = 1"))
        .await
        .unwrap();
    let keys: Vec<&str> = output.rows[0].keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["name", "id"]);

    let service = GatewayService::new(manager, String::new());
    let result = service
        .query_database(Parameters(query_input(
            "db1",
            "SELECT email, name, id FROM users WHERE id = 1",
        )))
        .await
        .unwrap();
    let body = text(&result);
    let email = body.find("\"email\"").unwrap();
    let name = body.find("\"name\"").unwrap();
    let id = body.rfind("\"id\"").unwrap();
    assert!(email < name && name < id, "{body}");
}
