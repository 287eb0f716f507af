//! MCP service implementation using rmcp.
//!
//! `GatewayService` exposes the four gateway tools. The `query_database`
//! description is rebuilt at construction time so it carries the schema
//! summary loaded at startup; the id-taking tools name the configured ids.

use crate::db::ConnectionManager;
use crate::error::DbResult;
use crate::tools::format::{self, ToolText};
use crate::tools::query::{QueryInput, QueryToolHandler};
use crate::tools::schema::{DescribeTableInput, ListTablesInput, SchemaToolHandler};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{
        CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    tool, tool_handler, tool_router,
};
use std::sync::Arc;
use tracing::debug;

const QUERY_TOOL: &str = "query_database";
const LIST_TABLES_TOOL: &str = "list_tables";
const DESCRIBE_TABLE_TOOL: &str = "describe_table";

#[derive(Clone)]
pub struct GatewayService {
    /// Shared connection manager for all database operations
    connection_manager: Arc<ConnectionManager>,
    query_handler: Arc<QueryToolHandler>,
    schema_handler: Arc<SchemaToolHandler>,
    /// Tool router with the startup descriptions applied
    tool_router: ToolRouter<Self>,
}

impl GatewayService {
    /// Create the service.
    ///
    /// `schema_summary` is the output of the schema description builder and
    /// is embedded verbatim into the `query_database` description.
    pub fn new(connection_manager: Arc<ConnectionManager>, schema_summary: String) -> Self {
        let ids = connection_manager.database_ids().join("/");

        let mut tool_router = Self::tool_router();
        set_description(&mut tool_router, QUERY_TOOL, query_description(&schema_summary));
        set_description(
            &mut tool_router,
            LIST_TABLES_TOOL,
            format!("List the tables in a database. Database id: {}", ids),
        );
        set_description(
            &mut tool_router,
            DESCRIBE_TABLE_TOOL,
            format!(
                "Describe a table's columns and foreign keys. Database id: {}",
                ids
            ),
        );

        Self {
            query_handler: Arc::new(QueryToolHandler::new(connection_manager.clone())),
            schema_handler: Arc::new(SchemaToolHandler::new(connection_manager.clone())),
            connection_manager,
            tool_router,
        }
    }

    pub fn connection_manager(&self) -> &Arc<ConnectionManager> {
        &self.connection_manager
    }

    /// Descriptions as published, keyed by tool name.
    pub fn tool_description(&self, name: &str) -> Option<String> {
        self.tool_router
            .map
            .get(name)
            .and_then(|route| route.attr.description.as_ref())
            .map(|description| description.to_string())
    }
}

fn set_description(router: &mut ToolRouter<GatewayService>, name: &str, description: String) {
    if let Some(route) = router.map.get_mut(name) {
        route.attr.description = Some(description.into());
    }
}

fn query_description(schema_summary: &str) -> String {
    format!(
        "Answer a natural-language question by picking the right database and running SQL against it.\n\
        \n\
        Use the databases below to choose the database id (dbId) that fits the question, \
        then write SQL using the exact table and column names listed.\n\
        \n\
        Available databases:\n\
        {}\n\
        \n\
        Notes:\n\
        - Only SELECT statements are intended; DROP, DELETE, TRUNCATE, ALTER and UPDATE are rejected\n\
        - Send one statement per call\n\
        - Use JOIN when the answer spans several tables",
        schema_summary
    )
}

/// Map a handler outcome onto a tool result.
///
/// Guidance (missing/unknown id, rejected statement) is a normal response;
/// everything else is an error result. Neither becomes a protocol error.
fn into_call_result<T: ToolText>(tool: &str, result: DbResult<T>) -> CallToolResult {
    match result {
        Ok(output) => CallToolResult::success(vec![Content::text(output.to_text())]),
        Err(e) if e.is_guidance() => {
            debug!(tool = tool, error = %e, "Returning guidance");
            CallToolResult::success(vec![Content::text(e.to_string())])
        }
        Err(e) => CallToolResult::error(vec![Content::text(format::error_text(&e))]),
    }
}

#[tool_router]
impl GatewayService {
    #[tool(description = "Run a SQL query against one of the configured databases.")]
    pub async fn query_database(
        &self,
        Parameters(input): Parameters<QueryInput>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.query_handler.query(input).await;
        Ok(into_call_result(QUERY_TOOL, result))
    }

    #[tool(description = "List the configured databases with their ids, names, hosts and ports.")]
    pub async fn list_databases(&self) -> Result<CallToolResult, McpError> {
        let databases = self.schema_handler.list_databases();
        Ok(into_call_result("list_databases", Ok(databases)))
    }

    #[tool(description = "List the tables in a database.")]
    pub async fn list_tables(
        &self,
        Parameters(input): Parameters<ListTablesInput>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.schema_handler.list_tables(input).await;
        Ok(into_call_result(LIST_TABLES_TOOL, result))
    }

    #[tool(description = "Describe a table's columns and foreign keys.")]
    pub async fn describe_table(
        &self,
        Parameters(input): Parameters<DescribeTableInput>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.schema_handler.describe_table(input).await;
        Ok(into_call_result(DESCRIBE_TABLE_TOOL, result))
    }
}

#[tool_handler]
impl ServerHandler for GatewayService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "schema-gateway-mcp".to_owned(),
                title: Some("Schema Gateway MCP".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Query several SQL databases through one gateway.\n\
                \n\
                ## Workflow\n\
                1. Read the `query_database` description: it lists every database id with its tables and columns\n\
                2. Call `query_database` with the chosen `dbId` and a SELECT statement\n\
                3. Use `list_tables` / `describe_table` when you need live or more detailed schema\n\
                \n\
                ## Notes\n\
                - Database ids are case-insensitive (`DB1` and `db1` are the same)\n\
                - An unknown or missing id returns the list of valid ids\n\
                - Statements starting with DROP, DELETE, TRUNCATE, ALTER or UPDATE are rejected\n\
                - Only one statement per call; `SELECT 1; SELECT 2` is refused"
                    .to_string(),
            ),
        }
    }
}
