//! MCP tool implementations.
//!
//! - `query`: `query_database`, guarded read-only execution
//! - `schema`: `list_databases`, `list_tables`, `describe_table`
//! - `guard`: leading-keyword check for mutating statements
//! - `statement`: one statement per call
//! - `format`: text rendering of tool outputs

pub mod format;
pub mod guard;
pub mod query;
pub mod schema;
pub mod statement;

pub use format::ToolText;
pub use guard::{check_query, is_dangerous_query};
pub use query::{QueryInput, QueryOutput, QueryToolHandler};
pub use schema::{
    DescribeTableInput, DescribeTableOutput, ListTablesInput, ListTablesOutput, SchemaToolHandler,
};
pub use statement::check_single_statement;
