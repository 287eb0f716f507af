//! Schema Gateway MCP Library
//!
//! An MCP server that routes agent SQL to one of several configured MySQL or
//! SQLite databases. Table and column names are introspected at startup and
//! published in the `query_database` tool description.

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod mcp;
pub mod models;
pub mod tools;
pub mod transport;

pub use config::Config;
pub use error::{DbError, DbResult};
pub use mcp::GatewayService;
