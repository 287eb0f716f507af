//! MCP server integration.
//!
//! Binds the gateway tool handlers to the MCP protocol through rmcp.

pub mod service;

pub use service::GatewayService;
