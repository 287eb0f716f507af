//! Data models for the schema gateway.
//!
//! This module re-exports all model types used throughout the application.

pub mod connection;
pub mod query;
pub mod schema;

// Re-export commonly used types
pub use connection::{DatabaseSummary, DatabaseType};
pub use query::{QueryParam, QueryResult};
pub use schema::{
    ColumnDescriptor, DatabaseSchema, ForeignKeyDescriptor, KeyRole, SchemaCache, TableSchema,
};
