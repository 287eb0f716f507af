//! Database abstraction layer.
//!
//! - Connection pool management
//! - Query execution
//! - Schema introspection
//! - Row decoding

pub mod executor;
pub mod pool;
pub mod schema;
pub mod types;

pub use executor::QueryExecutor;
pub use pool::{ConnectionManager, DbPool};
pub use schema::SchemaInspector;
