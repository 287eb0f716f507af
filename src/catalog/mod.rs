//! Startup schema catalog: loading and the published summary.

pub mod description;
pub mod loader;

pub use description::build_schema_description;
pub use loader::{LoadReport, LoadStatus, SchemaLoader};
