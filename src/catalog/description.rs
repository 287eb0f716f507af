//! Text summary of the configured databases and their tables.
//!
//! The summary is embedded in the `query_database` tool description so the
//! agent can pick a database and write SQL without a round trip.

use crate::config::DatabaseSet;
use crate::models::SchemaCache;

/// Render the schema summary.
///
/// With an empty cache each database gets one `- id (database)` line. With a
/// populated cache each cached database gets a block listing its tables and
/// columns; blocks are separated by a blank line.
pub fn build_schema_description(databases: &DatabaseSet, cache: &SchemaCache) -> String {
    if cache.is_empty() {
        return databases
            .iter()
            .map(|config| format!("- {} ({})", config.id, config.database))
            .collect::<Vec<_>>()
            .join("\n");
    }

    cache
        .iter()
        .map(|(id, schema)| {
            let name = databases
                .get(id)
                .map(|config| config.database.as_str())
                .unwrap_or(id);

            let mut block = format!("- {} ({}):", id, name);
            for (table, table_schema) in schema.iter() {
                let columns = table_schema.column_names().collect::<Vec<_>>().join(", ");
                block.push_str(&format!("\n  - {}({})", table, columns));
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
