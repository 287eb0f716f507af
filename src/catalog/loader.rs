//! Startup schema loading.
//!
//! Walks every configured database in order, introspects its tables, and
//! fills a [`SchemaCache`]. A database that cannot be introspected is kept in
//! the cache with no tables; loading never fails as a whole.

use crate::db::{ConnectionManager, SchemaInspector};
use crate::error::DbResult;
use crate::models::{DatabaseSchema, SchemaCache};
use std::time::Instant;
use tracing::{info, warn};

/// Outcome of loading one database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loaded { table_count: usize },
    Failed { message: String },
}

/// Per-database outcomes, in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub entries: Vec<(String, LoadStatus)>,
}

impl LoadReport {
    pub fn status(&self, database_id: &str) -> Option<&LoadStatus> {
        self.entries
            .iter()
            .find(|(id, _)| id == database_id)
            .map(|(_, status)| status)
    }

    pub fn failures(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, status)| matches!(status, LoadStatus::Failed { .. }))
            .count()
    }
}

pub struct SchemaLoader<'a> {
    manager: &'a ConnectionManager,
    inspector: SchemaInspector,
}

impl<'a> SchemaLoader<'a> {
    pub fn new(manager: &'a ConnectionManager, inspector: SchemaInspector) -> Self {
        Self { manager, inspector }
    }

    /// Introspect every configured database, one at a time.
    pub async fn load(&self) -> (SchemaCache, LoadReport) {
        let start = Instant::now();
        let mut cache = SchemaCache::new();
        let mut report = LoadReport::default();

        for config in self.manager.databases().iter() {
            info!(database_id = %config.id, database = %config.database, "Loading schema");

            match self.load_database(&config.id, &config.database).await {
                Ok(schema) => {
                    info!(
                        database_id = %config.id,
                        table_count = schema.len(),
                        "Schema loaded"
                    );
                    report.entries.push((
                        config.id.clone(),
                        LoadStatus::Loaded {
                            table_count: schema.len(),
                        },
                    ));
                    cache.insert(config.id.clone(), schema);
                }
                Err(e) => {
                    warn!(
                        database_id = %config.id,
                        error = %e,
                        "Failed to load schema, continuing without it"
                    );
                    report.entries.push((
                        config.id.clone(),
                        LoadStatus::Failed {
                            message: e.to_string(),
                        },
                    ));
                    cache.insert(config.id.clone(), DatabaseSchema::new());
                }
            }
        }

        info!(
            databases = cache.len(),
            failures = report.failures(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Schema loading finished"
        );
        (cache, report)
    }

    async fn load_database(&self, database_id: &str, database: &str) -> DbResult<DatabaseSchema> {
        let pool = self.manager.get_pool(database_id)?;
        let tables = self.inspector.list_tables(pool, database).await?;

        let mut schema = DatabaseSchema::new();
        for table in tables {
            let table_schema = self.inspector.describe_table(pool, database, &table).await?;
            schema.insert(table, table_schema);
        }
        Ok(schema)
    }
}
