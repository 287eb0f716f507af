//! Connection pool management.
//!
//! One driver-specific pool (MySqlPool, SqlitePool) per configured database,
//! created once at startup and shared read-only afterwards. Pools connect
//! lazily: an unreachable database fails on first use, not at startup.

use crate::config::{DatabaseConfig, DatabaseSet, PoolSettings};
use crate::db::executor::QueryExecutor;
use crate::error::{DbError, DbResult};
use crate::models::{DatabaseType, QueryParam, QueryResult};
use sqlx::{
    MySqlPool, SqlitePool, mysql::MySqlConnectOptions, mysql::MySqlPoolOptions,
    sqlite::SqliteConnectOptions, sqlite::SqlitePoolOptions,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Database-specific connection pool (avoids AnyPool limitations).
#[derive(Debug, Clone)]
pub enum DbPool {
    MySql(MySqlPool),
    SQLite(SqlitePool),
}

impl DbPool {
    /// Build a pool for `config` without opening any connection yet.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn connect_lazy(config: &DatabaseConfig, settings: &PoolSettings) -> Self {
        match config.driver {
            DatabaseType::MySQL => {
                let options = MySqlConnectOptions::new()
                    .host(&config.host)
                    .port(config.port)
                    .username(&config.user)
                    .password(&config.password)
                    .database(&config.database)
                    .charset("utf8mb4");

                let pool = MySqlPoolOptions::new()
                    .max_connections(settings.max_connections)
                    .acquire_timeout(settings.acquire_timeout)
                    .connect_lazy_with(options);
                DbPool::MySql(pool)
            }
            DatabaseType::SQLite => {
                let options = SqliteConnectOptions::new()
                    .filename(&config.database)
                    .read_only(true);

                let pool = SqlitePoolOptions::new()
                    .max_connections(settings.max_connections)
                    .acquire_timeout(settings.acquire_timeout)
                    .connect_lazy_with(options);
                DbPool::SQLite(pool)
            }
        }
    }

    /// Close the connection pool.
    pub async fn close(&self) {
        match self {
            DbPool::MySql(pool) => pool.close().await,
            DbPool::SQLite(pool) => pool.close().await,
        }
    }

    /// Get the database type for this pool.
    pub fn db_type(&self) -> DatabaseType {
        match self {
            DbPool::MySql(_) => DatabaseType::MySQL,
            DbPool::SQLite(_) => DatabaseType::SQLite,
        }
    }
}

/// Owns every pool and routes statements by database id.
#[derive(Debug)]
pub struct ConnectionManager {
    databases: Arc<DatabaseSet>,
    pools: HashMap<String, DbPool>,
    executor: QueryExecutor,
}

impl ConnectionManager {
    /// Create one pool per configured database.
    pub fn initialize(databases: Arc<DatabaseSet>, settings: PoolSettings) -> DbResult<Self> {
        settings.validate().map_err(DbError::configuration)?;

        let mut pools = HashMap::with_capacity(databases.len());
        for config in databases.iter() {
            info!(
                database_id = %config.id,
                db_type = %config.driver,
                database = %config.database,
                max_connections = settings.max_connections,
                "Creating connection pool"
            );
            pools.insert(config.id.clone(), DbPool::connect_lazy(config, &settings));
        }

        Ok(Self {
            databases,
            pools,
            executor: QueryExecutor::new(settings.query_timeout),
        })
    }

    /// Get the pool for an exact (lowercase) id.
    ///
    /// Every call for the same id returns the same pool.
    pub fn get_pool(&self, database_id: &str) -> DbResult<&DbPool> {
        self.pools
            .get(database_id)
            .ok_or_else(|| DbError::unknown_database(database_id, self.database_ids()))
    }

    /// Resolve a caller-supplied id: trims, lowercases, and looks it up.
    pub fn resolve(&self, raw_id: &str) -> DbResult<(&DatabaseConfig, &DbPool)> {
        let trimmed = raw_id.trim();
        if trimmed.is_empty() {
            return Err(DbError::missing_database_id(self.database_ids()));
        }

        let database_id = trimmed.to_lowercase();
        let config = self
            .databases
            .get(&database_id)
            .ok_or_else(|| DbError::unknown_database(trimmed, self.database_ids()))?;
        let pool = self.get_pool(&config.id)?;
        Ok((config, pool))
    }

    /// Run a statement against the pool registered under `database_id`.
    pub async fn execute(
        &self,
        database_id: &str,
        sql: &str,
        params: &[QueryParam],
    ) -> DbResult<QueryResult> {
        let pool = self.get_pool(database_id)?;
        let result = self.executor.fetch_all(pool, sql, params).await?;
        debug!(
            database_id = %database_id,
            row_count = result.row_count(),
            execution_time_ms = result.execution_time_ms,
            "Query completed"
        );
        Ok(result)
    }

    pub fn executor(&self) -> QueryExecutor {
        self.executor
    }

    pub fn databases(&self) -> &DatabaseSet {
        &self.databases
    }

    /// Configured ids in configuration order.
    pub fn database_ids(&self) -> Vec<String> {
        self.databases.ids()
    }

    /// Close every pool. In-flight statements finish first.
    pub async fn close_all(&self) {
        for config in self.databases.iter() {
            if let Some(pool) = self.pools.get(&config.id) {
                info!(database_id = %config.id, "Closing connection pool");
                pool.close().await;
            }
        }
        info!("All connection pools closed");
    }
}
