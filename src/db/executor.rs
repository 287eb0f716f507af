//! Query execution engine.
//!
//! Statements run through the pool with optional positional parameters and a
//! timeout around the whole round trip. The full result set is returned.
//!
//! Each driver has its own submodule; the code is kept parallel so the
//! differences between them stay obvious.

use crate::db::pool::DbPool;
use crate::db::types::RowToJson;
use crate::error::{DbError, DbResult};
use crate::models::{QueryParam, QueryResult};
use futures_util::StreamExt;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::debug;

/// Runs statements against a pool.
#[derive(Debug, Clone, Copy)]
pub struct QueryExecutor {
    query_timeout: Duration,
}

impl QueryExecutor {
    pub fn new(query_timeout: Duration) -> Self {
        Self { query_timeout }
    }

    pub fn query_timeout(&self) -> Duration {
        self.query_timeout
    }

    /// Execute a statement and return every row it produces.
    pub async fn fetch_all(
        &self,
        pool: &DbPool,
        sql: &str,
        params: &[QueryParam],
    ) -> DbResult<QueryResult> {
        let start = Instant::now();

        debug!(
            sql = %sql,
            params = params.len(),
            timeout_secs = self.query_timeout.as_secs(),
            "Executing query"
        );

        match pool {
            DbPool::MySql(p) => {
                let rows = mysql::fetch_rows(p, sql, params, self.query_timeout).await?;
                Ok(process_rows(rows, start))
            }
            DbPool::SQLite(p) => {
                let rows = sqlite::fetch_rows(p, sql, params, self.query_timeout).await?;
                Ok(process_rows(rows, start))
            }
        }
    }
}

impl Default for QueryExecutor {
    fn default() -> Self {
        Self::new(Duration::from_secs(
            crate::config::DEFAULT_QUERY_TIMEOUT_SECS,
        ))
    }
}

fn process_rows<R: RowToJson>(rows: Vec<R>, start: Instant) -> QueryResult {
    let execution_time_ms = start.elapsed().as_millis() as u64;

    QueryResult {
        rows: rows.iter().map(RowToJson::to_json_map).collect(),
        execution_time_ms,
    }
}

fn collect_rows<R>(results: Vec<Result<R, sqlx::Error>>) -> DbResult<Vec<R>> {
    let mut rows = Vec::with_capacity(results.len());
    for result in results {
        rows.push(result.map_err(DbError::from)?);
    }
    Ok(rows)
}

fn timeout_error(operation: &str, timeout: Duration) -> DbError {
    DbError::timeout(operation, timeout.as_secs())
}

mod mysql {
    use super::*;
    use sqlx::MySqlPool;
    use sqlx::mysql::{MySqlArguments, MySqlRow};

    pub async fn fetch_rows(
        pool: &MySqlPool,
        sql: &str,
        params: &[QueryParam],
        query_timeout: Duration,
    ) -> DbResult<Vec<MySqlRow>> {
        // Without params use the text protocol: some statements (SHOW ...)
        // are not preparable on every server version
        let rows_future = if params.is_empty() {
            use sqlx::Executor;
            pool.fetch(sql).collect::<Vec<_>>()
        } else {
            let mut query = sqlx::query(sql);
            for param in params {
                query = bind_param(query, param);
            }
            query.fetch(pool).collect::<Vec<_>>()
        };

        match timeout(query_timeout, rows_future).await {
            Ok(results) => collect_rows(results),
            Err(_) => Err(timeout_error("query execution", query_timeout)),
        }
    }

    fn bind_param<'q>(
        query: sqlx::query::Query<'q, sqlx::MySql, MySqlArguments>,
        param: &'q QueryParam,
    ) -> sqlx::query::Query<'q, sqlx::MySql, MySqlArguments> {
        match param {
            QueryParam::Null => query.bind(None::<String>),
            QueryParam::Bool(v) => query.bind(*v),
            QueryParam::Int(v) => query.bind(*v),
            QueryParam::Float(v) => query.bind(*v),
            QueryParam::String(v) => query.bind(v.as_str()),
        }
    }
}

mod sqlite {
    use super::*;
    use sqlx::SqlitePool;
    use sqlx::sqlite::{SqliteArguments, SqliteRow};

    pub async fn fetch_rows(
        pool: &SqlitePool,
        sql: &str,
        params: &[QueryParam],
        query_timeout: Duration,
    ) -> DbResult<Vec<SqliteRow>> {
        let rows_future = if params.is_empty() {
            use sqlx::Executor;
            pool.fetch(sql).collect::<Vec<_>>()
        } else {
            let mut query = sqlx::query(sql);
            for param in params {
                query = bind_param(query, param);
            }
            query.fetch(pool).collect::<Vec<_>>()
        };

        match timeout(query_timeout, rows_future).await {
            Ok(results) => collect_rows(results),
            Err(_) => Err(timeout_error("query execution", query_timeout)),
        }
    }

    fn bind_param<'q>(
        query: sqlx::query::Query<'q, sqlx::Sqlite, SqliteArguments<'q>>,
        param: &'q QueryParam,
    ) -> sqlx::query::Query<'q, sqlx::Sqlite, SqliteArguments<'q>> {
        match param {
            QueryParam::Null => query.bind(None::<String>),
            QueryParam::Bool(v) => query.bind(*v),
            QueryParam::Int(v) => query.bind(*v),
            QueryParam::Float(v) => query.bind(*v),
            QueryParam::String(v) => query.bind(v.as_str()),
        }
    }
}
