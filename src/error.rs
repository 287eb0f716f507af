//! Error types for the schema gateway.
//!
//! Every failure a tool call can hit is a `DbError` variant. Some variants are
//! guidance for the calling agent (missing or unknown database id, rejected
//! statement) rather than faults; `is_guidance` tells them apart so the MCP
//! layer can answer them as normal tool results.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Database ID (dbId) was not specified.\n\nAvailable databases: {}", .available.join(", "))]
    MissingDatabaseId { available: Vec<String> },

    #[error("Database \"{database_id}\" was not found.\n\nAvailable databases: {}", .available.join(", "))]
    UnknownDatabase {
        database_id: String,
        available: Vec<String>,
    },

    #[error(
        "Dangerous operation ({keyword}) is not allowed. Forbidden statements: DROP/DELETE/TRUNCATE/ALTER/UPDATE.\n\nOnly SELECT statements can be executed."
    )]
    DangerousQuery { keyword: String },

    #[error("Invalid query: {message}")]
    InvalidQuery { message: String },

    #[error("Database error: {message}")]
    Database {
        message: String,
        /// e.g., "42S02" for unknown table
        sql_state: Option<String>,
        suggestion: String,
    },

    #[error("Connection failed: {message}")]
    Connection { message: String, suggestion: String },

    #[error("Timeout: {operation} exceeded {elapsed_secs}s")]
    Timeout {
        operation: String,
        elapsed_secs: u64,
    },

    #[error("Schema error: {message} (object: {object})")]
    Schema { message: String, object: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DbError {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a missing database id error listing the configured ids.
    pub fn missing_database_id(available: Vec<String>) -> Self {
        Self::MissingDatabaseId { available }
    }

    /// Create an unknown database error listing the configured ids.
    pub fn unknown_database(database_id: impl Into<String>, available: Vec<String>) -> Self {
        Self::UnknownDatabase {
            database_id: database_id.into(),
            available,
        }
    }

    /// Create a dangerous query error for the matched keyword.
    pub fn dangerous_query(keyword: impl Into<String>) -> Self {
        Self::DangerousQuery {
            keyword: keyword.into(),
        }
    }

    /// Create a database error with optional SQL state.
    pub fn database(
        message: impl Into<String>,
        sql_state: Option<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Database {
            message: message.into(),
            sql_state,
            suggestion: suggestion.into(),
        }
    }

    /// Create a connection error with a helpful suggestion.
    pub fn connection(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Create an invalid query error.
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            message: message.into(),
        }
    }

    /// Create a timeout error.
    pub fn timeout(operation: impl Into<String>, elapsed_secs: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            elapsed_secs,
        }
    }

    /// Create a schema error.
    pub fn schema(message: impl Into<String>, object: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
            object: object.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the suggestion for this error, if available.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Connection { suggestion, .. } => Some(suggestion),
            Self::Database { suggestion, .. } => Some(suggestion),
            Self::InvalidQuery { .. } => Some("Send exactly one SQL statement per call"),
            _ => None,
        }
    }

    /// True for outcomes that answer the caller with guidance instead of
    /// reporting a failure: the statement never reached a database.
    pub fn is_guidance(&self) -> bool {
        matches!(
            self,
            Self::MissingDatabaseId { .. } | Self::UnknownDatabase { .. } | Self::DangerousQuery { .. }
        )
    }
}

/// Convert sqlx errors to DbError.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Configuration(msg) => DbError::connection(
                msg.to_string(),
                "Check the connection settings and credentials",
            ),
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.to_string());
                DbError::database(
                    db_err.message(),
                    code,
                    "Check the SQL syntax and the table/column names in the schema summary",
                )
            }
            sqlx::Error::RowNotFound => DbError::database(
                "No rows returned",
                None,
                "Verify the query conditions match existing data",
            ),
            sqlx::Error::PoolTimedOut => DbError::connection(
                "Timed out waiting for a free pooled connection",
                "The pool is saturated; retry later or raise --max-connections / --acquire-timeout",
            ),
            sqlx::Error::PoolClosed => {
                DbError::connection("Connection pool is closed", "Restart the gateway")
            }
            sqlx::Error::Io(io_err) => DbError::connection(
                format!("I/O error: {}", io_err),
                "Check network connectivity and database server status",
            ),
            sqlx::Error::Tls(tls_err) => DbError::connection(
                format!("TLS error: {}", tls_err),
                "Verify TLS configuration and certificates",
            ),
            sqlx::Error::Protocol(msg) => DbError::connection(
                format!("Protocol error: {}", msg),
                "Check database server compatibility",
            ),
            sqlx::Error::ColumnNotFound(col) => {
                DbError::schema(format!("Column not found: {}", col), col.to_string())
            }
            sqlx::Error::ColumnDecode { index, source } => {
                DbError::internal(format!("Failed to decode column {}: {}", index, source))
            }
            sqlx::Error::Decode(source) => DbError::internal(format!("Decode error: {}", source)),
            sqlx::Error::WorkerCrashed => DbError::internal("Database worker crashed"),
            _ => DbError::internal(format!("Unknown database error: {}", err)),
        }
    }
}

/// Result type alias for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> Vec<String> {
        vec!["db1".to_string(), "db2".to_string()]
    }

    #[test]
    fn test_unknown_database_lists_available_ids() {
        let err = DbError::unknown_database("db9", ids());
        let msg = err.to_string();
        assert!(msg.contains("\"db9\""));
        assert!(msg.contains("db1, db2"));
    }

    #[test]
    fn test_missing_database_id_lists_available_ids() {
        let msg = DbError::missing_database_id(ids()).to_string();
        assert!(msg.contains("not specified"));
        assert!(msg.ends_with("db1, db2"));
    }

    #[test]
    fn test_dangerous_query_names_forbidden_category() {
        let msg = DbError::dangerous_query("DELETE").to_string();
        assert!(msg.contains("DELETE"));
        assert!(msg.contains("DROP/DELETE/TRUNCATE/ALTER/UPDATE"));
    }

    #[test]
    fn test_pool_timeout_is_connection_error() {
        let err = DbError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, DbError::Connection { .. }));
        assert!(!err.to_string().contains("0s"));
        assert!(err.suggestion().unwrap().contains("--acquire-timeout"));
    }

    #[test]
    fn test_invalid_query_is_not_guidance() {
        let err = DbError::invalid_query("Multiple statements are not allowed");
        assert!(!err.is_guidance());
        assert_eq!(
            err.to_string(),
            "Invalid query: Multiple statements are not allowed"
        );
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_guidance_classification() {
        assert!(DbError::missing_database_id(ids()).is_guidance());
        assert!(DbError::unknown_database("x", ids()).is_guidance());
        assert!(DbError::dangerous_query("DROP").is_guidance());
        assert!(!DbError::database("syntax error", None, "fix it").is_guidance());
        assert!(!DbError::timeout("query execution", 30).is_guidance());
    }

    #[test]
    fn test_error_suggestion() {
        let err = DbError::database(
            "Syntax error",
            Some("42000".to_string()),
            "Check SQL syntax",
        );
        assert_eq!(err.suggestion(), Some("Check SQL syntax"));
        assert_eq!(DbError::internal("boom").suggestion(), None);
    }
}
