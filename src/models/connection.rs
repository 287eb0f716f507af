//! Connection-related data models.

use crate::config::DatabaseConfig;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Supported database types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    /// Includes MariaDB
    #[default]
    MySQL,
    SQLite,
}

impl DatabaseType {
    /// Map a URL scheme (without `:`) to a database type.
    pub fn from_scheme(scheme: &str) -> Option<Self> {
        match scheme.to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Some(Self::MySQL),
            "sqlite" => Some(Self::SQLite),
            _ => None,
        }
    }

    /// Get the display name for this database type.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::MySQL => "MySQL",
            Self::SQLite => "SQLite",
        }
    }
}

impl std::fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Public view of a configured database, as returned by `list_databases`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct DatabaseSummary {
    pub id: String,
    pub database: String,
    /// None for file-backed databases.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

impl From<&DatabaseConfig> for DatabaseSummary {
    fn from(config: &DatabaseConfig) -> Self {
        let (host, port) = match config.driver {
            DatabaseType::MySQL => (Some(config.host.clone()), Some(config.port)),
            DatabaseType::SQLite => (None, None),
        };
        Self {
            id: config.id.clone(),
            database: config.database.clone(),
            host,
            port,
        }
    }
}
