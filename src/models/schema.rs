//! Schema-related data models.
//!
//! Everything the loader captures at startup and `describe_table` returns
//! live. Tables and databases keep introspection order.

use schemars::JsonSchema;
use serde::Serialize;

/// Index participation of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum KeyRole {
    #[default]
    None,
    Primary,
    Unique,
    /// Leading column of a non-unique index
    Multiple,
    Foreign,
}

impl KeyRole {
    /// Parse the MySQL `COLUMN_KEY` value (`PRI`, `UNI`, `MUL`, empty).
    pub fn from_mysql(key: &str) -> Self {
        match key.trim().to_ascii_uppercase().as_str() {
            "PRI" => Self::Primary,
            "UNI" => Self::Unique,
            "MUL" => Self::Multiple,
            _ => Self::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct ColumnDescriptor {
    pub name: String,
    /// Declared type text (e.g., "varchar(255)", "INTEGER")
    #[serde(rename = "type")]
    pub column_type: String,
    pub nullable: bool,
    pub key_role: KeyRole,
    pub default_value: Option<String>,
    /// e.g., "auto_increment"
    pub extra: String,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            nullable: true,
            key_role: KeyRole::None,
            default_value: None,
            extra: String::new(),
        }
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn key_role(mut self, key_role: KeyRole) -> Self {
        self.key_role = key_role;
        self
    }

    pub fn default_value(mut self, default_value: Option<String>) -> Self {
        self.default_value = default_value;
        self
    }

    pub fn extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = extra.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct ForeignKeyDescriptor {
    pub column_name: String,
    pub referenced_table: String,
    pub referenced_column: String,
}

impl ForeignKeyDescriptor {
    pub fn new(
        column_name: impl Into<String>,
        referenced_table: impl Into<String>,
        referenced_column: impl Into<String>,
    ) -> Self {
        Self {
            column_name: column_name.into(),
            referenced_table: referenced_table.into(),
            referenced_column: referenced_column.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
pub struct TableSchema {
    pub columns: Vec<ColumnDescriptor>,
    pub foreign_keys: Vec<ForeignKeyDescriptor>,
}

impl TableSchema {
    pub fn new(columns: Vec<ColumnDescriptor>, foreign_keys: Vec<ForeignKeyDescriptor>) -> Self {
        Self {
            columns,
            foreign_keys,
        }
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}

/// Ordered mapping table name -> structure for one database.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseSchema {
    tables: Vec<(String, TableSchema)>,
}

impl DatabaseSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a table, replacing an existing entry of the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, table: TableSchema) {
        let name = name.into();
        match self.tables.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = table,
            None => self.tables.push((name, table)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&TableSchema> {
        self.tables
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, table)| table)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TableSchema)> {
        self.tables.iter().map(|(n, t)| (n.as_str(), t))
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Startup snapshot: ordered database id -> schema. Read-only once built.
///
/// A database whose introspection failed is present with an empty
/// [`DatabaseSchema`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaCache {
    databases: Vec<(String, DatabaseSchema)>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, schema: DatabaseSchema) {
        let id = id.into();
        match self.databases.iter_mut().find(|(n, _)| *n == id) {
            Some((_, existing)) => *existing = schema,
            None => self.databases.push((id, schema)),
        }
    }

    pub fn get(&self, id: &str) -> Option<&DatabaseSchema> {
        self.databases
            .iter()
            .find(|(n, _)| n == id)
            .map(|(_, schema)| schema)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DatabaseSchema)> {
        self.databases.iter().map(|(n, s)| (n.as_str(), s))
    }

    pub fn len(&self) -> usize {
        self.databases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.databases.is_empty()
    }
}
