//! Source table descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fully qualified path of a source table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TablePath {
    pub database: Option<String>,
    pub schema: Option<String>,
    pub table: String,
}

impl TablePath {
    /// Create a path with only a table name
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            database: None,
            schema: None,
            table: table.into(),
        }
    }

    /// Create a database-qualified path
    pub fn of(database: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            database: Some(database.into()),
            schema: None,
            table: table.into(),
        }
    }

    /// Create a fully qualified database.schema.table path
    pub fn full(
        database: impl Into<String>,
        schema: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            database: Some(database.into()),
            schema: Some(schema.into()),
            table: table.into(),
        }
    }

    /// Dotted full name, omitting absent qualifiers
    pub fn full_name(&self) -> String {
        let mut parts = Vec::with_capacity(3);
        if let Some(database) = &self.database {
            parts.push(database.as_str());
        }
        if let Some(schema) = &self.schema {
            parts.push(schema.as_str());
        }
        parts.push(self.table.as_str());
        parts.join(".")
    }
}

impl fmt::Display for TablePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())
    }
}

/// Descriptor of a table handed to the chunk splitter
///
/// The optional `query` is a user-supplied SELECT that replaces the direct
/// table scan in generated split queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceTable {
    pub table_path: TablePath,
    pub query: Option<String>,
}

impl SourceTable {
    /// Create a descriptor for a plain table scan
    pub fn new(table_path: TablePath) -> Self {
        Self {
            table_path,
            query: None,
        }
    }

    /// Create a descriptor for a user-supplied query
    pub fn with_query(table_path: TablePath, query: impl Into<String>) -> Self {
        Self {
            table_path,
            query: Some(query.into()),
        }
    }
}
