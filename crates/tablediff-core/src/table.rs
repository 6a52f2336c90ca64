//! Table identity

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one comparable table resolved from the dbt manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRef {
    /// Database/project name
    pub database: String,

    /// Schema/dataset name (dev side)
    pub schema: String,

    /// Table name
    pub table: String,
}

impl TableRef {
    /// Create a new table reference
    pub fn new(
        database: impl Into<String>,
        schema: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            database: database.into(),
            schema: schema.into(),
            table: table.into(),
        }
    }

    /// Get fully qualified name
    pub fn fqn(&self) -> String {
        format!("{}.{}.{}", self.database, self.schema, self.table)
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fqn())
    }
}
