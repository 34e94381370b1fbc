//! Three-level table names (`catalog.schema.table`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{TablelogError, TablelogResult};

/// A fully qualified table name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedName {
    pub catalog: String,
    pub schema: String,
    pub table: String,
}

impl QualifiedName {
    pub fn new(
        catalog: impl Into<String>,
        schema: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            catalog: catalog.into(),
            schema: schema.into(),
            table: table.into(),
        }
    }

    /// Parse `catalog.schema.table`.
    ///
    /// Exactly three dot-separated, non-blank parts are required; surrounding
    /// whitespace on each part is dropped.
    pub fn parse(name: &str) -> TablelogResult<Self> {
        let parts: Vec<&str> = name.split('.').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(TablelogError::InvalidTableName {
                name: name.to_string(),
                reason: format!("expected catalog.schema.table, found {} part(s)", parts.len()),
            });
        }
        if let Some(pos) = parts.iter().position(|p| p.is_empty()) {
            let which = ["catalog", "schema", "table"][pos];
            return Err(TablelogError::InvalidTableName {
                name: name.to_string(),
                reason: format!("{which} name is empty"),
            });
        }
        Ok(Self::new(parts[0], parts[1], parts[2]))
    }
}

impl FromStr for QualifiedName {
    type Err = TablelogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.catalog, self.schema, self.table)
    }
}
