//! The data platform as the recipes see it.
//!
//! `Workspace` covers the two SDK surfaces the recipes use: catalog browsing
//! (warehouses, catalogs, schemas, tables) and statement execution on a SQL
//! warehouse. Authentication belongs to whoever implements it.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use tablelog_contracts::error::TablelogResult;

/// A SQL warehouse and the HTTP path used to connect to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warehouse {
    pub name: String,
    pub http_path: String,
}

/// One cell of a result set.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// A calendar date, serialized as `%Y-%m-%d`.
    Date(NaiveDate),
    Text(String),
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// Floats compare by value, except that NaN equals NaN so an untouched NaN
// cell never shows up as an edit.
impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => true,
            (CellValue::Bool(a), CellValue::Bool(b)) => a == b,
            (CellValue::Int(a), CellValue::Int(b)) => a == b,
            (CellValue::Float(a), CellValue::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (CellValue::Date(a), CellValue::Date(b)) => a == b,
            (CellValue::Text(a), CellValue::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for CellValue {}

impl Hash for CellValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Null => {}
            CellValue::Bool(b) => b.hash(state),
            CellValue::Int(i) => i.hash(state),
            CellValue::Float(f) => {
                let canonical = if *f == 0.0 {
                    0.0f64
                } else if f.is_nan() {
                    f64::NAN
                } else {
                    *f
                };
                canonical.to_bits().hash(state);
            }
            CellValue::Date(d) => d.hash(state),
            CellValue::Text(s) => s.hash(state),
        }
    }
}

/// Rows returned by a statement, or rows about to be written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl ResultSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Catalog browsing and statement execution.
pub trait Workspace: Send + Sync {
    fn list_warehouses(&self) -> TablelogResult<Vec<Warehouse>>;

    fn list_catalogs(&self) -> TablelogResult<Vec<String>>;

    fn list_schemas(&self, catalog: &str) -> TablelogResult<Vec<String>>;

    fn list_tables(&self, catalog: &str, schema: &str) -> TablelogResult<Vec<String>>;

    /// Run `statement` on the warehouse reachable at `http_path`.
    fn execute(&self, http_path: &str, statement: &str) -> TablelogResult<ResultSet>;
}

impl<T: Workspace + ?Sized> Workspace for Arc<T> {
    fn list_warehouses(&self) -> TablelogResult<Vec<Warehouse>> {
        (**self).list_warehouses()
    }

    fn list_catalogs(&self) -> TablelogResult<Vec<String>> {
        (**self).list_catalogs()
    }

    fn list_schemas(&self, catalog: &str) -> TablelogResult<Vec<String>> {
        (**self).list_schemas(catalog)
    }

    fn list_tables(&self, catalog: &str, schema: &str) -> TablelogResult<Vec<String>> {
        (**self).list_tables(catalog, schema)
    }

    fn execute(&self, http_path: &str, statement: &str) -> TablelogResult<ResultSet> {
        (**self).execute(http_path, statement)
    }
}
