//! Simulated workspace for the tablelog recipes.
//!
//! All data in this module is hardcoded and fictional. No external systems are
//! contacted. `MockWorkspace` stands in for a real catalog and SQL warehouse
//! and answers the statements produced by [`crate::sql`].
//!
//! | table                    | behaviour                                 |
//! |--------------------------|-------------------------------------------|
//! | `main.sales.orders`      | readable and writable                     |
//! | `main.sales.customers`   | readable and writable                     |
//! | `main.restricted.payroll`| every statement fails with 403 FORBIDDEN  |
//! | `samples.nyctaxi.trips`  | readable, writes fail                     |
//!
//! Successful `INSERT OVERWRITE` statements are recorded but do not change
//! the stored rows.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, PoisonError};

use chrono::NaiveDate;

use tablelog_contracts::{
    error::{TablelogError, TablelogResult},
    identity::Headers,
};
use tablelog_core::traits::PrincipalLookup;

use crate::workspace::{CellValue, ResultSet, Warehouse, Workspace};

/// Name and HTTP path of the default mock warehouse.
pub const STARTER_WAREHOUSE: (&str, &str) = ("Starter Warehouse", "/sql/1.0/warehouses/abc123");
/// Name and HTTP path of the second mock warehouse.
pub const ANALYTICS_WAREHOUSE: (&str, &str) =
    ("Analytics Warehouse", "/sql/1.0/warehouses/def456");

const SELECT_PREFIX: &str = "SELECT * FROM ";
const INSERT_PREFIX: &str = "INSERT OVERWRITE ";

// ── Workspace ─────────────────────────────────────────────────────────────────

pub struct MockWorkspace {
    warehouses: Vec<Warehouse>,
    tables: BTreeMap<String, ResultSet>,
    forbidden: BTreeSet<String>,
    read_only: BTreeSet<String>,
    executed: Mutex<Vec<String>>,
}

impl MockWorkspace {
    /// A workspace seeded with the tables listed in the module docs.
    pub fn new() -> Self {
        let mut tables = BTreeMap::new();
        tables.insert("main.sales.orders".to_string(), orders());
        tables.insert("main.sales.customers".to_string(), customers());
        tables.insert("main.restricted.payroll".to_string(), payroll());
        tables.insert("samples.nyctaxi.trips".to_string(), trips());

        Self {
            warehouses: vec![
                Warehouse {
                    name: STARTER_WAREHOUSE.0.to_string(),
                    http_path: STARTER_WAREHOUSE.1.to_string(),
                },
                Warehouse {
                    name: ANALYTICS_WAREHOUSE.0.to_string(),
                    http_path: ANALYTICS_WAREHOUSE.1.to_string(),
                },
            ],
            tables,
            forbidden: BTreeSet::from(["main.restricted.payroll".to_string()]),
            read_only: BTreeSet::from(["samples.nyctaxi.trips".to_string()]),
            executed: Mutex::new(Vec::new()),
        }
    }

    /// Make every statement against `table` fail with 403 FORBIDDEN.
    pub fn forbid(mut self, table: &str) -> Self {
        self.forbidden.insert(table.to_string());
        self
    }

    /// Make writes to `table` fail.
    pub fn read_only(mut self, table: &str) -> Self {
        self.read_only.insert(table.to_string());
        self
    }

    /// Every statement received so far, in order.
    pub fn executed(&self) -> Vec<String> {
        self.executed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn lookup(&self, table: &str) -> TablelogResult<&ResultSet> {
        if self.forbidden.contains(table) {
            return Err(TablelogError::QueryFailed {
                message: format!(
                    "Error during request to server: 403 FORBIDDEN: PERMISSION_DENIED: \
                     User does not have SELECT on Table '{table}'."
                ),
            });
        }
        self.tables.get(table).ok_or_else(|| TablelogError::QueryFailed {
            message: format!(
                "[TABLE_OR_VIEW_NOT_FOUND] The table or view {table} cannot be found."
            ),
        })
    }
}

impl Default for MockWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace for MockWorkspace {
    fn list_warehouses(&self) -> TablelogResult<Vec<Warehouse>> {
        Ok(self.warehouses.clone())
    }

    fn list_catalogs(&self) -> TablelogResult<Vec<String>> {
        let catalogs: BTreeSet<&str> = self.tables.keys().filter_map(|k| part(k, 0)).collect();
        Ok(catalogs.into_iter().map(str::to_string).collect())
    }

    fn list_schemas(&self, catalog: &str) -> TablelogResult<Vec<String>> {
        let schemas: BTreeSet<&str> = self
            .tables
            .keys()
            .filter(|k| part(k, 0) == Some(catalog))
            .filter_map(|k| part(k, 1))
            .collect();
        Ok(schemas.into_iter().map(str::to_string).collect())
    }

    fn list_tables(&self, catalog: &str, schema: &str) -> TablelogResult<Vec<String>> {
        Ok(self
            .tables
            .keys()
            .filter(|k| part(k, 0) == Some(catalog) && part(k, 1) == Some(schema))
            .filter_map(|k| part(k, 2))
            .map(str::to_string)
            .collect())
    }

    fn execute(&self, http_path: &str, statement: &str) -> TablelogResult<ResultSet> {
        self.executed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(statement.to_string());

        if !self.warehouses.iter().any(|w| w.http_path == http_path) {
            return Err(TablelogError::ConnectionFailed {
                message: format!("no SQL warehouse is reachable at '{http_path}'"),
            });
        }

        if let Some(rest) = statement.strip_prefix(SELECT_PREFIX) {
            let table = unquote(rest.trim());
            return self.lookup(&table).cloned();
        }

        if let Some(rest) = statement.strip_prefix(INSERT_PREFIX) {
            let target = rest.split(" VALUES ").next().unwrap_or_default();
            let table = unquote(target.trim());
            self.lookup(&table)?;
            if self.read_only.contains(&table) {
                return Err(TablelogError::QueryFailed {
                    message: format!(
                        "[INSUFFICIENT_PERMISSIONS] User does not have MODIFY on Table '{table}'."
                    ),
                });
            }
            return Ok(ResultSet::default());
        }

        Err(TablelogError::QueryFailed {
            message: "[PARSE_SYNTAX_ERROR] unsupported statement".to_string(),
        })
    }
}

fn part(qualified: &str, index: usize) -> Option<&str> {
    qualified.split('.').nth(index)
}

/// `` `a`.`b`.`c` `` → `a.b.c`
fn unquote(name: &str) -> String {
    name.replace("``", "\u{0}").replace('`', "").replace('\u{0}', "`")
}

// ── Principal ─────────────────────────────────────────────────────────────────

/// A principal lookup that always answers with the same user name.
#[derive(Debug, Clone)]
pub struct FixedPrincipal {
    name: String,
}

impl FixedPrincipal {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl PrincipalLookup for FixedPrincipal {
    fn current_user_name(&self) -> TablelogResult<String> {
        Ok(self.name.clone())
    }
}

// ── Seed data ─────────────────────────────────────────────────────────────────

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn day(year: i32, month: u32, dom: u32) -> CellValue {
    NaiveDate::from_ymd_opt(year, month, dom).map_or(CellValue::Null, CellValue::Date)
}

fn orders() -> ResultSet {
    ResultSet::new(
        columns(&["order_id", "customer", "amount", "shipped", "note", "order_date"]),
        vec![
            vec![
                CellValue::Int(1001),
                CellValue::text("Acme Corp"),
                CellValue::Float(249.99),
                CellValue::Bool(true),
                CellValue::Null,
                day(2026, 4, 2),
            ],
            vec![
                CellValue::Int(1002),
                CellValue::text("O'Brien Supplies"),
                CellValue::Float(80.0),
                CellValue::Bool(false),
                CellValue::text("call before delivery"),
                day(2026, 4, 9),
            ],
            vec![
                CellValue::Int(1003),
                CellValue::text("Globex"),
                CellValue::Float(1200.5),
                CellValue::Bool(true),
                CellValue::Null,
                day(2026, 4, 15),
            ],
        ],
    )
}

fn customers() -> ResultSet {
    ResultSet::new(
        columns(&["customer_id", "name", "region"]),
        vec![
            vec![CellValue::Int(1), CellValue::text("Acme Corp"), CellValue::text("EMEA")],
            vec![CellValue::Int(2), CellValue::text("Globex"), CellValue::text("AMER")],
        ],
    )
}

fn payroll() -> ResultSet {
    ResultSet::new(
        columns(&["employee_id", "salary"]),
        vec![vec![CellValue::Int(7), CellValue::Float(0.0)]],
    )
}

fn trips() -> ResultSet {
    ResultSet::new(
        columns(&["pickup_zip", "dropoff_zip", "fare_amount"]),
        vec![
            vec![CellValue::Int(10103), CellValue::Int(10110), CellValue::Float(8.5)],
            vec![CellValue::Int(10023), CellValue::Int(10023), CellValue::Float(6.0)],
            vec![CellValue::Int(10001), CellValue::Int(10282), CellValue::Float(21.5)],
            vec![CellValue::Int(10044), CellValue::Int(10111), CellValue::Float(13.0)],
        ],
    )
}

// ── Request headers ───────────────────────────────────────────────────────────

/// Headers as the reverse proxy forwards them for a signed-in user.
pub fn sample_headers() -> Headers {
    [
        ("Host", "tablelog-demo.example.com"),
        ("X-Forwarded-Email", "dana.lee@example.com"),
        ("X-Forwarded-Preferred-Username", "dana.lee"),
        ("X-Forwarded-User", "4821337@7700912"),
        ("X-Real-Ip", "192.0.2.10"),
        ("User-Agent", "Mozilla/5.0"),
    ]
    .into_iter()
    .collect()
}
