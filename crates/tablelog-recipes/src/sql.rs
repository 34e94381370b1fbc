//! SQL text for the two statements the recipes run.
//!
//! Identifiers are always backtick-quoted. Values are rendered as literals:
//! `NULL`, plain numbers, `TRUE`/`FALSE`, `'%Y-%m-%d'` dates, or single-quoted
//! text with embedded quotes doubled. Non-finite floats have no SQL literal and become `NULL`.

use tablelog_contracts::{
    error::{TablelogError, TablelogResult},
    resource::QualifiedName,
};

use crate::workspace::{CellValue, ResultSet};

pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// `` `catalog`.`schema`.`table` ``
pub fn qualified(name: &QualifiedName) -> String {
    format!(
        "{}.{}.{}",
        quote_identifier(&name.catalog),
        quote_identifier(&name.schema),
        quote_identifier(&name.table)
    )
}

pub fn literal(value: &CellValue) -> String {
    match value {
        CellValue::Null => "NULL".to_string(),
        CellValue::Bool(true) => "TRUE".to_string(),
        CellValue::Bool(false) => "FALSE".to_string(),
        CellValue::Int(i) => i.to_string(),
        CellValue::Float(f) if f.is_finite() => f.to_string(),
        CellValue::Float(_) => "NULL".to_string(),
        CellValue::Date(d) => format!("'{}'", d.format("%Y-%m-%d")),
        CellValue::Text(s) => format!("'{}'", s.replace('\'', "''")),
    }
}

pub fn select_all(name: &QualifiedName) -> String {
    format!("SELECT * FROM {}", qualified(name))
}

/// Replace the whole table with `rows`.
///
/// Returns `TablelogError::InvalidStatement` for an empty row set: `INSERT
/// OVERWRITE ... VALUES` needs at least one tuple.
pub fn insert_overwrite(name: &QualifiedName, rows: &ResultSet) -> TablelogResult<String> {
    if rows.is_empty() {
        return Err(TablelogError::InvalidStatement {
            reason: format!("no rows to write to {name}"),
        });
    }

    let values = rows
        .rows
        .iter()
        .map(|row| {
            let cells: Vec<String> = row.iter().map(literal).collect();
            format!("({})", cells.join(","))
        })
        .collect::<Vec<_>>()
        .join(",");

    Ok(format!("INSERT OVERWRITE {} VALUES {}", qualified(name), values))
}
