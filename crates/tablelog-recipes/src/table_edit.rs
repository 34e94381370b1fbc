//! Load a table for editing, diff the edit, and write it back.
//!
//! A save writes two audit records around the statement:
//!
//! 1. `update` with `rows_modified` / `total_rows`, before the write
//! 2. `edit` with `rows_count` on success, or `edit_failed` with the failure
//!
//! An edit that changes nothing writes no record and runs no statement.

use std::collections::HashMap;

use tracing::{info, warn};

use tablelog_contracts::{
    identity::Identity,
    record::{Failure, Operation, RecordDetails},
};

use crate::context::{PageRequest, RecipeContext, TableSelection, UserNotice};
use crate::sql;
use crate::table_read::{read_table, ReadOutcome};
use crate::workspace::{CellValue, ResultSet};

/// A table loaded into an editor.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    pub selection: TableSelection,
    pub original: ResultSet,
}

/// Load the selected table for editing. The read is audited like any other.
pub fn load_for_edit(
    ctx: &RecipeContext,
    request: &PageRequest,
    selection: &TableSelection,
) -> Result<EditSession, UserNotice> {
    match read_table(ctx, request, selection) {
        ReadOutcome::Loaded { rows, .. } => Ok(EditSession {
            selection: selection.clone(),
            original: rows,
        }),
        ReadOutcome::Failed { notice, .. } => Err(notice),
    }
}

/// How an edited row set differs from the original.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowDiff {
    /// Rows present in the edit but not the original.
    pub added: u64,
    /// Rows present in the original but not the edit.
    pub removed: u64,
    /// `max(added, removed)`: a changed row counts once.
    pub rows_modified: u64,
    /// Rows in the edited table.
    pub total_rows: u64,
}

impl RowDiff {
    pub fn is_unchanged(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

/// Multiset difference of two row sets. Row order is ignored; duplicate rows
/// count individually.
pub fn diff_rows(original: &ResultSet, edited: &ResultSet) -> RowDiff {
    let mut balance: HashMap<&[CellValue], i64> = HashMap::new();
    for row in &original.rows {
        *balance.entry(row.as_slice()).or_default() -= 1;
    }
    for row in &edited.rows {
        *balance.entry(row.as_slice()).or_default() += 1;
    }

    let added: i64 = balance.values().filter(|n| **n > 0).sum();
    let removed: i64 = balance.values().filter(|n| **n < 0).map(|n| -n).sum();
    let (added, removed) = (added as u64, removed as u64);

    RowDiff {
        added,
        removed,
        rows_modified: added.max(removed),
        total_rows: edited.len() as u64,
    }
}

/// What a save did.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// The edit matched the original; nothing was written.
    Unchanged,
    Saved { diff: RowDiff, notice: UserNotice },
    Failed {
        diff: RowDiff,
        failure: Failure,
        notice: UserNotice,
    },
}

impl SaveOutcome {
    pub fn notice(&self) -> Option<&UserNotice> {
        match self {
            SaveOutcome::Unchanged => None,
            SaveOutcome::Saved { notice, .. } | SaveOutcome::Failed { notice, .. } => Some(notice),
        }
    }
}

/// Overwrite the table with `edited` when it differs from the session's
/// original rows.
pub fn save_changes(
    ctx: &RecipeContext,
    request: &PageRequest,
    session: &EditSession,
    edited: &ResultSet,
) -> SaveOutcome {
    let diff = diff_rows(&session.original, edited);
    if diff.is_unchanged() {
        return SaveOutcome::Unchanged;
    }

    let caller = ctx.caller(request);
    let selection = &session.selection;
    let target = selection.table.to_string();

    let details = RecordDetails::new()
        .with_warehouse(&selection.warehouse)
        .with_changes(diff.rows_modified, diff.total_rows);
    ctx.emitter
        .record(Operation::Update, &target, &caller.identity, details);

    match write_rows(ctx, selection, edited) {
        Ok(()) => {
            let details = RecordDetails::new()
                .with_warehouse(&selection.warehouse)
                .with_rows_count(edited.len() as u64);
            ctx.emitter
                .record(Operation::Edit, &target, &caller.identity, details);

            info!(table = %target, rows_modified = diff.rows_modified, "table saved");
            SaveOutcome::Saved {
                diff,
                notice: UserNotice::Success("Changes saved".to_string()),
            }
        }
        Err(failure) => {
            record_edit_failure(ctx, &target, &caller.identity, &selection.warehouse, &failure);

            warn!(table = %target, kind = %failure.kind, "table save failed");
            let notice = UserNotice::Error(format!("Error saving changes: {}", failure.message));
            SaveOutcome::Failed {
                diff,
                failure,
                notice,
            }
        }
    }
}

fn write_rows(
    ctx: &RecipeContext,
    selection: &TableSelection,
    edited: &ResultSet,
) -> Result<(), Failure> {
    let statement = sql::insert_overwrite(&selection.table, edited)
        .map_err(|e| Failure::from_error(&e))?;
    let http_path = ctx
        .warehouse_path(&selection.warehouse)
        .map_err(|e| Failure::from_error(&e))?;
    ctx.workspace
        .execute(&http_path, &statement)
        .map(|_| ())
        .map_err(|e| Failure::from_error(&e))
}

fn record_edit_failure(
    ctx: &RecipeContext,
    target: &str,
    identity: &Identity,
    warehouse: &str,
    failure: &Failure,
) {
    let details = RecordDetails::new()
        .with_warehouse(warehouse)
        .with_failure(failure.clone());
    ctx.emitter
        .record(Operation::EditFailed, target, identity, details);
}
