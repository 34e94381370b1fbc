//! Read a table and audit the access.
//!
//! ```text
//!   resolve caller → warehouse path → SELECT * → record read | read_failed
//! ```
//!
//! Exactly one audit record is written per call, whatever happens.

use std::time::Instant;

use chrono::Utc;
use tracing::{info, warn};

use tablelog_contracts::{
    error::TablelogResult,
    record::{Failure, Operation, RecordDetails},
};

use crate::context::{PageRequest, RecipeContext, TableSelection, UserNotice};
use crate::sql;
use crate::workspace::ResultSet;

/// What a read produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome {
    Loaded { rows: ResultSet, notice: UserNotice },
    Failed { failure: Failure, notice: UserNotice },
}

impl ReadOutcome {
    pub fn notice(&self) -> &UserNotice {
        match self {
            ReadOutcome::Loaded { notice, .. } | ReadOutcome::Failed { notice, .. } => notice,
        }
    }

    pub fn rows(&self) -> Option<&ResultSet> {
        match self {
            ReadOutcome::Loaded { rows, .. } => Some(rows),
            ReadOutcome::Failed { .. } => None,
        }
    }
}

/// Read every row of the selected table.
pub fn read_table(
    ctx: &RecipeContext,
    request: &PageRequest,
    selection: &TableSelection,
) -> ReadOutcome {
    let caller = ctx.caller(request);
    let target = selection.table.to_string();

    let started = Utc::now();
    let clock = Instant::now();
    let result = run_select(ctx, selection);
    let elapsed = clock.elapsed().as_millis() as u64;

    match result {
        Ok(rows) => {
            let details = RecordDetails::new()
                .with_warehouse(&selection.warehouse)
                .with_rows_count(rows.len() as u64)
                .with_query_time(started)
                .with_duration_ms(elapsed);
            ctx.emitter
                .record(Operation::Read, &target, &caller.identity, details);

            info!(table = %target, rows = rows.len(), "table read");
            let notice = UserNotice::Success(format!("Successfully read {} rows", rows.len()));
            ReadOutcome::Loaded { rows, notice }
        }
        Err(e) => {
            let failure = Failure::from_error(&e);
            let details = RecordDetails::new()
                .with_warehouse(&selection.warehouse)
                .with_query_time(Utc::now())
                .with_duration_ms(elapsed)
                .with_failure(failure.clone());
            ctx.emitter
                .record(Operation::ReadFailed, &target, &caller.identity, details);

            warn!(table = %target, kind = %failure.kind, "table read failed");
            let notice = read_failure_notice(&target, &failure);
            ReadOutcome::Failed { failure, notice }
        }
    }
}

fn run_select(ctx: &RecipeContext, selection: &TableSelection) -> TablelogResult<ResultSet> {
    let http_path = ctx.warehouse_path(&selection.warehouse)?;
    ctx.workspace
        .execute(&http_path, &sql::select_all(&selection.table))
}

/// The user-facing message for a failed read of `table`.
pub fn read_failure_notice(table: &str, failure: &Failure) -> UserNotice {
    if failure.is_permission_denied() {
        UserNotice::AccessDenied(format!(
            "Access denied: You don't have permission to read table {table}. \
             Please check your credentials or request access."
        ))
    } else {
        UserNotice::Error(format!("Failed to read table: {}", failure.message))
    }
}
