//! Scenario: Edit a table
//!
//! Sub-case A: change one row of `main.sales.orders`   → `read`, `update`, `edit`
//! Sub-case B: save without changes                    → nothing recorded
//! Sub-case C: edit the read-only sample table         → `read`, `update`, `edit_failed`

use tablelog_contracts::{error::TablelogResult, resource::QualifiedName};

use crate::context::{PageRequest, RecipeContext, TableSelection};
use crate::mock_data::{sample_headers, STARTER_WAREHOUSE};
use crate::table_edit::{load_for_edit, save_changes, EditSession, SaveOutcome};
use crate::workspace::CellValue;

pub fn run_scenario(ctx: &RecipeContext) -> TablelogResult<()> {
    println!("=== Scenario: Edit a table ===");
    println!();

    let request = PageRequest::with_headers(sample_headers());

    // ── Sub-case A: one changed row ──────────────────────────────────────────
    {
        println!("  Sub-case A: change one order's amount");
        let selection = TableSelection::new(
            STARTER_WAREHOUSE.0,
            QualifiedName::parse("main.sales.orders")?,
        );
        if let Some(session) = load(ctx, &request, &selection) {
            let mut edited = session.original.clone();
            if let Some(row) = edited.rows.first_mut() {
                row[2] = CellValue::Float(199.99);
            }
            report(&save_changes(ctx, &request, &session, &edited));
        }
        println!();
    }

    // ── Sub-case B: nothing changed ──────────────────────────────────────────
    {
        println!("  Sub-case B: save without changes");
        let selection = TableSelection::new(
            STARTER_WAREHOUSE.0,
            QualifiedName::parse("main.sales.customers")?,
        );
        if let Some(session) = load(ctx, &request, &selection) {
            let edited = session.original.clone();
            report(&save_changes(ctx, &request, &session, &edited));
        }
        println!();
    }

    // ── Sub-case C: write rejected ───────────────────────────────────────────
    {
        println!("  Sub-case C: append a row to a read-only table");
        let selection = TableSelection::new(
            STARTER_WAREHOUSE.0,
            QualifiedName::parse("samples.nyctaxi.trips")?,
        );
        if let Some(session) = load(ctx, &request, &selection) {
            let mut edited = session.original.clone();
            edited.rows.push(vec![
                CellValue::Int(10005),
                CellValue::Int(10013),
                CellValue::Float(9.5),
            ]);
            report(&save_changes(ctx, &request, &session, &edited));
        }
        println!();
    }

    Ok(())
}

fn load(
    ctx: &RecipeContext,
    request: &PageRequest,
    selection: &TableSelection,
) -> Option<EditSession> {
    match load_for_edit(ctx, request, selection) {
        Ok(session) => {
            println!("  Loaded:  {} row(s) from {}", session.original.len(), selection.table);
            Some(session)
        }
        Err(notice) => {
            println!("  Notice:  {notice}");
            None
        }
    }
}

fn report(outcome: &SaveOutcome) {
    match outcome {
        SaveOutcome::Unchanged => println!("  Result:  no changes to save"),
        SaveOutcome::Saved { diff, notice } | SaveOutcome::Failed { diff, notice, .. } => {
            println!(
                "  Diff:    +{} -{} ({} modified, {} total)",
                diff.added, diff.removed, diff.rows_modified, diff.total_rows
            );
            println!("  Notice:  {notice}");
        }
    }
}
