//! Scenario: Read a table
//!
//! Three reads against the mock workspace, one per audit outcome:
//!
//! Sub-case A: readable table, caller from headers  → `read`
//! Sub-case B: forbidden table                      → `read_failed`, access denied
//! Sub-case C: no request context, missing table    → `read_failed`, principal identity

use tablelog_contracts::{error::TablelogResult, resource::QualifiedName};

use crate::context::{PageRequest, RecipeContext, TableSelection};
use crate::mock_data::{sample_headers, STARTER_WAREHOUSE};
use crate::table_read::{read_table, ReadOutcome};

pub fn run_scenario(ctx: &RecipeContext) -> TablelogResult<()> {
    println!("=== Scenario: Read a table ===");
    println!();

    let cases = [
        ("A", "main.sales.orders", PageRequest::with_headers(sample_headers())),
        ("B", "main.restricted.payroll", PageRequest::with_headers(sample_headers())),
        ("C", "main.sales.returns", PageRequest::without_context()),
    ];

    for (label, table, request) in cases {
        let selection = TableSelection::new(STARTER_WAREHOUSE.0, QualifiedName::parse(table)?);
        let caller = ctx.caller(&request);

        println!("  Sub-case {label}: read {table}");
        println!(
            "  Caller:  {} ({})",
            caller.identity.username, caller.source
        );

        let outcome = read_table(ctx, &request, &selection);
        println!("  Notice:  {}", outcome.notice());
        if let ReadOutcome::Loaded { rows, .. } = &outcome {
            println!("  Columns: {}", rows.columns.join(", "));
            for row in &rows.rows {
                println!("    {}", serde_json::to_string(row)?);
            }
        }
        println!();
    }

    Ok(())
}
