//! Scenario: Get the current user
//!
//! Shows the forwarded identity headers, then the identity the resolver would
//! record with and without a request context.

use tablelog_contracts::{error::TablelogResult, identity::Headers};

use crate::context::{PageRequest, RecipeContext};
use crate::current_user::user_details;
use crate::mock_data::sample_headers;

pub fn run_scenario(ctx: &RecipeContext) -> TablelogResult<()> {
    println!("=== Scenario: Current user ===");
    println!();

    for (label, headers) in [("A", sample_headers()), ("B", Headers::new())] {
        let details = user_details(&headers);
        println!("  Sub-case {label}: {} header(s)", headers.len());
        println!("  E-mail:    {}", details.email);
        println!("  Username:  {}", details.username);
        println!("  User:      {}", details.user);
        println!("  IP:        {}", details.ip);
        for line in details.all_headers.lines() {
            println!("    {line}");
        }
        println!();
    }

    let with_headers = ctx.caller(&PageRequest::with_headers(sample_headers()));
    let background = ctx.caller(&PageRequest::without_context());
    println!(
        "  Audit identity (request):    {} via {}",
        with_headers.identity.email, with_headers.source
    );
    println!(
        "  Audit identity (no request): {} via {}",
        background.identity.email, background.source
    );
    println!();

    Ok(())
}
