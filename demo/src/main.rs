//! tablelog demo CLI
//!
//! Runs the table recipes against the mock workspace with auditing wired
//! through the configured sinks, or checks an existing log file.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- --config tablelog.toml table-read
//!   cargo run -p demo -- table-edit
//!   cargo run -p demo -- current-user
//!   cargo run -p demo -- verify-log --file app.log

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tablelog_config::{env_app_id, AppConfig};
use tablelog_contracts::error::{TablelogError, TablelogResult};
use tablelog_core::{AuditEmitter, IdentityResolver};
use tablelog_recipes::mock_data::{FixedPrincipal, MockWorkspace};
use tablelog_recipes::scenarios::{current_user, table_edit, table_read, ConsoleSurface};
use tablelog_recipes::RecipeContext;
use tablelog_sink::{build_sink, MemorySink};
use tablelog_verify::{LogSummary, RecordVerifier};

/// Principal the mock SDK client is authenticated as.
const DEMO_PRINCIPAL: &str = "svc-tablelog@example.com";

// ── CLI definition ────────────────────────────────────────────────────────────

/// tablelog: audited table access for data apps.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "tablelog recipes demo",
    long_about = "Runs the table read, table edit and current-user recipes against a mock\n\
                  workspace, writing one audit line per table operation."
)]
struct Cli {
    /// TOML configuration file. Built-in defaults are used when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every recipe in sequence.
    RunAll,
    /// Read tables, including a forbidden and a missing one.
    TableRead,
    /// Edit tables, including a no-op save and a rejected write.
    TableEdit,
    /// Show the forwarded identity headers.
    CurrentUser,
    /// Check every audit line in a log file.
    VerifyLog {
        /// Log file to check.
        #[arg(long)]
        file: PathBuf,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    };

    // RUST_LOG wins over the configured filter.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with_target(false)
        .compact()
        .init();

    let result = match cli.command {
        Command::VerifyLog { file } => verify_log(&file),
        command => {
            print_banner();
            run_recipes(&config, command)
        }
    };

    match result {
        Ok(()) => {
            println!("Done.");
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

fn load_config(path: Option<&Path>) -> TablelogResult<AppConfig> {
    match path {
        Some(path) => AppConfig::from_file(path),
        None => Ok(AppConfig::default()),
    }
}

// ── Recipe dispatch ───────────────────────────────────────────────────────────

fn run_recipes(config: &AppConfig, command: Command) -> TablelogResult<()> {
    let (ctx, memory) = build_context(config)?;
    info!(
        app_id = %ctx.emitter.settings().app_id,
        sinks = config.sinks.len(),
        "audit emitter ready"
    );

    match command {
        Command::RunAll => {
            table_read::run_scenario(&ctx)?;
            table_edit::run_scenario(&ctx)?;
            current_user::run_scenario(&ctx)?;
        }
        Command::TableRead => table_read::run_scenario(&ctx)?,
        Command::TableEdit => table_edit::run_scenario(&ctx)?,
        Command::CurrentUser => current_user::run_scenario(&ctx)?,
        Command::VerifyLog { .. } => {}
    }

    match memory {
        Some(memory) => check_captured(&memory),
        None => Ok(()),
    }
}

fn build_context(config: &AppConfig) -> TablelogResult<(RecipeContext, Option<MemorySink>)> {
    let (sink, memory) = build_sink(&config.sinks)?;
    let settings = config.emitter_settings(env_app_id().as_deref());
    let emitter = AuditEmitter::new(settings, sink).with_surface(Box::new(ConsoleSurface));
    let resolver = IdentityResolver::new(Some(Box::new(FixedPrincipal::new(DEMO_PRINCIPAL))));
    let ctx = RecipeContext::new(Box::new(MockWorkspace::new()), resolver, emitter);
    Ok((ctx, memory))
}

// ── Verification ──────────────────────────────────────────────────────────────

/// Re-check the lines a memory sink captured during the run.
fn check_captured(memory: &MemorySink) -> TablelogResult<()> {
    println!();
    println!("Captured audit lines ({})", memory.len());
    println!("-----------------------");
    for line in memory.lines() {
        println!("  [{}] {}", line.severity, line.line);
    }

    let summary = RecordVerifier::new()?.verify_log(&memory.to_text());
    report(&summary)
}

fn verify_log(path: &Path) -> TablelogResult<()> {
    let summary = RecordVerifier::new()?.verify_file(path)?;
    report(&summary)
}

fn report(summary: &LogSummary) -> TablelogResult<()> {
    println!();
    println!(
        "Verified: {} access, {} access-failed, {} skipped, {} invalid",
        summary.access,
        summary.access_failed,
        summary.skipped,
        summary.invalid.len()
    );
    if summary.is_clean() {
        return Ok(());
    }

    let detail = serde_json::to_string_pretty(&summary.invalid)?;
    println!("{detail}");
    Err(TablelogError::SchemaValidation {
        reason: format!("{} audit line(s) failed verification", summary.invalid.len()),
    })
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("tablelog: audited table access");
    println!("==============================");
    println!();
    println!("Per table operation:");
    println!("  [1] Caller resolved from forwarded headers, else the SDK principal");
    println!("  [2] Statement runs on the selected SQL warehouse");
    println!("  [3] One TABLE_ACCESS / TABLE_ACCESS_FAILED line written to every sink");
    println!();
}
