//! Sinks that write to the process's own log streams.

use tracing::{info, warn};

use tablelog_contracts::{error::TablelogResult, record::Severity};
use tablelog_core::traits::LogSink;

/// Forwards audit lines through `tracing` under the `table_access` target.
///
/// Whatever subscriber the host installed decides where the lines land.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, severity: Severity, line: &str) -> TablelogResult<()> {
        match severity {
            Severity::Info => info!(target: "table_access", "{}", line),
            Severity::Warning => warn!(target: "table_access", "{}", line),
        }
        Ok(())
    }
}

/// Prints audit lines to standard output. Warning lines get a `WARNING: `
/// prefix so they stand out in a console.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl StdoutSink {
    pub fn render(severity: Severity, line: &str) -> String {
        match severity {
            Severity::Info => line.to_string(),
            Severity::Warning => format!("WARNING: {line}"),
        }
    }
}

impl LogSink for StdoutSink {
    fn emit(&self, severity: Severity, line: &str) -> TablelogResult<()> {
        println!("{}", Self::render(severity, line));
        Ok(())
    }
}
