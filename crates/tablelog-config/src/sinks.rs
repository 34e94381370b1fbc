//! Sink selection as written in the configuration file.
//!
//! Each `[[sinks]]` table names one destination through its `kind` key:
//!
//! ```toml
//! [[sinks]]
//! kind = "tracing"
//!
//! [[sinks]]
//! kind = "file"
//! path = "logs/table_access.log"
//! ```
//!
//! Every configured sink receives every audit line.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One configured audit line destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SinkSpec {
    /// Forward lines through `tracing` under the `table_access` target.
    Tracing,
    /// Print lines to standard output.
    Stdout,
    /// Append lines to a file, creating parent directories as needed.
    File { path: PathBuf },
    /// Keep lines in memory. Used by tests and the demo's summaries.
    Memory,
}

impl SinkSpec {
    pub fn name(&self) -> &'static str {
        match self {
            SinkSpec::Tracing => "tracing",
            SinkSpec::Stdout => "stdout",
            SinkSpec::File { .. } => "file",
            SinkSpec::Memory => "memory",
        }
    }
}
