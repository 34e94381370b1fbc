//! In-memory sink.
//!
//! `MemorySink` keeps every line in a `Vec` behind `Arc<Mutex<_>>`. Clones
//! share the same buffer, so a caller can hand one clone to the emitter and
//! read the lines back through another.

use std::sync::{Arc, Mutex, PoisonError};

use tablelog_contracts::{
    error::{TablelogError, TablelogResult},
    record::Severity,
};
use tablelog_core::traits::LogSink;

/// One line as received by a [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedLine {
    pub severity: Severity,
    pub line: String,
}

#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<EmittedLine>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of every line received so far, in arrival order.
    pub fn lines(&self) -> Vec<EmittedLine> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The received lines joined with newlines, as a log file would hold them.
    pub fn to_text(&self) -> String {
        self.lines()
            .into_iter()
            .map(|l| l.line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl LogSink for MemorySink {
    fn emit(&self, severity: Severity, line: &str) -> TablelogResult<()> {
        let mut lines = self.lines.lock().map_err(|e| TablelogError::SinkWriteFailed {
            reason: format!("memory sink lock poisoned: {}", e),
        })?;
        lines.push(EmittedLine {
            severity,
            line: line.to_string(),
        });
        Ok(())
    }
}
