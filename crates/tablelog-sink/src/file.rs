//! Append-only file sink.
//!
//! Each audit line becomes one file line:
//!
//! ```text
//! 2026-03-01 09:30:00,123 [INFO] [table-access] TABLE_ACCESS: {...}
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use tracing::info;

use tablelog_contracts::{
    error::{TablelogError, TablelogResult},
    record::Severity,
};
use tablelog_core::traits::LogSink;

/// Logger name written into every file line.
pub const LOGGER_NAME: &str = "table-access";

/// Appends audit lines to a file.
///
/// The `Mutex` keeps concurrent lines from interleaving.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileSink {
    /// Open `path` for appending, creating it and any missing parent
    /// directories.
    pub fn open(path: impl AsRef<Path>) -> TablelogResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| TablelogError::SinkWriteFailed {
                reason: format!("failed to create '{}': {}", parent.display(), e),
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| TablelogError::SinkWriteFailed {
                reason: format!("failed to open '{}': {}", path.display(), e),
            })?;

        info!(path = %path.display(), "file sink opened");
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for FileSink {
    fn emit(&self, severity: Severity, line: &str) -> TablelogResult<()> {
        let stamp = Utc::now().format("%Y-%m-%d %H:%M:%S,%3f");
        let mut file = self.file.lock().map_err(|e| TablelogError::SinkWriteFailed {
            reason: format!("file sink lock poisoned: {}", e),
        })?;
        writeln!(file, "{stamp} [{severity}] [{LOGGER_NAME}] {line}")
            .and_then(|_| file.flush())
            .map_err(|e| TablelogError::SinkWriteFailed {
                reason: format!("failed to write '{}': {}", self.path.display(), e),
            })
    }
}
