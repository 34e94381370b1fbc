//! The audit emitter: turns a table operation into exactly one log line.
//!
//! ```text
//!   build record → format line → sink.emit(severity, line) → [notice]
//! ```
//!
//! Audit logging must never break the operation being audited. Invalid
//! records, sink errors and sink panics are all reported through `tracing`
//! and handed back as an [`EmitOutcome`], never as an `Err` or an unwind.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use chrono::Utc;
use tracing::{debug, error, warn};

use tablelog_contracts::{
    identity::Identity,
    record::{AuditRecord, Operation, RecordDetails, Severity, Status, LOCAL_APP_ID},
};

use crate::format::format_line;
use crate::traits::{LogSink, NoticeSurface};

/// Explicit emitter configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitterSettings {
    /// Value written to every record's `app_id`.
    pub app_id: String,
    /// Send a short [`Notice`] to the attached surface after each record.
    pub surface_notices: bool,
}

impl Default for EmitterSettings {
    fn default() -> Self {
        Self {
            app_id: LOCAL_APP_ID.to_string(),
            surface_notices: false,
        }
    }
}

/// The short per-operation message shown on a debug surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub operation: Operation,
    pub target: String,
    pub status: Status,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self.status {
            Status::Success => "SUCCESS",
            Status::Failed => "FAILED",
        };
        write!(f, "{} - {} - {}", self.operation, self.target, status)
    }
}

/// What happened to one emit call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmitOutcome {
    /// The sink accepted the line.
    Emitted { severity: Severity },
    /// The record failed validation or serialization; nothing was written.
    Rejected { reason: String },
    /// The sink returned an error or panicked. The line went to stderr.
    SinkFailed { severity: Severity, reason: String },
}

impl EmitOutcome {
    pub fn is_emitted(&self) -> bool {
        matches!(self, EmitOutcome::Emitted { .. })
    }
}

/// Emits audit records to a [`LogSink`].
///
/// Stateless between calls. Safe to share across threads when the sink and
/// surface are.
pub struct AuditEmitter {
    settings: EmitterSettings,
    sink: Box<dyn LogSink>,
    surface: Option<Box<dyn NoticeSurface>>,
}

impl AuditEmitter {
    pub fn new(settings: EmitterSettings, sink: Box<dyn LogSink>) -> Self {
        Self {
            settings,
            sink,
            surface: None,
        }
    }

    /// Attach a notice surface. Notices are only sent when
    /// `settings.surface_notices` is on.
    pub fn with_surface(mut self, surface: Box<dyn NoticeSurface>) -> Self {
        self.surface = Some(surface);
        self
    }

    pub fn settings(&self) -> &EmitterSettings {
        &self.settings
    }

    /// Build a record stamped with the current time and emit it.
    pub fn record(
        &self,
        operation: Operation,
        target_resource: &str,
        identity: &Identity,
        details: RecordDetails,
    ) -> EmitOutcome {
        let built = AuditRecord::build(
            operation,
            target_resource,
            identity,
            &self.settings.app_id,
            details,
            Utc::now(),
        );

        match built {
            Ok(record) => self.emit(&record),
            Err(e) => {
                error!(
                    operation = %operation,
                    target = %target_resource,
                    error = %e,
                    "audit record rejected"
                );
                EmitOutcome::Rejected {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Format and emit an already-built record.
    pub fn emit(&self, record: &AuditRecord) -> EmitOutcome {
        let severity = record.severity();

        let line = match format_line(record) {
            Ok(line) => line,
            Err(e) => {
                error!(
                    operation = %record.operation(),
                    target = %record.target_resource(),
                    error = %e,
                    "audit record could not be formatted"
                );
                return EmitOutcome::Rejected {
                    reason: e.to_string(),
                };
            }
        };

        let result = panic::catch_unwind(AssertUnwindSafe(|| self.sink.emit(severity, &line)));
        let outcome = match result {
            Ok(Ok(())) => {
                debug!(
                    operation = %record.operation(),
                    target = %record.target_resource(),
                    severity = %severity,
                    "audit line emitted"
                );
                EmitOutcome::Emitted { severity }
            }
            Ok(Err(e)) => sink_failed(severity, &line, e.to_string()),
            Err(payload) => sink_failed(severity, &line, panic_message(payload.as_ref())),
        };

        self.send_notice(record);
        outcome
    }

    fn send_notice(&self, record: &AuditRecord) {
        if !self.settings.surface_notices {
            return;
        }
        let Some(surface) = &self.surface else {
            return;
        };

        let notice = Notice {
            operation: record.operation(),
            target: record.target_resource().to_string(),
            status: record.status(),
        };
        match panic::catch_unwind(AssertUnwindSafe(|| surface.notify(&notice))) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, notice = %notice, "notice surface failed"),
            Err(payload) => warn!(
                reason = %panic_message(payload.as_ref()),
                notice = %notice,
                "notice surface panicked"
            ),
        }
    }
}

fn sink_failed(severity: Severity, line: &str, reason: String) -> EmitOutcome {
    error!(severity = %severity, reason = %reason, "audit sink failed, line written to stderr");
    eprintln!("{line}");
    EmitOutcome::SinkFailed { severity, reason }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("sink panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("sink panicked: {s}")
    } else {
        "sink panicked".to_string()
    }
}
