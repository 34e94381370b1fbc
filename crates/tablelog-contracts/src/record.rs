//! The structured audit record and its vocabulary.
//!
//! An `AuditRecord` is created the moment a table operation completes or
//! fails, serialized once, and dropped. The set of optional fields is closed:
//! callers attach extras through `RecordDetails`, which has no way to touch
//! the reserved fields (timestamp, operation, table, identity, app id, status).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{TablelogError, TablelogResult};
use crate::identity::Identity;

/// Application id used when the hosting platform provides none.
pub const LOCAL_APP_ID: &str = "local-dev";

/// The audited operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Read,
    Edit,
    Update,
    ReadFailed,
    EditFailed,
}

impl Operation {
    /// True for the `_failed` variants.
    pub fn is_failure(self) -> bool {
        matches!(self, Operation::ReadFailed | Operation::EditFailed)
    }

    /// The failure variant matching this operation.
    ///
    /// Writes (`edit`, `update`) share `edit_failed`.
    pub fn failed(self) -> Self {
        match self {
            Operation::Read | Operation::ReadFailed => Operation::ReadFailed,
            Operation::Edit | Operation::Update | Operation::EditFailed => Operation::EditFailed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Read => "read",
            Operation::Edit => "edit",
            Operation::Update => "update",
            Operation::ReadFailed => "read_failed",
            Operation::EditFailed => "edit_failed",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the audited operation. This, not the operation name, decides
/// the log severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Success,
    Failed,
}

impl Status {
    pub fn severity(self) -> Severity {
        match self {
            Status::Success => Severity::Info,
            Status::Failed => Severity::Warning,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Success => write!(f, "success"),
            Status::Failed => write!(f, "failed"),
        }
    }
}

/// Log severity of an emitted line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARNING"),
        }
    }
}

/// Category of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    PermissionDenied,
    NotFound,
    Connection,
    Query,
    Write,
    Unknown,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::PermissionDenied => "permission_denied",
            FailureKind::NotFound => "not_found",
            FailureKind::Connection => "connection",
            FailureKind::Query => "query",
            FailureKind::Write => "write",
            FailureKind::Unknown => "unknown",
        }
    }

    /// Inverse of [`FailureKind::as_str`]; anything unrecognised is `Unknown`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "permission_denied" => FailureKind::PermissionDenied,
            "not_found" => FailureKind::NotFound,
            "connection" => FailureKind::Connection,
            "query" => FailureKind::Query,
            "write" => FailureKind::Write,
            _ => FailureKind::Unknown,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What went wrong, as recorded in the `error` / `error_kind` fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Classify a raw error message.
    ///
    /// Messages carrying both `403` and `FORBIDDEN` are permission denials;
    /// everything else keeps `fallback`.
    pub fn classify(message: impl Into<String>, fallback: FailureKind) -> Self {
        let message = message.into();
        let kind = if is_permission_denied(&message) {
            FailureKind::PermissionDenied
        } else {
            fallback
        };
        Self { kind, message }
    }

    /// Classify a [`TablelogError`] raised by a warehouse or SDK call.
    pub fn from_error(error: &TablelogError) -> Self {
        match error {
            TablelogError::ConnectionFailed { message } => {
                Self::classify(message.clone(), FailureKind::Connection)
            }
            TablelogError::QueryFailed { message } => {
                Self::classify(message.clone(), FailureKind::Query)
            }
            TablelogError::NotFound { .. } => {
                Self::classify(error.to_string(), FailureKind::NotFound)
            }
            TablelogError::InvalidStatement { .. } | TablelogError::InvalidTableName { .. } => {
                Self::classify(error.to_string(), FailureKind::Query)
            }
            other => Self::classify(other.to_string(), FailureKind::Unknown),
        }
    }

    pub fn is_permission_denied(&self) -> bool {
        self.kind == FailureKind::PermissionDenied
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// True when `message` carries the HTTP 403 / FORBIDDEN signature.
pub fn is_permission_denied(message: &str) -> bool {
    message.contains("403") && message.contains("FORBIDDEN")
}

/// Optional extras attached to an audit record.
///
/// `status` is the canonical success/failure signal. When left unset it is
/// derived from the operation name and whether a failure is attached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordDetails {
    pub status: Option<Status>,
    pub warehouse: Option<String>,
    pub rows_count: Option<u64>,
    pub rows_modified: Option<u64>,
    pub total_rows: Option<u64>,
    pub query_time: Option<DateTime<Utc>>,
    pub duration_ms: Option<u64>,
    pub failure: Option<Failure>,
}

impl RecordDetails {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_warehouse(mut self, warehouse: impl Into<String>) -> Self {
        self.warehouse = Some(warehouse.into());
        self
    }

    pub fn with_rows_count(mut self, rows: u64) -> Self {
        self.rows_count = Some(rows);
        self
    }

    pub fn with_changes(mut self, rows_modified: u64, total_rows: u64) -> Self {
        self.rows_modified = Some(rows_modified);
        self.total_rows = Some(total_rows);
        self
    }

    pub fn with_query_time(mut self, started: DateTime<Utc>) -> Self {
        self.query_time = Some(started);
        self
    }

    pub fn with_duration_ms(mut self, millis: u64) -> Self {
        self.duration_ms = Some(millis);
        self
    }

    pub fn with_failure(mut self, failure: Failure) -> Self {
        self.failure = Some(failure);
        self
    }
}

/// One audit log entry.
///
/// Field declaration order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    timestamp: DateTime<Utc>,
    operation: Operation,
    #[serde(rename = "table_name")]
    target_resource: String,
    #[serde(flatten)]
    identity: Identity,
    app_id: String,
    status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    warehouse: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rows_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rows_modified: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    total_rows: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    query_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_kind: Option<FailureKind>,
}

impl AuditRecord {
    /// Build and validate a record.
    ///
    /// # Errors
    ///
    /// Returns `TablelogError::InvalidRecord` when the target is blank
    /// or when an explicit `success` status contradicts a `_failed` operation
    /// or an attached failure.
    pub fn build(
        operation: Operation,
        target_resource: &str,
        identity: &Identity,
        app_id: &str,
        details: RecordDetails,
        timestamp: DateTime<Utc>,
    ) -> TablelogResult<Self> {
        let target = target_resource.trim();
        if target.is_empty() {
            return Err(TablelogError::InvalidRecord {
                reason: "target resource must not be empty".to_string(),
            });
        }

        let status = resolve_status(operation, &details)?;

        let app_id = if app_id.trim().is_empty() {
            LOCAL_APP_ID.to_string()
        } else {
            app_id.to_string()
        };

        let (error, error_kind) = match details.failure {
            Some(f) => (Some(f.message), Some(f.kind)),
            None => (None, None),
        };

        Ok(Self {
            timestamp,
            operation,
            target_resource: target.to_string(),
            identity: identity.clone().normalized(),
            app_id,
            status,
            warehouse: details.warehouse,
            rows_count: details.rows_count,
            rows_modified: details.rows_modified,
            total_rows: details.total_rows,
            query_time: details.query_time,
            duration_ms: details.duration_ms,
            error,
            error_kind,
        })
    }

    /// Re-check the construction invariants on a record that did not come
    /// through [`AuditRecord::build`], e.g. one parsed back from a log line.
    pub fn validate(&self) -> TablelogResult<()> {
        if self.target_resource.trim().is_empty() {
            return Err(TablelogError::InvalidRecord {
                reason: "target resource must not be empty".to_string(),
            });
        }
        if self.status == Status::Success && (self.operation.is_failure() || self.error.is_some()) {
            return Err(TablelogError::InvalidRecord {
                reason: format!(
                    "status 'success' contradicts operation '{}' or attached error",
                    self.operation
                ),
            });
        }
        Ok(())
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn target_resource(&self) -> &str {
        &self.target_resource
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn severity(&self) -> Severity {
        self.status.severity()
    }

    pub fn warehouse(&self) -> Option<&str> {
        self.warehouse.as_deref()
    }

    pub fn rows_count(&self) -> Option<u64> {
        self.rows_count
    }

    pub fn rows_modified(&self) -> Option<u64> {
        self.rows_modified
    }

    pub fn total_rows(&self) -> Option<u64> {
        self.total_rows
    }

    pub fn query_time(&self) -> Option<DateTime<Utc>> {
        self.query_time
    }

    pub fn duration_ms(&self) -> Option<u64> {
        self.duration_ms
    }

    /// The attached failure, if any.
    pub fn failure(&self) -> Option<Failure> {
        self.error.as_ref().map(|message| Failure {
            kind: self.error_kind.unwrap_or(FailureKind::Unknown),
            message: message.clone(),
        })
    }
}

fn resolve_status(operation: Operation, details: &RecordDetails) -> TablelogResult<Status> {
    let implied_failure = operation.is_failure() || details.failure.is_some();
    match details.status {
        Some(Status::Success) if operation.is_failure() => Err(TablelogError::InvalidRecord {
            reason: format!("status 'success' contradicts operation '{operation}'"),
        }),
        Some(Status::Success) if details.failure.is_some() => Err(TablelogError::InvalidRecord {
            reason: "status 'success' given together with a failure".to_string(),
        }),
        Some(status) => Ok(status),
        None if implied_failure => Ok(Status::Failed),
        None => Ok(Status::Success),
    }
}
