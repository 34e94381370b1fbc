//! Audit line formatting.
//!
//! ```text
//! TABLE_ACCESS: {json}
//! TABLE_ACCESS_FAILED: {json} - Error: {kind}: {message}
//! ```
//!
//! The JSON body uses `", "` and `": "` separators so lines read the same as
//! those written by the existing log pipeline consumers grep for.

use std::io;

use serde::Serialize;
use serde_json::ser::Formatter;

use tablelog_contracts::{
    error::{TablelogError, TablelogResult},
    record::{AuditRecord, FailureKind, Status},
};

/// Prefix of a successful access line.
pub const ACCESS_PREFIX: &str = "TABLE_ACCESS:";
/// Prefix of a failed access line.
pub const ACCESS_FAILED_PREFIX: &str = "TABLE_ACCESS_FAILED:";
/// Separator between the JSON body and the error suffix of a failed line.
pub const ERROR_SEPARATOR: &str = " - Error: ";
/// Message used when a failed record carries no error text.
pub const NO_ERROR_DETAIL: &str = "no error detail recorded";

/// Compact JSON with a space after every `,` and `:`.
#[derive(Debug, Default, Clone, Copy)]
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Serialize `record` as the single-line JSON body of an audit line.
pub fn record_json(record: &AuditRecord) -> TablelogResult<String> {
    let mut buf = Vec::with_capacity(256);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    record.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(|e| TablelogError::Serialization {
        reason: e.to_string(),
    })
}

/// Format the complete audit line for `record`.
///
/// The prefix follows `record.status()`. Failed lines always carry an error
/// suffix; line breaks inside the error message are flattened to spaces.
pub fn format_line(record: &AuditRecord) -> TablelogResult<String> {
    let json = record_json(record)?;
    match record.status() {
        Status::Success => Ok(format!("{ACCESS_PREFIX} {json}")),
        Status::Failed => {
            let (kind, message) = match record.failure() {
                Some(f) => (f.kind, f.message),
                None => (FailureKind::Unknown, NO_ERROR_DETAIL.to_string()),
            };
            let message = single_line(&message);
            Ok(format!(
                "{ACCESS_FAILED_PREFIX} {json}{ERROR_SEPARATOR}{kind}: {message}"
            ))
        }
    }
}

fn single_line(s: &str) -> String {
    s.chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use tablelog_contracts::{
        identity::Identity,
        record::{Failure, Operation, RecordDetails},
    };

    use super::*;

    fn record(operation: Operation, details: RecordDetails) -> AuditRecord {
        let ts = Utc.with_ymd_and_hms(2026, 5, 4, 8, 0, 0).unwrap();
        let identity = Identity::new("u", "u@x.com", "1.2.3.4");
        AuditRecord::build(operation, "a.b.c", &identity, "local-dev", details, ts).unwrap()
    }

    #[test]
    fn success_line_has_spaced_json_in_field_order() {
        let line = format_line(&record(Operation::Read, RecordDetails::new())).unwrap();
        assert_eq!(
            line,
            r#"TABLE_ACCESS: {"timestamp": "2026-05-04T08:00:00Z", "operation": "read", "table_name": "a.b.c", "username": "u", "email": "u@x.com", "ip_address": "1.2.3.4", "app_id": "local-dev", "status": "success"}"#
        );
    }

    #[test]
    fn failed_line_carries_error_suffix() {
        let details = RecordDetails::new()
            .with_failure(Failure::classify("403 FORBIDDEN", FailureKind::Query));
        let line = format_line(&record(Operation::ReadFailed, details)).unwrap();

        assert!(line.starts_with("TABLE_ACCESS_FAILED: {"));
        assert!(line.ends_with(" - Error: permission_denied: 403 FORBIDDEN"));
    }

    #[test]
    fn failed_line_without_failure_uses_placeholder() {
        let line = format_line(&record(Operation::EditFailed, RecordDetails::new())).unwrap();
        assert!(line.ends_with(" - Error: unknown: no error detail recorded"));
    }

    #[test]
    fn multi_line_errors_stay_on_one_line() {
        let details =
            RecordDetails::new().with_failure(Failure::new(FailureKind::Query, "first\nsecond"));
        let line = format_line(&record(Operation::ReadFailed, details)).unwrap();
        assert!(!line.contains('\n'));
        assert!(line.ends_with("query: first second"));
    }

    #[test]
    fn body_parses_as_json() {
        let details = RecordDetails::new().with_rows_count(12).with_warehouse("wh");
        let json = record_json(&record(Operation::Read, details)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["rows_count"], 12);
        assert_eq!(value["warehouse"], "wh");
    }
}
