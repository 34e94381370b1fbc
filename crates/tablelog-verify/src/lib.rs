//! # tablelog-verify
//!
//! The reading side of the audit log: parse `TABLE_ACCESS` lines back into
//! records and check them against the record schema and the line rules.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tablelog_verify::{parse_line, RecordVerifier};
//!
//! let verifier = RecordVerifier::new()?;
//! let parsed = parse_line(line)?;
//! let report = verifier.verify(&parsed);
//! let record = parsed.into_record()?;
//! ```

pub mod engine;
pub mod parse;
pub mod schema;

pub use engine::{InvalidLine, LogSummary, RecordVerifier};
pub use parse::{is_audit_line, parse_line, LineKind, ParsedLine};
pub use schema::record_schema;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use tablelog_contracts::{
        error::TablelogError,
        identity::Identity,
        record::{AuditRecord, Failure, FailureKind, Operation, RecordDetails, Status},
    };
    use tablelog_core::format::format_line;

    use super::*;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn record(operation: Operation, details: RecordDetails) -> AuditRecord {
        let ts = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
        let identity = Identity::new("alice", "alice@example.com", "10.0.0.7");
        AuditRecord::build(operation, "main.sales.orders", &identity, "app-1", details, ts).unwrap()
    }

    fn verifier() -> RecordVerifier {
        RecordVerifier::new().unwrap()
    }

    fn rule_ids(report: &tablelog_contracts::verify::VerificationReport) -> Vec<&str> {
        report.failures.iter().map(|f| f.rule_id.as_str()).collect()
    }

    // ── 1. round trip ─────────────────────────────────────────────────────────

    /// A formatted line parses back to the same record.
    #[test]
    fn test_success_line_round_trips() {
        let original = record(
            Operation::Read,
            RecordDetails::new().with_warehouse("Starter Warehouse").with_rows_count(3),
        );
        let line = format_line(&original).unwrap();

        let parsed = parse_line(&line).unwrap();
        assert_eq!(parsed.kind, LineKind::Access);
        assert!(parsed.error_suffix.is_none());
        assert!(verifier().verify(&parsed).passed);
        assert_eq!(parsed.into_record().unwrap(), original);
    }

    #[test]
    fn test_failure_line_round_trips_with_suffix() {
        let failure = Failure::classify("403 FORBIDDEN: no SELECT", FailureKind::Query);
        let original = record(Operation::ReadFailed, RecordDetails::new().with_failure(failure.clone()));
        let line = format_line(&original).unwrap();

        let parsed = parse_line(&line).unwrap();
        assert_eq!(parsed.kind, LineKind::AccessFailed);
        assert_eq!(parsed.error_suffix, Some(failure));
        assert!(verifier().verify(&parsed).passed);
        assert_eq!(parsed.into_record().unwrap().status(), Status::Failed);
    }

    /// The file sink's timestamp/level prefix does not get in the way.
    #[test]
    fn test_prefix_found_mid_line() {
        let line = format!(
            "2026-03-01 09:30:00,123 [INFO] [table-access] {}",
            format_line(&record(Operation::Edit, RecordDetails::new())).unwrap()
        );
        let parsed = parse_line(&line).unwrap();
        assert_eq!(parsed.payload["operation"], "edit");
    }

    /// A prefix inside a header-supplied value does not move the split point.
    #[test]
    fn test_prefix_text_inside_a_value() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
        let identity = Identity::new("TABLE_ACCESS_FAILED: mallory", "m@example.com", "10.0.0.9");
        let original = AuditRecord::build(
            Operation::Read,
            "main.sales.orders",
            &identity,
            "app-1",
            RecordDetails::new(),
            ts,
        )
        .unwrap();
        let line = format_line(&original).unwrap();

        let parsed = parse_line(&line).unwrap();
        assert_eq!(parsed.kind, LineKind::Access);
        assert_eq!(parsed.payload["username"], "TABLE_ACCESS_FAILED: mallory");

        let summary = verifier().verify_log(&line);
        assert_eq!((summary.access, summary.access_failed), (1, 0));
        assert!(summary.is_clean());
    }

    #[test]
    fn test_access_prefix_inside_error_text() {
        let failure = Failure::new(FailureKind::Query, "bad token near TABLE_ACCESS: {}");
        let line = format_line(&record(
            Operation::ReadFailed,
            RecordDetails::new().with_failure(failure.clone()),
        ))
        .unwrap();

        let parsed = parse_line(&line).unwrap();
        assert_eq!(parsed.kind, LineKind::AccessFailed);
        assert_eq!(parsed.error_suffix, Some(failure));
    }

    // ── 2. malformed lines ────────────────────────────────────────────────────

    #[test]
    fn test_missing_prefix_is_malformed() {
        assert!(matches!(
            parse_line("INFO something unrelated"),
            Err(TablelogError::MalformedLine { .. })
        ));
    }

    #[test]
    fn test_truncated_json_is_malformed() {
        assert!(parse_line(r#"TABLE_ACCESS: {"timestamp": "x", "#).is_err());
        assert!(parse_line("TABLE_ACCESS: [1, 2]").is_err());
        assert!(parse_line(r#"TABLE_ACCESS: {"a": 1} trailing"#).is_err());
    }

    #[test]
    fn test_error_text_without_known_kind() {
        let parsed =
            parse_line(r#"TABLE_ACCESS_FAILED: {"a": 1} - Error: Connection reset: by peer"#)
                .unwrap();
        let failure = parsed.error_suffix.unwrap();
        assert_eq!(failure.kind, FailureKind::Unknown);
        assert_eq!(failure.message, "Connection reset: by peer");
    }

    // ── 3. verification rules ─────────────────────────────────────────────────

    #[test]
    fn test_missing_required_field_fails_schema() {
        let parsed = ParsedLine {
            kind: LineKind::Access,
            payload: json!({ "timestamp": "t", "operation": "read", "table_name": "a.b.c" }),
            error_suffix: None,
        };
        let report = verifier().verify(&parsed);
        assert!(!report.passed);
        assert!(rule_ids(&report).contains(&"json-schema"));
    }

    #[test]
    fn test_unknown_operation_fails_schema() {
        let parsed = parse_line(
            r#"TABLE_ACCESS: {"timestamp": "t", "operation": "delete", "table_name": "a.b.c", "username": "u", "email": "e", "ip_address": "i"}"#,
        )
        .unwrap();
        assert_eq!(rule_ids(&verifier().verify(&parsed)), vec!["json-schema"]);
    }

    #[test]
    fn test_prefix_must_agree_with_status() {
        let parsed = parse_line(
            r#"TABLE_ACCESS: {"timestamp": "t", "operation": "edit", "table_name": "a.b.c", "username": "u", "email": "e", "ip_address": "i", "status": "failed"}"#,
        )
        .unwrap();
        assert_eq!(rule_ids(&verifier().verify(&parsed)), vec!["prefix-status"]);
    }

    #[test]
    fn test_failed_operation_with_success_status() {
        let parsed = parse_line(
            r#"TABLE_ACCESS_FAILED: {"timestamp": "t", "operation": "read_failed", "table_name": "a.b.c", "username": "u", "email": "e", "ip_address": "i", "status": "success"} - Error: query: boom"#,
        )
        .unwrap();
        let report = verifier().verify(&parsed);
        let ids = rule_ids(&report);
        assert!(ids.contains(&"prefix-status"));
        assert!(ids.contains(&"failed-operation"));
    }

    #[test]
    fn test_failure_line_without_suffix() {
        let parsed = parse_line(
            r#"TABLE_ACCESS_FAILED: {"timestamp": "t", "operation": "read_failed", "table_name": "a.b.c", "username": "u", "email": "e", "ip_address": "i", "status": "failed"}"#,
        )
        .unwrap();
        assert_eq!(rule_ids(&verifier().verify(&parsed)), vec!["failure-suffix"]);
    }

    // ── 4. whole log ──────────────────────────────────────────────────────────

    #[test]
    fn test_verify_log_tallies_lines() {
        let ok = format_line(&record(Operation::Read, RecordDetails::new())).unwrap();
        let failed = format_line(&record(
            Operation::EditFailed,
            RecordDetails::new().with_failure(Failure::new(FailureKind::Write, "disk")),
        ))
        .unwrap();
        let text = format!(
            "application started\n{ok}\n{failed}\nTABLE_ACCESS: not json\n{ok}\n"
        );

        let summary = verifier().verify_log(&text);

        assert_eq!(summary.access, 2);
        assert_eq!(summary.access_failed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.invalid.len(), 1);
        assert_eq!(summary.invalid[0].line_number, 4);
        assert_eq!(summary.invalid[0].failures[0].rule_id, "parse");
        assert!(!summary.is_clean());
    }

    #[test]
    fn test_verify_file_reads_log() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        let ok = format_line(&record(Operation::Read, RecordDetails::new())).unwrap();
        std::fs::write(&path, format!("{ok}\nstartup complete\n")).unwrap();

        let summary = verifier().verify_file(&path).unwrap();

        assert_eq!((summary.access, summary.skipped), (1, 1));
    }

    #[test]
    fn test_unreadable_log_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();

        let missing = verifier().verify_file(&dir.path().join("absent.log"));
        assert!(matches!(missing, Err(TablelogError::Io { .. })));

        let not_a_file = verifier().verify_file(dir.path());
        assert!(matches!(not_a_file, Err(TablelogError::Io { .. })));

        let binary = dir.path().join("binary.log");
        std::fs::write(&binary, b"\xff\xfe\xfd").unwrap();
        match verifier().verify_file(&binary) {
            Err(TablelogError::Io { path, .. }) => assert!(path.ends_with("binary.log")),
            other => panic!("expected Io error, got {:?}", other),
        }
    }
}
