//! # tablelog-contracts
//!
//! Shared types for the tablelog workspace: caller identity, the audit record
//! and its vocabulary, qualified table names, and the error enum.
//!
//! No I/O lives in this crate, only data definitions and the validation that
//! guards audit record construction.

pub mod error;
pub mod identity;
pub mod record;
pub mod resource;
pub mod verify;

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use error::TablelogError;
    use identity::{Headers, Identity, UNKNOWN};
    use record::{
        AuditRecord, Failure, FailureKind, Operation, RecordDetails, Severity, Status,
        LOCAL_APP_ID,
    };
    use resource::QualifiedName;

    fn alice() -> Identity {
        Identity::new("alice", "alice@example.com", "10.0.0.7")
    }

    fn build(operation: Operation, details: RecordDetails) -> Result<AuditRecord, TablelogError> {
        let ts = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
        AuditRecord::build(operation, "main.sales.orders", &alice(), "app-1", details, ts)
    }

    // ── Headers ──────────────────────────────────────────────────────────────

    #[test]
    fn headers_lookup_ignores_case() {
        let headers: Headers = [("x-forwarded-email", "a@example.com")].into_iter().collect();
        assert_eq!(headers.get("X-Forwarded-Email"), Some("a@example.com"));
        assert_eq!(headers.get("X-FORWARDED-EMAIL"), Some("a@example.com"));
        assert_eq!(headers.get("X-Real-Ip"), None);
    }

    #[test]
    fn headers_first_occurrence_wins_and_order_is_kept() {
        let mut headers = Headers::new();
        headers.insert("Host", "app.example.com");
        headers.insert("X-Real-Ip", "1.1.1.1");
        headers.insert("x-real-ip", "2.2.2.2");

        assert_eq!(headers.get("X-Real-Ip"), Some("1.1.1.1"));
        let names: Vec<&str> = headers.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Host", "X-Real-Ip", "x-real-ip"]);
    }

    // ── Identity ─────────────────────────────────────────────────────────────

    #[test]
    fn principal_identity_reuses_name_for_email() {
        let id = Identity::from_principal("svc-app@example.com");
        assert_eq!(id.username, "svc-app@example.com");
        assert_eq!(id.email, "svc-app@example.com");
        assert_eq!(id.source_ip, UNKNOWN);
    }

    #[test]
    fn normalized_fills_blank_fields_with_unknown() {
        let id = Identity::new("", "  ", "1.2.3.4").normalized();
        assert_eq!(id, Identity::new(UNKNOWN, UNKNOWN, "1.2.3.4"));
    }

    // ── QualifiedName ────────────────────────────────────────────────────────

    #[test]
    fn qualified_name_parses_and_displays() {
        let name = QualifiedName::parse("main.sales.orders").unwrap();
        assert_eq!(name.catalog, "main");
        assert_eq!(name.table, "orders");
        assert_eq!(name.to_string(), "main.sales.orders");
    }

    #[test]
    fn qualified_name_rejects_wrong_shapes() {
        assert!(QualifiedName::parse("main.orders").is_err());
        assert!(QualifiedName::parse("a.b.c.d").is_err());

        let err = QualifiedName::parse("main..orders").unwrap_err();
        assert!(err.to_string().contains("schema name is empty"));
    }

    // ── Operation / Status ───────────────────────────────────────────────────

    #[test]
    fn failed_variants_map_reads_and_writes() {
        assert_eq!(Operation::Read.failed(), Operation::ReadFailed);
        assert_eq!(Operation::Edit.failed(), Operation::EditFailed);
        assert_eq!(Operation::Update.failed(), Operation::EditFailed);
        assert!(Operation::ReadFailed.is_failure());
        assert!(!Operation::Update.is_failure());
    }

    #[test]
    fn status_decides_severity() {
        assert_eq!(Status::Success.severity(), Severity::Info);
        assert_eq!(Status::Failed.severity(), Severity::Warning);
    }

    #[test]
    fn operation_serializes_snake_case() {
        let json = serde_json::to_string(&Operation::ReadFailed).unwrap();
        assert_eq!(json, "\"read_failed\"");
    }

    // ── Failure classification ───────────────────────────────────────────────

    #[test]
    fn forbidden_signature_is_permission_denied() {
        let f = Failure::classify("Error 403 FORBIDDEN: no SELECT", FailureKind::Query);
        assert!(f.is_permission_denied());

        // Both markers are required.
        let f = Failure::classify("403 something else", FailureKind::Query);
        assert_eq!(f.kind, FailureKind::Query);
    }

    #[test]
    fn failure_from_error_keeps_inner_message() {
        let err = TablelogError::QueryFailed {
            message: "[TABLE_OR_VIEW_NOT_FOUND] x".to_string(),
        };
        let f = Failure::from_error(&err);
        assert_eq!(f.kind, FailureKind::Query);
        assert_eq!(f.message, "[TABLE_OR_VIEW_NOT_FOUND] x");
    }

    // ── AuditRecord construction ─────────────────────────────────────────────

    #[test]
    fn status_derived_from_operation_when_absent() {
        assert_eq!(build(Operation::Read, RecordDetails::new()).unwrap().status(), Status::Success);
        assert_eq!(
            build(Operation::ReadFailed, RecordDetails::new()).unwrap().status(),
            Status::Failed
        );
    }

    #[test]
    fn attached_failure_implies_failed_status() {
        let details = RecordDetails::new().with_failure(Failure::new(FailureKind::Query, "boom"));
        let record = build(Operation::Read, details).unwrap();
        assert_eq!(record.status(), Status::Failed);
        assert_eq!(record.severity(), Severity::Warning);
    }

    #[test]
    fn explicit_failed_status_on_plain_operation_is_kept() {
        let record =
            build(Operation::Update, RecordDetails::new().with_status(Status::Failed)).unwrap();
        assert_eq!(record.status(), Status::Failed);
    }

    #[test]
    fn contradictory_status_is_rejected() {
        let err = build(Operation::EditFailed, RecordDetails::new().with_status(Status::Success))
            .unwrap_err();
        assert!(matches!(err, TablelogError::InvalidRecord { .. }));

        let details = RecordDetails::new()
            .with_status(Status::Success)
            .with_failure(Failure::new(FailureKind::Write, "disk"));
        assert!(build(Operation::Edit, details).is_err());
    }

    #[test]
    fn blank_target_is_rejected() {
        let ts = Utc::now();
        let err = AuditRecord::build(Operation::Read, "   ", &alice(), "app", RecordDetails::new(), ts)
            .unwrap_err();
        assert!(err.to_string().contains("target resource"));
    }

    #[test]
    fn deleted_rows_may_exceed_remaining_total() {
        let record = build(Operation::Update, RecordDetails::new().with_changes(3, 0)).unwrap();
        assert_eq!(record.rows_modified(), Some(3));
        assert_eq!(record.total_rows(), Some(0));
    }

    #[test]
    fn blank_app_id_falls_back_to_local_dev() {
        let ts = Utc::now();
        let record =
            AuditRecord::build(Operation::Read, "a.b.c", &alice(), "", RecordDetails::new(), ts)
                .unwrap();
        assert_eq!(record.app_id(), LOCAL_APP_ID);
    }

    #[test]
    fn record_serializes_reserved_fields_first() {
        let details = RecordDetails::new().with_warehouse("Starter").with_rows_count(3);
        let record = build(Operation::Read, details).unwrap();
        let json = serde_json::to_string(&record).unwrap();

        assert!(json.starts_with(
            r#"{"timestamp":"2026-03-01T09:30:00Z","operation":"read","table_name":"main.sales.orders","username":"alice","email":"alice@example.com","ip_address":"10.0.0.7","app_id":"app-1","status":"success""#
        ));
        assert!(json.contains(r#""rows_count":3"#));
        assert!(!json.contains("error"));
    }

    #[test]
    fn record_deserializes_back() {
        let details = RecordDetails::new()
            .with_failure(Failure::new(FailureKind::PermissionDenied, "403 FORBIDDEN"));
        let record = build(Operation::ReadFailed, details).unwrap();

        let json = serde_json::to_string(&record).unwrap();
        let decoded: AuditRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded, record);
        assert!(decoded.validate().is_ok());
        assert_eq!(decoded.failure().unwrap().kind, FailureKind::PermissionDenied);
    }

    #[test]
    fn validate_catches_tampered_status() {
        let json = r#"{"timestamp":"2026-03-01T09:30:00Z","operation":"read_failed","table_name":"a.b.c","username":"u","email":"e","ip_address":"i","app_id":"x","status":"success"}"#;
        let record: AuditRecord = serde_json::from_str(json).unwrap();
        assert!(record.validate().is_err());
    }

    // ── Error display ────────────────────────────────────────────────────────

    #[test]
    fn error_messages_carry_context() {
        let err = TablelogError::SinkWriteFailed {
            reason: "disk full".to_string(),
        };
        assert_eq!(err.to_string(), "audit sink write failed: disk full");

        let err = TablelogError::InvalidTableName {
            name: "x".to_string(),
            reason: "bad".to_string(),
        };
        assert!(err.to_string().contains("'x'"));
    }
}
