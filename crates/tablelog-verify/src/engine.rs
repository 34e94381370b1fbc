//! Audit line verifier.
//!
//! `RecordVerifier` checks one parsed line in two phases:
//!
//! 1. **Structural**: the JSON body is validated against
//!    [`record_schema`](crate::schema::record_schema) with `jsonschema`.
//! 2. **Semantic**: line-level rules the schema cannot express. All failures
//!    are collected before returning.
//!
//! | rule id            | check                                               |
//! |--------------------|-----------------------------------------------------|
//! | `json-schema`      | body matches the record schema                      |
//! | `prefix-status`    | `TABLE_ACCESS_FAILED:` if and only if status is `failed` |
//! | `failed-operation` | a `_failed` operation never has status `success`    |
//! | `failure-suffix`   | a failure line carries an `- Error:` suffix         |

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use tablelog_contracts::{
    error::{TablelogError, TablelogResult},
    verify::{VerificationFailure, VerificationReport},
};

use crate::parse::{is_audit_line, parse_line, LineKind, ParsedLine};
use crate::schema::record_schema;

/// Tallies from checking a whole log text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LogSummary {
    /// `TABLE_ACCESS:` lines that passed every check.
    pub access: usize,
    /// `TABLE_ACCESS_FAILED:` lines that passed every check.
    pub access_failed: usize,
    /// Lines without an audit prefix.
    pub skipped: usize,
    /// Audit lines that did not parse or failed a check.
    pub invalid: Vec<InvalidLine>,
}

impl LogSummary {
    pub fn is_clean(&self) -> bool {
        self.invalid.is_empty()
    }
}

/// An audit line that failed parsing or verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidLine {
    /// 1-based line number within the checked text.
    pub line_number: usize,
    pub failures: Vec<VerificationFailure>,
}

/// Checks audit lines against the record schema and the line rules.
pub struct RecordVerifier {
    validator: jsonschema::Validator,
}

impl RecordVerifier {
    /// Compile the built-in record schema.
    pub fn new() -> TablelogResult<Self> {
        let validator =
            jsonschema::validator_for(&record_schema()).map_err(|e| TablelogError::SchemaValidation {
                reason: format!("invalid record schema: {e}"),
            })?;
        Ok(Self { validator })
    }

    /// Verify one parsed line.
    pub fn verify(&self, line: &ParsedLine) -> VerificationReport {
        let mut failures: Vec<VerificationFailure> = Vec::new();
        let payload = &line.payload;

        // ── Phase 1: JSON Schema structural validation ────────────────────────
        for error in self.validator.iter_errors(payload) {
            let message = format!("JSON Schema violation at {}: {}", error.instance_path, error);
            warn!(%message, "structural validation failure");
            failures.push(VerificationFailure::new("json-schema", message));
        }

        // ── Phase 2: line rules ──────────────────────────────────────────────
        let status = payload.get("status").and_then(Value::as_str);
        let operation = payload.get("operation").and_then(Value::as_str);

        match (line.kind, status) {
            (LineKind::AccessFailed, Some(s)) if s != "failed" => {
                failures.push(VerificationFailure::new(
                    "prefix-status",
                    format!("TABLE_ACCESS_FAILED line has status '{s}'"),
                ));
            }
            (LineKind::Access, Some("failed")) => {
                failures.push(VerificationFailure::new(
                    "prefix-status",
                    "TABLE_ACCESS line has status 'failed'",
                ));
            }
            _ => {}
        }

        if let (Some(op), Some("success")) = (operation, status) {
            if op.ends_with("_failed") {
                failures.push(VerificationFailure::new(
                    "failed-operation",
                    format!("operation '{op}' recorded with status 'success'"),
                ));
            }
        }

        if line.kind == LineKind::AccessFailed && line.error_suffix.is_none() {
            failures.push(VerificationFailure::new(
                "failure-suffix",
                "TABLE_ACCESS_FAILED line has no '- Error:' suffix",
            ));
        }

        debug!(failures = failures.len(), "audit line verified");
        VerificationReport::from_failures(failures)
    }

    /// Read `path` and verify it with [`verify_log`](Self::verify_log).
    ///
    /// Returns `TablelogError::Io` when the file cannot be read as UTF-8 text.
    pub fn verify_file(&self, path: &Path) -> TablelogResult<LogSummary> {
        let text = fs::read_to_string(path).map_err(|e| TablelogError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(self.verify_log(&text))
    }

    /// Parse and verify every audit line in `text`.
    ///
    /// Lines without an audit prefix are counted as skipped, not invalid.
    pub fn verify_log(&self, text: &str) -> LogSummary {
        let mut summary = LogSummary::default();

        for (index, raw) in text.lines().enumerate() {
            if !is_audit_line(raw) {
                summary.skipped += 1;
                continue;
            }

            let failures = match parse_line(raw) {
                Ok(parsed) => {
                    let report = self.verify(&parsed);
                    if report.passed {
                        match parsed.kind {
                            LineKind::Access => summary.access += 1,
                            LineKind::AccessFailed => summary.access_failed += 1,
                        }
                        continue;
                    }
                    report.failures
                }
                Err(e) => vec![VerificationFailure::new("parse", e.to_string())],
            };

            summary.invalid.push(InvalidLine {
                line_number: index + 1,
                failures,
            });
        }

        summary
    }
}
