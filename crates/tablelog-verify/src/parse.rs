//! Audit line parsing.
//!
//! A line is located by its prefix anywhere in the text, so lines written by
//! the file sink (which prepends a timestamp, level and logger name) parse
//! the same as bare ones.

use serde_json::Value;

use tablelog_contracts::{
    error::{TablelogError, TablelogResult},
    record::{AuditRecord, Failure, FailureKind},
};
use tablelog_core::format::{ACCESS_FAILED_PREFIX, ACCESS_PREFIX, ERROR_SEPARATOR};

/// Which prefix a line carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Access,
    AccessFailed,
}

/// One audit line split into its parts.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLine {
    pub kind: LineKind,
    /// The JSON body, unvalidated.
    pub payload: Value,
    /// The `- Error: {kind}: {message}` suffix of a failure line.
    pub error_suffix: Option<Failure>,
}

impl ParsedLine {
    /// Deserialize the body as an [`AuditRecord`] and re-check its invariants.
    pub fn into_record(self) -> TablelogResult<AuditRecord> {
        let record: AuditRecord = serde_json::from_value(self.payload)?;
        record.validate()?;
        Ok(record)
    }
}

/// True when `line` carries either audit prefix.
pub fn is_audit_line(line: &str) -> bool {
    line.contains(ACCESS_FAILED_PREFIX) || line.contains(ACCESS_PREFIX)
}

/// Split one audit line into prefix kind, JSON body and error suffix.
///
/// # Errors
///
/// `TablelogError::MalformedLine` when no prefix is present, the body is not
/// a single JSON object, or a success line has trailing text.
pub fn parse_line(line: &str) -> TablelogResult<ParsedLine> {
    // The first prefix in the line wins; either may also appear inside a
    // JSON string value further along.
    let failed = line
        .find(ACCESS_FAILED_PREFIX)
        .map(|at| (at, LineKind::AccessFailed, ACCESS_FAILED_PREFIX));
    let access = line
        .find(ACCESS_PREFIX)
        .map(|at| (at, LineKind::Access, ACCESS_PREFIX));
    let (at, kind, prefix) = match (failed, access) {
        (Some(f), Some(a)) => {
            if f.0 < a.0 {
                f
            } else {
                a
            }
        }
        (Some(found), None) | (None, Some(found)) => found,
        (None, None) => return Err(malformed("no TABLE_ACCESS prefix")),
    };
    let rest = &line[at + prefix.len()..];

    let rest = rest.trim_start();
    let mut stream = serde_json::Deserializer::from_str(rest).into_iter::<Value>();
    let payload = match stream.next() {
        Some(Ok(value)) => value,
        Some(Err(e)) => return Err(malformed(&format!("invalid JSON body: {e}"))),
        None => return Err(malformed("missing JSON body")),
    };
    if !payload.is_object() {
        return Err(malformed("JSON body is not an object"));
    }
    let tail = rest[stream.byte_offset()..].trim_end();

    let error_suffix = match kind {
        LineKind::Access if tail.is_empty() => None,
        LineKind::Access => return Err(malformed("unexpected text after JSON body")),
        LineKind::AccessFailed if tail.is_empty() => None,
        LineKind::AccessFailed => {
            let text = tail
                .strip_prefix(ERROR_SEPARATOR.trim_end())
                .map(str::trim_start)
                .ok_or_else(|| malformed("expected '- Error:' after JSON body"))?;
            Some(parse_error_text(text))
        }
    };

    Ok(ParsedLine {
        kind,
        payload,
        error_suffix,
    })
}

/// `"{kind}: {message}"` when `kind` is a known failure kind, otherwise the
/// whole text is the message.
fn parse_error_text(text: &str) -> Failure {
    match text.split_once(": ") {
        Some((name, message)) if FailureKind::from_name(name).as_str() == name => {
            Failure::new(FailureKind::from_name(name), message)
        }
        _ => Failure::new(FailureKind::Unknown, text),
    }
}

fn malformed(reason: &str) -> TablelogError {
    TablelogError::MalformedLine {
        reason: reason.to_string(),
    }
}
