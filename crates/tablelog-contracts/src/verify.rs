//! Report types produced when audit lines are checked after the fact.

use serde::{Deserialize, Serialize};

/// The result of checking one audit line against the record schema and the
/// line-level rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// True only if every check passed.
    pub passed: bool,
    /// Every failure found. Empty on pass.
    pub failures: Vec<VerificationFailure>,
}

impl VerificationReport {
    pub fn from_failures(failures: Vec<VerificationFailure>) -> Self {
        Self {
            passed: failures.is_empty(),
            failures,
        }
    }
}

/// A single failed check within a `VerificationReport`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationFailure {
    /// Identifier of the check that failed, e.g. `"json-schema"`.
    pub rule_id: String,
    /// Human-readable explanation.
    pub message: String,
}

impl VerificationFailure {
    pub fn new(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            message: message.into(),
        }
    }
}
