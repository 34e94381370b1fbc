//! Collaborator traits at the edges of the audit pipeline.
//!
//! - `LogSink`: where formatted audit lines go
//! - `PrincipalLookup`: the SDK's "current authenticated principal" call
//! - `NoticeSurface`: optional UI-visible debug surface
//!
//! The emitter and resolver own the policy (severity, fallbacks, swallowing
//! failures); implementations only move bytes.

use std::sync::Arc;

use tablelog_contracts::{error::TablelogResult, record::Severity};

use crate::emitter::Notice;

/// A destination for formatted audit lines.
pub trait LogSink: Send + Sync {
    /// Write one line at `severity`.
    ///
    /// `line` is already fully formatted and never contains a newline.
    fn emit(&self, severity: Severity, line: &str) -> TablelogResult<()>;
}

impl<T: LogSink + ?Sized> LogSink for Arc<T> {
    fn emit(&self, severity: Severity, line: &str) -> TablelogResult<()> {
        (**self).emit(severity, line)
    }
}

impl<T: LogSink + ?Sized> LogSink for Box<T> {
    fn emit(&self, severity: Severity, line: &str) -> TablelogResult<()> {
        (**self).emit(severity, line)
    }
}

/// The "who am I" call of an already-authenticated SDK client.
///
/// Used only when no request headers are available, typically when the
/// application runs locally or outside a request.
pub trait PrincipalLookup: Send + Sync {
    /// Return the user name of the principal the client is authenticated as.
    fn current_user_name(&self) -> TablelogResult<String>;
}

/// A UI surface that can show a short per-operation notice.
pub trait NoticeSurface: Send + Sync {
    fn notify(&self, notice: &Notice) -> TablelogResult<()>;
}
