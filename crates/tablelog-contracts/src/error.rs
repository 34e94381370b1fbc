//! Error types shared by every tablelog crate.
//!
//! Fallible operations return `TablelogResult<T>`. The identity resolver and
//! the audit emitter never surface these to their callers; they degrade
//! instead and report through `tracing`.

use thiserror::Error;

/// The unified error type for tablelog.
#[derive(Debug, Error)]
pub enum TablelogError {
    /// An audit record failed construction-time validation.
    #[error("invalid audit record: {reason}")]
    InvalidRecord { reason: String },

    /// A `catalog.schema.table` name could not be parsed.
    #[error("invalid table name '{name}': {reason}")]
    InvalidTableName { name: String, reason: String },

    /// A log sink could not accept a line.
    #[error("audit sink write failed: {reason}")]
    SinkWriteFailed { reason: String },

    /// A record could not be serialized or deserialized.
    #[error("serialization failed: {reason}")]
    Serialization { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// The "current principal" API could not be reached or answered badly.
    #[error("principal lookup failed: {reason}")]
    PrincipalLookup { reason: String },

    /// A log line did not follow the `TABLE_ACCESS` line format.
    #[error("malformed audit line: {reason}")]
    MalformedLine { reason: String },

    /// The record schema document itself could not be compiled.
    #[error("schema validation error: {reason}")]
    SchemaValidation { reason: String },

    /// The warehouse connection could not be established.
    #[error("connection failed: {message}")]
    ConnectionFailed { message: String },

    /// The warehouse rejected or failed a statement.
    #[error("query failed: {message}")]
    QueryFailed { message: String },

    /// A SQL statement could not be built from the given input.
    #[error("invalid statement: {reason}")]
    InvalidStatement { reason: String },

    /// A file could not be read or written.
    #[error("I/O error on '{path}': {reason}")]
    Io { path: String, reason: String },

    /// A named warehouse, catalog, schema, or table does not exist.
    #[error("not found: {what}")]
    NotFound { what: String },
}

/// Convenience alias used throughout the tablelog crates.
pub type TablelogResult<T> = Result<T, TablelogError>;

impl From<serde_json::Error> for TablelogError {
    fn from(e: serde_json::Error) -> Self {
        TablelogError::Serialization {
            reason: e.to_string(),
        }
    }
}
