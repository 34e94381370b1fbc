//! # tablelog-core
//!
//! Identity resolution and audit emission for table operations.
//!
//! This crate provides:
//! - The collaborator traits (`LogSink`, `PrincipalLookup`, `NoticeSurface`)
//! - `IdentityResolver`, which answers "who is calling" from request headers
//!   or the authenticated principal
//! - `AuditEmitter`, which turns one table operation into one log line
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tablelog_core::{AuditEmitter, EmitterSettings, IdentityResolver};
//! ```

pub mod emitter;
pub mod format;
pub mod resolver;
pub mod traits;

pub use emitter::{AuditEmitter, EmitOutcome, EmitterSettings, Notice};
pub use resolver::{resolve_identity, IdentityResolver};
