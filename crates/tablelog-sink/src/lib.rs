//! # tablelog-sink
//!
//! Concrete [`LogSink`](tablelog_core::traits::LogSink) implementations for
//! audit lines.
//!
//! ## Overview
//!
//! | sink          | destination                                      |
//! |---------------|--------------------------------------------------|
//! | `TracingSink` | `tracing` events under target `table_access`     |
//! | `StdoutSink`  | standard output                                  |
//! | `FileSink`    | an append-only file with a timestamped prefix    |
//! | `MemorySink`  | a shared in-memory buffer                        |
//! | `FanoutSink`  | every child sink in turn                         |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tablelog_sink::build_sink;
//!
//! let (sink, memory) = build_sink(&config.sinks)?;
//! let emitter = AuditEmitter::new(settings, sink);
//! ```

pub mod console;
pub mod fanout;
pub mod file;
pub mod memory;

pub use console::{StdoutSink, TracingSink};
pub use fanout::{build_sink, FanoutSink};
pub use file::FileSink;
pub use memory::{EmittedLine, MemorySink};

// ── Tests ─────────────────────────────────────────────────────────────────────
