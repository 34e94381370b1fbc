//! Fan-out over several sinks, and construction from configuration.

use tracing::{debug, warn};

use tablelog_config::SinkSpec;
use tablelog_contracts::{error::TablelogResult, record::Severity};
use tablelog_core::traits::LogSink;

use crate::{console::StdoutSink, console::TracingSink, file::FileSink, memory::MemorySink};

/// Emits every line to each child sink.
///
/// All children are tried even when one fails; the first error is returned
/// afterwards.
pub struct FanoutSink {
    sinks: Vec<Box<dyn LogSink>>,
}

impl FanoutSink {
    pub fn new(sinks: Vec<Box<dyn LogSink>>) -> Self {
        Self { sinks }
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl LogSink for FanoutSink {
    fn emit(&self, severity: Severity, line: &str) -> TablelogResult<()> {
        let mut first_error = None;
        for (index, sink) in self.sinks.iter().enumerate() {
            if let Err(e) = sink.emit(severity, line) {
                warn!(sink = index, error = %e, "fan-out child sink failed");
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Build the sink described by `specs`.
///
/// A single spec yields that sink directly; several are wrapped in a
/// [`FanoutSink`]. When a `memory` sink is configured a handle to it is
/// returned alongside so the caller can read the lines back.
pub fn build_sink(specs: &[SinkSpec]) -> TablelogResult<(Box<dyn LogSink>, Option<MemorySink>)> {
    let mut sinks: Vec<Box<dyn LogSink>> = Vec::with_capacity(specs.len());
    let mut memory = None;

    for spec in specs {
        debug!(kind = spec.name(), "building sink");
        let sink: Box<dyn LogSink> = match spec {
            SinkSpec::Tracing => Box::new(TracingSink),
            SinkSpec::Stdout => Box::new(StdoutSink),
            SinkSpec::File { path } => Box::new(FileSink::open(path)?),
            SinkSpec::Memory => {
                let handle = memory.get_or_insert_with(MemorySink::new).clone();
                Box::new(handle)
            }
        };
        sinks.push(sink);
    }

    let sink: Box<dyn LogSink> = if sinks.len() == 1 {
        sinks.remove(0)
    } else {
        Box::new(FanoutSink::new(sinks))
    };
    Ok((sink, memory))
}
