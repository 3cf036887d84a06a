//! Decision event log.
//!
//! Each review appends one JSON line to the run's event log. The logger
//! also issues event ids, so ids stay sequential whether or not the log
//! is being written anywhere.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::warn;

use firm_events::DecisionEvent;

/// JSONL sink for decision events, with a discarding null mode.
pub struct EventLogger {
    sink: Option<BufWriter<File>>,
    issued: u64,
    written: u64,
}

impl EventLogger {
    /// Log to `path`, truncating any previous run's log there.
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        Ok(Self {
            sink: Some(BufWriter::new(File::create(path)?)),
            issued: 0,
            written: 0,
        })
    }

    /// A logger that discards entries but still issues ids; used when the
    /// simulation is driven as a library without an event log.
    pub fn null() -> Self {
        Self {
            sink: None,
            issued: 0,
            written: 0,
        }
    }

    /// Issue the next event id.
    pub fn next_id(&mut self) -> String {
        self.issued += 1;
        format!("evt_{:08}", self.issued)
    }

    /// Number of events logged so far.
    pub fn event_count(&self) -> u64 {
        self.written
    }

    /// Append one event.
    pub fn log(&mut self, event: &DecisionEvent) -> std::io::Result<()> {
        self.written += 1;
        if let Some(sink) = self.sink.as_mut() {
            serde_json::to_writer(&mut *sink, event)?;
            sink.write_all(b"\n")?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        match self.sink.as_mut() {
            Some(sink) => sink.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for EventLogger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            warn!("event log flush failed on drop: {e}");
        }
    }
}
