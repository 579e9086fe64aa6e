//! Downstream record sinks.
//!
//! The poller hands every finished record to a [`RecordSink`]. Sinks must
//! tolerate concurrent appends from the per-request tasks of a cycle, and
//! must not block unboundedly; both implementations here satisfy that.

use std::io::Write;

use tokio::sync::mpsc;

use crate::error_handling::SinkError;
use crate::record::Record;

/// Consumes finished records.
pub trait RecordSink: Send + Sync {
    /// Appends one record. Errors are the caller's to log and swallow;
    /// a failing sink must never take down a poll cycle.
    fn append(&self, record: Record) -> Result<(), SinkError>;
}

/// In-process sink backed by an unbounded tokio channel.
///
/// The natural choice when embedding the poller: the receiving half is
/// handed to whatever consumes the records.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Record>,
}

impl ChannelSink {
    /// Creates the sink and the receiving half of its channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Record>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl RecordSink for ChannelSink {
    fn append(&self, record: Record) -> Result<(), SinkError> {
        self.tx.send(record).map_err(|_| SinkError::Closed)
    }
}

/// Sink that writes each record as one JSON line on stdout.
///
/// Used by the CLI binary; locks stdout per record so concurrently appended
/// records never interleave within a line.
pub struct StdoutSink;

impl RecordSink for StdoutSink {
    fn append(&self, record: Record) -> Result<(), SinkError> {
        let line = serde_json::to_string(&record)?;
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "{line}")?;
        Ok(())
    }
}
