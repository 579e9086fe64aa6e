//! Poll statistics tracking.
//!
//! This module provides thread-safe statistics tracking for cycles,
//! dispatched requests, emitted records, and categorized failures.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use strum::IntoEnumIterator;
use strum_macros::EnumIter;

/// Categories of recoverable failures observed while polling.
///
/// Transport and decode failures are tracked separately so a misbehaving
/// endpoint (network errors) can be told apart from a misconfigured codec
/// (well-delivered but undecodable bodies).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum FailureKind {
    /// The request never produced a usable response (timeout, connect error,
    /// or an outcome recovered by the reconciliation sweep).
    Transport,
    /// The response arrived but its body could not be decoded.
    Decode,
    /// A record could not be appended to the sink.
    Emit,
}

/// Thread-safe poll statistics tracker.
///
/// All counters are atomic, allowing concurrent updates from the per-request
/// tasks of a cycle. Shared across tasks behind an `Arc`.
pub struct PollStats {
    cycles: AtomicUsize,
    dispatched: AtomicUsize,
    emitted: AtomicUsize,
    failures: HashMap<FailureKind, AtomicUsize>,
}

impl PollStats {
    /// Creates a tracker with every counter at zero.
    pub fn new() -> Self {
        let mut failures = HashMap::new();
        for kind in FailureKind::iter() {
            failures.insert(kind, AtomicUsize::new(0));
        }
        PollStats {
            cycles: AtomicUsize::new(0),
            dispatched: AtomicUsize::new(0),
            emitted: AtomicUsize::new(0),
            failures,
        }
    }

    /// Records one completed poll cycle.
    pub fn record_cycle(&self) {
        self.cycles.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of completed poll cycles.
    pub fn cycles(&self) -> usize {
        self.cycles.load(Ordering::SeqCst)
    }

    /// Records one dispatched request.
    pub fn record_dispatch(&self) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of requests dispatched across all cycles.
    pub fn dispatched(&self) -> usize {
        self.dispatched.load(Ordering::SeqCst)
    }

    /// Records one record appended to the sink.
    pub fn record_emitted(&self) {
        self.emitted.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of records appended to the sink across all cycles.
    pub fn emitted(&self) -> usize {
        self.emitted.load(Ordering::SeqCst)
    }

    /// Increments the counter for one failure category.
    pub fn record_failure(&self, kind: FailureKind) {
        if let Some(counter) = self.failures.get(&kind) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment failure counter for {:?} which is not in the map. \
                 This indicates a bug in PollStats initialization.",
                kind
            );
        }
    }

    /// The count for one failure category.
    pub fn failure_count(&self, kind: FailureKind) -> usize {
        self.failures
            .get(&kind)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Logs a one-line summary of all non-zero counters.
    pub fn log_summary(&self) {
        log::info!(
            "Poll summary: {} cycle(s), {} request(s) dispatched, {} record(s) emitted",
            self.cycles(),
            self.dispatched(),
            self.emitted()
        );
        for kind in FailureKind::iter() {
            let count = self.failure_count(kind);
            if count > 0 {
                log::info!("  {:?} failures: {}", kind, count);
            }
        }
    }
}

impl Default for PollStats {
    fn default() -> Self {
        Self::new()
    }
}
