//! Per-attempt request context.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use rand::distr::Alphanumeric;
use rand::Rng;

use crate::config::ATTEMPT_ID_LEN;
use crate::requests::RequestSpec;

/// Ephemeral identity for one dispatch of one named request.
///
/// Created immediately before dispatch and alive only until its terminal
/// outcome (success or failure) is delivered; exactly one exists per
/// (cycle, name) pair and none is ever reused across cycles.
#[derive(Debug)]
pub struct RequestContext {
    /// The immutable spec this attempt was issued from.
    pub spec: Arc<RequestSpec>,
    /// Opaque attempt identifier, for log traceability only.
    pub attempt_id: String,
    /// Timestamp shared by every context in the same cycle.
    pub batch_started_at: DateTime<Utc>,
    /// Timestamp of this specific dispatch.
    pub issued_at: DateTime<Utc>,
    /// Monotonic counterpart of `issued_at`, used to measure runtime.
    started: Instant,
}

impl RequestContext {
    /// Creates a fresh context for one dispatch.
    pub fn new(spec: Arc<RequestSpec>, batch_started_at: DateTime<Utc>) -> Self {
        Self {
            spec,
            attempt_id: new_attempt_id(),
            batch_started_at,
            issued_at: Utc::now(),
            started: Instant::now(),
        }
    }

    /// The request name this attempt belongs to.
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// Seconds elapsed since this attempt was issued.
    pub fn runtime_seconds(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}

/// Random alphanumeric attempt identifier.
fn new_attempt_id() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(ATTEMPT_ID_LEN)
        .map(char::from)
        .collect()
}
