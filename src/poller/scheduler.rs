//! Fixed-interval cycle scheduling.

use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::error_handling::{FailureKind, PollStats};

use super::dispatcher::Dispatcher;

/// Summary of a completed polling run.
#[derive(Debug, Clone)]
pub struct PollReport {
    /// Number of completed poll cycles.
    pub cycles: usize,
    /// Requests dispatched across all cycles.
    pub requests_dispatched: usize,
    /// Records appended to the sink (decoded and failure records alike).
    pub records_emitted: usize,
    /// Requests that ended in a transport failure.
    pub transport_failures: usize,
    /// Response bodies dropped because they could not be decoded.
    pub decode_failures: usize,
    /// Wall-clock duration of the run in seconds.
    pub elapsed_seconds: f64,
}

impl PollReport {
    fn from_stats(stats: &PollStats, elapsed: Duration) -> Self {
        Self {
            cycles: stats.cycles(),
            requests_dispatched: stats.dispatched(),
            records_emitted: stats.emitted(),
            transport_failures: stats.failure_count(FailureKind::Transport),
            decode_failures: stats.failure_count(FailureKind::Decode),
            elapsed_seconds: elapsed.as_secs_f64(),
        }
    }
}

/// Drives cycles at a fixed start-to-start interval until shutdown.
///
/// The first cycle fires immediately. Ticks are start-to-start: a cycle that
/// overruns the interval delays the next tick (it is never skipped or run
/// concurrently), so dispatch phases of consecutive cycles can never
/// overlap. On cancellation no further cycles start; a dispatch already in
/// progress is abandoned mid-await and its spawned request tasks drain
/// fire-and-forget.
pub(crate) async fn run_schedule(
    dispatcher: &Dispatcher,
    interval: Duration,
    stats: &PollStats,
    shutdown: CancellationToken,
) -> PollReport {
    let started = std::time::Instant::now();
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {
                log::debug!("Starting poll cycle {}", stats.cycles() + 1);
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        log::info!("Shutdown requested; leaving in-flight requests to drain");
                        break;
                    }
                    _ = dispatcher.dispatch_cycle() => {
                        stats.record_cycle();
                    }
                }
            }
        }
    }

    PollReport::from_stats(stats, started.elapsed())
}
