//! The polling engine: scheduler, dispatcher, response handling, metadata.
//!
//! A [`Poller`] binds a validated request table to its collaborators (the
//! transport, the codec, the sink) and drives fixed-interval cycles. Within
//! a cycle every named request is dispatched concurrently; every dispatch
//! produces exactly one terminal outcome — one-or-more decoded records or
//! exactly one tagged failure record — even when the transport fails outside
//! its normal callback path.

mod context;
mod dispatcher;
mod handler;
mod metadata;
mod scheduler;

// Re-export public API
pub use context::RequestContext;
pub use metadata::build_metadata;
pub use scheduler::PollReport;

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::codec::Codec;
use crate::error_handling::{ConfigError, PollStats};
use crate::requests::RequestTable;
use crate::sink::RecordSink;
use crate::transport::Transport;

use dispatcher::Dispatcher;
use handler::ResponseHandler;

/// Enrichment and scheduling settings for a [`Poller`].
#[derive(Debug, Clone)]
pub struct PollerOptions {
    /// Seconds between the start of one cycle and the start of the next.
    /// Must be a positive, finite number.
    pub interval_seconds: f64,
    /// Field under which metadata is nested; `None` disables enrichment.
    pub metadata_target: Option<String>,
    /// Field under which decoded content is nested; `None` merges decoded
    /// content at the top level.
    pub target: Option<String>,
    /// Host name reported in metadata; resolved from the machine when
    /// `None`.
    pub host: Option<String>,
}

/// The assembled polling engine.
pub struct Poller {
    dispatcher: Dispatcher,
    interval: Duration,
    stats: Arc<PollStats>,
}

impl Poller {
    /// Assembles a poller from a validated table and its collaborators.
    ///
    /// The host name for metadata is resolved here, once; per-cycle code
    /// never consults the machine again.
    pub fn new(
        table: RequestTable,
        transport: Arc<dyn Transport>,
        codec: Arc<dyn Codec>,
        sink: Arc<dyn RecordSink>,
        options: PollerOptions,
    ) -> Result<Self, ConfigError> {
        if !options.interval_seconds.is_finite() || options.interval_seconds <= 0.0 {
            return Err(ConfigError::InvalidInterval(options.interval_seconds));
        }
        let interval = Duration::from_secs_f64(options.interval_seconds);
        let host = options
            .host
            .unwrap_or_else(crate::initialization::resolve_host);
        let stats = Arc::new(PollStats::new());
        let handler = Arc::new(ResponseHandler::new(
            codec,
            sink,
            Arc::clone(&stats),
            host,
            options.metadata_target,
            options.target,
        ));
        let dispatcher = Dispatcher::new(Arc::new(table), transport, handler, Arc::clone(&stats));
        Ok(Self {
            dispatcher,
            interval,
            stats,
        })
    }

    /// The shared statistics tracker for this poller.
    pub fn stats(&self) -> Arc<PollStats> {
        Arc::clone(&self.stats)
    }

    /// Runs exactly one poll cycle: dispatch, await outcomes, reconcile.
    pub async fn run_cycle(&self) {
        self.dispatcher.dispatch_cycle().await;
        self.stats.record_cycle();
    }

    /// Polls on the configured interval until `shutdown` is cancelled.
    pub async fn run(&self, shutdown: CancellationToken) -> PollReport {
        scheduler::run_schedule(&self.dispatcher, self.interval, &self.stats, shutdown).await
    }
}
