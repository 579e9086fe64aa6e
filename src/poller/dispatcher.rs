//! Per-cycle concurrent dispatch and outcome reconciliation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use futures::stream::FuturesUnordered;
use futures::StreamExt;

use crate::error_handling::{PollStats, TransportError};
use crate::requests::RequestTable;
use crate::transport::Transport;

use super::context::RequestContext;
use super::handler::ResponseHandler;

/// Tracks every context issued in one cycle until its terminal outcome.
///
/// A per-request task must `claim` its context before delivering an outcome;
/// the claim removes it, so exactly one terminal outcome can ever fire per
/// context. Whatever is left after all tasks have been joined never reached
/// a terminal callback and is owed a synthesized failure.
struct CycleLedger {
    pending: Mutex<HashMap<String, RequestContext>>,
}

impl CycleLedger {
    fn new() -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
        }
    }

    fn register(&self, ctx: RequestContext) {
        self.lock().insert(ctx.name().to_string(), ctx);
    }

    /// Takes the context for `name`, if no terminal outcome claimed it yet.
    fn claim(&self, name: &str) -> Option<RequestContext> {
        self.lock().remove(name)
    }

    /// Drains every unclaimed context.
    fn drain(&self) -> Vec<RequestContext> {
        self.lock().drain().map(|(_, ctx)| ctx).collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, RequestContext>> {
        match self.pending.lock() {
            Ok(guard) => guard,
            // A poisoned ledger only means a task panicked mid-claim; the
            // map itself is still usable for the sweep.
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Issues one cycle's worth of requests and reconciles their outcomes.
pub struct Dispatcher {
    table: Arc<RequestTable>,
    transport: Arc<dyn Transport>,
    handler: Arc<ResponseHandler>,
    stats: Arc<PollStats>,
}

impl Dispatcher {
    /// Creates a dispatcher over the shared request table and collaborators.
    pub fn new(
        table: Arc<RequestTable>,
        transport: Arc<dyn Transport>,
        handler: Arc<ResponseHandler>,
        stats: Arc<PollStats>,
    ) -> Self {
        Self {
            table,
            transport,
            handler,
            stats,
        }
    }

    /// Runs one full cycle: issue every named request concurrently, deliver
    /// each outcome exactly once, then sweep for outcomes lost to abnormal
    /// task termination.
    ///
    /// Every context produces exactly one terminal outcome. The normal path
    /// is the task's own success/failure delivery; the sweep converts
    /// anything that bypassed it (a panicked task, a cancelled runtime
    /// handle) into a failure record through the same failure path, keyed by
    /// name back to the original context.
    pub async fn dispatch_cycle(&self) {
        let batch_started_at = Utc::now();
        let ledger = Arc::new(CycleLedger::new());
        let mut inflight = FuturesUnordered::new();

        for spec in self.table.iter() {
            let ctx = RequestContext::new(Arc::clone(spec), batch_started_at);
            log::debug!(
                "Fetching '{}' [{}] {} {}",
                ctx.name(),
                ctx.attempt_id,
                spec.method,
                spec.raw_url
            );
            self.stats.record_dispatch();

            let name = ctx.name().to_string();
            ledger.register(ctx);

            let spec = Arc::clone(spec);
            let transport = Arc::clone(&self.transport);
            let handler = Arc::clone(&self.handler);
            let ledger = Arc::clone(&ledger);
            inflight.push(tokio::spawn(async move {
                let result = transport.execute(&spec).await;
                // Claim before delivering: the ledger guarantees at most one
                // terminal outcome per context.
                let Some(ctx) = ledger.claim(&name) else {
                    return;
                };
                match result {
                    Ok(response) => handler.on_success(&ctx, &response),
                    Err(error) => handler.on_failure(&ctx, &error),
                }
            }));
        }

        while let Some(joined) = inflight.next().await {
            if let Err(join_error) = joined {
                log::warn!("Request task terminated abnormally: {join_error}");
            }
        }

        // Reconciliation sweep. Without it, a request whose task died before
        // delivering would vanish without a failure record.
        for ctx in ledger.drain() {
            log::error!(
                "Request '{}' [{}] produced no terminal outcome; synthesizing failure",
                ctx.name(),
                ctx.attempt_id
            );
            let error =
                TransportError::Other("request terminated without a terminal outcome".to_string());
            self.handler.on_failure(&ctx, &error);
        }
    }
}
