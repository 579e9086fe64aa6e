// Shared test helpers for poller assembly and fake collaborators.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use tokio::sync::mpsc::UnboundedReceiver;

use http_poller::{
    ChannelSink, JsonCodec, Poller, PollerOptions, RawRequests, Record, RequestSpec, RequestTable,
    Transport, TransportError, TransportResponse,
};

/// One programmed outcome for a named request.
#[derive(Debug, Clone)]
#[allow(dead_code)] // Used by other test files
pub enum FakeOutcome {
    /// Deliver a response with this status and body.
    Respond {
        status: u16,
        body: &'static str,
        times_retried: u32,
    },
    /// Fail with a timeout error.
    Timeout(&'static str),
    /// Fail with a connection error.
    Refuse(&'static str),
    /// Panic inside the transport, so the request task dies without ever
    /// reaching a terminal callback.
    Panic,
    /// Sleep before delivering the inner outcome.
    Delay(Duration, Box<FakeOutcome>),
}

/// Programmable in-memory transport keyed by request name.
pub struct FakeTransport {
    outcomes: Mutex<HashMap<String, FakeOutcome>>,
    calls: AtomicUsize,
}

#[allow(dead_code)] // Used by other test files
impl FakeTransport {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Programs the outcome for one request name.
    pub fn set(self, name: &str, outcome: FakeOutcome) -> Self {
        self.outcomes
            .lock()
            .expect("fake transport lock poisoned")
            .insert(name.to_string(), outcome);
        self
    }

    /// Shorthand for a 200 response with the given body.
    pub fn ok(self, name: &str, body: &'static str) -> Self {
        self.set(
            name,
            FakeOutcome::Respond {
                status: 200,
                body,
                times_retried: 0,
            },
        )
    }

    /// Number of execute calls observed.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn resolve(&self, outcome: FakeOutcome) -> Result<TransportResponse, TransportError> {
        match outcome {
            FakeOutcome::Respond {
                status,
                body,
                times_retried,
            } => Ok(TransportResponse {
                status,
                status_text: if status == 200 { "OK" } else { "" }.to_string(),
                headers: vec![("content-type".to_string(), "application/json".to_string())],
                body: Bytes::from_static(body.as_bytes()),
                times_retried,
            }),
            FakeOutcome::Timeout(message) => Err(TransportError::Timeout(message.to_string())),
            FakeOutcome::Refuse(message) => Err(TransportError::Connect(message.to_string())),
            FakeOutcome::Panic => panic!("fake transport programmed to panic"),
            FakeOutcome::Delay(duration, inner) => {
                tokio::time::sleep(duration).await;
                Box::pin(self.resolve(*inner)).await
            }
        }
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn execute(&self, spec: &RequestSpec) -> Result<TransportResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self
            .outcomes
            .lock()
            .expect("fake transport lock poisoned")
            .get(&spec.name)
            .cloned();
        match outcome {
            Some(outcome) => self.resolve(outcome).await,
            None => Err(TransportError::Other(format!(
                "no outcome programmed for '{}'",
                spec.name
            ))),
        }
    }
}

/// Builds a validated request table from a JSON mapping.
#[allow(dead_code)] // Used by other test files
pub fn make_table(entries: Value) -> RequestTable {
    let raw: RawRequests =
        serde_json::from_value(entries).expect("raw requests should deserialize");
    RequestTable::build(raw).expect("request table should build")
}

/// Assembles a poller over the fake transport with a channel sink, returning
/// the receiving half for assertions.
#[allow(dead_code)] // Used by other test files
pub fn make_poller(
    table: RequestTable,
    transport: Arc<FakeTransport>,
    interval_seconds: f64,
    metadata_target: Option<&str>,
    target: Option<&str>,
) -> (Poller, UnboundedReceiver<Record>) {
    let (sink, rx) = ChannelSink::new();
    let poller = Poller::new(
        table,
        transport,
        Arc::new(JsonCodec),
        Arc::new(sink),
        PollerOptions {
            interval_seconds,
            metadata_target: metadata_target.map(String::from),
            target: target.map(String::from),
            host: Some("test-host".to_string()),
        },
    )
    .expect("poller should assemble");
    (poller, rx)
}

/// Drains every queued record from the sink channel.
#[allow(dead_code)] // Used by other test files
pub fn drain(rx: &mut UnboundedReceiver<Record>) -> Vec<Record> {
    let mut records = Vec::new();
    while let Ok(record) = rx.try_recv() {
        records.push(record);
    }
    records
}
