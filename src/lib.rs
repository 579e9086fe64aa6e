//! http_poller library: periodic HTTP polling with record enrichment
//!
//! This library polls a configured set of named HTTP endpoints on a fixed
//! interval, decodes each response body into structured records, enriches
//! every record with request/response metadata, and appends it to a sink.
//! Requests that fail become tagged failure records instead of disappearing,
//! so a malfunctioning endpoint produces a steady, debuggable stream rather
//! than silence.
//!
//! # Example
//!
//! ```no_run
//! use http_poller::{run_poller, Config};
//! use std::path::PathBuf;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     requests_file: PathBuf::from("requests.json"),
//!     interval: 30.0,
//!     ..Default::default()
//! };
//!
//! let report = run_poller(config).await?;
//! println!("Polled {} cycle(s), emitted {} record(s)",
//!          report.cycles, report.records_emitted);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or ensure you're calling library functions within an async
//! context.

#![warn(missing_docs)]

mod codec;
pub mod config;
mod error_handling;
pub mod initialization;
mod poller;
mod record;
mod requests;
mod sink;
mod transport;

// Re-export public API
pub use codec::{build_codec, Codec, JsonCodec, JsonLinesCodec};
pub use config::{CodecKind, Config, LogFormat, LogLevel};
pub use error_handling::{
    CodecError, ConfigError, FailureKind, InitializationError, PollStats, SinkError,
    TransportError,
};
pub use poller::{build_metadata, PollReport, Poller, PollerOptions, RequestContext};
pub use record::Record;
pub use requests::{
    load_requests, BasicAuth, HttpMethod, RawRequestEntry, RawRequestSpec, RawRequests,
    RequestOptions, RequestSpec, RequestTable,
};
pub use run::run_poller;
pub use sink::{ChannelSink, RecordSink, StdoutSink};
pub use transport::{HttpTransport, Transport, TransportResponse};

// Internal run module (assembles the components and drives the poller)
mod run {
    use anyhow::{Context, Result};
    use std::sync::Arc;

    use log::info;
    use tokio_util::sync::CancellationToken;

    use crate::codec::build_codec;
    use crate::config::Config;
    use crate::initialization::init_client;
    use crate::poller::{PollReport, Poller, PollerOptions};
    use crate::requests::{load_requests, RequestTable};
    use crate::sink::StdoutSink;
    use crate::transport::HttpTransport;

    /// Runs the poller with the provided configuration until Ctrl-C.
    ///
    /// This is the main entry point for the binary. It loads and validates
    /// the request file, assembles the production collaborators (reqwest
    /// transport, configured codec, stdout sink), and polls until
    /// interrupted. Embedders that need a custom transport, codec, or sink
    /// should assemble a [`Poller`] directly instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the request file cannot be read or parsed, if
    /// any request entry is invalid, if the interval is not positive, or if
    /// the HTTP client cannot be constructed. All of these refuse startup
    /// before any network activity.
    pub async fn run_poller(config: Config) -> Result<PollReport> {
        let raw = load_requests(&config.requests_file)?;
        let table = RequestTable::build(raw)?;
        info!(
            "Registered {} request(s); polling every {}s",
            table.len(),
            config.interval
        );

        let client = init_client(&config).context("Failed to initialize HTTP client")?;
        let transport = Arc::new(HttpTransport::new(client, config.max_retries));
        let codec = build_codec(config.codec);
        let sink = Arc::new(StdoutSink);

        let poller = Poller::new(
            table,
            transport,
            codec,
            sink,
            PollerOptions {
                interval_seconds: config.interval,
                metadata_target: config.metadata_target().map(String::from),
                target: config.target().map(String::from),
                host: None,
            },
        )?;
        let stats = poller.stats();

        let shutdown = CancellationToken::new();
        let signal_token = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Ctrl-C received, shutting down");
                signal_token.cancel();
            }
        });

        let report = poller.run(shutdown).await;
        stats.log_summary();
        Ok(report)
    }
}
