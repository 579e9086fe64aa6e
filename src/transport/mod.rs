//! The HTTP transport boundary.
//!
//! The dispatcher talks to the network only through the [`Transport`] trait,
//! passed in explicitly rather than held as process-wide state, so tests can
//! substitute a programmable fake. [`HttpTransport`] is the production
//! implementation over a shared `reqwest::Client`.

mod http;

pub use http::HttpTransport;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error_handling::TransportError;
use crate::requests::RequestSpec;

/// A delivered HTTP response, transport-agnostic.
///
/// Any status code counts as a delivered response; HTTP-level errors (4xx,
/// 5xx) are successes at this boundary and surface through the `status`
/// metadata, not as failures.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Canonical reason phrase for the status, when one exists.
    pub status_text: String,
    /// Response headers in arrival order; names lower-cased by the transport.
    pub headers: Vec<(String, String)>,
    /// The raw response body.
    pub body: Bytes,
    /// Retries performed before this response was obtained (0 when the
    /// first attempt succeeded).
    pub times_retried: u32,
}

/// Asynchronous request execution.
///
/// Implementations own connection pooling, per-request timeouts, and retry
/// policy; retries are surfaced only through
/// [`TransportResponse::times_retried`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Executes one request to completion: a delivered response of any
    /// status, or a transport-level failure.
    async fn execute(&self, spec: &RequestSpec) -> Result<TransportResponse, TransportError>;
}
