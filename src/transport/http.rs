//! reqwest-backed transport with bounded retry.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_retry::strategy::ExponentialBackoff;
use tokio_retry::RetryIf;

use crate::config::{RETRY_FACTOR, RETRY_INITIAL_DELAY_MS, RETRY_MAX_DELAY_SECS};
use crate::error_handling::TransportError;
use crate::requests::{HttpMethod, RequestSpec};

use super::{Transport, TransportResponse};

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Head => reqwest::Method::HEAD,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Options => reqwest::Method::OPTIONS,
        }
    }
}

/// Production transport over a shared `reqwest::Client`.
///
/// The client (and therefore the connection pool) is shared across all
/// requests and cycles. Transient errors are retried with exponential
/// backoff up to `max_retries` times; the count actually used is reported in
/// [`TransportResponse::times_retried`].
pub struct HttpTransport {
    client: Arc<reqwest::Client>,
    max_retries: u32,
}

impl HttpTransport {
    /// Creates a transport over an existing client.
    pub fn new(client: Arc<reqwest::Client>, max_retries: u32) -> Self {
        Self {
            client,
            max_retries,
        }
    }

    /// Builds and sends the request once, without retry.
    async fn send_once(&self, spec: &RequestSpec) -> Result<TransportResponse, TransportError> {
        let mut builder = self
            .client
            .request(spec.method.into(), spec.url.as_str());
        for (name, value) in &spec.options.headers {
            builder = builder.header(name, value);
        }
        if let Some(auth) = &spec.options.auth {
            builder = builder.basic_auth(&auth.user, Some(&auth.password));
        }
        if let Some(seconds) = spec.options.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        if let Some(body) = &spec.options.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(TransportError::from_reqwest)?;
        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or("").to_string(),
                )
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(TransportError::from_reqwest)?;

        Ok(TransportResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            headers,
            body,
            times_retried: 0,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, spec: &RequestSpec) -> Result<TransportResponse, TransportError> {
        // The action closure runs once per attempt, so retries = attempts - 1.
        let attempts = Arc::new(AtomicU32::new(0));

        let result = RetryIf::spawn(
            retry_strategy(self.max_retries),
            || {
                attempts.fetch_add(1, Ordering::SeqCst);
                self.send_once(spec)
            },
            TransportError::is_retriable,
        )
        .await;

        let times_retried = attempts.load(Ordering::SeqCst).saturating_sub(1);
        result.map(|mut response| {
            response.times_retried = times_retried;
            response
        })
    }
}

/// Exponential backoff strategy bounded by `max_retries` additional attempts.
fn retry_strategy(max_retries: u32) -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(RETRY_INITIAL_DELAY_MS)
        .factor(RETRY_FACTOR)
        .max_delay(Duration::from_secs(RETRY_MAX_DELAY_SECS))
        .take(max_retries as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_strategy_is_bounded() {
        assert_eq!(retry_strategy(0).count(), 0);
        assert_eq!(retry_strategy(3).count(), 3);
    }

    #[test]
    fn test_retry_strategy_caps_delay() {
        let cap = Duration::from_secs(RETRY_MAX_DELAY_SECS);
        for delay in retry_strategy(10) {
            assert!(delay <= cap, "delay {delay:?} exceeds cap {cap:?}");
        }
    }

    #[test]
    fn test_method_conversion() {
        assert_eq!(reqwest::Method::from(HttpMethod::Get), reqwest::Method::GET);
        assert_eq!(
            reqwest::Method::from(HttpMethod::Patch),
            reqwest::Method::PATCH
        );
    }
}
