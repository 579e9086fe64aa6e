//! Configuration constants.
//!
//! This module defines all configuration constants used throughout the
//! application, including defaults, retry tuning, and reserved field names.

/// Tag and payload field attached to every synthetic failure record.
///
/// The payload duplicates the essentials from the metadata attachment so the
/// failure survives sinks that strip the metadata namespace.
pub const FAILURE_TAG: &str = "_http_request_failure";

/// Default field under which request/response metadata is nested.
pub const DEFAULT_METADATA_TARGET: &str = "@metadata";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

/// Default number of retries for transient transport errors (on top of the
/// initial attempt).
pub const DEFAULT_MAX_RETRIES: u32 = 1;

/// Default User-Agent header value for polled requests.
pub const DEFAULT_USER_AGENT: &str = concat!("http_poller/", env!("CARGO_PKG_VERSION"));

// Retry backoff tuning
/// Initial retry delay in milliseconds.
pub const RETRY_INITIAL_DELAY_MS: u64 = 250;
/// Backoff multiplier applied to the delay after each retry.
pub const RETRY_FACTOR: u64 = 2;
/// Maximum delay between retries in seconds.
pub const RETRY_MAX_DELAY_SECS: u64 = 5;

/// Length of the random attempt identifier attached to each request context.
pub const ATTEMPT_ID_LEN: usize = 12;
