//! Error type definitions.
//!
//! This module defines all error types used throughout the application,
//! grouped by the phase in which they occur: configuration validation,
//! initialization, transport execution, body decoding, and record emission.

use std::path::PathBuf;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

/// Errors raised while building the request table from raw configuration.
///
/// All variants are fatal at startup: the poller refuses to start rather
/// than poll a partially-valid request set.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A structured request entry had no `url` key.
    #[error("request '{name}' has no URL")]
    MissingUrl {
        /// Name of the offending request entry.
        name: String,
    },

    /// A request URL could not be parsed as an absolute URI.
    #[error("request '{name}' has an invalid URL '{url}': {source}")]
    InvalidUrl {
        /// Name of the offending request entry.
        name: String,
        /// The URL text as configured.
        url: String,
        /// The underlying parse error.
        #[source]
        source: url::ParseError,
    },

    /// A request URL parsed, but its scheme is not `http` or `https`.
    #[error("request '{name}' has URL '{url}' with unsupported scheme '{scheme}'")]
    UnsupportedScheme {
        /// Name of the offending request entry.
        name: String,
        /// The URL text as configured.
        url: String,
        /// The scheme that was rejected.
        scheme: String,
    },

    /// A request entry named an HTTP verb outside the supported set.
    #[error("request '{name}' has unsupported method '{method}'")]
    InvalidMethod {
        /// Name of the offending request entry.
        name: String,
        /// The method text as configured.
        method: String,
    },

    /// An `auth` block was present but missing its user or password.
    #[error("request '{name}' has an incomplete auth block: both user and password are required")]
    IncompleteAuth {
        /// Name of the offending request entry.
        name: String,
    },

    /// The request mapping was empty.
    #[error("no requests configured")]
    EmptyRequests,

    /// The poll interval was zero, negative, or not a finite number.
    #[error("poll interval must be a positive number of seconds, got {0}")]
    InvalidInterval(f64),

    /// The request file could not be read.
    #[error("failed to read request file '{path}': {source}")]
    UnreadableFile {
        /// Path that was attempted.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The request file was not a valid name-to-request JSON mapping.
    #[error("failed to parse request file '{path}': {source}")]
    UnparseableFile {
        /// Path that was attempted.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised during startup initialization.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Transport-level request failures.
///
/// These are recovered per-request: each one becomes a tagged failure record
/// and never crashes the cycle or the scheduler.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The request did not complete within its timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The connection could not be established (refused, DNS failure, TLS failure).
    #[error("connection failed: {0}")]
    Connect(String),

    /// The request could not be constructed; not retriable.
    #[error("invalid request: {0}")]
    Build(String),

    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Whether a retry of the same request might succeed.
    ///
    /// Timeouts, connection failures, and unclassified errors are treated as
    /// transient. Request-construction failures are permanent: the same spec
    /// will fail the same way every time.
    pub fn is_retriable(&self) -> bool {
        !matches!(self, TransportError::Build(_))
    }

    /// Categorizes a `reqwest::Error`, flattening its source chain into the
    /// message so failure records carry the root cause, not just the
    /// top-level wrapper.
    pub fn from_reqwest(error: reqwest::Error) -> Self {
        let message = flatten_error_chain(&error);
        if error.is_timeout() {
            TransportError::Timeout(message)
        } else if error.is_connect() {
            TransportError::Connect(message)
        } else if error.is_builder() {
            TransportError::Build(message)
        } else {
            TransportError::Other(message)
        }
    }
}

/// Renders an error and its full source chain as a single `: `-separated string.
fn flatten_error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        // reqwest often repeats the same text at adjacent chain levels
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

/// Errors raised while decoding a response body.
///
/// Recovered per-body: logged with full request context and counted, with
/// sibling requests in the same cycle unaffected.
#[derive(Error, Debug)]
pub enum CodecError {
    /// The body was not valid JSON.
    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),

    /// One line of a newline-delimited body was not valid JSON.
    #[error("invalid JSON at line {line}: {source}")]
    JsonLine {
        /// 1-based line number within the body.
        line: usize,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised while appending a record to the sink.
///
/// Recovered per-record: logged (together with the original request error,
/// when the record being appended was itself a failure record) and swallowed.
#[derive(Error, Debug)]
pub enum SinkError {
    /// The consuming side of the sink has gone away.
    #[error("sink channel closed")]
    Closed,

    /// The record could not be serialized for the sink's wire format.
    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The sink's underlying writer failed.
    #[error("failed to write record: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_errors_are_not_retriable() {
        assert!(!TransportError::Build("bad header".into()).is_retriable());
    }

    #[test]
    fn test_transient_errors_are_retriable() {
        assert!(TransportError::Timeout("deadline elapsed".into()).is_retriable());
        assert!(TransportError::Connect("connection refused".into()).is_retriable());
        assert!(TransportError::Other("channel closed".into()).is_retriable());
    }

    #[test]
    fn test_flatten_error_chain_includes_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let err = SinkError::Io(io);
        let message = flatten_error_chain(&err);
        assert!(message.contains("failed to write record"));
        assert!(message.contains("connection refused"));
    }

    #[test]
    fn test_config_error_messages_name_the_request() {
        let err = ConfigError::IncompleteAuth {
            name: "billing".into(),
        };
        assert!(err.to_string().contains("billing"));

        let err = ConfigError::MissingUrl {
            name: "health".into(),
        };
        assert!(err.to_string().contains("health"));
    }
}
