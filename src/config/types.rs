//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument
//! parsing and configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_MAX_RETRIES, DEFAULT_METADATA_TARGET, DEFAULT_TIMEOUT_SECONDS, DEFAULT_USER_AGENT,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to
/// most verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Codec used to decode response bodies into records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CodecKind {
    /// One JSON document per body; a top-level array yields one record per element
    Json,
    /// Newline-delimited JSON, one record per non-blank line
    JsonLines,
}

/// Poller configuration.
///
/// Doubles as the CLI surface (clap derive) and the library configuration
/// struct; library callers can construct it directly or start from
/// `Default::default()`.
///
/// # Examples
///
/// ```no_run
/// use http_poller::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     requests_file: PathBuf::from("requests.json"),
///     interval: 30.0,
///     ..Default::default()
/// };
/// ```
#[derive(Parser, Debug, Clone)]
#[command(
    name = "http_poller",
    version,
    about = "Polls a set of named HTTP endpoints on a fixed interval and emits decoded, metadata-enriched records"
)]
pub struct Config {
    /// Path to a JSON file mapping request names to a URL string or a
    /// request spec (method, url, headers, auth, timeout_seconds, body)
    pub requests_file: PathBuf,

    /// Seconds between the start of one poll cycle and the start of the next
    #[arg(short, long)]
    pub interval: f64,

    /// Field under which request/response metadata is nested; an empty
    /// value disables metadata enrichment entirely
    #[arg(long, default_value = DEFAULT_METADATA_TARGET)]
    pub metadata_target: String,

    /// Field under which decoded response content is nested; empty merges
    /// the decoded content at the top level of the record
    #[arg(long, default_value = "")]
    pub target: String,

    /// Codec used to decode response bodies
    #[arg(long, value_enum, default_value = "json")]
    pub codec: CodecKind,

    /// Default per-request timeout in seconds (individual requests may
    /// override this via their spec)
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    /// Maximum retries for transient transport errors, on top of the
    /// initial attempt; the count actually used is reported as
    /// `times_retried` in metadata
    #[arg(long, default_value_t = DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain")]
    pub log_format: LogFormat,
}

impl Config {
    /// The metadata target field, or `None` when enrichment is disabled.
    pub fn metadata_target(&self) -> Option<&str> {
        if self.metadata_target.is_empty() {
            None
        } else {
            Some(&self.metadata_target)
        }
    }

    /// The result-wrapping target field, or `None` when decoded content
    /// merges at the top level.
    pub fn target(&self) -> Option<&str> {
        if self.target.is_empty() {
            None
        } else {
            Some(&self.target)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            requests_file: PathBuf::from("requests.json"),
            interval: 60.0,
            metadata_target: DEFAULT_METADATA_TARGET.to_string(),
            target: String::new(),
            codec: CodecKind::Json,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            max_retries: DEFAULT_MAX_RETRIES,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}
