//! Application initialization and resource setup.
//!
//! This module provides functions to initialize shared resources:
//! - The logger (plain or JSON format)
//! - The HTTP client backing the transport
//! - The local host name reported in metadata
//!
//! All fallible initialization returns proper error types.

mod client;
mod logger;

// Re-export public API
pub use client::init_client;
pub use logger::init_logger_with;

/// Resolves the local host name reported in record metadata.
///
/// Called once at startup; the result is captured by the poller and reused
/// for every record. Falls back to a placeholder when the machine name is
/// unavailable or not valid Unicode.
pub fn resolve_host() -> String {
    hostname::get()
        .ok()
        .and_then(|name| name.into_string().ok())
        .unwrap_or_else(|| "unknown-host".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_host_is_nonempty() {
        assert!(!resolve_host().is_empty());
    }
}
