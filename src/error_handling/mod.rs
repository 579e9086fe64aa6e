//! Error handling and poll statistics.
//!
//! This module provides:
//! - Error type definitions for every phase (configuration, initialization,
//!   transport, decode, emission)
//! - Retriability classification for transport errors
//! - Thread-safe poll statistics tracking

mod stats;
mod types;

// Re-export public API
pub use stats::{FailureKind, PollStats};
pub use types::{CodecError, ConfigError, InitializationError, SinkError, TransportError};
