//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (defaults, retry tuning, reserved field names)
//! - CLI option types and parsing

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{CodecKind, Config, LogFormat, LogLevel};
