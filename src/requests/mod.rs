//! The request table: the normalized, validated set of named requests.
//!
//! Raw configuration is a name-keyed mapping where each value is either a
//! bare URL string or a structured spec. [`RequestTable::build`] resolves
//! that union once at startup, rejecting anything malformed before a single
//! network call is made; the resulting table is immutable and shared
//! read-only across poll cycles.

mod raw;
mod spec;
mod table;

// Re-export public API
pub use raw::{RawRequestEntry, RawRequestSpec, RawRequests};
pub use spec::{BasicAuth, HttpMethod, RequestOptions, RequestSpec};
pub use table::RequestTable;

use std::path::Path;

use crate::error_handling::ConfigError;

/// Reads and parses a request file: a JSON object mapping request names to
/// bare URL strings or structured specs.
pub fn load_requests(path: &Path) -> Result<RawRequests, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::UnreadableFile {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::UnparseableFile {
        path: path.to_path_buf(),
        source,
    })
}
