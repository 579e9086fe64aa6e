//! Raw (pre-validation) request configuration.
//!
//! Mirrors the accepted input shape: each named entry is either a bare URL
//! string or a structured spec. The union is resolved exactly once, when the
//! request table is built; nothing re-inspects the raw shape per cycle.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use super::spec::BasicAuth;

/// The raw input mapping: request name to entry.
///
/// A `BTreeMap` keeps iteration deterministic (name-sorted) and guarantees
/// name uniqueness by construction.
pub type RawRequests = BTreeMap<String, RawRequestEntry>;

/// One raw request entry: a bare URL string or a structured spec.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawRequestEntry {
    /// Shorthand: the entry is just the URL, polled with GET.
    Url(String),
    /// Full spec with method, headers, auth, and transport options.
    Spec(RawRequestSpec),
}

/// A structured raw request spec.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRequestSpec {
    /// HTTP verb; defaults to GET when absent.
    pub method: Option<String>,
    /// Request URL. Required; its absence is a configuration error reported
    /// at table-build time (an `Option` here so the error can name the
    /// request rather than surfacing as an opaque parse failure).
    pub url: Option<String>,
    /// Request headers.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Basic-auth credentials; both fields required when present.
    pub auth: Option<BasicAuth>,
    /// Per-request timeout override in seconds.
    pub timeout_seconds: Option<u64>,
    /// Request body.
    pub body: Option<String>,
    /// Anything else is captured and forwarded to the transport opaquely.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
