//! Normalized request types.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};
use strum_macros::{Display, EnumString};
use url::Url;

/// The supported HTTP verbs, lower-case canonical.
///
/// Parsing is case-insensitive (`"GET"`, `"get"`, and `"Get"` all resolve to
/// [`HttpMethod::Get`]); display always yields the lower-case form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum HttpMethod {
    /// HTTP GET (the default verb)
    #[default]
    Get,
    /// HTTP POST
    Post,
    /// HTTP PUT
    Put,
    /// HTTP DELETE
    Delete,
    /// HTTP HEAD
    Head,
    /// HTTP PATCH
    Patch,
    /// HTTP OPTIONS
    Options,
}

/// Basic-auth credentials for a request.
///
/// Completeness (both fields non-empty) is enforced when the request table
/// is built, never at dispatch time.
#[derive(Debug, Clone, Deserialize)]
pub struct BasicAuth {
    /// User name.
    #[serde(default)]
    pub user: String,
    /// Password.
    #[serde(default)]
    pub password: String,
}

/// Per-request options forwarded to the transport.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Request headers.
    pub headers: BTreeMap<String, String>,
    /// Basic-auth credentials.
    pub auth: Option<BasicAuth>,
    /// Per-request timeout override in seconds.
    pub timeout_seconds: Option<u64>,
    /// Request body.
    pub body: Option<String>,
    /// Unrecognized keys, forwarded opaquely; a transport may interpret
    /// them or ignore them.
    pub extra: Map<String, Value>,
}

/// One normalized, immutable entry in the request table.
///
/// Built once from raw configuration at startup and never mutated per-cycle.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    /// Unique request name; doubles as the log and metadata label.
    pub name: String,
    /// The HTTP verb.
    pub method: HttpMethod,
    /// The parsed, validated URL.
    pub url: Url,
    /// The URL exactly as configured. Failure records and metadata carry
    /// this text, not the normalized [`Url`] rendering.
    pub raw_url: String,
    /// Options forwarded to the transport.
    pub options: RequestOptions,
}
