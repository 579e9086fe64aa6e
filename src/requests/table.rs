//! Request table construction and validation.

use std::sync::Arc;

use url::Url;

use crate::error_handling::ConfigError;

use super::raw::{RawRequestEntry, RawRequests};
use super::spec::{HttpMethod, RequestOptions, RequestSpec};

/// The normalized, validated set of named requests.
///
/// Built once at startup; read-only afterwards, so cycles share it without
/// locking. Iteration order is deterministic (name-sorted, inherited from
/// the raw mapping).
#[derive(Debug)]
pub struct RequestTable {
    specs: Vec<Arc<RequestSpec>>,
}

impl RequestTable {
    /// Normalizes and validates raw configuration into a request table.
    ///
    /// Fails fast on the first invalid entry: a missing or malformed URL, a
    /// non-http(s) scheme, an unknown verb, or an incomplete auth block all
    /// refuse startup before any network activity.
    pub fn build(raw: RawRequests) -> Result<Self, ConfigError> {
        if raw.is_empty() {
            return Err(ConfigError::EmptyRequests);
        }
        let mut specs = Vec::with_capacity(raw.len());
        for (name, entry) in raw {
            specs.push(Arc::new(normalize_entry(name, entry)?));
        }
        Ok(Self { specs })
    }

    /// Iterates the table in deterministic name order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<RequestSpec>> {
        self.specs.iter()
    }

    /// Number of named requests.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether the table is empty. Never true for a built table.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Looks up a request by name.
    pub fn get(&self, name: &str) -> Option<&Arc<RequestSpec>> {
        self.specs.iter().find(|spec| spec.name == name)
    }
}

/// Resolves one raw entry (bare URL or structured spec) into a normalized
/// [`RequestSpec`].
fn normalize_entry(name: String, entry: RawRequestEntry) -> Result<RequestSpec, ConfigError> {
    match entry {
        RawRequestEntry::Url(raw_url) => {
            let url = parse_url(&name, &raw_url)?;
            Ok(RequestSpec {
                name,
                method: HttpMethod::default(),
                url,
                raw_url,
                options: RequestOptions::default(),
            })
        }
        RawRequestEntry::Spec(spec) => {
            let raw_url = spec.url.ok_or_else(|| ConfigError::MissingUrl {
                name: name.clone(),
            })?;
            let url = parse_url(&name, &raw_url)?;
            let method = match spec.method {
                Some(text) => {
                    text.parse::<HttpMethod>()
                        .map_err(|_| ConfigError::InvalidMethod {
                            name: name.clone(),
                            method: text,
                        })?
                }
                None => HttpMethod::default(),
            };
            if let Some(auth) = &spec.auth {
                if auth.user.is_empty() || auth.password.is_empty() {
                    return Err(ConfigError::IncompleteAuth { name });
                }
            }
            Ok(RequestSpec {
                name,
                method,
                url,
                raw_url,
                options: RequestOptions {
                    headers: spec.headers,
                    auth: spec.auth,
                    timeout_seconds: spec.timeout_seconds,
                    body: spec.body,
                    extra: spec.extra,
                },
            })
        }
    }
}

/// Parses and validates one URL: must be absolute and http(s).
fn parse_url(name: &str, raw_url: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw_url).map_err(|source| ConfigError::InvalidUrl {
        name: name.to_string(),
        url: raw_url.to_string(),
        source,
    })?;
    let scheme = url.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(ConfigError::UnsupportedScheme {
            name: name.to_string(),
            url: raw_url.to_string(),
            scheme: scheme.to_string(),
        });
    }
    Ok(url)
}
