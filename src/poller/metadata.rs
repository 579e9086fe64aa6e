//! Request/response metadata construction.

use serde_json::{json, Map, Value};

use crate::transport::TransportResponse;

use super::context::RequestContext;

/// Builds the metadata attachment for one terminal outcome.
///
/// Pure function of its inputs: no clocks, no side effects, identical inputs
/// yield identical output. `url` is the exact configured text for the
/// request, never a normalized derivative. Response-derived fields (`code`,
/// `response_headers`, `response_message`, `times_retried`) appear only when
/// a response was delivered.
pub fn build_metadata(
    host: &str,
    ctx: &RequestContext,
    runtime_seconds: f64,
    response: Option<&TransportResponse>,
) -> Value {
    let mut metadata = json!({
        "name": ctx.name(),
        "host": host,
        "url": ctx.spec.raw_url,
        "issued_at": ctx.issued_at.to_rfc3339(),
        "runtime_seconds": runtime_seconds,
    });

    if let Some(response) = response {
        metadata["code"] = json!(response.status);
        metadata["response_headers"] = headers_to_value(&response.headers);
        metadata["response_message"] = json!(response.status_text);
        metadata["times_retried"] = json!(response.times_retried);
    }

    metadata
}

/// Folds a header list into a JSON object; a repeated header name collects
/// its values into an array.
fn headers_to_value(headers: &[(String, String)]) -> Value {
    let mut object = Map::new();
    for (name, value) in headers {
        match object.entry(name.clone()) {
            serde_json::map::Entry::Vacant(slot) => {
                slot.insert(Value::String(value.clone()));
            }
            serde_json::map::Entry::Occupied(mut slot) => {
                let existing = slot.get_mut();
                if let Value::Array(list) = existing {
                    list.push(Value::String(value.clone()));
                } else {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, Value::String(value.clone())]);
                }
            }
        }
    }
    Value::Object(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poller::context::RequestContext;
    use crate::requests::{RawRequests, RequestTable};
    use bytes::Bytes;
    use chrono::Utc;
    use serde_json::json;
    use std::sync::Arc;

    fn sample_context() -> RequestContext {
        let raw: RawRequests =
            serde_json::from_value(json!({"a": "http://x/1"}))
                .expect("raw requests should deserialize");
        let table = RequestTable::build(raw).expect("table should build");
        RequestContext::new(
            Arc::clone(table.get("a").expect("entry should exist")),
            Utc::now(),
        )
    }

    fn sample_response() -> TransportResponse {
        TransportResponse {
            status: 200,
            status_text: "OK".to_string(),
            headers: vec![
                ("content-type".to_string(), "application/json".to_string()),
                ("set-cookie".to_string(), "a=1".to_string()),
                ("set-cookie".to_string(), "b=2".to_string()),
            ],
            body: Bytes::from_static(b"{}"),
            times_retried: 2,
        }
    }

    #[test]
    fn test_failure_metadata_has_no_response_fields() {
        let ctx = sample_context();
        let metadata = build_metadata("host-1", &ctx, 1.25, None);

        assert_eq!(metadata["name"], json!("a"));
        assert_eq!(metadata["host"], json!("host-1"));
        assert_eq!(metadata["url"], json!("http://x/1"));
        assert_eq!(metadata["runtime_seconds"], json!(1.25));
        assert!(metadata.get("code").is_none());
        assert!(metadata.get("times_retried").is_none());
    }

    #[test]
    fn test_success_metadata_includes_response_fields() {
        let ctx = sample_context();
        let metadata = build_metadata("host-1", &ctx, 0.5, Some(&sample_response()));

        assert_eq!(metadata["code"], json!(200));
        assert_eq!(metadata["response_message"], json!("OK"));
        assert_eq!(metadata["times_retried"], json!(2));
        assert_eq!(
            metadata["response_headers"]["content-type"],
            json!("application/json")
        );
    }

    #[test]
    fn test_repeated_headers_collect_into_array() {
        let ctx = sample_context();
        let metadata = build_metadata("host-1", &ctx, 0.5, Some(&sample_response()));
        assert_eq!(
            metadata["response_headers"]["set-cookie"],
            json!(["a=1", "b=2"])
        );
    }

    #[test]
    fn test_builder_is_referentially_transparent() {
        let ctx = sample_context();
        let response = sample_response();
        let first = build_metadata("host-1", &ctx, 0.5, Some(&response));
        let second = build_metadata("host-1", &ctx, 0.5, Some(&response));
        assert_eq!(first, second);
    }
}
