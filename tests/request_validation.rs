//! Startup validation: bad configuration refuses to start, before any
//! network activity.

mod helpers;

use std::sync::Arc;

use serde_json::json;

use helpers::FakeTransport;
use http_poller::{load_requests, ConfigError, HttpMethod, RawRequests, RequestTable};

#[test]
fn test_malformed_url_refuses_to_start_with_zero_network_calls() {
    let transport = Arc::new(FakeTransport::new());

    let raw: RawRequests =
        serde_json::from_value(json!({"bad": "not-a-url"})).expect("raw mapping should parse");
    let err = RequestTable::build(raw).expect_err("malformed URL must refuse startup");

    assert!(matches!(err, ConfigError::InvalidUrl { ref name, ref url, .. }
        if name == "bad" && url == "not-a-url"));
    assert_eq!(transport.calls(), 0, "no network call may be made");
}

#[test]
fn test_one_bad_entry_rejects_the_whole_set() {
    let raw: RawRequests = serde_json::from_value(json!({
        "good": "http://localhost:9200",
        "partial": {"url": "http://localhost:9200/_stats", "auth": {"user": "elastic"}}
    }))
    .expect("raw mapping should parse");

    let err = RequestTable::build(raw).expect_err("partial auth must refuse startup");
    assert!(matches!(err, ConfigError::IncompleteAuth { ref name } if name == "partial"));
}

#[test]
fn test_well_formed_entries_all_accepted() {
    let raw: RawRequests = serde_json::from_value(json!({
        "bare": "https://example.com/status",
        "verbose": {
            "method": "POST",
            "url": "https://example.com/search",
            "headers": {"Accept": "application/json"},
            "auth": {"user": "poller", "password": "s3cret"},
            "timeout_seconds": 10,
            "body": "{\"query\":{}}"
        }
    }))
    .expect("raw mapping should parse");

    let table = RequestTable::build(raw).expect("well-formed set should build");
    assert_eq!(table.len(), 2);

    let bare = table.get("bare").expect("bare should exist");
    assert_eq!(bare.method, HttpMethod::Get);

    let verbose = table.get("verbose").expect("verbose should exist");
    assert_eq!(verbose.method, HttpMethod::Post);
    assert_eq!(verbose.options.timeout_seconds, Some(10));
    assert_eq!(verbose.options.body.as_deref(), Some("{\"query\":{}}"));
}

#[test]
fn test_load_requests_round_trip_through_file() {
    let path = std::env::temp_dir().join(format!(
        "http_poller_requests_{}.json",
        std::process::id()
    ));
    std::fs::write(
        &path,
        r#"{"a": "http://localhost:9200", "b": {"url": "http://localhost:9200/_cat", "method": "head"}}"#,
    )
    .expect("request file should be writable");

    let raw = load_requests(&path).expect("request file should load");
    let table = RequestTable::build(raw).expect("table should build");
    assert_eq!(table.len(), 2);
    assert_eq!(
        table.get("b").expect("b should exist").method,
        HttpMethod::Head
    );

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_load_requests_missing_file_errors() {
    let path = std::env::temp_dir().join("http_poller_definitely_missing.json");
    let err = load_requests(&path).expect_err("missing file should error");
    assert!(matches!(err, ConfigError::UnreadableFile { .. }));
}

#[test]
fn test_load_requests_invalid_json_errors() {
    let path = std::env::temp_dir().join(format!(
        "http_poller_invalid_{}.json",
        std::process::id()
    ));
    std::fs::write(&path, "not json at all").expect("request file should be writable");

    let err = load_requests(&path).expect_err("invalid JSON should error");
    assert!(matches!(err, ConfigError::UnparseableFile { .. }));

    std::fs::remove_file(&path).ok();
}
