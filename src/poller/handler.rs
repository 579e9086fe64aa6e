//! Terminal-outcome handling: decoded records and synthetic failures.

use std::sync::Arc;

use serde_json::json;

use crate::codec::Codec;
use crate::config::FAILURE_TAG;
use crate::error_handling::{FailureKind, PollStats, SinkError, TransportError};
use crate::record::Record;
use crate::sink::RecordSink;
use crate::transport::TransportResponse;

use super::context::RequestContext;
use super::metadata::build_metadata;

/// Turns delivered responses and transport failures into sink records.
///
/// Shared by every per-request task of every cycle; holds the collaborators
/// and the enrichment settings resolved once at startup. Nothing in here is
/// allowed to propagate an error upward: a broken response, codec, or sink
/// affects exactly one record (or one request) and is logged in place.
pub struct ResponseHandler {
    codec: Arc<dyn Codec>,
    sink: Arc<dyn RecordSink>,
    stats: Arc<PollStats>,
    host: String,
    metadata_target: Option<String>,
    target: Option<String>,
}

impl ResponseHandler {
    /// Creates a handler with the given collaborators and settings.
    pub fn new(
        codec: Arc<dyn Codec>,
        sink: Arc<dyn RecordSink>,
        stats: Arc<PollStats>,
        host: String,
        metadata_target: Option<String>,
        target: Option<String>,
    ) -> Self {
        Self {
            codec,
            sink,
            stats,
            host,
            metadata_target,
            target,
        }
    }

    /// Success path: decode the body and emit one record per decoded value.
    ///
    /// A decode failure of the whole body drops it (counted separately from
    /// transport failures); a failure while emitting one decoded value
    /// leaves the sibling values and sibling requests untouched.
    pub fn on_success(&self, ctx: &RequestContext, response: &TransportResponse) {
        let runtime_seconds = ctx.runtime_seconds();
        log::debug!(
            "Response for '{}' [{}]: {} {} ({} bytes, {:.3}s)",
            ctx.name(),
            ctx.attempt_id,
            response.status,
            response.status_text,
            response.body.len(),
            runtime_seconds
        );

        match self.codec.decode(&response.body) {
            Ok(values) => {
                for value in values {
                    if let Err(err) = self.emit_decoded(ctx, response, runtime_seconds, value) {
                        self.stats.record_failure(FailureKind::Emit);
                        log::error!(
                            "Error emitting decoded record for '{}' ({}): {}; response was {} {}",
                            ctx.name(),
                            ctx.spec.raw_url,
                            err,
                            response.status,
                            response.status_text
                        );
                    }
                }
            }
            Err(err) => {
                self.stats.record_failure(FailureKind::Decode);
                log::error!(
                    "Failed to decode response body for '{}' ({}): {}; response was {} {} with {} bytes",
                    ctx.name(),
                    ctx.spec.raw_url,
                    err,
                    response.status,
                    response.status_text,
                    response.body.len()
                );
            }
        }
    }

    /// Wraps, enriches, and appends one decoded value.
    fn emit_decoded(
        &self,
        ctx: &RequestContext,
        response: &TransportResponse,
        runtime_seconds: f64,
        value: serde_json::Value,
    ) -> Result<(), SinkError> {
        let mut record = match &self.target {
            Some(field) => {
                let mut wrapped = Record::new();
                wrapped.insert(field, value);
                wrapped
            }
            None => Record::from_value(value),
        };
        if let Some(field) = &self.metadata_target {
            record.insert(
                field,
                build_metadata(&self.host, ctx, runtime_seconds, Some(response)),
            );
        }
        self.sink.append(record)?;
        self.stats.record_emitted();
        Ok(())
    }

    /// Failure path: synthesize exactly one tagged failure record.
    ///
    /// The payload duplicates name/url/error/runtime next to the metadata
    /// attachment so failures stay visible in sinks that strip metadata. If
    /// appending the failure record itself fails, both errors are logged and
    /// swallowed; a broken failure path must never crash the poll cycle.
    pub fn on_failure(&self, ctx: &RequestContext, error: &TransportError) {
        let runtime_seconds = ctx.runtime_seconds();
        self.stats.record_failure(FailureKind::Transport);
        log::warn!(
            "Request '{}' [{}] failed after {:.3}s: {}",
            ctx.name(),
            ctx.attempt_id,
            runtime_seconds,
            error
        );

        let mut record = Record::new();
        if let Some(field) = &self.metadata_target {
            record.insert(field, build_metadata(&self.host, ctx, runtime_seconds, None));
        }
        record.tag(FAILURE_TAG);
        record.insert(
            FAILURE_TAG,
            json!({
                "url": ctx.spec.raw_url,
                "name": ctx.name(),
                "error": error.to_string(),
                "runtime_seconds": runtime_seconds,
            }),
        );

        if let Err(append_err) = self.sink.append(record) {
            self.stats.record_failure(FailureKind::Emit);
            log::error!(
                "Cannot deliver failure record for '{}' ({}): {}; original error: {}",
                ctx.name(),
                ctx.spec.raw_url,
                append_err,
                error
            );
        } else {
            self.stats.record_emitted();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::JsonCodec;
    use crate::requests::{RawRequests, RequestTable};
    use crate::sink::ChannelSink;
    use bytes::Bytes;
    use chrono::Utc;
    use serde_json::json;
    use tokio::sync::mpsc::UnboundedReceiver;

    fn context_for(url: &str) -> RequestContext {
        let raw: RawRequests = serde_json::from_value(json!({ "a": url }))
            .expect("raw requests should deserialize");
        let table = RequestTable::build(raw).expect("table should build");
        RequestContext::new(
            Arc::clone(table.get("a").expect("entry should exist")),
            Utc::now(),
        )
    }

    fn handler_with_sink(
        metadata_target: Option<&str>,
        target: Option<&str>,
    ) -> (ResponseHandler, UnboundedReceiver<Record>) {
        let (sink, rx) = ChannelSink::new();
        let handler = ResponseHandler::new(
            Arc::new(JsonCodec),
            Arc::new(sink),
            Arc::new(PollStats::new()),
            "test-host".to_string(),
            metadata_target.map(String::from),
            target.map(String::from),
        );
        (handler, rx)
    }

    fn response_with_body(body: &'static [u8]) -> TransportResponse {
        TransportResponse {
            status: 200,
            status_text: "OK".to_string(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Bytes::from_static(body),
            times_retried: 0,
        }
    }

    #[test]
    fn test_success_emits_decoded_record_with_metadata() {
        let (handler, mut rx) = handler_with_sink(Some("@metadata"), None);
        let ctx = context_for("http://x/1");

        handler.on_success(&ctx, &response_with_body(br#"{"k":1}"#));

        let record = rx.try_recv().expect("one record should be emitted");
        assert_eq!(record.get("k"), Some(&json!(1)));
        let metadata = record.get("@metadata").expect("metadata should be attached");
        assert_eq!(metadata["name"], json!("a"));
        assert_eq!(metadata["code"], json!(200));
        assert!(rx.try_recv().is_err(), "exactly one record expected");
    }

    #[test]
    fn test_success_wraps_under_target_field() {
        let (handler, mut rx) = handler_with_sink(None, Some("payload"));
        let ctx = context_for("http://x/1");

        handler.on_success(&ctx, &response_with_body(br#"{"k":1}"#));

        let record = rx.try_recv().expect("one record should be emitted");
        assert_eq!(record.get("payload"), Some(&json!({"k": 1})));
        assert!(record.get("k").is_none(), "content must not merge flat");
    }

    #[test]
    fn test_success_without_metadata_target_attaches_nothing() {
        let (handler, mut rx) = handler_with_sink(None, None);
        let ctx = context_for("http://x/1");

        handler.on_success(&ctx, &response_with_body(br#"{"k":1}"#));

        let record = rx.try_recv().expect("one record should be emitted");
        assert!(record.get("@metadata").is_none());
    }

    #[test]
    fn test_array_body_emits_one_record_per_element() {
        let (handler, mut rx) = handler_with_sink(Some("@metadata"), None);
        let ctx = context_for("http://x/1");

        handler.on_success(&ctx, &response_with_body(br#"[{"n":1},{"n":2},{"n":3}]"#));

        let mut count = 0;
        while rx.try_recv().is_ok() {
            count += 1;
        }
        assert_eq!(count, 3);
    }

    #[test]
    fn test_undecodable_body_emits_nothing_and_counts_decode_failure() {
        let (sink, mut rx) = ChannelSink::new();
        let stats = Arc::new(PollStats::new());
        let handler = ResponseHandler::new(
            Arc::new(JsonCodec),
            Arc::new(sink),
            Arc::clone(&stats),
            "test-host".to_string(),
            Some("@metadata".to_string()),
            None,
        );
        let ctx = context_for("http://x/1");

        handler.on_success(&ctx, &response_with_body(b"<html>not json</html>"));

        assert!(rx.try_recv().is_err(), "no record should be emitted");
        assert_eq!(stats.failure_count(FailureKind::Decode), 1);
        assert_eq!(stats.failure_count(FailureKind::Transport), 0);
    }

    #[test]
    fn test_failure_record_shape() {
        let (handler, mut rx) = handler_with_sink(Some("@metadata"), None);
        let ctx = context_for("http://x/1");

        handler.on_failure(&ctx, &TransportError::Timeout("deadline elapsed".into()));

        let record = rx.try_recv().expect("one failure record should be emitted");
        assert!(record.has_tag(FAILURE_TAG));
        let payload = record.get(FAILURE_TAG).expect("payload should exist");
        assert_eq!(payload["name"], json!("a"));
        assert_eq!(payload["url"], json!("http://x/1"));
        let error_text = payload["error"].as_str().expect("error should be a string");
        assert!(!error_text.is_empty());

        let metadata = record.get("@metadata").expect("metadata should be attached");
        assert!(metadata.get("code").is_none(), "no response fields on failure");
    }

    #[test]
    fn test_failure_record_carries_original_url_text() {
        // Url::parse would render this as "http://example.com/"; the payload
        // must carry the configured text.
        let (handler, mut rx) = handler_with_sink(None, None);
        let ctx = context_for("http://example.com");

        handler.on_failure(&ctx, &TransportError::Connect("refused".into()));

        let record = rx.try_recv().expect("one failure record should be emitted");
        let payload = record.get(FAILURE_TAG).expect("payload should exist");
        assert_eq!(payload["url"], json!("http://example.com"));
    }

    #[test]
    fn test_broken_sink_is_swallowed_on_both_paths() {
        let (sink, rx) = ChannelSink::new();
        drop(rx); // every append now fails
        let stats = Arc::new(PollStats::new());
        let handler = ResponseHandler::new(
            Arc::new(JsonCodec),
            Arc::new(sink),
            Arc::clone(&stats),
            "test-host".to_string(),
            None,
            None,
        );
        let ctx = context_for("http://x/1");

        // Neither call may panic or propagate.
        handler.on_success(&ctx, &response_with_body(br#"{"k":1}"#));
        handler.on_failure(&ctx, &TransportError::Other("boom".into()));

        assert_eq!(stats.failure_count(FailureKind::Emit), 2);
        assert_eq!(stats.emitted(), 0);
    }
}
