//! Response body decoding.
//!
//! A codec turns one raw response body into a finite, possibly-empty
//! sequence of structured values. Decode failures are the caller's to
//! recover from; a codec never panics on malformed input.

use serde_json::Value;

use crate::config::CodecKind;
use crate::error_handling::CodecError;

/// Decodes raw response bodies into structured values.
pub trait Codec: Send + Sync {
    /// Decodes one body. May yield zero, one, or many values.
    fn decode(&self, body: &[u8]) -> Result<Vec<Value>, CodecError>;
}

/// JSON codec: one document per body.
///
/// A top-level array yields one value per element; any other document yields
/// a single value.
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn decode(&self, body: &[u8]) -> Result<Vec<Value>, CodecError> {
        let value: Value = serde_json::from_slice(body)?;
        match value {
            Value::Array(elements) => Ok(elements),
            other => Ok(vec![other]),
        }
    }
}

/// Newline-delimited JSON codec: one document per non-blank line.
pub struct JsonLinesCodec;

impl Codec for JsonLinesCodec {
    fn decode(&self, body: &[u8]) -> Result<Vec<Value>, CodecError> {
        let text = String::from_utf8_lossy(body);
        let mut values = Vec::new();
        for (index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let value =
                serde_json::from_str(line).map_err(|source| CodecError::JsonLine {
                    line: index + 1,
                    source,
                })?;
            values.push(value);
        }
        Ok(values)
    }
}

/// Resolves a configured codec kind to its implementation.
pub fn build_codec(kind: CodecKind) -> std::sync::Arc<dyn Codec> {
    match kind {
        CodecKind::Json => std::sync::Arc::new(JsonCodec),
        CodecKind::JsonLines => std::sync::Arc::new(JsonLinesCodec),
    }
}
