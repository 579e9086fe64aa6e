//! The emitted record type.
//!
//! Every unit handed to the sink is a [`Record`]: a JSON object with helper
//! operations for tagging and nested-field insertion. Decoded response
//! content and synthetic failure payloads both flow through this type.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field holding the list of tags applied to a record.
const TAGS_FIELD: &str = "tags";

/// A single output record: a JSON object plus tag support.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record from a decoded JSON value.
    ///
    /// Objects become the record's fields directly. Any other value (array
    /// element that is a scalar, bare string, number, bool, null) is wrapped
    /// as `{"message": <value>}` so tags and metadata always have an object
    /// to land on.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            other => {
                let mut fields = Map::new();
                fields.insert("message".to_string(), other);
                Self { fields }
            }
        }
    }

    /// Sets a top-level field, replacing any existing value.
    pub fn insert(&mut self, key: &str, value: Value) {
        self.fields.insert(key.to_string(), value);
    }

    /// A top-level field, if present.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Appends a tag to the record's `tags` array, creating it if needed.
    ///
    /// Duplicate tags are ignored. A pre-existing non-array `tags` field is
    /// replaced.
    pub fn tag(&mut self, tag: &str) {
        let tags = self
            .fields
            .entry(TAGS_FIELD.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if !tags.is_array() {
            *tags = Value::Array(Vec::new());
        }
        if let Value::Array(list) = tags {
            if !list.iter().any(|t| t == tag) {
                list.push(Value::String(tag.to_string()));
            }
        }
    }

    /// Whether the record carries the given tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        match self.fields.get(TAGS_FIELD) {
            Some(Value::Array(list)) => list.iter().any(|t| t == tag),
            _ => false,
        }
    }

    /// Consumes the record, returning it as a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}
