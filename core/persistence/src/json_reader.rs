// FILENAME: core/persistence/src/json_reader.rs

use crate::{PersistenceError, RecordMap};
use serde_json::Value;
use std::path::Path;

/// Keys under which list endpoints wrap their rows.
const ENVELOPE_KEYS: [&str; 4] = ["data", "items", "records", "content"];

/// Envelopes may nest (e.g. `{"data": {"content": [...]}}`) up to this depth.
const MAX_ENVELOPE_DEPTH: usize = 3;

pub fn load_records_json(path: &Path) -> Result<Vec<RecordMap>, PersistenceError> {
    let text = std::fs::read_to_string(path)?;
    parse_records_json(&text)
}

/// Parses either a top-level array of objects or an API response envelope
/// holding that array.
pub fn parse_records_json(text: &str) -> Result<Vec<RecordMap>, PersistenceError> {
    let root: Value = serde_json::from_str(text)?;
    let items = find_record_array(root, 0).ok_or_else(|| {
        PersistenceError::InvalidFormat(
            "Expected a JSON array of records or an object wrapping one".to_string(),
        )
    })?;

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(map),
            other => Err(PersistenceError::InvalidFormat(format!(
                "Element {} is not an object (found {})",
                index,
                json_kind(&other)
            ))),
        })
        .collect()
}

fn find_record_array(value: Value, depth: usize) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(mut map) if depth < MAX_ENVELOPE_DEPTH => ENVELOPE_KEYS
            .iter()
            .find_map(|key| {
                map.remove(*key)
                    .and_then(|inner| find_record_array(inner, depth + 1))
            }),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
