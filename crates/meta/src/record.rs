//! JSON encoding of flat metadata records.

use tracing::warn;

use crate::error::MetaError;
use crate::value::{FlatMeta, MetaValue};

/// A decoded record plus the keys whose values were not primitives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedRecord {
    /// Primitive entries of the record.
    pub meta: FlatMeta,
    /// Keys that were skipped because their value was null, an array or an
    /// object.
    pub skipped: Vec<String>,
}

/// Decodes a JSON object into a flat record.
///
/// Records written by other tools may hold nulls or structures; those
/// entries are skipped and listed in [`DecodedRecord::skipped`] rather than
/// failing the whole record.
///
/// # Errors
///
/// Returns [`MetaError::Json`] on malformed JSON and
/// [`MetaError::NotAnObject`] if the top-level value is not an object.
pub fn decode_record(bytes: &[u8]) -> Result<DecodedRecord, MetaError> {
    let value: serde_json::Value = serde_json::from_slice(bytes)?;
    let serde_json::Value::Object(map) = &value else {
        return Err(MetaError::NotAnObject {
            found: json_type(&value),
        });
    };

    let mut record = DecodedRecord::default();
    for (key, value) in map {
        match MetaValue::from_json(value) {
            Some(v) => {
                record.meta.insert(key.clone(), v);
            }
            None => {
                warn!(key = %key, datatype = json_type(value), "skipping non-primitive metadata entry");
                record.skipped.push(key.clone());
            }
        }
    }
    Ok(record)
}

/// Encodes a flat record as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`MetaError::Json`] if serialization fails.
pub fn encode_record(meta: &FlatMeta) -> Result<String, MetaError> {
    Ok(serde_json::to_string_pretty(meta)?)
}

fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
