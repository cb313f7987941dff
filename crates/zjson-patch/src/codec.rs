//! JSON codec for JSON Patch operations.
//!
//! Converts operations to/from `serde_json::Value` in the RFC 6902 format.
//! Unlike the serde derive on [`Operation`], decoding here honours
//! [`CompatibilityFlag::MissingValuesAsNulls`] and reports the index of the
//! offending operation.

use serde_json::{json, Map, Value};
use thiserror::Error;
use zjson_pointer::{JsonPointer, JsonPointerError};

use crate::flags::{CompatibilityFlag, CompatibilityFlags};
use crate::types::{OpKind, Operation};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DecodeError {
    #[error("patch must be an array")]
    NotAnArray,
    #[error("operation must be an object")]
    NotAnObject,
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("field `{0}` must be a string")]
    NotAString(&'static str),
    #[error("unknown op {0:?}")]
    UnknownOp(String),
    #[error("field `{field}`: {source}")]
    MalformedPointer {
        field: &'static str,
        #[source]
        source: JsonPointerError,
    },
    #[error("operation {index}: {source}")]
    AtIndex {
        index: usize,
        #[source]
        source: Box<DecodeError>,
    },
}

// ── Field helpers ─────────────────────────────────────────────────────────

fn decode_str<'a>(m: &'a Map<String, Value>, field: &'static str) -> Result<&'a str, DecodeError> {
    m.get(field)
        .ok_or(DecodeError::MissingField(field))?
        .as_str()
        .ok_or(DecodeError::NotAString(field))
}

fn decode_pointer(m: &Map<String, Value>, field: &'static str) -> Result<JsonPointer, DecodeError> {
    JsonPointer::parse(decode_str(m, field)?)
        .map_err(|source| DecodeError::MalformedPointer { field, source })
}

fn decode_value(m: &Map<String, Value>, flags: CompatibilityFlags) -> Result<Value, DecodeError> {
    match m.get("value") {
        Some(v) => Ok(v.clone()),
        None if flags.contains(CompatibilityFlag::MissingValuesAsNulls) => Ok(Value::Null),
        None => Err(DecodeError::MissingField("value")),
    }
}

// ── Deserialization ───────────────────────────────────────────────────────

/// Deserialize one operation from a `serde_json::Value`.
pub fn from_json(v: &Value, flags: CompatibilityFlags) -> Result<Operation, DecodeError> {
    let m = v.as_object().ok_or(DecodeError::NotAnObject)?;
    let name = decode_str(m, "op")?;
    let kind = OpKind::from_name(name).ok_or_else(|| DecodeError::UnknownOp(name.to_string()))?;
    let path = decode_pointer(m, "path")?;

    Ok(match kind {
        OpKind::Add => Operation::Add {
            path,
            value: decode_value(m, flags)?,
        },
        OpKind::Remove => Operation::Remove { path },
        OpKind::Replace => Operation::Replace {
            path,
            value: decode_value(m, flags)?,
        },
        OpKind::Move => Operation::Move {
            from: decode_pointer(m, "from")?,
            path,
        },
        OpKind::Copy => Operation::Copy {
            from: decode_pointer(m, "from")?,
            path,
        },
        OpKind::Test => Operation::Test {
            path,
            value: decode_value(m, flags)?,
        },
    })
}

/// Deserialize an RFC 6902 patch document (an array of operations).
pub fn from_json_patch(v: &Value, flags: CompatibilityFlags) -> Result<Vec<Operation>, DecodeError> {
    let arr = v.as_array().ok_or(DecodeError::NotAnArray)?;
    arr.iter()
        .enumerate()
        .map(|(index, op)| {
            from_json(op, flags).map_err(|source| DecodeError::AtIndex {
                index,
                source: Box::new(source),
            })
        })
        .collect()
}

// ── Serialization ─────────────────────────────────────────────────────────

/// Serialize an `Operation` to a `serde_json::Value` in the JSON Patch format.
pub fn to_json(op: &Operation) -> Value {
    match op {
        Operation::Add { path, value } => json!({
            "op": "add",
            "path": path.to_string(),
            "value": value
        }),
        Operation::Remove { path } => json!({
            "op": "remove",
            "path": path.to_string()
        }),
        Operation::Replace { path, value } => json!({
            "op": "replace",
            "path": path.to_string(),
            "value": value
        }),
        Operation::Move { from, path } => json!({
            "op": "move",
            "path": path.to_string(),
            "from": from.to_string()
        }),
        Operation::Copy { from, path } => json!({
            "op": "copy",
            "path": path.to_string(),
            "from": from.to_string()
        }),
        Operation::Test { path, value } => json!({
            "op": "test",
            "path": path.to_string(),
            "value": value
        }),
    }
}

/// Serialize a list of operations as a JSON Patch document.
pub fn to_json_patch(ops: &[Operation]) -> Value {
    Value::Array(ops.iter().map(to_json).collect())
}
