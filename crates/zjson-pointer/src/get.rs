use serde_json::Value;

use crate::types::{ArrayIndex, RefToken};

/// Get a value from a JSON document by path.
///
/// Returns `None` if any step is missing, out of range, the `-` sentinel, or
/// passes through a scalar.
pub fn get<'a>(val: &'a Value, path: &[RefToken]) -> Option<&'a Value> {
    let mut current = val;
    for step in path {
        current = match current {
            Value::Array(arr) => match step.array_index()? {
                ArrayIndex::At(idx) => arr.get(idx)?,
                ArrayIndex::Append => return None,
            },
            Value::Object(map) => map.get(step.as_field())?,
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => return None,
        };
    }
    Some(current)
}

/// Get a mutable reference to a value in a JSON document by path.
pub fn get_mut<'a>(val: &'a mut Value, path: &[RefToken]) -> Option<&'a mut Value> {
    let mut current = val;
    for step in path {
        current = match current {
            Value::Array(arr) => match step.array_index()? {
                ArrayIndex::At(idx) => arr.get_mut(idx)?,
                ArrayIndex::Append => return None,
            },
            Value::Object(map) => map.get_mut(step.as_field())?,
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => return None,
        };
    }
    Some(current)
}
