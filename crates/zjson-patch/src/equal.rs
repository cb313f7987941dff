//! Structural equality and value descriptions for `test`.

use serde_json::{Number, Value};

/// Performs a deep equality check between two JSON values.
///
/// Numbers compare by numeric value, so `1`, `1.0` and `1.00` are equal.
/// Object key order is ignored.
///
/// ```
/// use serde_json::json;
/// use zjson_patch::equal::json_equal;
///
/// assert!(json_equal(&json!({"a": [1, 2]}), &json!({"a": [1.0, 2]})));
/// assert!(!json_equal(&json!({"a": [1, 2]}), &json!({"a": [2, 1]})));
/// ```
pub fn json_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(arr_a), Value::Array(arr_b)) => {
            arr_a.len() == arr_b.len() && arr_a.iter().zip(arr_b).all(|(a, b)| json_equal(a, b))
        }
        (Value::Object(obj_a), Value::Object(obj_b)) => {
            if obj_a.len() != obj_b.len() {
                return false;
            }
            obj_a
                .iter()
                .all(|(key, val_a)| obj_b.get(key).is_some_and(|val_b| json_equal(val_a, val_b)))
        }
        _ => false,
    }
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
        return a == b;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Short description of a value for mismatch messages.
///
/// Containers and null are named by kind; scalars are shown as compact JSON,
/// which may differ from the source text (e.g. `1.50` prints as `1.5`).
pub fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
        Value::Bool(_) | Value::Number(_) | Value::String(_) => format!("value {value}"),
    }
}
