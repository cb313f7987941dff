//! Core types: the operation model and the error taxonomy.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use zjson_pointer::JsonPointer;
use zjson_pointer::JsonPointerError;

// ── Op enum ───────────────────────────────────────────────────────────────

/// Name of an RFC 6902 operation, used to tag failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Add,
    Remove,
    Replace,
    Move,
    Copy,
    Test,
}

impl OpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpKind::Add => "add",
            OpKind::Remove => "remove",
            OpKind::Replace => "replace",
            OpKind::Move => "move",
            OpKind::Copy => "copy",
            OpKind::Test => "test",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "add" => Some(OpKind::Add),
            "remove" => Some(OpKind::Remove),
            "replace" => Some(OpKind::Replace),
            "move" => Some(OpKind::Move),
            "copy" => Some(OpKind::Copy),
            "test" => Some(OpKind::Test),
            _ => None,
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A JSON Patch operation.
///
/// Serializes to the RFC 6902 object shape, e.g.
/// `{"op":"move","from":"/a","path":"/b"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Operation {
    Add { path: JsonPointer, value: Value },
    Remove { path: JsonPointer },
    Replace { path: JsonPointer, value: Value },
    Move { from: JsonPointer, path: JsonPointer },
    Copy { from: JsonPointer, path: JsonPointer },
    Test { path: JsonPointer, value: Value },
}

impl Operation {
    pub fn kind(&self) -> OpKind {
        match self {
            Operation::Add { .. } => OpKind::Add,
            Operation::Remove { .. } => OpKind::Remove,
            Operation::Replace { .. } => OpKind::Replace,
            Operation::Move { .. } => OpKind::Move,
            Operation::Copy { .. } => OpKind::Copy,
            Operation::Test { .. } => OpKind::Test,
        }
    }

    /// The target path of the operation.
    pub fn path(&self) -> &JsonPointer {
        match self {
            Operation::Add { path, .. }
            | Operation::Remove { path }
            | Operation::Replace { path, .. }
            | Operation::Move { path, .. }
            | Operation::Copy { path, .. }
            | Operation::Test { path, .. } => path,
        }
    }

    /// The source path of `move` and `copy`.
    pub fn from(&self) -> Option<&JsonPointer> {
        match self {
            Operation::Move { from, .. } | Operation::Copy { from, .. } => Some(from),
            _ => None,
        }
    }
}

// ── Error ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ErrorKind {
    #[error("malformed pointer {pointer:?}: {reason}")]
    MalformedPointer {
        pointer: String,
        reason: &'static str,
    },
    #[error("no value at {pointer:?}")]
    PathNotFound { pointer: String },
    #[error("cannot reference past scalar value")]
    CannotTraverseScalar,
    #[error("array index {index} out of bounds (length {len})")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("{token:?} is not an array index")]
    InvalidIndex { token: String },
    #[error("cannot remove document root")]
    RootRemovalForbidden,
    #[error("expected {expected} but found {actual}")]
    TestMismatch { expected: String, actual: String },
}

impl From<JsonPointerError> for ErrorKind {
    fn from(err: JsonPointerError) -> Self {
        match err {
            JsonPointerError::Malformed { pointer, reason } => {
                ErrorKind::MalformedPointer { pointer, reason }
            }
            JsonPointerError::NotFound { pointer } => ErrorKind::PathNotFound { pointer },
        }
    }
}

/// A failed operation, tagged with the operation kind and the path involved.
///
/// Failures raised while resolving a parent container carry the parent path.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{op} at \"{path}\": {kind}")]
pub struct PatchError {
    pub op: OpKind,
    pub path: JsonPointer,
    #[source]
    pub kind: ErrorKind,
}

impl PatchError {
    pub fn new(op: OpKind, path: JsonPointer, kind: ErrorKind) -> Self {
        Self { op, path, kind }
    }
}

/// Failure of a whole patch sequence.
///
/// `doc` holds the document as left by the operations before `index`;
/// nothing is rolled back.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("operation {index} failed: {error}")]
pub struct PatchFailure {
    pub index: usize,
    #[source]
    pub error: PatchError,
    pub doc: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn op_kind_names_roundtrip() {
        for kind in [
            OpKind::Add,
            OpKind::Remove,
            OpKind::Replace,
            OpKind::Move,
            OpKind::Copy,
            OpKind::Test,
        ] {
            assert_eq!(OpKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(OpKind::from_name("str_ins"), None);
    }

    #[test]
    fn operation_accessors() {
        let op = Operation::Move {
            from: JsonPointer::parse("/a").unwrap(),
            path: JsonPointer::parse("/b").unwrap(),
        };
        assert_eq!(op.kind(), OpKind::Move);
        assert_eq!(op.path().to_string(), "/b");
        assert_eq!(op.from().map(ToString::to_string), Some("/a".to_string()));

        let op = Operation::Remove {
            path: JsonPointer::parse("/a").unwrap(),
        };
        assert_eq!(op.from(), None);
    }

    #[test]
    fn operation_serde_shape() {
        let op: Operation =
            serde_json::from_value(json!({"op": "copy", "from": "/a/0", "path": "/b"})).unwrap();
        assert_eq!(
            op,
            Operation::Copy {
                from: JsonPointer::parse("/a/0").unwrap(),
                path: JsonPointer::parse("/b").unwrap(),
            }
        );
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({"op": "copy", "from": "/a/0", "path": "/b"})
        );
    }

    #[test]
    fn patch_error_display() {
        let err = PatchError::new(
            OpKind::Replace,
            JsonPointer::parse("/arr").unwrap(),
            ErrorKind::IndexOutOfBounds { index: 5, len: 2 },
        );
        assert_eq!(
            err.to_string(),
            "replace at \"/arr\": array index 5 out of bounds (length 2)"
        );
    }

    #[test]
    fn pointer_error_maps_to_kind() {
        let kind: ErrorKind = JsonPointerError::NotFound {
            pointer: "/x".to_string(),
        }
        .into();
        assert_eq!(
            kind,
            ErrorKind::PathNotFound {
                pointer: "/x".to_string()
            }
        );
    }
}
