//! In-place operation processor.
//!
//! The processor owns the document for the duration of a patch sequence and
//! hands it back through [`InPlaceProcessor::into_result`]. Each method
//! either mutates the document or returns a [`PatchError`]; a failed
//! operation leaves earlier mutations in place.

use std::borrow::Cow;

use serde_json::{Map, Value};
use tracing::{debug, trace};
use zjson_pointer::{ArrayIndex, JsonPointer, RefToken};

use crate::config::ProcessorConfig;
use crate::equal::{describe, json_equal};
use crate::flags::{CompatibilityFlag, CompatibilityFlags};
use crate::merge::{numeric_gt, MergePolicy};
use crate::types::{ErrorKind, OpKind, Operation, PatchError};

/// Holds the document and borrows the merge policy of the
/// [`ProcessorConfig`] it was built from.
#[derive(Debug, Clone)]
pub struct InPlaceProcessor<'a> {
    target: Value,
    flags: CompatibilityFlags,
    merge: Cow<'a, MergePolicy>,
}

impl<'a> InPlaceProcessor<'a> {
    pub fn new(target: Value, config: &'a ProcessorConfig) -> Self {
        Self {
            target,
            flags: config.flags,
            merge: Cow::Borrowed(&config.merge),
        }
    }

    /// Processor with no compatibility flags and the default merge policy.
    pub fn with_defaults(target: Value) -> Self {
        Self {
            target,
            flags: CompatibilityFlags::empty(),
            merge: Cow::Owned(MergePolicy::default()),
        }
    }

    pub fn document(&self) -> &Value {
        &self.target
    }

    pub fn flags(&self) -> CompatibilityFlags {
        self.flags
    }

    pub fn merge_policy(&self) -> &MergePolicy {
        &self.merge
    }

    /// The current document, including any root replacement.
    pub fn into_result(self) -> Value {
        self.target
    }

    /// Apply one operation.
    pub fn apply(&mut self, op: &Operation) -> Result<(), PatchError> {
        match op {
            Operation::Add { path, value } => self.add(path, value.clone()),
            Operation::Remove { path } => self.remove(path),
            Operation::Replace { path, value } => self.replace(path, value.clone()),
            Operation::Move { from, path } => self.move_value(from, path),
            Operation::Copy { from, path } => self.copy_value(from, path),
            Operation::Test { path, value } => self.test(path, value),
        }
    }

    pub fn add(&mut self, path: &JsonPointer, value: Value) -> Result<(), PatchError> {
        self.set(path, value, OpKind::Add)
    }

    /// Replace the value at `path`.
    ///
    /// An unresolvable parent is skipped silently. A missing object field is
    /// also skipped unless `AllowMissingTargetObjectOnReplace` is set, in
    /// which case it is inserted. Replacing never merges.
    pub fn replace(&mut self, path: &JsonPointer, value: Value) -> Result<(), PatchError> {
        let Some(token) = path.last() else {
            self.target = value;
            return Ok(());
        };
        let parent_path = path.parent();
        let Ok(parent) = parent_path.evaluate_mut(&mut self.target) else {
            debug!(%path, "replace skipped: parent not found");
            return Ok(());
        };
        match parent {
            Value::Object(map) => {
                let field = token.as_field();
                if !map.contains_key(field)
                    && !self
                        .flags
                        .contains(CompatibilityFlag::AllowMissingTargetObjectOnReplace)
                {
                    debug!(%path, "replace skipped: field not found");
                    return Ok(());
                }
                map.insert(field.to_string(), value);
                Ok(())
            }
            Value::Array(arr) => {
                let len = arr.len();
                let idx = resolve_index(token, len)
                    .map_err(|kind| PatchError::new(OpKind::Replace, parent_path.clone(), kind))?;
                if idx >= len {
                    return Err(PatchError::new(
                        OpKind::Replace,
                        parent_path,
                        ErrorKind::IndexOutOfBounds { index: idx, len },
                    ));
                }
                arr[idx] = value;
                Ok(())
            }
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => Err(PatchError::new(
                OpKind::Replace,
                parent_path,
                ErrorKind::CannotTraverseScalar,
            )),
        }
    }

    pub fn remove(&mut self, path: &JsonPointer) -> Result<(), PatchError> {
        self.remove_as(path, OpKind::Remove)
    }

    /// Move the value at `from` to `path`.
    ///
    /// The value is captured, then removed from `from`, then written to
    /// `path`, so indices in a shared array are those after the removal.
    pub fn move_value(&mut self, from: &JsonPointer, path: &JsonPointer) -> Result<(), PatchError> {
        let value = from
            .evaluate(&self.target)
            .map_err(|err| PatchError::new(OpKind::Move, from.clone(), err.into()))?
            .clone();
        self.remove_as(from, OpKind::Move)?;
        self.set(path, value, OpKind::Move)
    }

    /// Copy the value at `from` to `path`. A missing source writes `null`.
    pub fn copy_value(&mut self, from: &JsonPointer, path: &JsonPointer) -> Result<(), PatchError> {
        // A parsed pointer only fails to evaluate as not-found.
        let value = match from.evaluate(&self.target) {
            Ok(found) => found.clone(),
            Err(_) => {
                debug!(%from, %path, "copy source not found, writing null");
                Value::Null
            }
        };
        self.set(path, value, OpKind::Copy)
    }

    /// Check that the value at `path` is structurally equal to `expected`.
    pub fn test(&self, path: &JsonPointer, expected: &Value) -> Result<(), PatchError> {
        let actual = path
            .evaluate(&self.target)
            .map_err(|err| PatchError::new(OpKind::Test, path.clone(), err.into()))?;
        if json_equal(actual, expected) {
            return Ok(());
        }
        Err(PatchError::new(
            OpKind::Test,
            path.clone(),
            ErrorKind::TestMismatch {
                expected: describe(expected),
                actual: describe(actual),
            },
        ))
    }

    fn remove_as(&mut self, path: &JsonPointer, op: OpKind) -> Result<(), PatchError> {
        let Some(token) = path.last() else {
            return Err(PatchError::new(op, path.clone(), ErrorKind::RootRemovalForbidden));
        };
        let parent_path = path.parent();
        let parent = parent_path
            .evaluate_mut(&mut self.target)
            .map_err(|err| PatchError::new(op, parent_path.clone(), err.into()))?;
        match parent {
            Value::Object(map) => {
                if map.shift_remove(token.as_field()).is_none() {
                    if self.flags.contains(CompatibilityFlag::ForbidRemoveMissingObject) {
                        return Err(PatchError::new(
                            op,
                            path.clone(),
                            ErrorKind::PathNotFound {
                                pointer: path.to_string(),
                            },
                        ));
                    }
                    debug!(%path, "remove of missing field ignored");
                }
                Ok(())
            }
            Value::Array(arr) => {
                let idx = resolve_index(token, arr.len())
                    .map_err(|kind| PatchError::new(op, parent_path.clone(), kind))?;
                if idx < arr.len() {
                    arr.remove(idx);
                    return Ok(());
                }
                if self
                    .flags
                    .contains(CompatibilityFlag::RemoveNoneExistingArrayElement)
                {
                    debug!(%path, len = arr.len(), "remove of missing array element ignored");
                    return Ok(());
                }
                Err(PatchError::new(
                    op,
                    parent_path,
                    ErrorKind::IndexOutOfBounds {
                        index: idx,
                        len: arr.len(),
                    },
                ))
            }
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => Err(PatchError::new(
                op,
                parent_path,
                ErrorKind::CannotTraverseScalar,
            )),
        }
    }

    /// Write `value` at `path`, merging into existing objects.
    ///
    /// An unresolvable parent is a silent no-op.
    fn set(&mut self, path: &JsonPointer, value: Value, op: OpKind) -> Result<(), PatchError> {
        let Some(token) = path.last() else {
            self.target = value;
            return Ok(());
        };
        let parent_path = path.parent();
        let Ok(parent) = parent_path.evaluate_mut(&mut self.target) else {
            debug!(%op, %path, "write skipped: parent not found");
            return Ok(());
        };
        match parent {
            Value::Array(arr) => insert_into_array(arr, token, value)
                .map_err(|kind| PatchError::new(op, parent_path, kind)),
            Value::Object(map) => {
                write_into_object(&self.merge, map, path, token.as_field(), value);
                Ok(())
            }
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => Err(PatchError::new(
                op,
                parent_path,
                ErrorKind::CannotTraverseScalar,
            )),
        }
    }
}

/// Position addressed by `token` in an array of length `len`.
///
/// The append sentinel resolves to `len`.
fn resolve_index(token: &RefToken, len: usize) -> Result<usize, ErrorKind> {
    match token.array_index() {
        Some(ArrayIndex::At(idx)) => Ok(idx),
        Some(ArrayIndex::Append) => Ok(len),
        None => Err(ErrorKind::InvalidIndex {
            token: token.as_field().to_string(),
        }),
    }
}

fn insert_into_array(arr: &mut Vec<Value>, token: &RefToken, value: Value) -> Result<(), ErrorKind> {
    let len = arr.len();
    match token.array_index() {
        // https://tools.ietf.org/html/rfc6902#section-4.1
        Some(ArrayIndex::Append) => arr.push(value),
        Some(ArrayIndex::At(idx)) if idx > len => {
            return Err(ErrorKind::IndexOutOfBounds { index: idx, len });
        }
        Some(ArrayIndex::At(idx)) => arr.insert(idx, value),
        None => {
            return Err(ErrorKind::InvalidIndex {
                token: token.as_field().to_string(),
            });
        }
    }
    Ok(())
}

/// Object-write rule, first match wins:
///
/// 1. `key` is a numeric-max field and both sides are objects: max merge.
/// 2. An ancestor of `path` is a numeric-max field and the existing value
///    is a number: keep it unless the incoming value ranks at least as high
///    under [`numeric_gt`] (non-numbers rank as zero).
/// 3. Both sides are objects: generic merge.
/// 4. Otherwise overwrite.
fn write_into_object(
    policy: &MergePolicy,
    node: &mut Map<String, Value>,
    path: &JsonPointer,
    key: &str,
    value: Value,
) {
    let under_numeric_max = path
        .ancestors()
        .iter()
        .any(|token| policy.is_numeric_max(token.as_field()));
    let Some(existing) = node.get_mut(key) else {
        node.insert(key.to_string(), value);
        return;
    };
    match (existing, value) {
        (Value::Object(base), Value::Object(incoming)) if policy.is_numeric_max(key) => {
            trace!(%path, "numeric-max merge");
            policy.merge_in_base_for_max(base, incoming);
        }
        (existing, incoming) if under_numeric_max && existing.is_number() => {
            if numeric_gt(existing, &incoming) {
                trace!(%path, kept = %existing, incoming = %incoming, "keeping larger value");
            } else {
                *existing = incoming;
            }
        }
        (Value::Object(base), Value::Object(incoming)) => {
            trace!(%path, "generic merge");
            policy.merge_in_base(base, incoming);
        }
        (existing, incoming) => *existing = incoming,
    }
}
