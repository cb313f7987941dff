//! Patch sequence driver.

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::codec::{from_json_patch, DecodeError};
use crate::config::ProcessorConfig;
use crate::processor::InPlaceProcessor;
use crate::types::{Operation, PatchError, PatchFailure};

/// Apply a single operation to the document (in-place mutation).
pub fn apply_op(doc: &mut Value, op: &Operation, config: &ProcessorConfig) -> Result<(), PatchError> {
    let mut processor = InPlaceProcessor::new(std::mem::take(doc), config);
    let res = processor.apply(op);
    *doc = processor.into_result();
    res
}

/// Apply `ops` in order and return the resulting document.
///
/// The first failing operation stops the sequence. The returned
/// [`PatchFailure`] carries its index and the document as mutated by the
/// operations before it.
pub fn apply_patch(doc: Value, ops: &[Operation], config: &ProcessorConfig) -> Result<Value, PatchFailure> {
    let mut processor = InPlaceProcessor::new(doc, config);
    for (index, op) in ops.iter().enumerate() {
        if let Err(error) = processor.apply(op) {
            debug!(index, %error, "patch aborted");
            return Err(PatchFailure {
                index,
                error,
                doc: processor.into_result(),
            });
        }
    }
    Ok(processor.into_result())
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplyError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Patch(#[from] PatchFailure),
}

/// Decode an RFC 6902 patch document and apply it.
///
/// Decoding happens up front; a malformed patch leaves the document
/// untouched and is reported as [`ApplyError::Decode`].
pub fn apply_json_patch(doc: Value, patch: &Value, config: &ProcessorConfig) -> Result<Value, ApplyError> {
    let ops = from_json_patch(patch, config.flags)?;
    Ok(apply_patch(doc, &ops, config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ErrorKind, JsonPointer, OpKind};
    use serde_json::json;

    fn path(s: &str) -> JsonPointer {
        JsonPointer::parse(s).unwrap()
    }

    #[test]
    fn apply_op_mutates_in_place() {
        let mut doc = json!({"a": 1});
        let config = ProcessorConfig::default();
        apply_op(&mut doc, &Operation::Add { path: path("/b"), value: json!(2) }, &config).unwrap();
        let wrapped = json!([doc.clone()]);
        apply_op(&mut doc, &Operation::Replace { path: path(""), value: wrapped }, &config).unwrap();
        assert_eq!(doc, json!([{"a": 1, "b": 2}]));
    }

    #[test]
    fn apply_op_keeps_document_on_error() {
        let mut doc = json!({"a": 1});
        let err = apply_op(&mut doc, &Operation::Remove { path: path("") }, &ProcessorConfig::default())
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::RootRemovalForbidden);
        assert_eq!(doc, json!({"a": 1}));
    }

    #[test]
    fn apply_ops_sequence() {
        let ops = vec![
            Operation::Add { path: path("/b"), value: json!(2) },
            Operation::Replace { path: path("/a"), value: json!(10) },
        ];
        let doc = apply_patch(json!({"a": 1}), &ops, &ProcessorConfig::default()).unwrap();
        assert_eq!(doc, json!({"a": 10, "b": 2}));
    }

    #[test]
    fn failure_reports_index_and_partial_document() {
        let ops = vec![
            Operation::Add { path: path("/b"), value: json!(2) },
            Operation::Test { path: path("/a"), value: json!(2) },
            Operation::Add { path: path("/c"), value: json!(3) },
        ];
        let failure = apply_patch(json!({"a": 1}), &ops, &ProcessorConfig::default()).unwrap_err();
        assert_eq!(failure.index, 1);
        assert_eq!(failure.error.op, OpKind::Test);
        assert_eq!(failure.doc, json!({"a": 1, "b": 2}));
        assert_eq!(
            failure.to_string(),
            "operation 1 failed: test at \"/a\": expected value 2 but found value 1"
        );
    }

    #[test]
    fn json_patch_decode_failure_applies_nothing() {
        let patch = json!([
            {"op": "add", "path": "/b", "value": 2},
            {"op": "nope", "path": "/c"}
        ]);
        let err = apply_json_patch(json!({"a": 1}), &patch, &ProcessorConfig::default()).unwrap_err();
        assert!(matches!(err, ApplyError::Decode(DecodeError::AtIndex { index: 1, .. })));
    }

    #[test]
    fn json_patch_applies() {
        let patch = json!([
            {"op": "add", "path": "/list", "value": []},
            {"op": "add", "path": "/list/-", "value": "x"},
            {"op": "copy", "from": "/list/0", "path": "/first"}
        ]);
        let doc = apply_json_patch(json!({}), &patch, &ProcessorConfig::default()).unwrap();
        assert_eq!(doc, json!({"list": ["x"], "first": "x"}));
    }
}
