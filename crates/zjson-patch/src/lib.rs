//! In-place JSON Patch (RFC 6902) with structural merge.
//!
//! All six RFC 6902 operations are supported:
//! `add`, `remove`, `replace`, `copy`, `move`, `test`.
//!
//! Differences from a plain RFC 6902 implementation:
//!
//! - Writing an object onto an existing object field deep-merges instead of
//!   overwriting (`add`, `move`, `copy`; never `replace`). Field names listed
//!   in the [`MergePolicy`] get a numeric-max or dedup-append merge.
//! - Writes below a parent that does not exist are skipped, not rejected.
//! - A few edge cases are controlled by [`CompatibilityFlags`].
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use zjson_patch::{apply_json_patch, ProcessorConfig};
//!
//! let doc = json!({"maxIdMap": {"task": 9}, "title": "a"});
//! let patch = json!([
//!     {"op": "add", "path": "/maxIdMap", "value": {"task": 4, "note": 2}},
//!     {"op": "replace", "path": "/title", "value": "b"}
//! ]);
//! let out = apply_json_patch(doc, &patch, &ProcessorConfig::default()).unwrap();
//! assert_eq!(out, json!({"maxIdMap": {"task": 9, "note": 2}, "title": "b"}));
//! ```

pub mod apply;
pub mod codec;
pub mod config;
pub mod equal;
pub mod flags;
pub mod merge;
pub mod processor;
pub mod types;

pub use apply::{apply_json_patch, apply_op, apply_patch, ApplyError};
pub use codec::{from_json, from_json_patch, to_json, to_json_patch, DecodeError};
pub use config::ProcessorConfig;
pub use flags::{CompatibilityFlag, CompatibilityFlags};
pub use merge::{MergePolicy, MergeStrategy};
pub use processor::InPlaceProcessor;
pub use types::{ErrorKind, JsonPointer, OpKind, Operation, PatchError, PatchFailure};
