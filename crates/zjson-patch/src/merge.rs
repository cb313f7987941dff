//! Structural merge applied when a write lands on an existing object field.
//!
//! Which rule applies is decided by a [`MergePolicy`]: a table from field
//! name to [`MergeStrategy`]. Fields not in the table use the generic deep
//! merge. The default table reproduces the historical behaviour: `maxIdMap`
//! keeps numeric maxima and `pageJsonSeq` is an append-only log.
//!
//! No rule ever removes a key that the incoming value does not name.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use tracing::trace;

/// Default field holding numeric high-water marks.
pub const MAX_ID_MAP_FIELD: &str = "maxIdMap";

/// Default field holding an ordered, deduplicated log.
pub const PAGE_JSON_SEQ_FIELD: &str = "pageJsonSeq";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeStrategy {
    /// Recursive field-wise merge, incoming leaves overwrite.
    #[default]
    Generic,
    /// Leaves keep the larger of the existing and incoming number.
    NumericMax,
    /// Arrays append incoming elements not already present, by substring.
    DedupAppend,
}

/// Field-name driven merge configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MergePolicy {
    rules: IndexMap<String, MergeStrategy>,
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self::empty()
            .with_rule(MAX_ID_MAP_FIELD, MergeStrategy::NumericMax)
            .with_rule(PAGE_JSON_SEQ_FIELD, MergeStrategy::DedupAppend)
    }
}

impl MergePolicy {
    /// A policy with no special fields: every merge is generic.
    pub fn empty() -> Self {
        Self {
            rules: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with_rule(mut self, field: impl Into<String>, strategy: MergeStrategy) -> Self {
        self.rules.insert(field.into(), strategy);
        self
    }

    pub fn strategy_for(&self, field: &str) -> MergeStrategy {
        self.rules.get(field).copied().unwrap_or_default()
    }

    pub fn is_numeric_max(&self, field: &str) -> bool {
        self.strategy_for(field) == MergeStrategy::NumericMax
    }

    pub fn is_dedup_append(&self, field: &str) -> bool {
        self.strategy_for(field) == MergeStrategy::DedupAppend
    }

    pub fn rules(&self) -> impl Iterator<Item = (&str, MergeStrategy)> {
        self.rules.iter().map(|(field, strategy)| (field.as_str(), *strategy))
    }

    /// Generic deep merge of `incoming` into `base`.
    ///
    /// For each incoming field: an existing object is merged into
    /// recursively (a non-object incoming value leaves it untouched); a
    /// dedup-append field holding a non-empty array receives the incoming
    /// array through [`dedup_append`]; anything else is overwritten.
    pub fn merge_in_base(&self, base: &mut Map<String, Value>, incoming: Map<String, Value>) {
        for (field, value) in incoming {
            match base.get_mut(&field) {
                Some(Value::Object(existing)) => match value {
                    Value::Object(sub) => self.merge_in_base(existing, sub),
                    other => trace!(%field, incoming = %other, "non-object value ignored by object merge"),
                },
                Some(Value::Array(existing))
                    if self.is_dedup_append(&field) && !existing.is_empty() && value.is_array() =>
                {
                    if let Value::Array(items) = value {
                        dedup_append(existing, items);
                    }
                }
                _ => {
                    base.insert(field, value);
                }
            }
        }
    }

    /// Numeric-max merge of `incoming` into `base`.
    ///
    /// Nested objects recurse; leaves take the incoming value unless the
    /// existing one ranks higher under [`numeric_gt`]. Applying the same
    /// incoming value twice is the same as applying it once.
    pub fn merge_in_base_for_max(&self, base: &mut Map<String, Value>, incoming: Map<String, Value>) {
        for (field, value) in incoming {
            match base.get_mut(&field) {
                Some(Value::Object(existing)) => match value {
                    Value::Object(sub) => self.merge_in_base_for_max(existing, sub),
                    other => trace!(%field, incoming = %other, "non-object value ignored by max merge"),
                },
                Some(existing) if numeric_gt(existing, &value) => {
                    trace!(%field, kept = %existing, incoming = %value, "keeping larger value");
                }
                _ => {
                    base.insert(field, value);
                }
            }
        }
    }
}

/// Appends each incoming element whose compact JSON text does not already
/// occur inside the compact JSON text of `base`.
///
/// The containment test is textual, so an element that is a substring of an
/// existing one (`"X"` against `"XY"`) is dropped as a duplicate.
pub fn dedup_append(base: &mut Vec<Value>, incoming: Vec<Value>) {
    for item in incoming {
        let haystack = array_text(base);
        let needle = item.to_string();
        if haystack.contains(&needle) {
            trace!(element = %needle, "suppressed duplicate log element");
        } else {
            trace!(element = %needle, "appended log element");
            base.push(item);
        }
    }
}

fn array_text(items: &[Value]) -> String {
    let mut out = String::from("[");
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&item.to_string());
    }
    out.push(']');
    out
}

/// True if `a` ranks above `b` under the max rules.
///
/// Non-numeric values rank as zero, so a stored positive number survives an
/// incoming `null`, string or container.
pub fn numeric_gt(a: &Value, b: &Value) -> bool {
    let rank = |v: &Value| match v {
        Value::Number(n) => n.clone(),
        _ => Number::from(0),
    };
    number_gt(&rank(a), &rank(b))
}

fn number_gt(a: &Number, b: &Number) -> bool {
    if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
        return a > b;
    }
    if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
        return a > b;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(a), Some(b)) => a > b,
        _ => false,
    }
}
