//! Processor configuration.

use serde::{Deserialize, Serialize};

use crate::flags::{CompatibilityFlag, CompatibilityFlags};
use crate::merge::{MergePolicy, MergeStrategy};

/// Settings fixed when a processor is constructed.
///
/// Deserializes from a table such as:
///
/// ```toml
/// flags = ["REMOVE_NONE_EXISTING_ARRAY_ELEMENT"]
///
/// [merge]
/// maxIdMap = "numeric-max"
/// pageJsonSeq = "dedup-append"
/// ```
///
/// Missing keys fall back to [`ProcessorConfig::default`]: no flags and the
/// default [`MergePolicy`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    pub flags: CompatibilityFlags,
    pub merge: MergePolicy,
}

impl ProcessorConfig {
    #[must_use]
    pub fn with_flag(mut self, flag: CompatibilityFlag) -> Self {
        self.flags = self.flags.with(flag);
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: CompatibilityFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn with_merge_policy(mut self, merge: MergePolicy) -> Self {
        self.merge = merge;
        self
    }

    #[must_use]
    pub fn with_merge_rule(mut self, field: impl Into<String>, strategy: MergeStrategy) -> Self {
        self.merge = self.merge.with_rule(field, strategy);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_accumulates() {
        let config = ProcessorConfig::default()
            .with_flag(CompatibilityFlag::RemoveNoneExistingArrayElement)
            .with_merge_rule("history", MergeStrategy::DedupAppend);
        assert!(config
            .flags
            .contains(CompatibilityFlag::RemoveNoneExistingArrayElement));
        assert!(config.merge.is_dedup_append("history"));
        assert!(config.merge.is_numeric_max("maxIdMap"));
    }

    #[test]
    fn toml_overrides_merge_table() {
        let config: ProcessorConfig = toml::from_str(
            r#"
            flags = ["ALLOW_MISSING_TARGET_OBJECT_ON_REPLACE", "FORBID_REMOVE_MISSING_OBJECT"]

            [merge]
            counters = "numeric-max"
            "#,
        )
        .unwrap();
        assert!(config
            .flags
            .contains(CompatibilityFlag::AllowMissingTargetObjectOnReplace));
        assert!(config
            .flags
            .contains(CompatibilityFlag::ForbidRemoveMissingObject));
        assert!(config.merge.is_numeric_max("counters"));
        // An explicit table replaces the defaults.
        assert!(!config.merge.is_numeric_max("maxIdMap"));
    }

    #[test]
    fn empty_toml_is_default() {
        let config: ProcessorConfig = toml::from_str("").unwrap();
        assert_eq!(config, ProcessorConfig::default());
    }

    #[test]
    fn unknown_flag_is_rejected() {
        let res: Result<ProcessorConfig, _> = toml::from_str(r#"flags = ["LENIENT"]"#);
        assert!(res.is_err());
    }
}
