//! Compatibility flags.
//!
//! Every flag is opt-in. With no flags set the processor follows the strict
//! behaviour; each flag relaxes (or, for `ForbidRemoveMissingObject`,
//! tightens) one specific edge case.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompatibilityFlag {
    /// Decode a missing `value` member as `null`.
    MissingValuesAsNulls,
    /// `remove` of an out-of-range array index is a no-op.
    RemoveNoneExistingArrayElement,
    /// `replace` of a missing object field inserts it instead of skipping.
    AllowMissingTargetObjectOnReplace,
    /// `remove` of a missing object field fails instead of being a no-op.
    ForbidRemoveMissingObject,
}

impl CompatibilityFlag {
    pub const ALL: [CompatibilityFlag; 4] = [
        CompatibilityFlag::MissingValuesAsNulls,
        CompatibilityFlag::RemoveNoneExistingArrayElement,
        CompatibilityFlag::AllowMissingTargetObjectOnReplace,
        CompatibilityFlag::ForbidRemoveMissingObject,
    ];

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Immutable set of [`CompatibilityFlag`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<CompatibilityFlag>", into = "Vec<CompatibilityFlag>")]
pub struct CompatibilityFlags(u8);

impl CompatibilityFlags {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn contains(self, flag: CompatibilityFlag) -> bool {
        self.0 & flag.bit() != 0
    }

    #[must_use]
    pub const fn with(self, flag: CompatibilityFlag) -> Self {
        Self(self.0 | flag.bit())
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = CompatibilityFlag> {
        CompatibilityFlag::ALL
            .into_iter()
            .filter(move |flag| self.contains(*flag))
    }
}

impl From<CompatibilityFlag> for CompatibilityFlags {
    fn from(flag: CompatibilityFlag) -> Self {
        Self::empty().with(flag)
    }
}

impl FromIterator<CompatibilityFlag> for CompatibilityFlags {
    fn from_iter<I: IntoIterator<Item = CompatibilityFlag>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

impl From<Vec<CompatibilityFlag>> for CompatibilityFlags {
    fn from(flags: Vec<CompatibilityFlag>) -> Self {
        flags.into_iter().collect()
    }
}

impl From<CompatibilityFlags> for Vec<CompatibilityFlag> {
    fn from(flags: CompatibilityFlags) -> Self {
        flags.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty() {
        let flags = CompatibilityFlags::default();
        assert!(flags.is_empty());
        for flag in CompatibilityFlag::ALL {
            assert!(!flags.contains(flag));
        }
    }

    #[test]
    fn with_adds_only_that_flag() {
        let flags = CompatibilityFlags::empty()
            .with(CompatibilityFlag::RemoveNoneExistingArrayElement);
        assert!(flags.contains(CompatibilityFlag::RemoveNoneExistingArrayElement));
        assert!(!flags.contains(CompatibilityFlag::AllowMissingTargetObjectOnReplace));
        assert_eq!(flags.iter().count(), 1);
    }

    #[test]
    fn serde_as_flag_names() {
        let flags: CompatibilityFlags = [
            CompatibilityFlag::AllowMissingTargetObjectOnReplace,
            CompatibilityFlag::MissingValuesAsNulls,
        ]
        .into_iter()
        .collect();
        let json = serde_json::to_value(flags).unwrap();
        assert_eq!(
            json,
            serde_json::json!(["MISSING_VALUES_AS_NULLS", "ALLOW_MISSING_TARGET_OBJECT_ON_REPLACE"])
        );
        let back: CompatibilityFlags = serde_json::from_value(json).unwrap();
        assert_eq!(back, flags);
    }
}
