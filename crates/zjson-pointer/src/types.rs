//! Type definitions for JSON Pointer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::{escape_component, is_valid_index, parse_json_pointer, JsonPointerError};

/// Token that addresses one past the last element of an array.
pub const APPEND_TOKEN: &str = "-";

/// Array position a token refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayIndex {
    At(usize),
    /// The `-` sentinel. Only meaningful when writing.
    Append,
}

/// One step of a JSON Pointer, stored unescaped.
///
/// Whether the step names a field or an array position is only decided when
/// it meets an actual node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RefToken(String);

impl RefToken {
    pub fn new(field: impl Into<String>) -> Self {
        Self(field.into())
    }

    pub fn as_field(&self) -> &str {
        &self.0
    }

    /// Interpret the token as an array position.
    ///
    /// Returns `None` if the token is neither a canonical index nor `-`.
    pub fn array_index(&self) -> Option<ArrayIndex> {
        if self.0 == APPEND_TOKEN {
            return Some(ArrayIndex::Append);
        }
        if !is_valid_index(&self.0) {
            return None;
        }
        // A canonical index too large for `usize` is past the end of any array.
        Some(ArrayIndex::At(self.0.parse().unwrap_or(usize::MAX)))
    }
}

impl fmt::Display for RefToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&escape_component(&self.0))
    }
}

impl From<&str> for RefToken {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<usize> for RefToken {
    fn from(idx: usize) -> Self {
        Self(idx.to_string())
    }
}

/// A parsed JSON Pointer. The empty pointer addresses the document root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct JsonPointer {
    tokens: Vec<RefToken>,
}

impl JsonPointer {
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse an RFC 6901 pointer string.
    ///
    /// # Errors
    ///
    /// [`JsonPointerError::Malformed`] if the text is non-empty and does not
    /// start with `/`, or contains an escape other than `~0` / `~1`.
    pub fn parse(text: &str) -> Result<Self, JsonPointerError> {
        let tokens = parse_json_pointer(text)?.into_iter().map(RefToken).collect();
        Ok(Self { tokens })
    }

    pub fn from_tokens(tokens: impl IntoIterator<Item = impl Into<RefToken>>) -> Self {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    pub fn tokens(&self) -> &[RefToken] {
        &self.tokens
    }

    pub fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The pointer without its last token. The parent of the root is the root.
    pub fn parent(&self) -> JsonPointer {
        match self.tokens.split_last() {
            Some((_, init)) => Self {
                tokens: init.to_vec(),
            },
            None => Self::root(),
        }
    }

    pub fn last(&self) -> Option<&RefToken> {
        self.tokens.last()
    }

    /// Tokens before the last one.
    pub fn ancestors(&self) -> &[RefToken] {
        self.tokens
            .split_last()
            .map(|(_, init)| init)
            .unwrap_or_default()
    }

    pub fn push(&mut self, token: impl Into<RefToken>) {
        self.tokens.push(token.into());
    }

    /// Returns a new pointer with `token` appended.
    pub fn child(&self, token: impl Into<RefToken>) -> JsonPointer {
        let mut out = self.clone();
        out.push(token);
        out
    }

    /// Resolve the pointer against `root`.
    ///
    /// # Errors
    ///
    /// [`JsonPointerError::NotFound`] on a missing field, an index that is
    /// out of range or not canonical, the `-` sentinel, or an attempt to step
    /// into a scalar.
    pub fn evaluate<'a>(&self, root: &'a Value) -> Result<&'a Value, JsonPointerError> {
        crate::get(root, &self.tokens).ok_or_else(|| self.not_found())
    }

    /// Mutable counterpart of [`JsonPointer::evaluate`].
    pub fn evaluate_mut<'a>(&self, root: &'a mut Value) -> Result<&'a mut Value, JsonPointerError> {
        match crate::get_mut(root, &self.tokens) {
            Some(v) => Ok(v),
            None => Err(self.not_found()),
        }
    }

    fn not_found(&self) -> JsonPointerError {
        JsonPointerError::NotFound {
            pointer: self.to_string(),
        }
    }
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            write!(f, "/{token}")?;
        }
        Ok(())
    }
}

impl FromStr for JsonPointer {
    type Err = JsonPointerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for JsonPointer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for JsonPointer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}
