//! JSON Pointer (RFC 6901) utilities.
//!
//! This crate parses [JSON Pointer (RFC 6901)](https://tools.ietf.org/html/rfc6901)
//! strings into reference tokens and evaluates them against `serde_json`
//! documents.
//!
//! # Example
//!
//! ```
//! use zjson_pointer::JsonPointer;
//!
//! let ptr = JsonPointer::parse("/foo/bar").unwrap();
//! assert_eq!(ptr.to_string(), "/foo/bar");
//! assert_eq!(ptr.parent().to_string(), "/foo");
//!
//! let doc = serde_json::json!({"foo": {"bar": 42}});
//! assert_eq!(ptr.evaluate(&doc).unwrap(), &serde_json::json!(42));
//! ```

use thiserror::Error;

pub mod get;
pub mod types;

pub use get::{get, get_mut};
pub use types::{ArrayIndex, JsonPointer, RefToken};

/// Unescapes a JSON Pointer path component.
///
/// Per RFC 6901, `~1` is replaced with `/` and `~0` is replaced with `~`.
/// A `~` followed by anything else is rejected.
///
/// # Example
///
/// ```
/// use zjson_pointer::unescape_component;
///
/// assert_eq!(unescape_component("a~0b").unwrap(), "a~b");
/// assert_eq!(unescape_component("c~1d").unwrap(), "c/d");
/// assert!(unescape_component("e~2f").is_err());
/// ```
pub fn unescape_component(component: &str) -> Result<String, &'static str> {
    if !component.contains('~') {
        return Ok(component.to_string());
    }
    let mut out = String::with_capacity(component.len());
    let mut chars = component.chars();
    while let Some(c) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('~'),
            Some('1') => out.push('/'),
            Some(_) => return Err("invalid escape sequence"),
            None => return Err("dangling escape character"),
        }
    }
    Ok(out)
}

/// Escapes a JSON Pointer path component.
///
/// Per RFC 6901, `/` is replaced with `~1` and `~` is replaced with `~0`.
///
/// # Example
///
/// ```
/// use zjson_pointer::escape_component;
///
/// assert_eq!(escape_component("a~b"), "a~0b");
/// assert_eq!(escape_component("c/d"), "c~1d");
/// assert_eq!(escape_component("no-escapes"), "no-escapes");
/// ```
pub fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    // Order matters: ~ must be escaped before /
    component.replace('~', "~0").replace('/', "~1")
}

/// Parse a JSON Pointer string into unescaped path components.
///
/// - Empty string returns an empty vec (the root)
/// - A non-empty pointer must start with `/`
/// - Each component is unescaped
///
/// ```
/// use zjson_pointer::parse_json_pointer;
///
/// assert_eq!(parse_json_pointer("").unwrap(), Vec::<String>::new());
/// assert_eq!(parse_json_pointer("/").unwrap(), vec![""]);
/// assert_eq!(parse_json_pointer("/a~0b/c~1d").unwrap(), vec!["a~b", "c/d"]);
/// assert!(parse_json_pointer("foo").is_err());
/// ```
pub fn parse_json_pointer(pointer: &str) -> Result<Vec<String>, JsonPointerError> {
    if pointer.is_empty() {
        return Ok(Vec::new());
    }
    let Some(rest) = pointer.strip_prefix('/') else {
        return Err(JsonPointerError::Malformed {
            pointer: pointer.to_string(),
            reason: "must start with '/'",
        });
    };
    rest.split('/')
        .map(|component| {
            unescape_component(component).map_err(|reason| JsonPointerError::Malformed {
                pointer: pointer.to_string(),
                reason,
            })
        })
        .collect()
}

/// Format path components into a JSON Pointer string.
///
/// Returns an empty string for the root path.
pub fn format_json_pointer<S: AsRef<str>>(path: &[S]) -> String {
    let mut out = String::new();
    for component in path {
        out.push('/');
        out.push_str(&escape_component(component.as_ref()));
    }
    out
}

/// Check if a string is a canonical non-negative array index.
///
/// `0` is valid, other numbers must not have a leading zero.
///
/// ```
/// use zjson_pointer::is_valid_index;
///
/// assert!(is_valid_index("0"));
/// assert!(is_valid_index("123"));
/// assert!(!is_valid_index("-1"));
/// assert!(!is_valid_index("01"));
/// assert!(!is_valid_index("-"));
/// ```
pub fn is_valid_index(index: &str) -> bool {
    let bytes = index.as_bytes();
    if bytes.is_empty() {
        return false;
    }
    if bytes.len() > 1 && bytes[0] == b'0' {
        return false;
    }
    bytes.iter().all(|b| b.is_ascii_digit())
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JsonPointerError {
    #[error("malformed pointer {pointer:?}: {reason}")]
    Malformed {
        pointer: String,
        reason: &'static str,
    },
    #[error("no value at {pointer:?}")]
    NotFound { pointer: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape_component() {
        assert_eq!(unescape_component("foo").unwrap(), "foo");
        assert_eq!(unescape_component("a~0b").unwrap(), "a~b");
        assert_eq!(unescape_component("c~1d").unwrap(), "c/d");
        assert_eq!(unescape_component("a~0b~1c").unwrap(), "a~b/c");

        // ~01 is "~1" literally, not "/"
        assert_eq!(unescape_component("~01").unwrap(), "~1");
        assert_eq!(unescape_component("~1~1").unwrap(), "//");
    }

    #[test]
    fn test_unescape_rejects_bad_escapes() {
        assert!(unescape_component("~").is_err());
        assert!(unescape_component("a~").is_err());
        assert!(unescape_component("~2").is_err());
        assert!(unescape_component("~a").is_err());
    }

    #[test]
    fn test_escape_component() {
        assert_eq!(escape_component("foo"), "foo");
        assert_eq!(escape_component("a~b/c"), "a~0b~1c");
        assert_eq!(escape_component("~~"), "~0~0");
        assert_eq!(escape_component("//"), "~1~1");
    }

    #[test]
    fn test_parse_json_pointer() {
        assert_eq!(parse_json_pointer("").unwrap(), Vec::<String>::new());
        assert_eq!(parse_json_pointer("/").unwrap(), vec![""]);
        assert_eq!(parse_json_pointer("/foo/bar").unwrap(), vec!["foo", "bar"]);
        assert_eq!(parse_json_pointer("/foo///").unwrap(), vec!["foo", "", "", ""]);
    }

    #[test]
    fn test_parse_json_pointer_malformed() {
        let err = parse_json_pointer("foo/bar").unwrap_err();
        assert!(matches!(err, JsonPointerError::Malformed { .. }));

        let err = parse_json_pointer("/foo/~3").unwrap_err();
        assert_eq!(
            err,
            JsonPointerError::Malformed {
                pointer: "/foo/~3".to_string(),
                reason: "invalid escape sequence",
            }
        );
    }

    #[test]
    fn test_format_json_pointer() {
        assert_eq!(format_json_pointer::<String>(&[]), "");
        assert_eq!(format_json_pointer(&["foo"]), "/foo");
        assert_eq!(format_json_pointer(&["a~b", "c/d"]), "/a~0b/c~1d");
        assert_eq!(format_json_pointer(&[""]), "/");
    }

    #[test]
    fn test_is_valid_index() {
        assert!(is_valid_index("0"));
        assert!(is_valid_index("10"));
        assert!(!is_valid_index(""));
        assert!(!is_valid_index("1.5"));
        assert!(!is_valid_index("abc"));
        assert!(!is_valid_index("00"));
    }

    #[test]
    fn test_roundtrip() {
        for pointer in ["", "/", "/foo", "/a~0b/c~1d/1", "/foo///"] {
            let path = parse_json_pointer(pointer).unwrap();
            assert_eq!(format_json_pointer(&path), pointer, "roundtrip for {pointer:?}");
        }
    }
}
