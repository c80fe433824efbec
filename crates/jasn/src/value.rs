//! Owned JSON values.
//!
//! [`OwnedValue`] is a self-contained copy of a subtree, detached from the
//! [`Document`](crate::Document) arenas. Its [`Display`](core::fmt::Display)
//! writes compact canonical JSON, which re-parses to an equal tree.
use alloc::{
    string::{String, ToString},
    vec::Vec,
};
use core::fmt::{self, Write as _};

use crate::number::NumberKind;

/// Array elements in source order.
pub type Array = Vec<OwnedValue>;
/// Object members in source order; duplicate keys are kept.
pub type Members = Vec<(String, OwnedValue)>;

/// A JSON value as defined by [RFC 8259].
///
/// # Examples
///
/// ```
/// use jasn::OwnedValue;
///
/// let v = OwnedValue::Object(vec![
///     ("key".to_string(), OwnedValue::String("value".into())),
///     ("n".to_string(), OwnedValue::from(3_u64)),
/// ]);
/// assert_eq!(v.to_string(), r#"{"key":"value","n":3}"#);
/// ```
///
/// [RFC 8259]: https://datatracker.ietf.org/doc/html/rfc8259
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum OwnedValue {
    /// `null`
    #[default]
    Null,
    /// `true` or `false`
    Boolean(bool),
    /// A number, kept as written.
    Number(OwnedNumber),
    /// An unescaped string.
    String(String),
    /// Elements in source order.
    Array(Array),
    /// Members in source order, duplicate keys included.
    Object(Members),
}

/// A number kept as its JSON lexeme, so no precision is lost.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OwnedNumber {
    lexeme: String,
    kind: NumberKind,
}

impl OwnedNumber {
    pub(crate) fn from_lexeme(lexeme: &str, kind: NumberKind) -> Self {
        Self {
            lexeme: lexeme.into(),
            kind,
        }
    }

    /// The source text.
    #[must_use]
    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    /// Integer or float, as written.
    #[must_use]
    pub fn kind(&self) -> NumberKind {
        self.kind
    }

    /// Nearest `f64`.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        self.lexeme.parse().unwrap_or(f64::NAN)
    }
}

impl fmt::Display for OwnedNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lexeme)
    }
}

impl From<bool> for OwnedValue {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<i64> for OwnedValue {
    fn from(v: i64) -> Self {
        Self::Number(OwnedNumber {
            lexeme: v.to_string(),
            kind: NumberKind::Integer,
        })
    }
}

impl From<u64> for OwnedValue {
    fn from(v: u64) -> Self {
        Self::Number(OwnedNumber {
            lexeme: v.to_string(),
            kind: NumberKind::Integer,
        })
    }
}

/// Non-finite floats have no JSON form and become `null`.
impl From<f64> for OwnedValue {
    fn from(v: f64) -> Self {
        if !v.is_finite() {
            return Self::Null;
        }
        // `Display` for `f64` never uses exponent notation and prints the
        // shortest digits that round-trip.
        let lexeme = v.to_string();
        let kind = if lexeme.contains('.') {
            NumberKind::Float
        } else {
            NumberKind::Integer
        };
        Self::Number(OwnedNumber { lexeme, kind })
    }
}

impl From<String> for OwnedValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for OwnedValue {
    fn from(v: &str) -> Self {
        Self::String(v.into())
    }
}

impl From<Array> for OwnedValue {
    fn from(v: Array) -> Self {
        Self::Array(v)
    }
}

impl From<Members> for OwnedValue {
    fn from(v: Members) -> Self {
        Self::Object(v)
    }
}

impl OwnedValue {
    /// Returns `true` if the value is [`Null`].
    ///
    /// [`Null`]: OwnedValue::Null
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if the value is [`Array`].
    ///
    /// [`Array`]: OwnedValue::Array
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(..))
    }

    /// Returns `true` if the value is [`Object`].
    ///
    /// [`Object`]: OwnedValue::Object
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(..))
    }

    /// Looks up `key` in an object, last occurrence winning.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&OwnedValue> {
        match self {
            Self::Object(members) => members.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }
}

/// Escapes a string for inclusion in a JSON string literal.
///
/// Quotes, backslashes, control characters (<= U+001F) and the Unicode line
/// separators are written as escapes.
pub(crate) fn write_escaped_string<W: fmt::Write>(src: &str, f: &mut W) -> fmt::Result {
    for c in src.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            // Escape Unicode line separators which pre-2019 JSON parsers may not handle correctly
            '\u{2028}' | '\u{2029}' => {
                write!(f, "\\u{:04X}", c as u32)?;
            }
            c if c.is_ascii_control() => {
                write!(f, "\\u{:04X}", c as u32)?;
            }
            _ => f.write_char(c)?,
        }
    }
    Ok(())
}

impl fmt::Display for OwnedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnedValue::Null => f.write_str("null"),
            OwnedValue::Boolean(b) => f.write_str(if *b { "true" } else { "false" }),
            OwnedValue::Number(n) => n.fmt(f),
            OwnedValue::String(s) => {
                f.write_char('"')?;
                write_escaped_string(s, f)?;
                f.write_char('"')
            }
            OwnedValue::Array(arr) => {
                f.write_str("[")?;
                let mut first = true;
                for v in arr {
                    if !first {
                        f.write_str(",")?;
                    }
                    first = false;
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
            OwnedValue::Object(members) => {
                f.write_str("{")?;
                let mut first = true;
                for (k, v) in members {
                    if !first {
                        f.write_str(",")?;
                    }
                    first = false;
                    f.write_char('"')?;
                    write_escaped_string(k, f)?;
                    write!(f, "\":{v}")?;
                }
                f.write_str("}")
            }
        }
    }
}
