//! # Runtime Value Representation
//!
//! `Value` is the runtime form of one decoded column. The variant is
//! total over everything the record format can produce; there is no
//! open-ended dynamic typing anywhere downstream of the decoder.
//!
//! | Variant | Rust Type | Source serial types |
//! |---------|-----------|---------------------|
//! | Null    | -         | 0 (and the rowid-alias slot) |
//! | Int     | i64       | 1..6, 8, 9          |
//! | Float   | f64       | 7                   |
//! | Text    | Vec<u8>   | odd ≥ 13            |
//! | Blob    | Vec<u8>   | even ≥ 12           |
//!
//! Text is kept as raw bytes; the database's text encoding (UTF-8 here)
//! only matters at the display edge, and keeping bytes internally makes
//! bytewise comparison exact.
//!
//! ## Comparison Semantics
//!
//! [`Value::sql_cmp`] implements the engine's one comparison rule, used
//! by both the WHERE evaluator and the index probe:
//!
//! 1. NULL equals NULL and sorts below every non-NULL value
//! 2. if both sides parse as finite numbers, compare numerically
//! 3. otherwise compare the UTF-8 byte forms
//!
//! Rule 2 deliberately lets `Text("12")` equal `Int(12)`: comparison
//! coerces at the comparison site, not at decode time.
//!
//! ## Rendering
//!
//! [`Value::render`] produces the output form: NULL is the empty string,
//! integers and floats print in base 10, text and blobs pass through as
//! their byte sequence (lossily decoded for display).

use std::borrow::Cow;
use std::cmp::Ordering;

/// One decoded column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Text(Vec<u8>),
    Blob(Vec<u8>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The value as a finite number, when it has one: integers and finite
    /// floats directly, text and blobs through a full-string parse.
    fn as_number(&self) -> Option<f64> {
        match self {
            Value::Null => None,
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => f.is_finite().then_some(*f),
            Value::Text(b) | Value::Blob(b) => {
                let s = std::str::from_utf8(b).ok()?;
                let n: f64 = s.parse().ok()?;
                n.is_finite().then_some(n)
            }
        }
    }

    /// The bytewise comparison form: text and blobs as-is, numbers via
    /// their base-10 rendering.
    fn byte_form(&self) -> Cow<'_, [u8]> {
        match self {
            Value::Null => Cow::Borrowed(&[]),
            Value::Int(i) => Cow::Owned(i.to_string().into_bytes()),
            Value::Float(f) => Cow::Owned(f.to_string().into_bytes()),
            Value::Text(b) | Value::Blob(b) => Cow::Borrowed(b),
        }
    }

    /// Total ordering with the engine's SQL semantics: NULLs first, then
    /// numeric when both sides are numbers, else bytewise.
    pub fn sql_cmp(&self, other: &Value) -> Ordering {
        match (self.is_null(), other.is_null()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (false, false) => {}
        }

        if let (Some(a), Some(b)) = (self.as_number(), other.as_number()) {
            return a.partial_cmp(&b).unwrap_or(Ordering::Equal);
        }

        self.byte_form().cmp(&other.byte_form())
    }

    /// Output rendering for pipe-joined rows.
    pub fn render(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Text(b) | Value::Blob(b) => String::from_utf8_lossy(b).into_owned(),
        }
    }
}
