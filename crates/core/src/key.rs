//! Query keys and their canonical hashes.
//!
//! A `QueryKey` is a structured identifier for one resource. Two keys with the
//! same content always canonicalize to the same `QueryHash`, independent of
//! the insertion order of any map parts.

use crate::error::{Error, Result};
use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::{self, Write};

/// One segment of a query key.
#[derive(Clone, Debug, PartialEq)]
pub enum KeyPart {
    /// Null segment
    Null,
    /// Boolean segment
    Bool(bool),
    /// Integer segment
    Int(i64),
    /// Floating point segment, must be finite to canonicalize
    Float(f64),
    /// UTF-8 string segment
    Str(String),
    /// Nested list of segments
    List(Vec<KeyPart>),
    /// String-keyed map of segments, ordered by key
    Map(BTreeMap<String, KeyPart>),
}

impl KeyPart {
    /// Builds a map part from `(name, part)` pairs.
    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<KeyPart>,
    {
        KeyPart::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    fn write_canonical(&self, out: &mut String) -> Result<()> {
        match self {
            KeyPart::Null => out.push_str("null"),
            KeyPart::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            KeyPart::Int(i) => {
                let _ = write!(out, "{}", i);
            }
            KeyPart::Float(f) => {
                if !f.is_finite() {
                    return Err(Error::invalid_key(alloc::format!(
                        "non-finite number {}",
                        f
                    )));
                }
                // -0.0 == 0.0, so both must write the same text
                let f = if *f == 0.0 { 0.0 } else { *f };
                let _ = write!(out, "{}", f);
            }
            KeyPart::Str(s) => write_quoted(s, out),
            KeyPart::List(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    item.write_canonical(out)?;
                }
                out.push(']');
            }
            KeyPart::Map(entries) => {
                out.push('{');
                for (i, (name, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    write_quoted(name, out);
                    out.push(':');
                    value.write_canonical(out)?;
                }
                out.push('}');
            }
        }
        Ok(())
    }
}

fn write_quoted(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

impl From<bool> for KeyPart {
    fn from(b: bool) -> Self {
        KeyPart::Bool(b)
    }
}

impl From<i32> for KeyPart {
    fn from(i: i32) -> Self {
        KeyPart::Int(i as i64)
    }
}

impl From<i64> for KeyPart {
    fn from(i: i64) -> Self {
        KeyPart::Int(i)
    }
}

impl From<u32> for KeyPart {
    fn from(i: u32) -> Self {
        KeyPart::Int(i as i64)
    }
}

impl From<f64> for KeyPart {
    fn from(f: f64) -> Self {
        KeyPart::Float(f)
    }
}

impl From<String> for KeyPart {
    fn from(s: String) -> Self {
        KeyPart::Str(s)
    }
}

impl From<&str> for KeyPart {
    fn from(s: &str) -> Self {
        KeyPart::Str(s.to_string())
    }
}

impl<T: Into<KeyPart>> From<Option<T>> for KeyPart {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => KeyPart::Null,
        }
    }
}

impl From<Vec<KeyPart>> for KeyPart {
    fn from(items: Vec<KeyPart>) -> Self {
        KeyPart::List(items)
    }
}

/// A structured query key: an ordered list of parts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryKey(Vec<KeyPart>);

impl QueryKey {
    /// Creates a key from a sequence of parts.
    pub fn new<P: Into<KeyPart>>(parts: impl IntoIterator<Item = P>) -> Self {
        Self(parts.into_iter().map(Into::into).collect())
    }

    /// Appends a part, builder style.
    pub fn with(mut self, part: impl Into<KeyPart>) -> Self {
        self.0.push(part.into());
        self
    }

    /// Returns the parts of this key.
    #[inline]
    pub fn parts(&self) -> &[KeyPart] {
        &self.0
    }

    /// Returns the number of parts.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the key has no parts.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Computes the canonical hash of this key.
    ///
    /// Fails with `Error::InvalidKey` if any part is a non-finite float.
    pub fn canonical_hash(&self) -> Result<QueryHash> {
        let mut out = String::new();
        out.push('[');
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            part.write_canonical(&mut out)?;
        }
        out.push(']');
        Ok(QueryHash::from(out))
    }
}

impl<P: Into<KeyPart>> FromIterator<P> for QueryKey {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Canonical identity of a normalized descriptor.
///
/// Cheap to clone; compared and hashed by content.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryHash(Rc<str>);

impl QueryHash {
    /// Returns the canonical string.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for QueryHash {
    fn from(s: String) -> Self {
        Self(Rc::from(s))
    }
}

impl From<&str> for QueryHash {
    fn from(s: &str) -> Self {
        Self(Rc::from(s))
    }
}

impl fmt::Display for QueryHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
