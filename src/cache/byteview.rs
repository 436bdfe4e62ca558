//! Byte View Module
//!
//! Immutable holder for cached bytes.

use std::borrow::Cow;
use std::fmt;

use bytes::Bytes;

use crate::cache::Value;

// == Byte View ==
/// Immutable view over a cached value.
///
/// The bytes are never mutated after construction. Accessors that hand out
/// the content return owned copies, so callers cannot reach into the cache.
/// Cloning a view is cheap: the underlying buffer is reference counted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ByteView {
    b: Bytes,
}

impl ByteView {
    /// Returns the number of bytes held by the view.
    pub fn len(&self) -> usize {
        self.b.len()
    }

    pub fn is_empty(&self) -> bool {
        self.b.is_empty()
    }

    // == Byte Slice ==
    /// Returns an independently owned copy of the bytes.
    pub fn byte_slice(&self) -> Vec<u8> {
        self.b.to_vec()
    }

    // == As Text ==
    /// Returns the bytes as text. Invalid UTF-8 is replaced, not rejected.
    pub fn as_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.b)
    }
}

impl Value for ByteView {
    fn byte_len(&self) -> usize {
        self.len()
    }
}

impl fmt::Display for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(v: Vec<u8>) -> Self {
        Self { b: Bytes::from(v) }
    }
}

impl From<&[u8]> for ByteView {
    fn from(v: &[u8]) -> Self {
        Self {
            b: Bytes::copy_from_slice(v),
        }
    }
}

impl From<String> for ByteView {
    fn from(s: String) -> Self {
        Self::from(s.into_bytes())
    }
}

impl From<&str> for ByteView {
    fn from(s: &str) -> Self {
        Self::from(s.as_bytes())
    }
}
