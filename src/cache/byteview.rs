//! Byte View Module
//!
//! Immutable snapshot of a cached value.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::cache::ByteSize;

// == Byte View ==
/// An immutable view of a value's bytes.
///
/// Cloning a `ByteView` shares the underlying buffer; since the buffer can
/// never be written through a `ByteView`, every clone observes the same bytes
/// for as long as it lives.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ByteView {
    b: Arc<[u8]>,
}

impl ByteView {
    // == Constructor ==
    /// Creates a view by copying `bytes`, so later writes to the source
    /// buffer are not observed.
    pub fn copy_from(bytes: &[u8]) -> Self {
        Self { b: Arc::from(bytes) }
    }

    // == Length ==
    /// Returns the view's length in bytes.
    pub fn len(&self) -> usize {
        self.b.len()
    }

    /// Returns true if the view holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.b.is_empty()
    }

    // == Byte Slice ==
    /// Returns a mutable copy of the data.
    pub fn byte_slice(&self) -> Vec<u8> {
        self.b.to_vec()
    }

    // == String View ==
    /// Returns the data as text, replacing invalid UTF-8 sequences.
    pub fn as_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.b)
    }
}

/// Takes ownership of `bytes` without an intermediate copy by the caller.
impl From<Vec<u8>> for ByteView {
    fn from(bytes: Vec<u8>) -> Self {
        Self { b: bytes.into() }
    }
}

impl From<&str> for ByteView {
    fn from(s: &str) -> Self {
        Self::copy_from(s.as_bytes())
    }
}

impl AsRef<[u8]> for ByteView {
    fn as_ref(&self) -> &[u8] {
        &self.b
    }
}

impl ByteSize for ByteView {
    fn byte_size(&self) -> usize {
        self.len()
    }
}

impl fmt::Display for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}

impl fmt::Debug for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteView")
            .field("len", &self.len())
            .field("value", &self.as_str())
            .finish()
    }
}
