//! Key storage with a small-string optimisation.
//!
//! Keys of up to [`INLINE_CAP`] bytes live inside the entry itself; longer
//! keys get their own heap allocation. The `Unset` state doubles as the
//! "empty bucket" marker, which is why the empty string is not a valid key.

use crate::error::TableError;
use core::cmp::Ordering;

/// Longest key stored without a heap allocation.
pub(crate) const INLINE_CAP: usize = 7;

#[derive(Default)]
pub(crate) enum Key {
    #[default]
    Unset,
    Inline {
        len: u8,
        buf: [u8; INLINE_CAP],
    },
    Heap(Box<str>),
}

impl Key {
    /// Build a key from `text`.
    ///
    /// Callers validate that `text` is non-empty and NUL-free; an empty
    /// `text` would produce an unset key.
    pub(crate) fn new(text: &str) -> Result<Self, TableError> {
        let bytes = text.as_bytes();
        if bytes.is_empty() {
            return Ok(Key::Unset);
        }
        if bytes.len() <= INLINE_CAP {
            let mut buf = [0u8; INLINE_CAP];
            buf[..bytes.len()].copy_from_slice(bytes);
            return Ok(Key::Inline {
                len: bytes.len() as u8,
                buf,
            });
        }
        let mut s = String::new();
        s.try_reserve_exact(bytes.len())?;
        s.push_str(text);
        Ok(Key::Heap(s.into_boxed_str()))
    }

    #[inline]
    pub(crate) fn is_set(&self) -> bool {
        !matches!(self, Key::Unset)
    }

    /// Text of the active form; empty when unset.
    pub(crate) fn as_str(&self) -> &str {
        match self {
            Key::Unset => "",
            // `buf[..len]` is a copy of a whole `&str`, so this never falls back.
            Key::Inline { len, buf } => {
                core::str::from_utf8(&buf[..usize::from(*len)]).unwrap_or_default()
            }
            Key::Heap(s) => s,
        }
    }

    /// Three-way byte-wise comparison against `text`.
    #[inline]
    pub(crate) fn compare(&self, text: &str) -> Ordering {
        self.as_str().as_bytes().cmp(text.as_bytes())
    }

    /// Release any heap storage and return to the unset state.
    pub(crate) fn clear(&mut self) {
        *self = Key::Unset;
    }

    #[cfg(test)]
    fn is_inline(&self) -> bool {
        matches!(self, Key::Inline { .. })
    }
}

impl core::fmt::Debug for Key {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Key::Unset => f.write_str("<unset>"),
            _ => self.as_str().fmt(f),
        }
    }
}
