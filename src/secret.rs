//! Scoped, zeroize-on-drop byte buffers for master keys and data keys.
//!
//! Every master key (MK) and data key (DK) in the pipeline is held inside a
//! [`LockedBuffer`] for its entire lifetime. The buffer zeroizes its contents
//! when dropped, on every exit path including error paths, because `Drop`
//! always runs during unwinding from a `?`-propagated error.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use zeroize::Zeroize;

/// A byte buffer that is zeroized when it goes out of scope.
///
/// A scoped resource with three operations: construct from bytes (wiping the
/// source), borrow a read-only view, and destroy. Page-locking against swap
/// (`mlock`) is not implemented; this buffer only guarantees zeroization.
pub struct LockedBuffer {
    data: Vec<u8>,
}

impl LockedBuffer {
    /// Takes ownership of `buf`'s contents, leaving `buf` empty.
    ///
    /// The allocation backing `buf` moves into the new `LockedBuffer`
    /// instead of being copied, so at no point does a second copy of the
    /// secret exist outside of this buffer.
    pub fn from_bytes(mut buf: Vec<u8>) -> Self {
        let data = std::mem::take(&mut buf);
        buf.zeroize();
        Self { data }
    }

    /// Copies `bytes` into a new locked buffer, without requiring the
    /// caller to give up ownership of their slice.
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self { data: bytes.to_vec() }
    }

    /// Creates a locked buffer of `len` zero bytes, for callers that want to
    /// fill it in place (e.g. as a KDF output buffer).
    pub fn zeroed(len: usize) -> Self {
        Self { data: vec![0u8; len] }
    }

    /// Mutable access, for callers (e.g. the KDF) that write into the buffer
    /// in place rather than constructing it from an existing `Vec`.
    pub fn borrow_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// A read-only view of the secret bytes.
    #[must_use]
    pub fn borrow(&self) -> &[u8] {
        &self.data
    }

    /// Number of bytes held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the buffer holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Explicitly consumes and zeroizes the buffer.
    ///
    /// `Drop` already zeroizes unconditionally, so this only exists to make
    /// the destruction point visible at call sites that want to document
    /// "this key's job is done now" (e.g. right after wrapping a data key).
    pub fn destroy(self) {
        drop(self);
    }
}

impl Drop for LockedBuffer {
    fn drop(&mut self) {
        self.data.zeroize();
    }
}

impl Debug for LockedBuffer {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("LockedBuffer([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bytes_empties_source() {
        let mut source = vec![1, 2, 3, 4];
        let locked = LockedBuffer::from_bytes(std::mem::take(&mut source));
        assert!(source.is_empty());
        assert_eq!(locked.borrow(), &[1, 2, 3, 4]);
    }

    #[test]
    fn from_slice_copies() {
        let source = [9u8; 8];
        let locked = LockedBuffer::from_slice(&source);
        assert_eq!(locked.borrow(), &source);
    }

    #[test]
    fn debug_does_not_leak() {
        let locked = LockedBuffer::from_slice(b"top secret");
        assert_eq!(format!("{locked:?}"), "LockedBuffer([REDACTED])");
    }

    #[test]
    fn zeroed_has_requested_length() {
        let locked = LockedBuffer::zeroed(32);
        assert_eq!(locked.len(), 32);
        assert!(locked.borrow().iter().all(|&b| b == 0));
    }
}
