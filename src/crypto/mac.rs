//! HMAC-SHA256 signing and constant-time verification (components C1, C4).
//!
//! Used for one purpose in this crate: signing the canonical manifest
//! encoding under the raw master-key bytes. Key handling is unified to a
//! single path: the key is always borrowed from a [`crate::secret::LockedBuffer`]
//! for the duration of one call, never copied out to a standalone owned
//! buffer.

use hmac::{Hmac, Mac as _};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::config::MAC_SIZE;
use crate::error::{Error, Result};

/// Computes HMAC-SHA256 of `data` keyed by `key`.
pub fn sign(data: &[u8], key: &[u8]) -> Result<[u8; MAC_SIZE]> {
    let mut mac = Hmac::<Sha256>::new_from_slice(key)
        .map_err(|e| Error::InvalidOptions(format!("invalid HMAC key: {e}")))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().into())
}

/// Verifies `tag` against the HMAC-SHA256 of `data` keyed by `key`.
///
/// Returns `false` on any mismatch (wrong length or wrong bytes) and never
/// panics or raises — the caller decides how to surface the failure.
#[must_use]
pub fn verify(data: &[u8], tag: &[u8], key: &[u8]) -> bool {
    let Ok(computed) = sign(data, key) else {
        return false;
    };
    if tag.len() != MAC_SIZE {
        return false;
    }
    bool::from(computed.ct_eq(tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_verify_roundtrip() {
        let key = b"0123456789abcdef0123456789abcdef";
        let data = b"manifest bytes go here";
        let tag = sign(data, key).unwrap();
        assert!(verify(data, &tag, key));
    }

    #[test]
    fn verify_rejects_tampered_data() {
        let key = b"key material";
        let tag = sign(b"original", key).unwrap();
        assert!(!verify(b"tampered!", &tag, key));
    }

    #[test]
    fn verify_rejects_wrong_key() {
        let tag = sign(b"data", b"key one").unwrap();
        assert!(!verify(b"data", &tag, b"key two"));
    }

    #[test]
    fn verify_rejects_wrong_length_tag() {
        let key = b"key";
        assert!(!verify(b"data", &[0u8; 4], key));
    }
}
