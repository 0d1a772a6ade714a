//! AES-256-GCM authenticated encryption (seal/open, component C1).
//!
//! Output format: `nonce(12) || ciphertext || tag(16)`. A fresh random
//! nonce is drawn for every seal; with 96-bit random nonces and single-use
//! data keys, nonce collision within one key's lifetime is negligible.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};

use crate::config::{KEY_SIZE, NONCE_SIZE, TAG_SIZE};
use crate::crypto::random::random_bytes;
use crate::error::{Error, Result};

/// Encrypts `plaintext` under `key`, returning `nonce || ciphertext || tag`.
///
/// An empty plaintext is permitted (e.g. sealing a zero-length chunk would
/// never reach here in practice, since the chunker never emits empty
/// chunks for non-empty input, but the filename-sealing call path is not
/// length-constrained by the chunker).
pub fn seal(plaintext: &[u8], key: &[u8; KEY_SIZE]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key).expect("key is exactly KEY_SIZE bytes");

    let nonce_bytes: [u8; NONCE_SIZE] = random_bytes()?;
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| Error::InvalidOptions(format!("AEAD seal failed: {e}")))?;

    let mut out = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    out.extend_from_slice(&nonce_bytes);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Decrypts a `nonce || ciphertext || tag` blob produced by [`seal`].
///
/// Never returns unauthenticated plaintext: any tag mismatch or malformed
/// input yields an error and no bytes.
pub fn open(blob: &[u8], key: &[u8; KEY_SIZE]) -> Result<Vec<u8>> {
    if blob.len() < NONCE_SIZE + TAG_SIZE {
        return Err(Error::DecryptionFailed(format!(
            "ciphertext too short: need at least {} bytes, got {}",
            NONCE_SIZE + TAG_SIZE,
            blob.len()
        )));
    }

    let cipher = Aes256Gcm::new_from_slice(key).expect("key is exactly KEY_SIZE bytes");
    let (nonce_bytes, ciphertext) = blob.split_at(NONCE_SIZE);
    let nonce = Nonce::from_slice(nonce_bytes);

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| Error::DecryptionFailed("AEAD authentication failed".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let key = [7u8; KEY_SIZE];
        let plaintext = b"hello, shardcrypt";
        let blob = seal(plaintext, &key).unwrap();
        assert_eq!(open(&blob, &key).unwrap(), plaintext);
    }

    #[test]
    fn nonce_is_random_per_call() {
        let key = [1u8; KEY_SIZE];
        let a = seal(b"same plaintext", &key).unwrap();
        let b = seal(b"same plaintext", &key).unwrap();
        assert_ne!(&a[..12], &b[..12], "nonces must differ across calls");
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let key = [2u8; KEY_SIZE];
        let mut blob = seal(b"authenticated data", &key).unwrap();
        let last = blob.len() - 1;
        blob[last] ^= 0xFF;
        assert!(open(&blob, &key).is_err());
    }

    #[test]
    fn too_short_blob_fails() {
        let key = [3u8; KEY_SIZE];
        assert!(open(&[0u8; NONCE_SIZE + TAG_SIZE - 1], &key).is_err());
    }

    #[test]
    fn wrong_key_fails() {
        let key_a = [4u8; KEY_SIZE];
        let key_b = [5u8; KEY_SIZE];
        let blob = seal(b"secret", &key_a).unwrap();
        assert!(open(&blob, &key_b).is_err());
    }
}
