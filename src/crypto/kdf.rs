//! Argon2id key derivation (component C1, `KDF`).

use argon2::{Algorithm, Argon2, Params, Version};

use crate::config::{ARGON_KEY_LEN, SALT_LEN};
use crate::error::{Error, Result};
use crate::secret::LockedBuffer;

/// Derives a 32-byte master key from `passphrase` and `salt` using Argon2id.
///
/// `time`, `memory_kb`, and `threads` must all be strictly positive; out of
/// range values are a precondition failure (`InvalidOptions`), not a runtime
/// condition the KDF can recover from.
pub fn derive_key(
    passphrase: &[u8],
    salt: &[u8; SALT_LEN],
    time: u32,
    memory_kb: u32,
    threads: u8,
) -> Result<LockedBuffer> {
    if time == 0 || memory_kb == 0 || threads == 0 {
        return Err(Error::InvalidOptions(
            "argon2 time, memory_kb, and threads must all be positive".into(),
        ));
    }

    let params = Params::new(memory_kb, time, u32::from(threads), Some(ARGON_KEY_LEN))
        .map_err(|e| Error::InvalidOptions(format!("invalid Argon2 parameters: {e}")))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = LockedBuffer::zeroed(ARGON_KEY_LEN);
    argon2
        .hash_password_into(passphrase, salt, key.borrow_mut())
        .map_err(|e| Error::InvalidOptions(format!("key derivation failed: {e}")))?;

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_key_is_deterministic() {
        let salt = [0u8; SALT_LEN];
        let k1 = derive_key(b"correct horse", &salt, 1, 8 * 1024, 1).unwrap();
        let k2 = derive_key(b"correct horse", &salt, 1, 8 * 1024, 1).unwrap();
        assert_eq!(k1.borrow(), k2.borrow());
    }

    #[test]
    fn different_salt_changes_key() {
        let k1 = derive_key(b"same password", &[0u8; SALT_LEN], 1, 8 * 1024, 1).unwrap();
        let k2 = derive_key(b"same password", &[1u8; SALT_LEN], 1, 8 * 1024, 1).unwrap();
        assert_ne!(k1.borrow(), k2.borrow());
    }

    #[test]
    fn zero_time_is_rejected() {
        assert!(derive_key(b"pw", &[0u8; SALT_LEN], 0, 8 * 1024, 1).is_err());
    }

    #[test]
    fn output_length_matches_key_size() {
        let key = derive_key(b"pw", &[0u8; SALT_LEN], 1, 8 * 1024, 1).unwrap();
        assert_eq!(key.len(), ARGON_KEY_LEN);
    }
}
