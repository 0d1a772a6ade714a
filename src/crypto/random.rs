//! Cryptographically secure randomness (component C1, `RandomBytes`).

use rand::Rng;

use crate::config::{MANIFEST_ID_LEN, SALT_LEN};
use crate::error::Result;

/// Fills an `N`-byte array with bytes from the OS CSPRNG.
///
/// `rand`'s default generator panics rather than returning an error if the
/// OS entropy source is unavailable; the `Result` here exists so
/// `EntropyUnavailable` has somewhere to live if a future generator swap
/// exposes a fallible path.
pub fn random_bytes<const N: usize>() -> Result<[u8; N]> {
    let mut bytes = [0u8; N];
    rand::rng().fill(&mut bytes);
    Ok(bytes)
}

/// Generates a fresh per-manifest salt for key derivation.
pub fn generate_salt() -> Result<[u8; SALT_LEN]> {
    random_bytes()
}

/// Generates a fresh `manifest_id`: lowercase hex of 16 random bytes.
pub fn generate_manifest_id() -> Result<String> {
    let bytes: [u8; MANIFEST_ID_LEN] = random_bytes()?;
    Ok(hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_bytes_are_not_constant() {
        let a: [u8; 32] = random_bytes().unwrap();
        let b: [u8; 32] = random_bytes().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn manifest_id_is_32_hex_chars() {
        let id = generate_manifest_id().unwrap();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn salt_has_expected_length() {
        let salt = generate_salt().unwrap();
        assert_eq!(salt.len(), SALT_LEN);
    }
}
