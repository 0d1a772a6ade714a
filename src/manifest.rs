//! Manifest model and codec (component C4).
//!
//! A manifest is the single per-file record binding the salt, KDF
//! parameters, shard layout, and wrapped data keys together, and an
//! HMAC-SHA256 signature over all of the above keyed by the master key. See
//! [`Manifest::canonical_bytes`] for the signing encoding and
//! [`Manifest::to_pretty_json`] for the persisted encoding.

use std::io;

use serde::{Deserialize, Serialize};

use crate::crypto::mac;
use crate::error::{Error, Result};

/// Per-file metadata record. Field order is the field declaration order
/// below, and `serde_json` preserves struct field order when serializing a
/// struct (as opposed to a map), which is what makes [`Self::canonical_bytes`]
/// byte-deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(with = "base64_bytes")]
    pub salt: Vec<u8>,
    pub argon2_time: u32,
    pub argon2_memory_kb: u32,
    pub argon2_threads: u8,
    pub data_shards: usize,
    pub parity_shards: usize,
    pub chunk_bases: Vec<String>,
    pub shard_suffixes: Vec<Vec<String>>,
    pub encrypted_chunk_sizes: Vec<u64>,
    #[serde(with = "base64_bytes::vec")]
    pub encrypted_data_keys: Vec<Vec<u8>>,
    #[serde(with = "base64_bytes")]
    pub encrypted_orig_filename: Vec<u8>,
    #[serde(skip_serializing_if = "Option::is_none", default, with = "base64_bytes::option")]
    pub signature: Option<Vec<u8>>,
}

impl Manifest {
    /// Encodes this manifest with `signature` always absent, in the
    /// non-pretty form used both to produce and to verify the signature.
    /// Called on the struct both before a signature exists and after, so
    /// signing and verification always agree on what was signed.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>> {
        let mut unsigned = self.clone();
        unsigned.signature = None;
        serde_json::to_vec(&unsigned).map_err(json_err)
    }

    /// Signs this manifest under `mk` (raw master key bytes) and stores the
    /// resulting tag in `signature`.
    pub fn sign(&mut self, mk: &[u8]) -> Result<()> {
        let bytes = self.canonical_bytes()?;
        let tag = mac::sign(&bytes, mk)?;
        self.signature = Some(tag.to_vec());
        Ok(())
    }

    /// Verifies the stored `signature` against `mk`. A missing signature is
    /// as much a failure as a mismatched one.
    pub fn verify(&self, mk: &[u8]) -> Result<()> {
        let Some(signature) = &self.signature else {
            return Err(Error::ManifestAuthFailed);
        };
        let bytes = self.canonical_bytes()?;
        if mac::verify(&bytes, signature, mk) {
            Ok(())
        } else {
            Err(Error::ManifestAuthFailed)
        }
    }

    /// Pretty-printed encoding used for the persisted `manifest.json`.
    /// `signature` must already be populated (see [`Self::sign`]).
    pub fn to_pretty_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(json_err)
    }

    /// Parses a persisted manifest.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(json_err)
    }
}

fn json_err(e: serde_json::Error) -> Error {
    Error::Io(io::Error::other(format!("manifest codec error: {e}")))
}

/// Serde helper serializing byte buffers as base64 strings: every
/// byte-valued field is base64-encoded by the textual encoder.
mod base64_bytes {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD.decode(&text).map_err(serde::de::Error::custom)
    }

    /// Same encoding applied element-wise to a `Vec<Vec<u8>>`
    /// (`encrypted_data_keys`, one wrapped data key per chunk).
    pub mod vec {
        use base64::Engine as _;
        use base64::engine::general_purpose::STANDARD;
        use serde::{Deserialize, Deserializer, Serialize, Serializer};

        pub fn serialize<S: Serializer>(values: &[Vec<u8>], serializer: S) -> std::result::Result<S::Ok, S::Error> {
            let encoded: Vec<String> = values.iter().map(|v| STANDARD.encode(v)).collect();
            encoded.serialize(serializer)
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Vec<Vec<u8>>, D::Error> {
            let encoded: Vec<String> = Vec::deserialize(deserializer)?;
            encoded
                .into_iter()
                .map(|s| STANDARD.decode(&s).map_err(serde::de::Error::custom))
                .collect()
        }
    }

    /// Same encoding applied to an `Option<Vec<u8>>` (`signature`), omitted
    /// entirely rather than serialized as `null` when absent.
    pub mod option {
        use base64::Engine as _;
        use base64::engine::general_purpose::STANDARD;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(value: &Option<Vec<u8>>, serializer: S) -> std::result::Result<S::Ok, S::Error> {
            match value {
                Some(bytes) => serializer.serialize_str(&STANDARD.encode(bytes)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<Vec<u8>>, D::Error> {
            let text: Option<String> = Option::deserialize(deserializer)?;
            text.map(|s| STANDARD.decode(&s).map_err(serde::de::Error::custom)).transpose()
        }
    }
}
