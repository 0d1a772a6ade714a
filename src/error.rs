//! Error taxonomy for the encrypt/decrypt core.
//!
//! Callers that need to distinguish, say, a wrong passphrase from a
//! corrupted shard can match on the variant instead of parsing message text.

use std::io;

use thiserror::Error;

/// Errors produced by the core encrypt/decrypt pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// A filesystem read or write failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The OS random number generator failed to produce entropy.
    #[error("entropy unavailable: {0}")]
    EntropyUnavailable(String),

    /// An `EncryptionOptions` value (or config-derived value) was out of range.
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// The content-defined chunker failed for a reason other than I/O.
    #[error("chunking error: {0}")]
    Chunking(String),

    /// Reed-Solomon split/encode failed (a precondition violation, not a
    /// recoverable runtime condition).
    #[error("erasure code error: {0}")]
    ErasureCode(String),

    /// Fewer than `N` shards were present for a chunk at decrypt time.
    #[error("insufficient shards for chunk {chunk_index}: need {needed}, have {have}")]
    InsufficientShards {
        chunk_index: usize,
        needed: usize,
        have: usize,
    },

    /// Reed-Solomon reconstruction was attempted but failed.
    #[error("reconstruction failed for chunk {chunk_index}")]
    ReconstructFailed { chunk_index: usize },

    /// The manifest's HMAC signature did not match. Indistinguishable from a
    /// wrong passphrase: both fail key derivation's downstream check the
    /// same way.
    #[error("manifest authentication failed")]
    ManifestAuthFailed,

    /// An AEAD tag mismatch on a chunk ciphertext or a wrapped data key.
    #[error("chunk authentication failed for chunk {chunk_index}")]
    ChunkAuthFailed { chunk_index: usize },

    /// AEAD failure while decrypting the original filename.
    #[error("decryption failed: {0}")]
    DecryptionFailed(String),
}

/// Convenience alias used throughout the core crate.
pub type Result<T> = std::result::Result<T, Error>;
