//! Cryptographic and format constants.
//!
//! Single source of truth for the on-disk format so that every module
//! agrees on sizes without repeating magic numbers.

/// Size of the AES-256-GCM key in bytes.
pub const KEY_SIZE: usize = 32;

/// Size of the AES-GCM nonce in bytes (96 bits, NIST SP 800-38D).
pub const NONCE_SIZE: usize = 12;

/// Size of the AES-GCM authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

/// Size of the Argon2id-derived master key in bytes.
pub const ARGON_KEY_LEN: usize = KEY_SIZE;

/// Size of the per-manifest random salt in bytes.
pub const SALT_LEN: usize = 16;

/// Size of the random bytes used to build a `manifest_id` (32 hex chars).
pub const MANIFEST_ID_LEN: usize = 16;

/// Size of the HMAC-SHA256 signature in bytes.
pub const MAC_SIZE: usize = 32;

/// Minimum permitted average chunk size, in KiB.
pub const MIN_CHUNK_SIZE_KB: u32 = 64;

/// Maximum permitted average chunk size, in KiB.
pub const MAX_CHUNK_SIZE_KB: u32 = 16384;

/// Fixed Rabin polynomial used by the content-defined chunker.
///
/// Tuned for a 1 MiB average chunk size. Do not change without a migration
/// plan: chunk boundaries are consumer-visible through `encrypted_chunk_sizes`.
pub const CHUNK_POLYNOMIAL: u64 = 0x3DA3_358B_4DC1_73;

/// Default name of the persisted manifest file inside a manifest directory.
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Unix permission bits applied to a freshly created manifest directory.
pub const MANIFEST_DIR_MODE: u32 = 0o755;

/// Unix permission bits applied to manifest and shard files.
pub const MANIFEST_FILE_MODE: u32 = 0o644;
