//! `EncryptionOptions`: the one value external collaborators hand the core
//! to start an encrypt call.

use crate::config::{MAX_CHUNK_SIZE_KB, MIN_CHUNK_SIZE_KB};
use crate::error::{Error, Result};

/// Caller-supplied parameters for one `encrypt_file` call.
///
/// `passphrase` is taken by value and should already be the only copy the
/// caller holds; [`crate::pipeline::encrypt::encrypt_file`] copies it into a
/// [`crate::secret::LockedBuffer`] as its first step, before any entropy is
/// spent or any directory is created.
#[derive(Clone)]
pub struct EncryptionOptions {
    pub passphrase: Vec<u8>,
    pub data_shards: usize,
    pub parity_shards: usize,
    pub chunk_size_kb: u32,
    pub argon2_time: u32,
    pub argon2_memory_kb: u32,
    pub argon2_threads: u8,
}

impl EncryptionOptions {
    /// Validates every field against its allowed range. Called as the first
    /// step of `encrypt_file`, before any entropy is spent or any directory
    /// is created.
    pub fn validate(&self) -> Result<()> {
        if self.passphrase.is_empty() {
            return Err(Error::InvalidOptions("passphrase must not be empty".into()));
        }
        if self.data_shards == 0 {
            return Err(Error::InvalidOptions("data_shards must be at least 1".into()));
        }
        if self.data_shards + self.parity_shards > 255 {
            return Err(Error::InvalidOptions("data_shards + parity_shards must not exceed 255 (GF(2^8))".into()));
        }
        if !(MIN_CHUNK_SIZE_KB..=MAX_CHUNK_SIZE_KB).contains(&self.chunk_size_kb) {
            return Err(Error::InvalidOptions(format!(
                "chunk_size_kb must be in [{MIN_CHUNK_SIZE_KB}, {MAX_CHUNK_SIZE_KB}], got {}",
                self.chunk_size_kb
            )));
        }
        if self.argon2_time == 0 {
            return Err(Error::InvalidOptions("argon2_time must be positive".into()));
        }
        if self.argon2_memory_kb == 0 {
            return Err(Error::InvalidOptions("argon2_memory_kb must be positive".into()));
        }
        if self.argon2_threads == 0 {
            return Err(Error::InvalidOptions("argon2_threads must be positive".into()));
        }
        Ok(())
    }
}
