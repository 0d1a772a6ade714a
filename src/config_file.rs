//! YAML configuration file loading (external collaborator, not part of the
//! core, consumed by the CLI binary to build an `EncryptionOptions`).

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use shardcrypt::config::{MAX_CHUNK_SIZE_KB, MIN_CHUNK_SIZE_KB};
use shardcrypt::error::{Error, Result};

#[derive(Debug, Deserialize)]
pub struct Argon2Config {
    pub time: u32,
    pub memory_kb: u32,
    pub threads: u8,
}

/// Everything an operator configures ahead of time: shard counts, chunk
/// size, KDF cost, and where manifests land on disk.
#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    pub chunk_size_kb: u32,
    pub data_shards: usize,
    pub parity_shards: usize,
    pub argon2: Argon2Config,
    pub storage_path: PathBuf,
}

impl ConfigFile {
    /// Loads and validates a YAML config file. Rejects non-positive values.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&text).map_err(|e| Error::InvalidOptions(format!("invalid config file {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.data_shards == 0 {
            return Err(Error::InvalidOptions("data_shards must be at least 1".into()));
        }
        if !(MIN_CHUNK_SIZE_KB..=MAX_CHUNK_SIZE_KB).contains(&self.chunk_size_kb) {
            return Err(Error::InvalidOptions(format!(
                "chunk_size_kb must be in [{MIN_CHUNK_SIZE_KB}, {MAX_CHUNK_SIZE_KB}], got {}",
                self.chunk_size_kb
            )));
        }
        if self.argon2.time == 0 || self.argon2.memory_kb == 0 || self.argon2.threads == 0 {
            return Err(Error::InvalidOptions("argon2.time, argon2.memory_kb, and argon2.threads must all be positive".into()));
        }
        Ok(())
    }
}
