//! Encrypt pipeline (component C5).
//!
//! Orchestrates C1-C4: derive key, walk the input chunk by chunk, write
//! shards as they are produced, then build and sign the manifest. Chunks are
//! processed in a plain loop, one at a time, with no worker thread pool.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::{debug, info};

use crate::chunker::Chunker;
use crate::config::SALT_LEN;
use crate::crypto::{aead, kdf, random};
use crate::erasure::ErasureCoder;
use crate::error::{Error, Result};
use crate::manifest::Manifest;
use crate::options::EncryptionOptions;
use crate::secret::LockedBuffer;
use crate::storage;

/// Encrypts the file at `local_path` into a new manifest directory under
/// `storage_dir`, returning the freshly generated `manifest_id`.
///
/// On any error after the manifest directory is created, the partially
/// written directory is left in place; the core does not roll back.
pub fn encrypt_file(local_path: &Path, storage_dir: &Path, options: &EncryptionOptions) -> Result<String> {
    options.validate()?;
    let passphrase = LockedBuffer::from_slice(&options.passphrase);

    let manifest_id = random::generate_manifest_id()?;
    let dir = storage::manifest_dir(storage_dir, &manifest_id);
    storage::create_manifest_dir(&dir)?;
    info!(manifest_id = %manifest_id, path = %local_path.display(), "starting encrypt");

    let salt: [u8; SALT_LEN] = random::generate_salt()?;
    let mk = kdf::derive_key(passphrase.borrow(), &salt, options.argon2_time, options.argon2_memory_kb, options.argon2_threads)?;
    passphrase.destroy();

    let coder = ErasureCoder::new(options.data_shards, options.parity_shards)?;
    let reader = BufReader::new(File::open(local_path)?);
    let chunker = Chunker::new(reader, options.chunk_size_kb);

    let mut chunk_bases = Vec::new();
    let mut shard_suffixes = Vec::new();
    let mut encrypted_chunk_sizes = Vec::new();
    let mut encrypted_data_keys = Vec::new();

    for item in chunker {
        let (index, data) = item?;
        let dk = LockedBuffer::from_bytes(random::random_bytes::<32>()?.to_vec());

        let ecb = aead::seal(&data, dk.borrow().try_into().map_err(|_| Error::InvalidOptions("data key is not 32 bytes".into()))?)?;
        let wrapped_dk = aead::seal(dk.borrow(), mk.borrow().try_into().map_err(|_| Error::InvalidOptions("master key is not 32 bytes".into()))?)?;
        dk.destroy();

        let shards = coder.encode(&ecb)?;
        let chunk_base = format!("chunk_{index}");
        let mut suffixes = Vec::with_capacity(shards.len());
        for (k, shard) in shards.iter().enumerate() {
            let suffix = format!("_shard_{k}.dat");
            storage::write_shard(&storage::shard_file_path(storage_dir, &manifest_id, &chunk_base, &suffix), shard)?;
            suffixes.push(suffix);
        }
        debug!(chunk_index = index, chunk_len = data.len(), shard_count = shards.len(), "wrote chunk shards");

        chunk_bases.push(chunk_base);
        shard_suffixes.push(suffixes);
        encrypted_chunk_sizes.push(ecb.len() as u64);
        encrypted_data_keys.push(wrapped_dk);
    }

    let basename = local_path
        .file_name()
        .ok_or_else(|| Error::InvalidOptions("input path has no file name component".into()))?
        .to_string_lossy();
    let encrypted_orig_filename = aead::seal(basename.as_bytes(), mk.borrow().try_into().map_err(|_| Error::InvalidOptions("master key is not 32 bytes".into()))?)?;

    let mut manifest = Manifest {
        salt: salt.to_vec(),
        argon2_time: options.argon2_time,
        argon2_memory_kb: options.argon2_memory_kb,
        argon2_threads: options.argon2_threads,
        data_shards: options.data_shards,
        parity_shards: options.parity_shards,
        chunk_bases,
        shard_suffixes,
        encrypted_chunk_sizes,
        encrypted_data_keys,
        encrypted_orig_filename,
        signature: None,
    };
    manifest.sign(mk.borrow())?;
    storage::write_manifest(&dir, &manifest)?;
    mk.destroy();

    info!(manifest_id = %manifest_id, chunk_count = manifest.chunk_bases.len(), "encrypt complete");
    Ok(manifest_id)
}
