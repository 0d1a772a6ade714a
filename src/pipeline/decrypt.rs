//! Decrypt pipeline (component C6), the dual of
//! [`crate::pipeline::encrypt::encrypt_file`].

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::SALT_LEN;
use crate::crypto::{aead, kdf};
use crate::erasure::ErasureCoder;
use crate::error::{Error, Result};
use crate::secret::LockedBuffer;
use crate::storage;

/// Decrypts the manifest named `manifest_id` under `storage_dir`, writing
/// the recovered plaintext to `output_path`.
///
/// If `output_path` is empty or names an existing directory, the decrypted
/// original basename is appended to it; otherwise `output_path` is used
/// verbatim.
pub fn decrypt_file(manifest_id: &str, storage_dir: &Path, output_path: &Path, passphrase: &[u8]) -> Result<()> {
    let passphrase = LockedBuffer::from_slice(passphrase);

    let dir = storage::manifest_dir(storage_dir, manifest_id);
    let manifest = storage::read_manifest(&dir)?;
    info!(manifest_id = %manifest_id, "starting decrypt");

    let mut salt = [0u8; SALT_LEN];
    if manifest.salt.len() != SALT_LEN {
        return Err(Error::InvalidOptions(format!("manifest salt must be {SALT_LEN} bytes, got {}", manifest.salt.len())));
    }
    salt.copy_from_slice(&manifest.salt);
    let mk = kdf::derive_key(passphrase.borrow(), &salt, manifest.argon2_time, manifest.argon2_memory_kb, manifest.argon2_threads)?;
    passphrase.destroy();

    manifest.verify(mk.borrow())?;

    let mk_array: &[u8; 32] = mk.borrow().try_into().map_err(|_| Error::InvalidOptions("master key is not 32 bytes".into()))?;
    let orig_filename_bytes = aead::open(&manifest.encrypted_orig_filename, mk_array)?;
    let orig_filename = String::from_utf8(orig_filename_bytes).map_err(|e| Error::DecryptionFailed(format!("original filename is not valid UTF-8: {e}")))?;

    let resolved_path = resolve_output_path(output_path, &orig_filename);
    let mut out = File::create(&resolved_path)?;

    let coder = ErasureCoder::new(manifest.data_shards, manifest.parity_shards)?;

    for (index, chunk_base) in manifest.chunk_bases.iter().enumerate() {
        let suffixes = &manifest.shard_suffixes[index];
        let mut shards: Vec<Option<Vec<u8>>> = Vec::with_capacity(suffixes.len());
        for suffix in suffixes {
            let path = storage::shard_file_path(storage_dir, manifest_id, chunk_base, suffix);
            shards.push(storage::read_shard(&path)?);
        }

        let present = shards.iter().filter(|s| s.is_some()).count();
        if present < coder.data_shards() {
            return Err(Error::InsufficientShards { chunk_index: index, needed: coder.data_shards(), have: present });
        }

        if !coder.verify(&shards)? {
            coder.reconstruct(&mut shards, index)?;
        }
        let shards: Vec<Vec<u8>> = shards.into_iter().map(|s| s.expect("reconstruct fills every slot")).collect();

        let ecb_len = manifest.encrypted_chunk_sizes[index] as usize;
        let ecb = coder.join(&shards, ecb_len)?;

        let wrapped_dk = &manifest.encrypted_data_keys[index];
        let dk_bytes = aead::open(wrapped_dk, mk_array).map_err(|_| Error::ChunkAuthFailed { chunk_index: index })?;
        let dk = LockedBuffer::from_bytes(dk_bytes);
        let dk_array: &[u8; 32] = dk.borrow().try_into().map_err(|_| Error::InvalidOptions("data key is not 32 bytes".into()))?;

        let plaintext = aead::open(&ecb, dk_array).map_err(|_| Error::ChunkAuthFailed { chunk_index: index })?;
        dk.destroy();
        out.write_all(&plaintext)?;
        debug!(chunk_index = index, plaintext_len = plaintext.len(), "wrote chunk plaintext");
    }

    out.flush()?;
    mk.destroy();

    info!(manifest_id = %manifest_id, output = %resolved_path.display(), "decrypt complete");
    Ok(())
}

fn resolve_output_path(output_path: &Path, orig_filename: &str) -> PathBuf {
    let is_dir = output_path.as_os_str().is_empty() || fs::metadata(output_path).map(|m| m.is_dir()).unwrap_or(false);
    if is_dir {
        output_path.join(orig_filename)
    } else {
        output_path.to_path_buf()
    }
}
