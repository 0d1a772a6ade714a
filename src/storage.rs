//! Manifest directory layout helpers, shared by the encrypt and decrypt
//! pipelines.
//!
//! ```text
//! <storage_dir>/<manifest_id>/
//!     manifest.json
//!     chunk_<i>_shard_<k>.dat
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{MANIFEST_DIR_MODE, MANIFEST_FILE_MODE, MANIFEST_FILE_NAME};
use crate::error::Result;
use crate::manifest::Manifest;

/// `<storage_dir>/<manifest_id>/`.
pub fn manifest_dir(storage_dir: &Path, manifest_id: &str) -> PathBuf {
    storage_dir.join(manifest_id)
}

/// `<storage_dir>/<manifest_id>/manifest.json`.
pub fn manifest_file_path(storage_dir: &Path, manifest_id: &str) -> PathBuf {
    manifest_dir(storage_dir, manifest_id).join(MANIFEST_FILE_NAME)
}

/// `<storage_dir>/<manifest_id>/<chunk_base><shard_suffix>`, e.g.
/// `chunk_0_shard_3.dat`.
pub fn shard_file_path(storage_dir: &Path, manifest_id: &str, chunk_base: &str, shard_suffix: &str) -> PathBuf {
    manifest_dir(storage_dir, manifest_id).join(format!("{chunk_base}{shard_suffix}"))
}

/// Creates the manifest directory with mode 0755 (a no-op on platforms
/// without POSIX permission bits).
pub fn create_manifest_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    set_mode(dir, MANIFEST_DIR_MODE)?;
    Ok(())
}

/// Writes the already-signed manifest, pretty-printed, with mode 0644.
pub fn write_manifest(dir: &Path, manifest: &Manifest) -> Result<()> {
    let path = dir.join(MANIFEST_FILE_NAME);
    fs::write(&path, manifest.to_pretty_json()?)?;
    set_mode(&path, MANIFEST_FILE_MODE)?;
    Ok(())
}

/// Reads and parses `manifest.json` from `dir`.
pub fn read_manifest(dir: &Path) -> Result<Manifest> {
    let path = dir.join(MANIFEST_FILE_NAME);
    let text = fs::read_to_string(path)?;
    Manifest::from_json(&text)
}

/// Writes one shard's raw bytes to `path` with mode 0644.
pub fn write_shard(path: &Path, data: &[u8]) -> Result<()> {
    fs::write(path, data)?;
    set_mode(path, MANIFEST_FILE_MODE)?;
    Ok(())
}

/// Reads one shard's raw bytes from `path`. A missing file is `Ok(None)`
/// (the shard slot is simply absent for erasure reconstruction), any other
/// I/O failure propagates.
pub fn read_shard(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::Manifest;

    fn sample_manifest() -> Manifest {
        Manifest {
            salt: vec![0u8; 16],
            argon2_time: 1,
            argon2_memory_kb: 1024,
            argon2_threads: 1,
            data_shards: 2,
            parity_shards: 1,
            chunk_bases: vec!["chunk_0".into()],
            shard_suffixes: vec![vec!["_shard_0.dat".into(), "_shard_1.dat".into(), "_shard_2.dat".into()]],
            encrypted_chunk_sizes: vec![10],
            encrypted_data_keys: vec![vec![1u8; 60]],
            encrypted_orig_filename: vec![2u8; 20],
            signature: None,
        }
    }

    #[test]
    fn manifest_roundtrips_through_storage() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = manifest_dir(tmp.path(), "abc123");
        create_manifest_dir(&dir).unwrap();

        let mut manifest = sample_manifest();
        manifest.sign(&[9u8; 32]).unwrap();
        write_manifest(&dir, &manifest).unwrap();

        let read_back = read_manifest(&dir).unwrap();
        read_back.verify(&[9u8; 32]).unwrap();
    }

    #[test]
    fn missing_shard_reads_as_none() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("chunk_0_shard_0.dat");
        assert!(read_shard(&path).unwrap().is_none());
    }

    #[test]
    fn shard_roundtrips() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("chunk_0_shard_0.dat");
        write_shard(&path, b"shard bytes").unwrap();
        assert_eq!(read_shard(&path).unwrap().unwrap(), b"shard bytes");
    }
}
