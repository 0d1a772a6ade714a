//! `clap`-based command surface (external collaborator, not part of the
//! core): a plain encrypt/decrypt surface, with no interactive wizard.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "shardcrypt", version, about = "End-to-end encrypted, chunked, erasure-coded at-rest file storage.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encrypt a file into a new manifest directory.
    Encrypt {
        /// Path to the file to encrypt.
        input: PathBuf,

        /// YAML config file (chunk_size_kb, data_shards, parity_shards, argon2.*, storage_path).
        #[arg(short, long)]
        config: PathBuf,

        /// Passphrase. If omitted, read from stdin.
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Decrypt a manifest back into a file.
    Decrypt {
        /// The `manifest_id` to decrypt.
        manifest_id: String,

        /// Output file or directory. If a directory, the decrypted original
        /// filename is used.
        output: PathBuf,

        /// YAML config file, for locating `storage_path`.
        #[arg(short, long)]
        config: PathBuf,

        /// Passphrase. If omitted, read from stdin.
        #[arg(short, long)]
        password: Option<String>,
    },
}
