// shardcrypt - end-to-end encrypted, chunked, erasure-coded at-rest storage.
//
// Encryption: AES-256-GCM, per-chunk data keys wrapped under an Argon2id
// master key. Erasure coding: Reed-Solomon over GF(2^8). Manifest: signed
// JSON binding salt, KDF parameters, and shard layout together.

mod cli;
mod config_file;

use std::io::{self, BufRead, Write as _};
use std::process;

use anyhow::{Context, Result, bail};
use clap::Parser;

use cli::{Cli, Commands};
use config_file::ConfigFile;
use shardcrypt::options::EncryptionOptions;
use shardcrypt::pipeline::{decrypt_file, encrypt_file};

fn main() {
    let subscriber = tracing_subscriber::fmt().with_file(true).with_line_number(true).finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("warning: tracing subscriber already set");
    }

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {e:?}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Encrypt { input, config, password } => {
            let config = ConfigFile::load(&config).context("loading config")?;
            let password = resolve_password(password)?;
            let options = EncryptionOptions {
                passphrase: password.into_bytes(),
                data_shards: config.data_shards,
                parity_shards: config.parity_shards,
                chunk_size_kb: config.chunk_size_kb,
                argon2_time: config.argon2.time,
                argon2_memory_kb: config.argon2.memory_kb,
                argon2_threads: config.argon2.threads,
            };
            let manifest_id = encrypt_file(&input, &config.storage_path, &options).context("encrypting file")?;
            println!("{manifest_id}");
            Ok(())
        }
        Commands::Decrypt { manifest_id, output, config, password } => {
            let config = ConfigFile::load(&config).context("loading config")?;
            let password = resolve_password(password)?;
            decrypt_file(&manifest_id, &config.storage_path, &output, password.as_bytes()).context("decrypting file")?;
            Ok(())
        }
    }
}

fn resolve_password(password: Option<String>) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }
    print!("Passphrase: ");
    io::stdout().flush().ok();
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).context("reading passphrase from stdin")?;
    let trimmed = line.trim_end_matches(['\n', '\r']);
    if trimmed.is_empty() {
        bail!("no passphrase supplied");
    }
    Ok(trimmed.to_string())
}
