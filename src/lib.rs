//! shardcrypt - end-to-end encrypted, chunked, erasure-coded at-rest file
//! storage.
//!
//! A file is transformed into a set of independently verifiable ciphertext
//! shards plus a signed manifest binding them together:
//! - content-defined chunking splits the input at content-determined
//!   boundaries,
//! - each chunk is sealed under a single-use AES-256-GCM data key,
//! - data keys are wrapped under an Argon2id-derived master key,
//! - each sealed chunk is Reed-Solomon erasure-coded into data and parity
//!   shards, tolerant of bounded shard loss,
//! - a signed JSON manifest records salt, KDF parameters, and shard layout.
//!
//! The two public entry points are [`pipeline::encrypt_file`] and
//! [`pipeline::decrypt_file`].

pub mod chunker;
pub mod config;
pub mod crypto;
pub mod erasure;
pub mod error;
pub mod manifest;
pub mod options;
pub mod pipeline;
pub mod secret;
pub mod storage;
