//! Encrypt and decrypt pipelines (components C5/C6): the only two operations
//! the core exposes publicly.

pub mod decrypt;
pub mod encrypt;

pub use decrypt::decrypt_file;
pub use encrypt::encrypt_file;
