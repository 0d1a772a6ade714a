//! Content-defined chunking (component C2).
//!
//! Splits a byte stream into variable-length chunks using a Rabin-style
//! polynomial rolling hash over a sliding window. Boundaries are picked
//! where the low bits of the rolling hash match a target pattern, which
//! makes them a function of local content rather than a fixed offset: an
//! insertion or deletion only perturbs the chunks touching it.
//!
//! This is a lazy, pull-based, single-consumer, non-restartable sequence,
//! realized here as a plain [`Iterator`].

use std::io::{Bytes, Read};

use crate::config::CHUNK_POLYNOMIAL;
use crate::error::{Error, Result};

/// Width of the rolling hash window, in bytes.
const WINDOW: usize = 48;

/// Base used for the polynomial rolling hash (treats each byte as a digit).
const BASE: u64 = 256;

/// Produces `(index, bytes)` chunks from a [`Read`] source.
///
/// `avg_kb` is the configured average chunk size in KiB (must already have
/// been validated to lie in `[MIN_CHUNK_SIZE_KB, MAX_CHUNK_SIZE_KB]` by the
/// caller — see [`crate::options::EncryptionOptions`]). Minimum chunk size is
/// `avg_kb*1024/2`, maximum is `avg_kb*1024*2`; the final chunk may be
/// shorter than the minimum, since it is simply the tail of the stream.
pub struct Chunker<R: Read> {
    bytes: Bytes<R>,
    min_size: usize,
    max_size: usize,
    mask: u64,
    base_pow: u64,
    next_index: u64,
    finished: bool,
}

impl<R: Read> Chunker<R> {
    /// Creates a chunker over `reader` targeting an average chunk size of
    /// `avg_kb` KiB.
    pub fn new(reader: R, avg_kb: u32) -> Self {
        let avg_bytes = (avg_kb as usize) * 1024;
        let bits = avg_bytes.max(2).ilog2();
        let mask = (1u64 << bits) - 1;
        let base_pow = mod_pow(BASE, WINDOW as u64, CHUNK_POLYNOMIAL);

        Self {
            bytes: reader.bytes(),
            min_size: avg_bytes / 2,
            max_size: avg_bytes * 2,
            mask,
            base_pow,
            next_index: 0,
            finished: false,
        }
    }

    fn next_chunk(&mut self) -> Result<Option<(u64, Vec<u8>)>> {
        if self.finished {
            return Ok(None);
        }

        let mut chunk = Vec::new();
        let mut window = [0u8; WINDOW];
        let mut window_pos = 0usize;
        let mut window_filled = 0usize;
        let mut hash: u64 = 0;

        loop {
            let Some(next) = self.bytes.next() else {
                self.finished = true;
                if chunk.is_empty() {
                    return Ok(None);
                }
                let index = self.next_index;
                self.next_index += 1;
                return Ok(Some((index, chunk)));
            };
            let byte = next.map_err(Error::Io)?;
            chunk.push(byte);

            let evicted = if window_filled == WINDOW { window[window_pos] } else { 0 };
            window[window_pos] = byte;
            window_pos = (window_pos + 1) % WINDOW;
            window_filled = (window_filled + 1).min(WINDOW);

            hash = roll(hash, evicted, byte, self.base_pow);

            if chunk.len() >= self.max_size {
                let index = self.next_index;
                self.next_index += 1;
                return Ok(Some((index, chunk)));
            }

            if chunk.len() >= self.min_size && window_filled == WINDOW && (hash & self.mask) == self.mask {
                let index = self.next_index;
                self.next_index += 1;
                return Ok(Some((index, chunk)));
            }
        }
    }
}

impl<R: Read> Iterator for Chunker<R> {
    type Item = Result<(u64, Vec<u8>)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_chunk().transpose()
    }
}

/// Advances the rolling hash by evicting `old` and admitting `new`, modulo
/// [`CHUNK_POLYNOMIAL`].
fn roll(hash: u64, old: u8, new: u8, base_pow: u64) -> u64 {
    let m = CHUNK_POLYNOMIAL;
    let removed = mod_mul(old as u64, base_pow, m);
    let without_old = (hash + m - removed % m) % m;
    let shifted = mod_mul(without_old, BASE, m);
    (shifted + new as u64) % m
}

/// `(a * b) % m` without overflowing `u64`.
fn mod_mul(a: u64, b: u64, m: u64) -> u64 {
    ((a as u128 * b as u128) % m as u128) as u64
}

/// `(base ^ exp) % m`.
fn mod_pow(base: u64, mut exp: u64, m: u64) -> u64 {
    let mut result = 1u64 % m;
    let mut base = base % m;
    while exp > 0 {
        if exp & 1 == 1 {
            result = mod_mul(result, base, m);
        }
        base = mod_mul(base, base, m);
        exp >>= 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn chunk_all(data: &[u8], avg_kb: u32) -> Vec<Vec<u8>> {
        Chunker::new(Cursor::new(data.to_vec()), avg_kb)
            .map(|r| r.unwrap().1)
            .collect()
    }

    #[test]
    fn concatenation_equals_input() {
        let data: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        let chunks = chunk_all(&data, 64);
        let joined: Vec<u8> = chunks.into_iter().flatten().collect();
        assert_eq!(joined, data);
    }

    #[test]
    fn boundaries_are_deterministic() {
        let data: Vec<u8> = (0..500_000u32).map(|i| ((i * 7 + 3) % 256) as u8).collect();
        let lens_a: Vec<usize> = chunk_all(&data, 128).iter().map(Vec::len).collect();
        let lens_b: Vec<usize> = chunk_all(&data, 128).iter().map(Vec::len).collect();
        assert_eq!(lens_a, lens_b);
    }

    #[test]
    fn respects_min_and_max_bounds_except_tail() {
        let data: Vec<u8> = (0..1_000_000u32).map(|i| ((i * 31) % 256) as u8).collect();
        let avg_kb = 64u32;
        let avg_bytes = avg_kb as usize * 1024;
        let chunks = chunk_all(&data, avg_kb);
        for (i, c) in chunks.iter().enumerate() {
            let is_last = i == chunks.len() - 1;
            if !is_last {
                assert!(c.len() >= avg_bytes / 2);
                assert!(c.len() <= avg_bytes * 2);
            } else {
                assert!(c.len() <= avg_bytes * 2);
            }
        }
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        assert!(chunk_all(&[], 64).is_empty());
    }

    #[test]
    fn tiny_input_yields_one_short_tail_chunk() {
        let data = b"hello world";
        let chunks = chunk_all(data, 64);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], data);
    }

    #[test]
    fn io_error_surfaces_as_chunking_error() {
        struct FailingReader;
        impl Read for FailingReader {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("disk gone"))
            }
        }
        let mut chunker = Chunker::new(FailingReader, 64);
        assert!(chunker.next().unwrap().is_err());
    }
}
