//! Reed-Solomon erasure coding over GF(2^8) (component C3).
//!
//! Each encrypted chunk blob is split into `data_shards` equal-size pieces,
//! `parity_shards` extra pieces are computed from them, and all shards are
//! persisted independently (see [`crate::storage`]). Losing up to
//! `parity_shards` of the total is survivable; [`ErasureCoder::reconstruct`]
//! recovers the missing pieces and [`ErasureCoder::join`] recombines the
//! data shards back into the original blob.

use reed_solomon_erasure::galois_8::ReedSolomon;

use crate::error::{Error, Result};

/// A Reed-Solomon encoder/decoder fixed to one `(data_shards, parity_shards)`
/// configuration, shared across every chunk of one manifest.
pub struct ErasureCoder {
    encoder: ReedSolomon,
    data_shards: usize,
    parity_shards: usize,
}

impl ErasureCoder {
    /// Builds a coder for `data_shards` data shards and `parity_shards`
    /// parity shards. `data_shards + parity_shards` must be at most 255,
    /// the largest shard count GF(2^8) can address.
    pub fn new(data_shards: usize, parity_shards: usize) -> Result<Self> {
        let encoder = ReedSolomon::new(data_shards, parity_shards)
            .map_err(|e| Error::ErasureCode(format!("failed to construct Reed-Solomon coder: {e:?}")))?;
        Ok(Self { encoder, data_shards, parity_shards })
    }

    pub fn data_shards(&self) -> usize {
        self.data_shards
    }

    pub fn parity_shards(&self) -> usize {
        self.parity_shards
    }

    pub fn total_shards(&self) -> usize {
        self.data_shards + self.parity_shards
    }

    /// Splits `data` into `data_shards` equal-length pieces, zero-padding the
    /// last one as needed, followed by `parity_shards` zeroed placeholders
    /// ready for [`ReedSolomon::encode`].
    fn split(&self, data: &[u8]) -> Vec<Vec<u8>> {
        let shard_size = data.len().div_ceil(self.data_shards).max(1);
        let mut shards: Vec<Vec<u8>> = (0..self.total_shards()).map(|_| vec![0u8; shard_size]).collect();
        for (idx, piece) in data.chunks(shard_size).enumerate() {
            shards[idx][..piece.len()].copy_from_slice(piece);
        }
        shards
    }

    /// Splits and computes parity, returning all `total_shards()` shards in
    /// order (data shards first, then parity shards).
    pub fn encode(&self, data: &[u8]) -> Result<Vec<Vec<u8>>> {
        if data.is_empty() {
            return Err(Error::ErasureCode("cannot encode empty data".into()));
        }
        let mut shards = self.split(data);
        self.encoder
            .encode(&mut shards)
            .map_err(|e| Error::ErasureCode(format!("reed-solomon encoding failed: {e:?}")))?;
        Ok(shards)
    }

    /// Checks that present parity shards are consistent with present data
    /// shards, without attempting reconstruction. Returns `false` (not an
    /// error) if any shard is missing; `true` iff all slots are present and
    /// parity is consistent.
    pub fn verify(&self, shards: &[Option<Vec<u8>>]) -> Result<bool> {
        self.check_shard_count(shards)?;
        let Some(present): Option<Vec<Vec<u8>>> = shards.iter().cloned().collect() else {
            return Ok(false);
        };
        self.encoder
            .verify(&present)
            .map_err(|e| Error::ErasureCode(format!("reed-solomon verification failed: {e:?}")))
    }

    /// Recovers any missing (`None`) shards in place. Fails with
    /// [`Error::InsufficientShards`] if fewer than `data_shards` shards are
    /// present, and with [`Error::ReconstructFailed`] if the underlying
    /// algorithm rejects the input for any other reason.
    pub fn reconstruct(&self, shards: &mut [Option<Vec<u8>>], chunk_index: usize) -> Result<()> {
        self.check_shard_count(shards)?;
        let have = shards.iter().filter(|s| s.is_some()).count();
        if have < self.data_shards {
            return Err(Error::InsufficientShards { chunk_index, needed: self.data_shards, have });
        }
        self.encoder
            .reconstruct(shards)
            .map_err(|_| Error::ReconstructFailed { chunk_index })
    }

    /// Concatenates the data shards (first `data_shards` entries) back into
    /// one blob and trims it to `original_len`, undoing the zero padding
    /// [`Self::split`] introduced.
    pub fn join(&self, shards: &[Vec<u8>], original_len: usize) -> Result<Vec<u8>> {
        if shards.len() < self.data_shards {
            return Err(Error::ErasureCode(format!(
                "join needs at least {} data shards, got {}",
                self.data_shards,
                shards.len()
            )));
        }
        let mut out = Vec::with_capacity(original_len);
        for shard in shards.iter().take(self.data_shards) {
            out.extend_from_slice(shard);
        }
        out.truncate(original_len);
        Ok(out)
    }

    fn check_shard_count(&self, shards: &[Option<Vec<u8>>]) -> Result<()> {
        if shards.len() != self.total_shards() {
            return Err(Error::ErasureCode(format!(
                "expected {} shards, got {}",
                self.total_shards(),
                shards.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_join_roundtrip() {
        let coder = ErasureCoder::new(4, 2).unwrap();
        let data = b"a reasonably sized chunk of plaintext to shard up".to_vec();
        let shards = coder.encode(&data).unwrap();
        let joined = coder.join(&shards, data.len()).unwrap();
        assert_eq!(joined, data);
    }

    #[test]
    fn reconstruct_recovers_missing_shards() {
        let coder = ErasureCoder::new(4, 2).unwrap();
        let data = b"some data that spans multiple shards for this test case".to_vec();
        let shards = coder.encode(&data).unwrap();

        let mut with_gaps: Vec<Option<Vec<u8>>> = shards.into_iter().map(Some).collect();
        with_gaps[1] = None;
        with_gaps[4] = None;

        coder.reconstruct(&mut with_gaps, 0).unwrap();
        let recovered: Vec<Vec<u8>> = with_gaps.into_iter().map(Option::unwrap).collect();
        let joined = coder.join(&recovered, data.len()).unwrap();
        assert_eq!(joined, data);
    }

    #[test]
    fn reconstruct_fails_with_too_few_shards() {
        let coder = ErasureCoder::new(4, 2).unwrap();
        let data = b"short data".to_vec();
        let shards = coder.encode(&data).unwrap();

        let mut with_gaps: Vec<Option<Vec<u8>>> = shards.into_iter().map(Some).collect();
        with_gaps[0] = None;
        with_gaps[1] = None;
        with_gaps[2] = None;

        let err = coder.reconstruct(&mut with_gaps, 7).unwrap_err();
        match err {
            Error::InsufficientShards { chunk_index, needed, have } => {
                assert_eq!(chunk_index, 7);
                assert_eq!(needed, 4);
                assert_eq!(have, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn verify_detects_tampered_parity() {
        let coder = ErasureCoder::new(4, 2).unwrap();
        let data = b"data to verify after tampering with a parity shard".to_vec();
        let mut shards = coder.encode(&data).unwrap();
        shards[4][0] ^= 0xFF;

        let present: Vec<Option<Vec<u8>>> = shards.into_iter().map(Some).collect();
        assert!(!coder.verify(&present).unwrap());
    }

    #[test]
    fn encode_rejects_empty_input() {
        let coder = ErasureCoder::new(4, 2).unwrap();
        assert!(coder.encode(&[]).is_err());
    }
}
