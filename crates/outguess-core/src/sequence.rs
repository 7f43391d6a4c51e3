//! Deterministic embedding sequence over AC coefficient positions.
//!
//! The sequence decides WHERE payload bits live. Embedder and extractor derive
//! it independently from `(total_coefficients, seed)`, so it must be identical
//! on every platform and every build.
//!
//! # Version 1
//!
//! - key: SHA-256 over the seed bytes followed by `total` as little-endian `u64`
//! - PRNG: ChaCha20 (`rand_chacha::ChaCha20Rng::from_seed(key)`)
//! - shuffle: Fisher-Yates from the last position down, drawing
//!   `gen_range(0..=i as u32)`
//!
//! Draws use `u32` rather than `usize`: `usize` is 32-bit on WASM and 64-bit on
//! native targets and `gen_range` consumes a different amount of entropy for
//! each, which would produce different shuffles.
//!
//! Any change here breaks extraction of previously embedded data. Bump
//! [`SEQUENCE_VERSION`] and keep the golden vectors in `tests/golden_sequence.rs`
//! in sync.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use sha2::{Digest, Sha256};

use crate::BLOCK_SIZE;

/// Version of the sequence derivation.
pub const SEQUENCE_VERSION: u32 = 1;

/// Seed used when the caller does not supply one.
pub const DEFAULT_SEED: &str = "outguess_seed_v2";

/// Largest coefficient count the sequence can address with `u32` draws.
pub const MAX_COEFFICIENTS: usize = u32::MAX as usize;

/// Ordered AC coefficient indices in which payload bits are written and read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddingSequence {
    indices: Vec<usize>,
}

impl EmbeddingSequence {
    /// Derive the sequence for a buffer of `total_coefficients` values.
    ///
    /// DC positions (`index % 64 == 0`) never appear in the sequence.
    /// Counts above [`MAX_COEFFICIENTS`] are the caller's responsibility to reject.
    pub fn new(total_coefficients: usize, seed: &str) -> Self {
        debug_assert!(total_coefficients <= MAX_COEFFICIENTS);

        let mut indices: Vec<usize> = (0..total_coefficients)
            .filter(|&i| !is_dc_coefficient(i))
            .collect();

        let mut rng = ChaCha20Rng::from_seed(derive_key(seed, total_coefficients));
        for i in (1..indices.len()).rev() {
            let j = rng.gen_range(0..=(i as u32)) as usize;
            indices.swap(i, j);
        }

        EmbeddingSequence { indices }
    }

    /// Derive the sequence keyed by [`DEFAULT_SEED`].
    pub fn with_default_seed(total_coefficients: usize) -> Self {
        Self::new(total_coefficients, DEFAULT_SEED)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }
}

impl<'a> IntoIterator for &'a EmbeddingSequence {
    type Item = &'a usize;
    type IntoIter = std::slice::Iter<'a, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.indices.iter()
    }
}

/// Check if an index is a DC coefficient (first of each 8x8 block).
#[inline]
pub(crate) fn is_dc_coefficient(index: usize) -> bool {
    index % BLOCK_SIZE == 0
}

fn derive_key(seed: &str, total_coefficients: usize) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(seed.as_bytes());
    hasher.update((total_coefficients as u64).to_le_bytes());
    hasher.finalize().into()
}
