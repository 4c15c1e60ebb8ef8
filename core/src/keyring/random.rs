//! Randomness used to pick curves and signing keys

use rand::rngs::OsRng;
use rand::Rng;

/// Uniform index selection
pub trait RandomSource: Send + Sync {
    /// Returns a value in `0..len`. Callers never pass zero.
    fn index(&self, len: usize) -> usize;
}

/// Draws from the operating system CSPRNG
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn index(&self, len: usize) -> usize {
        OsRng.gen_range(0..len)
    }
}
