//! Random number generation for room sources
//!
//! Uses a seeded ChaCha RNG so a seed always reproduces the same floor plan.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Layout random number generator
///
/// Wraps ChaCha8Rng for reproducible random number generation.
#[derive(Debug, Clone)]
pub struct LayoutRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl LayoutRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a new RNG with a random seed
    pub fn from_entropy() -> Self {
        let seed = rand::random();
        Self::new(seed)
    }

    /// Get the seed used to create this RNG
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns 0..n-1, or 0 if n is 0
    pub fn rn2(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    /// Returns 1..=n, or 0 if n is 0
    pub fn rnd(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(1..=n)
    }

    /// Integer in `[-radius, radius)`, or 0 if radius is 0
    pub fn offset(&mut self, radius: u32) -> i64 {
        self.rn2(radius.saturating_mul(2)) as i64 - radius as i64
    }
}
