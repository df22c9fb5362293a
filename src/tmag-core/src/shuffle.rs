//! Randomness behind a trait so callers and tests can pick the source.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Produces random permutations of a member pool.
///
/// Implement this to plug in a different randomness source, e.g. a
/// fixed ordering in tests.
pub trait Shuffler {
    /// Permute `items` in place.
    fn shuffle(&mut self, items: &mut [String]);
}

/// Uniform Fisher-Yates shuffling backed by a `rand` generator.
#[derive(Debug, Clone)]
pub struct RandomShuffler<R = StdRng> {
    rng: R,
}

impl<R: rand::Rng> RandomShuffler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomShuffler<StdRng> {
    /// Seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Reproducible sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl Default for RandomShuffler<StdRng> {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl<R: rand::Rng> Shuffler for RandomShuffler<R> {
    fn shuffle(&mut self, items: &mut [String]) {
        items.shuffle(&mut self.rng);
    }
}
