//! Deterministic random number generation.
//!
//! The engine draws randomness exactly once per match (the challenger
//! pick), but keeps it behind a seeded wrapper so full matches replay
//! identically in tests: same seed, same challenger, same transcript.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seeded deterministic RNG for one match.
///
/// Uses ChaCha8 for speed while keeping high-quality randomness.
/// The seed is injected by the caller; the engine never reads entropy.
///
/// ```
/// use santorini_engine::core::MatchRng;
///
/// let mut a = MatchRng::new(7);
/// let mut b = MatchRng::new(7);
/// assert_eq!(a.gen_index(10), b.gen_index(10));
/// ```
#[derive(Clone, Debug)]
pub struct MatchRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl MatchRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this RNG was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate a uniform index in `0..len`.
    ///
    /// # Panics
    ///
    /// Panics if `len` is zero.
    pub fn gen_index(&mut self, len: usize) -> usize {
        assert!(len > 0, "cannot pick from an empty range");
        self.inner.gen_range(0..len)
    }

    /// Choose a uniform random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.inner)
    }
}
