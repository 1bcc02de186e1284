use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;

/// Seedable source of bounded integers.
///
/// Every piece of geometry and every sample order is derived from one of
/// these. The stream is only ever restarted through [`RandomSource::reset`],
/// so two passes that reset to the same seed see exactly the same draws.
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: ChaCha12Rng,
}

impl RandomSource {
    pub fn new(seed: u64) -> RandomSource {
        RandomSource {
            rng: ChaCha12Rng::seed_from_u64(seed),
        }
    }

    /// Restarts the stream from `seed`.
    pub fn reset(&mut self, seed: u64) {
        self.rng = ChaCha12Rng::seed_from_u64(seed);
    }

    /// Uniform integer in `[min, max)`.
    ///
    /// # Panics
    /// Panics if the range is empty.
    pub fn range(&mut self, min: usize, max: usize) -> usize {
        assert!(min < max, "empty random range [{min}, {max})");
        self.rng.gen_range(min..max)
    }

    /// Uniform integer in `[min, max]`.
    ///
    /// # Panics
    /// Panics if `min > max`.
    pub fn range_inclusive(&mut self, min: usize, max: usize) -> usize {
        assert!(min <= max, "empty random range [{min}, {max}]");
        self.rng.gen_range(min..=max)
    }
}
