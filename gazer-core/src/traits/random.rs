//! Randomness seam
//!
//! The animation only ever asks for "a number below N". Keeping that behind
//! a trait lets tests script exact values, while the firmware plugs in a
//! seeded `rand` generator.

use rand::{Rng, RngCore};

/// Source of bounded random integers
pub trait RandomSource {
    /// Uniform value in `0..bound`. Returns 0 when `bound` is 0.
    fn below(&mut self, bound: u32) -> u32;
}

/// Adapter from any `rand` generator
///
/// ```
/// use gazer_core::traits::{RandomSource, RngSource};
/// use rand::{rngs::SmallRng, SeedableRng};
///
/// let mut rng = RngSource(SmallRng::seed_from_u64(7));
/// assert!(rng.below(10) < 10);
/// ```
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl<R: RngCore> RandomSource for RngSource<R> {
    fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.0.random_range(0..bound)
    }
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn below(&mut self, bound: u32) -> u32 {
        (**self).below(bound)
    }
}
