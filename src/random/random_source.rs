use nalgebra::convert;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use rand_distr::{Distribution, Normal, Triangular};

use crate::misc::FloatingPoint;

/// Seed-scoped random generator shared by the phases of one generation request
///
/// The sequence only restarts through [`RandomSource::reseed`] or
/// [`RandomSource::reseed_with`].
///
/// # Example
/// ```
/// use spiderweb::prelude::*;
/// let mut rng = RandomSource::new(7);
/// let a: f64 = rng.uniform(0., 1.);
/// rng.reseed();
/// let b: f64 = rng.uniform(0., 1.);
/// assert_eq!(a, b);
/// ```
#[derive(Clone, Debug)]
pub struct RandomSource {
    seed: u64,
    rng: StdRng,
}

impl RandomSource {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Restart the sequence from the current seed
    pub fn reseed(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
    }

    /// Restart the sequence from another seed
    pub fn reseed_with(&mut self, seed: u64) {
        self.seed = seed;
        self.reseed();
    }

    /// Uniform value in `[0, 1)`
    pub fn unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// Uniform value between `a` and `b`
    /// the bounds may be inverted or equal
    pub fn uniform<T: FloatingPoint>(&mut self, a: T, b: T) -> T {
        let u: T = convert(self.unit());
        a + (b - a) * u
    }

    /// Uniform index in `[0, len)`
    pub fn choose_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.rng.random_range(0..len))
        }
    }

    /// Uniform element of a slice
    pub fn choose<'a, E>(&mut self, items: &'a [E]) -> Option<&'a E> {
        self.choose_index(items.len()).map(|i| &items[i])
    }

    /// Index in `[low, high)` drawn from a triangular distribution peaking at the center
    pub fn triangular_index(&mut self, low: usize, high: usize) -> usize {
        if high <= low + 1 {
            return low;
        }
        let (min, max) = (low as f64, high as f64);
        let value = match Triangular::new(min, max, (min + max) * 0.5) {
            Ok(dist) => dist.sample(&mut self.rng),
            Err(_) => min,
        };
        (value.floor() as usize).clamp(low, high - 1)
    }

    /// Index in `[low, high)` drawn from a normal distribution centered on the range
    /// three standard deviations reach the bounds, outliers are clamped
    pub fn gaussian_index(&mut self, low: usize, high: usize) -> usize {
        if high <= low + 1 {
            return low;
        }
        let (min, max) = (low as f64, high as f64);
        let value = match Normal::new((min + max) * 0.5, (max - min) / 6.0) {
            Ok(dist) => dist.sample(&mut self.rng),
            Err(_) => min,
        };
        (value.floor().max(min) as usize).clamp(low, high - 1)
    }

    /// Shuffle a slice in place
    pub fn shuffle<E>(&mut self, items: &mut [E]) {
        items.shuffle(&mut self.rng);
    }
}
