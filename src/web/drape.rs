use nalgebra::convert;

use crate::{misc::FloatingPoint, random::RandomSource};

use super::Strand;

/// Lowers the middle of strands to imitate sagging threads
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrapeSolver {
    min: f64,
    max: f64,
    length_solver: bool,
}

impl DrapeSolver {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            length_solver: true,
        }
    }

    pub fn with_length_solver(mut self, enabled: bool) -> Self {
        self.length_solver = enabled;
        self
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn length_solver(&self) -> bool {
        self.length_solver
    }

    /// Offset the middle of every strand along z, scaled against the mean length of `strands`
    /// The random stream restarts from its seed, so draping the same strands twice gives the same offsets
    pub fn apply<T: FloatingPoint>(&self, strands: &mut [Strand<T>], rng: &mut RandomSource) {
        let mean = mean_length(strands.iter());
        self.apply_with_mean(strands, mean, rng);
    }

    /// Offset the middle of every strand along z, scaled against a given mean length
    /// `None` leaves the raw offsets unscaled
    pub fn apply_with_mean<T: FloatingPoint>(
        &self,
        strands: &mut [Strand<T>],
        mean: Option<T>,
        rng: &mut RandomSource,
    ) {
        rng.reseed();

        let (min, max): (T, T) = (convert(self.min), convert(self.max));
        for strand in strands.iter_mut() {
            let mut offset = rng.uniform(min, max);
            if self.length_solver {
                if let Some(mean) = mean {
                    offset = offset * strand.length() / mean;
                }
            }
            strand.sag(offset);
        }
    }
}

/// Mean end to end length, `None` when empty or zero
pub fn mean_length<'a, T: FloatingPoint + 'a>(
    strands: impl IntoIterator<Item = &'a Strand<T>>,
) -> Option<T> {
    let (count, total) = strands
        .into_iter()
        .fold((0, T::zero()), |(count, total), strand| {
            (count + 1, total + strand.length())
        });
    if count == 0 {
        return None;
    }
    let mean = total / T::from_count(count);
    (mean > T::zero()).then_some(mean)
}
