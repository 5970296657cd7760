pub mod mesh_source;
pub mod sampling_method;
pub use mesh_source::*;
pub use sampling_method::*;

use nalgebra::Point3;

use crate::{misc::FloatingPoint, random::RandomSource};

/// A source object that anchor points can be sampled from
pub trait AnchorSource<T: FloatingPoint> {
    /// Sample up to `amount` world space points with the given method
    fn sample_anchors(
        &self,
        amount: usize,
        method: SamplingMethod,
        rng: &mut RandomSource,
    ) -> anyhow::Result<Vec<Point3<T>>>;
}
