use nalgebra::Point3;

use crate::misc::FloatingPoint;

use super::{Curve, CurveSampler, Spline};

/// A trait for tessellating a shape
pub trait Tessellation<Opt> {
    type Output;
    fn tessellate(&self, options: Opt) -> Self::Output;
}

/// Tessellate a spline into a polyline
/// `None` samples with the resolution stored on the spline
impl<T: FloatingPoint> Tessellation<Option<&CurveSampler<T>>> for Spline<T> {
    type Output = anyhow::Result<Vec<Point3<T>>>;

    fn tessellate(&self, sampler: Option<&CurveSampler<T>>) -> Self::Output {
        match sampler {
            Some(sampler) => sampler.sample(self),
            None => CurveSampler::new().sample(self),
        }
    }
}

/// Tessellate every spline of a curve with the curve resolution
impl<T: FloatingPoint> Tessellation<()> for Curve<T> {
    type Output = anyhow::Result<Vec<Vec<Point3<T>>>>;

    fn tessellate(&self, _options: ()) -> Self::Output {
        (0..self.len())
            .map(|index| self.sample_spline(index, None))
            .collect()
    }
}
