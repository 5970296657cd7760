use nalgebra::{convert, RealField};
use num_traits::ToPrimitive;

/// Scalar type of every point, weight and knot (f32 or f64)
pub trait FloatingPoint: RealField + ToPrimitive + Copy {
    /// Bring an index or a count into the field
    fn from_count(count: usize) -> Self {
        convert(count as f64)
    }
}

impl FloatingPoint for f32 {}
impl FloatingPoint for f64 {}
