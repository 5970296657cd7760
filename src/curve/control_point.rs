use nalgebra::{convert, Matrix4, Point3, Vector4};
use simba::scalar::SupersetOf;

use crate::misc::{FloatingPoint, Transformable};

/// Control point of a spline: a position with a rational weight
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlPoint<T: FloatingPoint> {
    position: Point3<T>,
    weight: T,
}

impl<T: FloatingPoint> ControlPoint<T> {
    pub fn new(position: Point3<T>, weight: T) -> Self {
        Self { position, weight }
    }

    pub fn position(&self) -> &Point3<T> {
        &self.position
    }

    pub fn weight(&self) -> T {
        self.weight
    }

    pub fn with_weight(mut self, weight: T) -> Self {
        self.weight = weight;
        self
    }

    /// `(x, y, z, w)` form, the position is not premultiplied by the weight
    pub fn to_homogeneous(&self) -> Vector4<T> {
        Vector4::new(
            self.position.x,
            self.position.y,
            self.position.z,
            self.weight,
        )
    }

    pub fn from_homogeneous(v: &Vector4<T>) -> Self {
        Self::new(Point3::new(v.x, v.y, v.z), v.w)
    }

    pub fn cast<F: FloatingPoint + SupersetOf<T>>(&self) -> ControlPoint<F> {
        ControlPoint {
            position: self.position.cast(),
            weight: convert(self.weight),
        }
    }
}

impl<T: FloatingPoint> From<Point3<T>> for ControlPoint<T> {
    fn from(position: Point3<T>) -> Self {
        Self::new(position, T::one())
    }
}

impl<'a, T: FloatingPoint> Transformable<&'a Matrix4<T>> for ControlPoint<T> {
    fn transform(&mut self, transform: &'a Matrix4<T>) {
        self.position = transform.transform_point(&self.position);
    }
}
