use nalgebra::{convert, Point3, Vector3};

use crate::misc::FloatingPoint;

/// Represents a ray in 3D space
#[derive(Clone, Debug)]
pub struct Ray<T: FloatingPoint> {
    pub(crate) origin: Point3<T>,
    pub(crate) direction: Vector3<T>,
}

impl<T: FloatingPoint> Ray<T> {
    pub fn new(origin: Point3<T>, direction: Vector3<T>) -> Self {
        Self { origin, direction }
    }

    pub fn origin(&self) -> &Point3<T> {
        &self.origin
    }

    pub fn direction(&self) -> &Vector3<T> {
        &self.direction
    }

    pub fn point_at(&self, t: T) -> Point3<T> {
        self.origin + self.direction * t
    }

    /// Distance along the ray to the triangle `abc`, if the ray hits it in front of the origin
    /// (Moller-Trumbore)
    pub fn intersect_triangle(&self, a: &Point3<T>, b: &Point3<T>, c: &Point3<T>) -> Option<T> {
        let eps: T = convert(1e-12);
        let ab = b - a;
        let ac = c - a;
        let p = self.direction.cross(&ac);
        let det = ab.dot(&p);

        // The ray is parallel to the triangle.
        if det.abs() < eps {
            return None;
        }

        let inv = T::one() / det;
        let s = self.origin - a;
        let u = s.dot(&p) * inv;
        if u < T::zero() || u > T::one() {
            return None;
        }

        let q = s.cross(&ab);
        let v = self.direction.dot(&q) * inv;
        if v < T::zero() || u + v > T::one() {
            return None;
        }

        let t = ac.dot(&q) * inv;
        if t > eps {
            Some(t)
        } else {
            None
        }
    }
}
