use nalgebra::{convert, Matrix4, Point3};
use simba::scalar::SupersetOf;

use crate::{
    curve::{ControlPoint, Spline},
    misc::{FloatingPoint, Transformable},
};

/// Order of the spline a strand converts into
pub const STRAND_ORDER: usize = 3;

/// A single sagging thread between two anchor points
/// The middle point starts halfway between the ends and is only ever moved along z
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Strand<T: FloatingPoint> {
    start: Point3<T>,
    mid: Point3<T>,
    end: Point3<T>,
}

impl<T: FloatingPoint> Strand<T> {
    /// Create a straight strand from `start` to `end`
    ///
    /// # Example
    /// ```
    /// use spiderweb::prelude::*;
    /// use nalgebra::Point3;
    ///
    /// let strand = Strand::new(Point3::new(0., 0., 0.), Point3::new(2., 0., 0.));
    /// assert_eq!(strand.mid(), &Point3::new(1., 0., 0.));
    /// assert_eq!(strand.length(), 2.);
    /// ```
    pub fn new(start: Point3<T>, end: Point3<T>) -> Self {
        let half: T = convert(0.5);
        Self {
            start,
            mid: start + (end - start) * half,
            end,
        }
    }

    pub fn start(&self) -> &Point3<T> {
        &self.start
    }

    pub fn mid(&self) -> &Point3<T> {
        &self.mid
    }

    pub fn end(&self) -> &Point3<T> {
        &self.end
    }

    pub fn points(&self) -> [Point3<T>; 3] {
        [self.start, self.mid, self.end]
    }

    /// Straight distance between the two ends
    pub fn length(&self) -> T {
        (self.end - self.start).norm()
    }

    /// Check if the strand joins `a` and `b` in either direction
    pub fn connects(&self, a: &Point3<T>, b: &Point3<T>) -> bool {
        (self.start == *a && self.end == *b) || (self.start == *b && self.end == *a)
    }

    /// Move the middle point along z
    pub fn sag(&mut self, offset: T) {
        self.mid.z += offset;
    }

    /// Clamped quadratic NURBS through the three points
    pub fn to_spline(&self, resolution: usize) -> anyhow::Result<Spline<T>> {
        let control_points = self
            .points()
            .into_iter()
            .map(ControlPoint::from)
            .collect();
        let spline = Spline::try_new(control_points, STRAND_ORDER)?
            .with_endpoint(true)
            .with_resolution(resolution);
        Ok(spline)
    }

    pub fn cast<F: FloatingPoint + SupersetOf<T>>(&self) -> Strand<F> {
        Strand {
            start: self.start.cast(),
            mid: self.mid.cast(),
            end: self.end.cast(),
        }
    }
}

impl<'a, T: FloatingPoint> Transformable<&'a Matrix4<T>> for Strand<T> {
    fn transform(&mut self, transform: &'a Matrix4<T>) {
        self.start = transform.transform_point(&self.start);
        self.mid = transform.transform_point(&self.mid);
        self.end = transform.transform_point(&self.end);
    }
}
