use std::fmt;

use nalgebra::{Matrix4, Point3};
use simba::scalar::SupersetOf;

use crate::{
    error::SpiderwebError,
    knot::{KnotOptions, KnotVector},
    misc::{FloatingPoint, Transformable},
};

use super::ControlPoint;

/// Default number of samples evaluated per parametric segment
pub const DEFAULT_RESOLUTION: usize = 12;

/// Family of a spline
/// all splines of one [`Curve`](super::Curve) share the same kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SplineKind {
    /// Straight segments through the control points
    Poly,
    /// Rational B-spline
    #[default]
    Nurbs,
}

impl fmt::Display for SplineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplineKind::Poly => write!(f, "POLY"),
            SplineKind::Nurbs => write!(f, "NURBS"),
        }
    }
}

/// Spline representation
/// A sparse list of weighted control points with the flags that shape its knot vector
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spline<T: FloatingPoint> {
    control_points: Vec<ControlPoint<T>>,
    /// degree + 1
    order: usize,
    cyclic: bool,
    /// clamp the knot vector so the curve interpolates its end points
    use_endpoint: bool,
    /// bezier-like knot spacing (order 3 or 4 only)
    use_bezier: bool,
    /// samples per parametric segment
    resolution: usize,
    kind: SplineKind,
}

impl<T: FloatingPoint> Spline<T> {
    /// Create a new NURBS spline
    /// The knot flags default to an open (non-clamped) and non-cyclic vector
    /// # Failures
    /// - if the number of control points is less than 2
    /// - if the order is less than 2
    ///
    /// # Example
    /// ```
    /// use spiderweb::prelude::*;
    /// use nalgebra::Point3;
    ///
    /// let spline = Spline::try_new(
    ///     vec![
    ///         Point3::new(0., 0., 0.).into(),
    ///         Point3::new(1., 1., 0.).into(),
    ///         Point3::new(2., 0., 0.).into(),
    ///     ],
    ///     3,
    /// )
    /// .unwrap()
    /// .with_endpoint(true);
    /// assert_eq!(spline.segment_count(), 2);
    /// ```
    pub fn try_new(control_points: Vec<ControlPoint<T>>, order: usize) -> anyhow::Result<Self> {
        if control_points.len() < 2 {
            anyhow::bail!(SpiderwebError::InvalidSplineGeometry(format!(
                "too few control points for spline, got {}",
                control_points.len()
            )));
        }
        if order < 2 {
            anyhow::bail!(SpiderwebError::InvalidSplineGeometry(format!(
                "order must be at least 2, got {}",
                order
            )));
        }

        Ok(Self {
            control_points,
            order,
            cyclic: false,
            use_endpoint: false,
            use_bezier: false,
            resolution: DEFAULT_RESOLUTION,
            kind: SplineKind::Nurbs,
        })
    }

    /// Create a poly spline running straight through the points
    pub fn try_poly(points: &[Point3<T>]) -> anyhow::Result<Self> {
        let control_points = points.iter().map(|p| ControlPoint::from(*p)).collect();
        let spline = Self::try_new(control_points, 2)?;
        Ok(spline.with_kind(SplineKind::Poly))
    }

    pub fn with_cyclic(mut self, cyclic: bool) -> Self {
        self.cyclic = cyclic;
        self
    }

    pub fn with_endpoint(mut self, use_endpoint: bool) -> Self {
        self.use_endpoint = use_endpoint;
        self
    }

    pub fn with_bezier(mut self, use_bezier: bool) -> Self {
        self.use_bezier = use_bezier;
        self
    }

    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_kind(mut self, kind: SplineKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn control_points(&self) -> &[ControlPoint<T>] {
        &self.control_points
    }

    pub fn control_points_iter(&self) -> impl Iterator<Item = &ControlPoint<T>> {
        self.control_points.iter()
    }

    pub fn positions(&self) -> Vec<Point3<T>> {
        self.control_points.iter().map(|p| *p.position()).collect()
    }

    pub fn weights(&self) -> Vec<T> {
        self.control_points.iter().map(|p| p.weight()).collect()
    }

    pub fn point_count(&self) -> usize {
        self.control_points.len()
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn degree(&self) -> usize {
        self.order - 1
    }

    pub fn cyclic(&self) -> bool {
        self.cyclic
    }

    pub fn use_endpoint(&self) -> bool {
        self.use_endpoint
    }

    pub fn use_bezier(&self) -> bool {
        self.use_bezier
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn kind(&self) -> SplineKind {
        self.kind
    }

    /// Knot shape derived from the spline flags
    pub fn knot_options(&self) -> KnotOptions {
        KnotOptions::new(self.point_count(), self.order)
            .with_cyclic(self.cyclic)
            .with_endpoint(self.use_endpoint)
            .with_bezier(self.use_bezier)
    }

    /// Build the knot vector of the spline
    pub fn try_knots(&self) -> anyhow::Result<KnotVector<T>> {
        KnotVector::try_build(&self.knot_options())
    }

    /// Number of parametric segments
    pub fn segment_count(&self) -> usize {
        self.knot_options().segment_count()
    }

    /// Cast the spline to another floating point type
    pub fn cast<F: FloatingPoint + SupersetOf<T>>(&self) -> Spline<F> {
        Spline {
            control_points: self.control_points.iter().map(|p| p.cast()).collect(),
            order: self.order,
            cyclic: self.cyclic,
            use_endpoint: self.use_endpoint,
            use_bezier: self.use_bezier,
            resolution: self.resolution,
            kind: self.kind,
        }
    }
}

/// Move every control point by a homogeneous 4x4 matrix
impl<'a, T: FloatingPoint> Transformable<&'a Matrix4<T>> for Spline<T> {
    fn transform(&mut self, transform: &'a Matrix4<T>) {
        self.control_points
            .iter_mut()
            .for_each(|p| p.transform(transform));
    }
}
