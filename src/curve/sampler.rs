use nalgebra::{convert, Matrix4, Point3, Vector3};

use crate::{
    error::SpiderwebError,
    knot::{evaluate_basis_into, KnotOptions, KnotVector},
    misc::FloatingPoint,
};

use super::{Spline, SplineKind};

/// Relative deviation from 1 tolerated before the basis terms are renormalized
const RATIONAL_EPSILON: f64 = 1e-6;

/// Turns a spline into a dense polyline by a uniform parameter sweep
#[derive(Clone, Debug, PartialEq)]
pub struct CurveSampler<T: FloatingPoint> {
    /// overrides the resolution of the spline when set and non-zero
    render_resolution: Option<usize>,
    /// world transform applied to every sample
    transform: Option<Matrix4<T>>,
}

impl<T: FloatingPoint> CurveSampler<T> {
    pub fn new() -> Self {
        Self {
            render_resolution: None,
            transform: None,
        }
    }

    pub fn render_resolution(&self) -> Option<usize> {
        self.render_resolution
    }

    pub fn transform(&self) -> Option<&Matrix4<T>> {
        self.transform.as_ref()
    }

    pub fn with_render_resolution(mut self, resolution: usize) -> Self {
        self.render_resolution = Some(resolution);
        self
    }

    pub fn with_transform(mut self, transform: Matrix4<T>) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Samples per segment used for the given spline
    pub fn resolution_for(&self, spline: &Spline<T>) -> usize {
        match self.render_resolution {
            Some(r) if r > 0 => r,
            _ => spline.resolution(),
        }
    }

    /// Sample the spline into a polyline
    ///
    /// # Example
    /// ```
    /// use spiderweb::prelude::*;
    /// use nalgebra::Point3;
    /// use approx::assert_relative_eq;
    ///
    /// let start = Point3::new(0., 0., 0.);
    /// let end = Point3::new(2., 0., 0.);
    /// let spline = Spline::try_new(
    ///     vec![start.into(), Point3::new(1., 1., 0.).into(), end.into()],
    ///     3,
    /// )
    /// .unwrap()
    /// .with_endpoint(true)
    /// .with_resolution(4);
    ///
    /// let points = CurveSampler::new().sample(&spline).unwrap();
    /// assert_eq!(points.len(), 8);
    /// assert_relative_eq!(points[0], start);
    /// assert_relative_eq!(points[7], end, epsilon = 1e-9);
    /// ```
    pub fn sample(&self, spline: &Spline<T>) -> anyhow::Result<Vec<Point3<T>>> {
        Ok(self.iter(spline)?.collect())
    }

    /// Sample the spline into a flat coordinate buffer with `stride` values per point
    /// lanes past the third are left at zero
    pub fn sample_coords(&self, spline: &Spline<T>, stride: usize) -> anyhow::Result<Vec<T>> {
        anyhow::ensure!(stride >= 3, "stride must hold 3 coordinates, got {}", stride);
        let samples = self.sample(spline)?;
        let mut coords = vec![T::zero(); samples.len() * stride];
        for (chunk, p) in coords.chunks_exact_mut(stride).zip(samples) {
            chunk[..3].copy_from_slice(p.coords.as_slice());
        }
        Ok(coords)
    }

    /// Lazily sample the spline
    /// the iterator can be recreated at any time and yields the same points
    pub fn iter<'a>(&self, spline: &'a Spline<T>) -> anyhow::Result<SplineSamples<'a, T>> {
        let transform = self.transform;

        if spline.kind() == SplineKind::Poly {
            return Ok(SplineSamples {
                spline,
                evaluator: None,
                transform,
                index: 0,
                total: spline.point_count(),
            });
        }

        let options = spline.knot_options();
        let knots = KnotVector::try_build(&options)?;

        let total = self.resolution_for(spline) * options.segment_count();
        if total == 0 {
            anyhow::bail!(SpiderwebError::EmptySample);
        }

        let (start, end) = knots.domain(&options);
        let divisions = if options.cyclic() { total } else { total - 1 };
        let step = if divisions > 0 {
            (end - start) / T::from_count(divisions)
        } else {
            T::zero()
        };

        let basis = vec![T::zero(); knots.len()];
        Ok(SplineSamples {
            spline,
            evaluator: Some(RationalEvaluator {
                options,
                knots,
                basis,
                terms: Vec::with_capacity(options.order()),
                start,
                step,
            }),
            transform,
            index: 0,
            total,
        })
    }
}

impl<T: FloatingPoint> Default for CurveSampler<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Scratch state of a rational sweep, owned by one iterator
#[derive(Clone, Debug)]
struct RationalEvaluator<T: FloatingPoint> {
    options: KnotOptions,
    knots: KnotVector<T>,
    basis: Vec<T>,
    terms: Vec<T>,
    start: T,
    step: T,
}

impl<T: FloatingPoint> RationalEvaluator<T> {
    fn parameter(&self, index: usize) -> T {
        self.start + self.step * T::from_count(index)
    }

    /// Evaluate the weighted, normalized point at `t`
    /// `None` when `t` falls outside every knot span
    fn point_at(&mut self, spline: &Spline<T>, t: T) -> Option<Point3<T>> {
        let points = spline.control_points();
        let n = points.len();

        let window = evaluate_basis_into(
            t,
            self.options.order(),
            self.options.effective_point_count(),
            self.knots.as_slice(),
            &mut self.basis,
        );
        debug_assert!(window.is_some(), "parameter {:?} left the knot domain", t);
        let (start, end) = window?;

        // cyclic splines reach past the last point and wrap to the first ones
        self.terms.clear();
        let mut sum = T::zero();
        for i in start..=end {
            let term = self.basis[i] * points[i % n].weight();
            self.terms.push(term);
            sum += term;
        }

        let eps: T = convert(RATIONAL_EPSILON);
        if sum != T::zero() && (sum < T::one() - eps || sum > T::one() + eps) {
            self.terms.iter_mut().for_each(|term| *term /= sum);
        }

        let mut position = Vector3::zeros();
        for (term, i) in self.terms.iter().zip(start..=end) {
            if *term != T::zero() {
                position += points[i % n].position().coords * *term;
            }
        }
        Some(Point3::from(position))
    }
}

/// Finite, restartable sequence of samples along one spline
#[derive(Clone, Debug)]
pub struct SplineSamples<'a, T: FloatingPoint> {
    spline: &'a Spline<T>,
    /// `None` for poly splines, which yield their control points
    evaluator: Option<RationalEvaluator<T>>,
    transform: Option<Matrix4<T>>,
    index: usize,
    total: usize,
}

impl<T: FloatingPoint> SplineSamples<'_, T> {
    /// Parameter of the next sample, `None` for poly splines or once exhausted
    pub fn next_parameter(&self) -> Option<T> {
        match &self.evaluator {
            Some(e) if self.index < self.total => Some(e.parameter(self.index)),
            _ => None,
        }
    }
}

impl<T: FloatingPoint> Iterator for SplineSamples<'_, T> {
    type Item = Point3<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.total {
            return None;
        }

        let point = match self.evaluator.as_mut() {
            Some(evaluator) => {
                let t = evaluator.parameter(self.index);
                evaluator.point_at(self.spline, t)
            }
            None => Some(*self.spline.control_points()[self.index].position()),
        };

        // a parameter without a basis window ends the sweep
        let Some(point) = point else {
            self.index = self.total;
            return None;
        };
        self.index += 1;

        Some(match &self.transform {
            Some(m) => m.transform_point(&point),
            None => point,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.total - self.index))
    }
}
