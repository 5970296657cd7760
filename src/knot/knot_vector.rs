use std::ops::Index;

use nalgebra::convert;
use simba::scalar::SupersetOf;

use crate::{error::SpiderwebError, misc::FloatingPoint};

/// Shape of the knot vector to build for a spline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KnotOptions {
    point_count: usize,
    order: usize,
    cyclic: bool,
    use_endpoint: bool,
    use_bezier: bool,
}

impl KnotOptions {
    /// Non-cyclic, non-clamped knots for `point_count` control points of the given order
    pub fn new(point_count: usize, order: usize) -> Self {
        Self {
            point_count,
            order,
            cyclic: false,
            use_endpoint: false,
            use_bezier: false,
        }
    }

    pub fn point_count(&self) -> usize {
        self.point_count
    }

    pub fn order(&self) -> usize {
        self.order
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

    /// Number of knots produced by [`KnotVector::try_build`]
    pub fn knot_count(&self) -> usize {
        if self.cyclic {
            self.order + self.point_count + (self.order - 1)
        } else {
            self.order + self.point_count + self.order
        }
    }

    /// Number of parametric segments the spline is made of
    pub fn segment_count(&self) -> usize {
        if self.cyclic {
            self.point_count
        } else {
            self.point_count.saturating_sub(1)
        }
    }

    /// Point count seen by the basis evaluator
    /// cyclic splines evaluate `order - 1` wrapped points past the last one
    pub fn effective_point_count(&self) -> usize {
        if self.cyclic {
            self.point_count + self.order - 1
        } else {
            self.point_count
        }
    }
}

/// Knot vector representation
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KnotVector<T>(Vec<T>);

impl<T: FloatingPoint> KnotVector<T> {
    pub fn new(knots: Vec<T>) -> Self {
        Self(knots)
    }

    /// Build the knot vector of a spline
    /// # Failures
    /// - `point_count` is zero or `order` is less than 2
    /// - `order` exceeds `point_count` on a non-cyclic spline
    /// - bezier spacing is requested for an order other than 3 or 4
    ///
    /// # Example
    /// ```
    /// use spiderweb::prelude::*;
    /// let options = KnotOptions::new(3, 3).with_endpoint(true);
    /// let knots = KnotVector::<f64>::try_build(&options).unwrap();
    /// assert_eq!(knots.to_vec(), vec![0., 0., 0., 1., 1., 1., 1., 1., 1.]);
    /// assert_eq!(knots.domain(&options), (0., 1.));
    /// ```
    pub fn try_build(options: &KnotOptions) -> anyhow::Result<Self> {
        let pnts = options.point_count;
        let order = options.order;

        if pnts < 1 {
            anyhow::bail!(SpiderwebError::InvalidSplineGeometry(
                "a spline needs at least one control point".to_string()
            ));
        }
        if order < 2 {
            anyhow::bail!(SpiderwebError::InvalidSplineGeometry(format!(
                "order must be at least 2, got {}",
                order
            )));
        }
        if !options.cyclic && order > pnts {
            anyhow::bail!(SpiderwebError::InvalidSplineGeometry(format!(
                "order {} exceeds the point count {}",
                order, pnts
            )));
        }

        let mut knots = vec![T::zero(); options.knot_count()];
        if options.cyclic {
            uniform_knots(&mut knots, pnts + order);
            wrap_cyclic_knots(&mut knots, pnts, order);
        } else {
            if options.use_endpoint {
                endpoint_knots(&mut knots, pnts, order);
            } else if options.use_bezier {
                bezier_knots(&mut knots, pnts, order)?;
            } else {
                uniform_knots(&mut knots, pnts + order);
            }

            // knots past `pnts + order` are never evaluated, keep them on the last value
            let tail = knots[pnts + order - 1];
            knots[pnts + order..].iter_mut().for_each(|k| *k = tail);
        }

        Ok(Self(knots))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.0.clone()
    }

    pub fn first(&self) -> T {
        self.0[0]
    }

    pub fn last(&self) -> T {
        self.0[self.0.len() - 1]
    }

    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    /// Check that no knot is smaller than its predecessor
    pub fn is_non_decreasing(&self) -> bool {
        self.0.windows(2).all(|w| w[0] <= w[1])
    }

    /// Get the evaluation domain of the knot vector
    pub fn domain(&self, options: &KnotOptions) -> (T, T) {
        let start = self.0[options.order - 1];
        let end = if options.cyclic {
            self.0[options.point_count + options.order - 1]
        } else {
            self.0[options.point_count]
        };
        (start, end)
    }

    /// Cast the knot vector to another floating point type
    pub fn cast<F: FloatingPoint + SupersetOf<T>>(&self) -> KnotVector<F> {
        KnotVector::new(self.0.iter().map(|v| convert(*v)).collect())
    }
}

/// `0, 1, 2, ...` over the first `count` knots
fn uniform_knots<T: FloatingPoint>(knots: &mut [T], count: usize) {
    for (a, knot) in knots.iter_mut().take(count).enumerate() {
        *knot = T::from_count(a);
    }
}

/// Integer knots with the first and last `order` entries clamped together
fn endpoint_knots<T: FloatingPoint>(knots: &mut [T], pnts: usize, order: usize) {
    let mut k = 0.0;
    for a in 1..=(pnts + order) {
        knots[a - 1] = convert(k);
        if a >= order && a <= pnts {
            k += 1.0;
        }
    }
}

/// Bezier-like repeated knots, only defined for order 3 and 4
fn bezier_knots<T: FloatingPoint>(knots: &mut [T], pnts: usize, order: usize) -> anyhow::Result<()> {
    match order {
        4 => {
            let mut k = 0.34;
            for knot in knots.iter_mut().take(pnts + order) {
                *knot = convert(f64::floor(k));
                k += 1.0 / 3.0;
            }
        }
        3 => {
            let mut k = 0.6;
            for (a, knot) in knots.iter_mut().take(pnts + order).enumerate() {
                if a >= order && a <= pnts {
                    k += 0.5;
                }
                *knot = convert(f64::floor(k));
            }
        }
        _ => anyhow::bail!(SpiderwebError::UnsupportedConfiguration(format!(
            "bezier knot spacing needs order 3 or 4, got {}",
            order
        ))),
    }
    Ok(())
}

/// Extend uniform knots periodically past the point count so the segments tile the loop
fn wrap_cyclic_knots<T: FloatingPoint>(knots: &mut [T], pnts: usize, order: usize) {
    let order2 = order - 1;

    // a run of coincident knots at the seam would leave a zero-length span
    if order > 2 {
        let b = pnts + order2;
        let coincident = (1..order2).all(|a| knots[b] == knots[b - a]);
        if coincident {
            knots[pnts + order - 2] += T::one();
        }
    }

    let mut b = order;
    for a in (pnts + order2)..(pnts + order + order2) {
        knots[a] = knots[a - 1] + (knots[b] - knots[b - 1]);
        b -= 1;
    }
}

impl<T> Index<usize> for KnotVector<T> {
    type Output = T;
    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<T> FromIterator<T> for KnotVector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
