use std::ops::RangeInclusive;

use crate::misc::FloatingPoint;

/// Basis function values at one parameter, with the window of non-zero entries
#[derive(Clone, Debug, PartialEq)]
pub struct BasisWindow<T> {
    weights: Vec<T>,
    active: Option<(usize, usize)>,
}

impl<T: FloatingPoint> BasisWindow<T> {
    /// All basis values, indexed by (effective) control point
    pub fn weights(&self) -> &[T] {
        &self.weights
    }

    pub fn start(&self) -> Option<usize> {
        self.active.map(|(s, _)| s)
    }

    pub fn end(&self) -> Option<usize> {
        self.active.map(|(_, e)| e)
    }

    /// Inclusive range of non-zero weights
    pub fn range(&self) -> Option<RangeInclusive<usize>> {
        self.active.map(|(s, e)| s..=e)
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_none()
    }

    /// Iterate `(index, weight)` over the active window only
    pub fn iter(&self) -> impl Iterator<Item = (usize, T)> + '_ {
        self.range()
            .into_iter()
            .flatten()
            .map(move |i| (i, self.weights[i]))
    }

    /// Sum of the active weights
    pub fn sum(&self) -> T {
        self.iter().fold(T::zero(), |acc, (_, w)| acc + w)
    }
}

/// Evaluate the basis functions of the given order at `t`
///
/// # Example
/// ```
/// use spiderweb::prelude::*;
/// use approx::assert_relative_eq;
/// let options = KnotOptions::new(4, 3).with_endpoint(true);
/// let knots = KnotVector::<f64>::try_build(&options).unwrap();
/// let basis = evaluate_basis(0.5, 3, 4, knots.as_slice());
/// assert_eq!(basis.range(), Some(0..=2));
/// assert_relative_eq!(basis.sum(), 1.0, epsilon = 1e-9);
/// ```
pub fn evaluate_basis<T: FloatingPoint>(
    t: T,
    order: usize,
    point_count: usize,
    knots: &[T],
) -> BasisWindow<T> {
    let mut weights = vec![T::zero(); knots.len().max(order + point_count)];
    let active = evaluate_basis_into(t, order, point_count, knots, &mut weights);
    BasisWindow { weights, active }
}

/// Evaluate the basis functions into a caller owned scratch buffer
/// Returns the inclusive `(start, end)` indices of the non-zero weights
///
/// `knots` and `basis` must hold at least `order + point_count` entries.
pub fn evaluate_basis_into<T: FloatingPoint>(
    t: T,
    order: usize,
    point_count: usize,
    knots: &[T],
    basis: &mut [T],
) -> Option<(usize, usize)> {
    let order_plus_points = order + point_count;
    let last = order_plus_points - 1;
    debug_assert!(knots.len() >= order_plus_points);
    debug_assert!(basis.len() >= order_plus_points);

    // floating point drift at the domain boundary
    let t = t.clamp(knots[0], knots[last]);

    basis[..order_plus_points]
        .iter_mut()
        .for_each(|b| *b = T::zero());

    // order 1
    let span = (0..last)
        .find(|&i| knots[i] != knots[i + 1] && t >= knots[i] && t <= knots[i + 1])?;
    basis[span] = T::one();

    let lower = span.saturating_sub(order + 1);
    let mut upper = span;

    // order 2, 3, ...
    for j in 2..=order {
        if upper + j >= order_plus_points {
            upper = last - j;
        }

        for i in lower..=upper {
            let d = if basis[i] != T::zero() {
                let width = knots[i + j - 1] - knots[i];
                if width != T::zero() {
                    (t - knots[i]) * basis[i] / width
                } else {
                    T::zero()
                }
            } else {
                T::zero()
            };

            let e = if basis[i + 1] != T::zero() {
                let width = knots[i + j] - knots[i + 1];
                if width != T::zero() {
                    (knots[i + j] - t) * basis[i + 1] / width
                } else {
                    T::zero()
                }
            } else {
                T::zero()
            };

            basis[i] = d + e;
        }
    }

    let mut active = None;
    for i in lower..=upper {
        if basis[i] > T::zero() {
            active = match active {
                None => Some((i, i)),
                Some((start, _)) => Some((start, i)),
            };
        }
    }
    active
}
