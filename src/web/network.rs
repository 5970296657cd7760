use nalgebra::Matrix4;

use crate::{
    curve::{Curve, Spline},
    misc::{FloatingPoint, Transformable},
};

use super::Strand;

/// Name given to the curve built from a network
pub const NETWORK_CURVE_NAME: &str = "Spiderweb";

/// Strands produced by one generation request
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrandNetwork<T: FloatingPoint> {
    main: Vec<Strand<T>>,
    sub: Vec<Strand<T>>,
    seed: u64,
    /// samples per segment of the strand splines
    resolution: usize,
}

impl<T: FloatingPoint> StrandNetwork<T> {
    pub(crate) fn new(main: Vec<Strand<T>>, sub: Vec<Strand<T>>, seed: u64, resolution: usize) -> Self {
        Self {
            main,
            sub,
            seed,
            resolution,
        }
    }

    /// Strands between anchor points
    pub fn main(&self) -> &[Strand<T>] {
        &self.main
    }

    /// Strands spanning between main strands
    pub fn sub(&self) -> &[Strand<T>] {
        &self.sub
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn len(&self) -> usize {
        self.main.len() + self.sub.len()
    }

    pub fn is_empty(&self) -> bool {
        self.main.is_empty() && self.sub.is_empty()
    }

    /// All strands, main strands first
    pub fn strands(&self) -> impl Iterator<Item = &Strand<T>> {
        self.main.iter().chain(self.sub.iter())
    }

    /// A spline per strand, in output order
    pub fn splines(&self) -> anyhow::Result<Vec<Spline<T>>> {
        self.strands()
            .map(|strand| strand.to_spline(self.resolution))
            .collect()
    }

    /// Collect the strands into a single NURBS curve
    ///
    /// # Example
    /// ```
    /// use spiderweb::prelude::*;
    /// use nalgebra::Point3;
    ///
    /// let generator = StrandNetworkGenerator::new(
    ///     StrandNetworkOptions::default().with_drape(0., 0.),
    /// )
    /// .unwrap();
    /// let network = generator
    ///     .generate_from_anchors(&[Point3::new(0., 0., 0.), Point3::new(2., 0., 0.)])
    ///     .unwrap();
    /// let curve = network.to_curve().unwrap();
    /// assert_eq!(curve.len(), network.len());
    /// assert_eq!(curve.kind(), Some(SplineKind::Nurbs));
    /// ```
    pub fn to_curve(&self) -> anyhow::Result<Curve<T>> {
        let mut curve = Curve::new(NETWORK_CURVE_NAME).with_resolution(self.resolution);
        for spline in self.splines()? {
            curve.try_push(spline)?;
        }
        Ok(curve)
    }
}

impl<'a, T: FloatingPoint> Transformable<&'a Matrix4<T>> for StrandNetwork<T> {
    fn transform(&mut self, transform: &'a Matrix4<T>) {
        self.main
            .iter_mut()
            .chain(self.sub.iter_mut())
            .for_each(|strand| strand.transform(transform));
    }
}
