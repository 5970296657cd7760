use nalgebra::{Matrix4, Point3};

use crate::{error::SpiderwebError, misc::FloatingPoint};

use super::{CurveSampler, Spline, SplineKind, DEFAULT_RESOLUTION};

/// Container of splines sharing one kind, as handed to a scene builder
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Curve<T: FloatingPoint> {
    name: String,
    splines: Vec<Spline<T>>,
    /// samples per segment when no render resolution is set
    resolution: usize,
    /// overrides `resolution` when non-zero
    render_resolution: usize,
}

impl<T: FloatingPoint> Curve<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            splines: vec![],
            resolution: DEFAULT_RESOLUTION,
            render_resolution: 0,
        }
    }

    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_render_resolution(mut self, resolution: usize) -> Self {
        self.render_resolution = resolution;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn splines(&self) -> &[Spline<T>] {
        &self.splines
    }

    pub fn len(&self) -> usize {
        self.splines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.splines.is_empty()
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn render_resolution(&self) -> usize {
        self.render_resolution
    }

    /// Kind shared by every spline of the curve, `None` while empty
    pub fn kind(&self) -> Option<SplineKind> {
        self.splines.first().map(|s| s.kind())
    }

    /// Add a spline to the curve
    /// # Failures
    /// - the spline kind differs from the kind of the splines already on the curve
    pub fn try_push(&mut self, spline: Spline<T>) -> anyhow::Result<()> {
        if let Some(kind) = self.kind() {
            if kind != spline.kind() {
                anyhow::bail!(SpiderwebError::IncompatibleSplineKind {
                    expected: kind.to_string(),
                    found: spline.kind().to_string(),
                });
            }
        }
        self.splines.push(spline);
        Ok(())
    }

    /// Sample the spline at `index` with the curve resolution
    /// `world` moves the samples out of the local space of the curve
    pub fn sample_spline(
        &self,
        index: usize,
        world: Option<&Matrix4<T>>,
    ) -> anyhow::Result<Vec<Point3<T>>> {
        let spline = self.splines.get(index).ok_or_else(|| {
            anyhow::anyhow!(
                "Spline index {} out of range, the curve holds {} splines",
                index,
                self.splines.len()
            )
        })?;

        let resolution = if self.render_resolution > 0 {
            self.render_resolution
        } else {
            self.resolution
        };
        let mut sampler = CurveSampler::new().with_render_resolution(resolution);
        if let Some(m) = world {
            sampler = sampler.with_transform(*m);
        }
        sampler.sample(spline)
    }
}
