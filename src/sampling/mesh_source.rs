use itertools::Itertools;
use nalgebra::{Matrix4, Point3, Vector3};

use crate::{
    misc::{FloatingPoint, Ray},
    random::RandomSource,
};

use super::{AnchorSource, SamplingMethod};

/// Triangle mesh placed in the world by a homogeneous transform
/// Vertices and faces stay in local space, sampled points are returned in world space
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeshSource<T: FloatingPoint> {
    vertices: Vec<Point3<T>>,
    faces: Vec<[usize; 3]>,
    transform: Matrix4<T>,
}

impl<T: FloatingPoint> MeshSource<T> {
    pub fn new(vertices: Vec<Point3<T>>, faces: Vec<[usize; 3]>) -> Self {
        Self {
            vertices,
            faces,
            transform: Matrix4::identity(),
        }
    }

    pub fn with_transform(mut self, transform: Matrix4<T>) -> Self {
        self.transform = transform;
        self
    }

    pub fn vertices(&self) -> &[Point3<T>] {
        &self.vertices
    }

    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    pub fn transform(&self) -> &Matrix4<T> {
        &self.transform
    }

    /// Move a local point into world space
    pub fn to_world(&self, p: &Point3<T>) -> Point3<T> {
        self.transform.transform_point(p)
    }

    /// Unique edges of the faces, as sorted vertex index pairs
    pub fn edges(&self) -> Vec<[usize; 2]> {
        self.faces
            .iter()
            .flat_map(|face| face.iter().circular_tuple_windows())
            .map(|(a, b)| if a < b { [*a, *b] } else { [*b, *a] })
            .unique()
            .collect()
    }

    pub fn triangles(&self) -> Vec<[Point3<T>; 3]> {
        self.faces
            .iter()
            .map(|[a, b, c]| [self.vertices[*a], self.vertices[*b], self.vertices[*c]])
            .collect()
    }

    /// Area of each triangle in local space
    pub fn triangle_areas(&self) -> Vec<T> {
        self.triangles()
            .iter()
            .map(|[a, b, c]| (b - a).cross(&(c - a)).norm() / (T::one() + T::one()))
            .collect()
    }

    pub fn area(&self) -> T {
        self.triangle_areas()
            .into_iter()
            .fold(T::zero(), |a, b| a + b)
    }

    /// Local axis aligned bounds, `None` for a mesh without vertices
    pub fn bounding_box(&self) -> Option<(Point3<T>, Point3<T>)> {
        let first = self.vertices.first()?;
        Some(
            self.vertices
                .iter()
                .fold((*first, *first), |(min, max), p| (min.inf(p), max.sup(p))),
        )
    }

    /// Check whether a local point lies inside the closed mesh
    /// A ray is cast along +X, the point is inside when the nearest face it hits faces +X
    pub fn contains(&self, p: &Point3<T>) -> bool {
        let ray = Ray::new(*p, Vector3::x());
        self.triangles()
            .iter()
            .filter_map(|[a, b, c]| ray.intersect_triangle(a, b, c).map(|t| (t, a, b, c)))
            .min_by(|x, y| x.0.partial_cmp(&y.0).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(_, a, b, c)| (b - a).cross(&(c - a)).x > T::zero())
            .unwrap_or(false)
    }
}

impl<T: FloatingPoint> AnchorSource<T> for MeshSource<T> {
    fn sample_anchors(
        &self,
        amount: usize,
        method: SamplingMethod,
        rng: &mut RandomSource,
    ) -> anyhow::Result<Vec<Point3<T>>> {
        method.sample(self, amount, rng)
    }
}
