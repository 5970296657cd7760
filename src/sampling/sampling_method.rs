use nalgebra::{convert, Point3};

use crate::{misc::FloatingPoint, random::RandomSource};

use super::MeshSource;

/// Maximum rejection attempts per point when sampling a volume
const VOLUME_MAX_ATTEMPTS: usize = 999;

/// Where the end points of the strands are sampled from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SamplingMethod {
    /// The origin of the object (a single point per object)
    Pivot,
    /// Random vertices
    Vertices,
    /// Random points on the edges
    Edges,
    /// Random points on the surface, uniform over the area
    #[default]
    Surface,
    /// Random points inside the enclosed volume
    Volume,
}

impl SamplingMethod {
    /// Sample `amount` world space points from the mesh
    /// `Pivot` always yields one point, `Volume` may yield fewer when rejection sampling gives up
    pub fn sample<T: FloatingPoint>(
        &self,
        mesh: &MeshSource<T>,
        amount: usize,
        rng: &mut RandomSource,
    ) -> anyhow::Result<Vec<Point3<T>>> {
        match self {
            SamplingMethod::Pivot => Ok(vec![mesh.to_world(&Point3::origin())]),
            SamplingMethod::Vertices => sample_vertices(mesh, amount, rng),
            SamplingMethod::Edges => sample_edges(mesh, amount, rng),
            SamplingMethod::Surface => sample_surface(mesh, amount, rng),
            SamplingMethod::Volume => sample_volume(mesh, amount, rng),
        }
    }
}

fn sample_vertices<T: FloatingPoint>(
    mesh: &MeshSource<T>,
    amount: usize,
    rng: &mut RandomSource,
) -> anyhow::Result<Vec<Point3<T>>> {
    anyhow::ensure!(!mesh.vertices().is_empty(), "Mesh has no vertices to sample");
    Ok((0..amount)
        .filter_map(|_| rng.choose(mesh.vertices()).map(|v| mesh.to_world(v)))
        .collect())
}

fn sample_edges<T: FloatingPoint>(
    mesh: &MeshSource<T>,
    amount: usize,
    rng: &mut RandomSource,
) -> anyhow::Result<Vec<Point3<T>>> {
    let edges = mesh.edges();
    anyhow::ensure!(!edges.is_empty(), "Mesh has no edges to sample");
    let vertices = mesh.vertices();
    let mut points = Vec::with_capacity(amount);
    for _ in 0..amount {
        if let Some([a, b]) = rng.choose(&edges) {
            let f: T = convert(rng.unit());
            let p = vertices[*a] + (vertices[*b] - vertices[*a]) * f;
            points.push(mesh.to_world(&p));
        }
    }
    Ok(points)
}

fn sample_surface<T: FloatingPoint>(
    mesh: &MeshSource<T>,
    amount: usize,
    rng: &mut RandomSource,
) -> anyhow::Result<Vec<Point3<T>>> {
    let triangles = mesh.triangles();
    let areas = mesh.triangle_areas();
    let cumulative: Vec<T> = areas
        .iter()
        .scan(T::zero(), |acc, a| {
            *acc += *a;
            Some(*acc)
        })
        .collect();
    let total = cumulative.last().copied().unwrap_or(T::zero());
    anyhow::ensure!(total > T::zero(), "Mesh has no surface area to sample");

    let mut points = Vec::with_capacity(amount);
    for _ in 0..amount {
        let r = rng.uniform(T::zero(), total);
        let index = cumulative
            .partition_point(|c| *c <= r)
            .min(triangles.len() - 1);
        let [a, b, c] = &triangles[index];

        // uniform barycentric coordinates
        let r1 = rng.unit().sqrt();
        let r2 = rng.unit();
        let wa: T = convert(1.0 - r1);
        let wb: T = convert(r1 * (1.0 - r2));
        let wc: T = convert(r1 * r2);
        let p = Point3::from(a.coords * wa + b.coords * wb + c.coords * wc);
        points.push(mesh.to_world(&p));
    }
    Ok(points)
}

fn sample_volume<T: FloatingPoint>(
    mesh: &MeshSource<T>,
    amount: usize,
    rng: &mut RandomSource,
) -> anyhow::Result<Vec<Point3<T>>> {
    anyhow::ensure!(!mesh.faces().is_empty(), "Mesh has no faces to enclose a volume");
    let Some((min, max)) = mesh.bounding_box() else {
        anyhow::bail!("Mesh has no vertices to sample");
    };

    let mut points = Vec::with_capacity(amount);
    let mut misses = 0;
    for _ in 0..amount {
        let hit = (0..VOLUME_MAX_ATTEMPTS).find_map(|_| {
            let p = Point3::new(
                rng.uniform(min.x, max.x),
                rng.uniform(min.y, max.y),
                rng.uniform(min.z, max.z),
            );
            mesh.contains(&p).then_some(p)
        });
        match hit {
            Some(p) => points.push(mesh.to_world(&p)),
            None => misses += 1,
        }
    }

    if misses > 0 {
        log::warn!(
            "Max attempts reached, sampled {} points less than requested",
            misses
        );
    }

    Ok(points)
}
