use std::collections::HashSet;

use nalgebra::Point3;

use crate::{
    curve::{CurveSampler, Tessellation},
    error::SpiderwebError,
    misc::FloatingPoint,
    random::RandomSource,
    sampling::AnchorSource,
};

use super::{
    mean_length, partition_budget, DrapeSolver, IndexDistribution, Strand, StrandNetwork,
    StrandNetworkOptions,
};

/// Maximum draws spent looking for a distinct partner before giving up
pub const MAX_DRAW_ATTEMPTS: usize = 9999;

/// Builds strand networks from anchor sources
///
/// Every phase restarts the random stream from the seed of the options,
/// so the same sources and options always give the same network.
///
/// # Example
/// ```
/// use spiderweb::prelude::*;
/// use nalgebra::Point3;
///
/// let anchors = vec![
///     Point3::new(0., 0., 0.),
///     Point3::new(4., 0., 0.),
///     Point3::new(4., 4., 0.),
///     Point3::new(0., 4., 0.),
/// ];
/// let generator = StrandNetworkGenerator::new(StrandNetworkOptions::default().with_seed(3)).unwrap();
/// let network = generator.generate_from_anchors(&anchors).unwrap();
/// assert_eq!(network, generator.generate_from_anchors(&anchors).unwrap());
/// assert!(!network.main().is_empty());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct StrandNetworkGenerator {
    options: StrandNetworkOptions,
}

impl StrandNetworkGenerator {
    /// Create a generator
    /// # Failures
    /// - if any option is out of its range
    pub fn new(options: StrandNetworkOptions) -> anyhow::Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &StrandNetworkOptions {
        &self.options
    }

    /// Sample anchors from the sources and span a network between them
    /// # Failures
    /// - if fewer than 2 anchor points are sampled
    /// - if a distinct partner cannot be drawn for a strand
    pub fn generate<T: FloatingPoint>(
        &self,
        sources: &[&dyn AnchorSource<T>],
    ) -> anyhow::Result<StrandNetwork<T>> {
        let mut rng = RandomSource::new(self.options.seed());
        let anchors = self.sample_anchors(sources, &mut rng)?;
        self.span(&anchors, &mut rng)
    }

    /// Span a network between already known anchor points
    pub fn generate_from_anchors<T: FloatingPoint>(
        &self,
        anchors: &[Point3<T>],
    ) -> anyhow::Result<StrandNetwork<T>> {
        let mut rng = RandomSource::new(self.options.seed());
        self.span(anchors, &mut rng)
    }

    /// Spread the amount over the sources in shuffled order and pool the samples
    fn sample_anchors<T: FloatingPoint>(
        &self,
        sources: &[&dyn AnchorSource<T>],
        rng: &mut RandomSource,
    ) -> anyhow::Result<Vec<Point3<T>>> {
        rng.reseed();

        let mut order: Vec<usize> = (0..sources.len()).collect();
        rng.shuffle(&mut order);
        let budget = partition_budget(self.options.amount(), sources.len());

        let mut anchors = vec![];
        for (index, amount) in order.into_iter().zip(budget) {
            let points = sources[index].sample_anchors(amount, self.options.method(), rng)?;
            anchors.extend(points);
        }

        log::debug!(
            "Sampled {} anchor points from {} sources",
            anchors.len(),
            sources.len()
        );
        Ok(anchors)
    }

    fn span<T: FloatingPoint>(
        &self,
        anchors: &[Point3<T>],
        rng: &mut RandomSource,
    ) -> anyhow::Result<StrandNetwork<T>> {
        let distinct = distinct_count(anchors);
        if distinct < 2 {
            anyhow::bail!(SpiderwebError::InsufficientAnchors(distinct));
        }

        let mut main = self.main_strands(anchors, rng)?;
        log::debug!("Spanned {} main strands", main.len());

        let mut sub = self.sub_strands(&main, rng)?;
        log::debug!("Spanned {} sub-strands", sub.len());

        // every tier sags against the mean length of the whole network
        let drape = DrapeSolver::new(self.options.drape_min(), self.options.drape_max())
            .with_length_solver(self.options.length_solver());
        let mean = mean_length(main.iter().chain(sub.iter()));
        drape.apply_with_mean(&mut main, mean, rng);
        drape.apply_with_mean(&mut sub, mean, rng);

        Ok(StrandNetwork::new(
            main,
            sub,
            self.options.seed(),
            self.options.strand_resolution(),
        ))
    }

    /// One strand per anchor and iteration towards another random anchor
    /// A pair of anchors is joined at most once per iteration, so an iteration
    /// can span fewer strands than there are anchors
    fn main_strands<T: FloatingPoint>(
        &self,
        anchors: &[Point3<T>],
        rng: &mut RandomSource,
    ) -> anyhow::Result<Vec<Strand<T>>> {
        rng.reseed();

        let mut strands = Vec::with_capacity(anchors.len() * self.options.main_iterations());
        for _ in 0..self.options.main_iterations() {
            let mut joined = HashSet::new();
            for (i, p) in anchors.iter().enumerate() {
                let j = draw_distinct(rng, anchors.len(), |j| anchors[j] != *p)?;
                if joined.insert((i.min(j), i.max(j))) {
                    strands.push(Strand::new(*p, anchors[j]));
                }
            }
        }
        Ok(strands)
    }

    /// Strands between points picked along two different undraped main strands
    fn sub_strands<T: FloatingPoint>(
        &self,
        main: &[Strand<T>],
        rng: &mut RandomSource,
    ) -> anyhow::Result<Vec<Strand<T>>> {
        if main.len() < 2 {
            log::debug!("Too few main strands to span sub-strands");
            return Ok(vec![]);
        }

        let sampler = CurveSampler::new();
        let polylines = main
            .iter()
            .map(|strand| {
                strand
                    .to_spline(self.options.strand_resolution())?
                    .tessellate(Some(&sampler))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        rng.reseed();

        let per_iteration = main.len().div_ceil(2);
        let mut strands = Vec::with_capacity(per_iteration * self.options.sub_iterations());
        for _ in 0..self.options.sub_iterations() {
            for _ in 0..per_iteration {
                let a = draw_distinct(rng, polylines.len(), |_| true)?;
                let b = draw_distinct(rng, polylines.len(), |b| b != a)?;
                let start = self.pick_point(&polylines[a], rng)?;
                let end = self.pick_point(&polylines[b], rng)?;
                strands.push(Strand::new(start, end));
            }
        }
        Ok(strands)
    }

    /// Pick a point of the polyline, favoring its middle
    fn pick_point<T: FloatingPoint>(
        &self,
        polyline: &[Point3<T>],
        rng: &mut RandomSource,
    ) -> anyhow::Result<Point3<T>> {
        let len = polyline.len();
        if len == 0 {
            anyhow::bail!(SpiderwebError::EmptySample);
        }

        // interior samples only, unless there are none
        let (low, high) = if self.options.include_ends() || len <= 2 {
            (0, len)
        } else {
            (1, len - 1)
        };

        let index = match self.options.distribution() {
            IndexDistribution::Triangular => rng.triangular_index(low, high),
            IndexDistribution::Gaussian => rng.gaussian_index(low, high),
        };
        Ok(polyline[index])
    }
}

/// Number of distinct anchor positions, counted up to 2
fn distinct_count<T: FloatingPoint>(anchors: &[Point3<T>]) -> usize {
    match anchors.first() {
        None => 0,
        Some(first) if anchors.iter().any(|p| p != first) => 2,
        Some(_) => 1,
    }
}

/// Draw an index in `[0, len)` until `accept` holds
fn draw_distinct(
    rng: &mut RandomSource,
    len: usize,
    accept: impl Fn(usize) -> bool,
) -> anyhow::Result<usize> {
    (0..MAX_DRAW_ATTEMPTS)
        .find_map(|_| rng.choose_index(len).filter(|i| accept(*i)))
        .ok_or_else(|| SpiderwebError::RandomSamplingExhausted(MAX_DRAW_ATTEMPTS).into())
}
