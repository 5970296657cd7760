use std::cell::RefCell;

use approx::assert_relative_eq;
use nalgebra::{Matrix4, Point3, Vector3};

use super::*;
use crate::{
    error::SpiderwebError,
    misc::Transformable,
    random::RandomSource,
    sampling::{AnchorSource, MeshSource, SamplingMethod},
};

/// Source drawing from a fixed list, recording the requested amounts
struct FixedPoints {
    points: Vec<Point3<f64>>,
    requests: RefCell<Vec<usize>>,
}

impl FixedPoints {
    fn new(points: Vec<Point3<f64>>) -> Self {
        Self {
            points,
            requests: RefCell::new(vec![]),
        }
    }
}

impl AnchorSource<f64> for FixedPoints {
    fn sample_anchors(
        &self,
        amount: usize,
        _method: SamplingMethod,
        rng: &mut RandomSource,
    ) -> anyhow::Result<Vec<Point3<f64>>> {
        self.requests.borrow_mut().push(amount);
        Ok((0..amount)
            .filter_map(|_| rng.choose(&self.points).copied())
            .collect())
    }
}

fn triangle() -> MeshSource<f64> {
    MeshSource::new(
        vec![
            Point3::new(0., 0., 0.),
            Point3::new(1., 0., 0.),
            Point3::new(0., 1., 0.),
        ],
        vec![[0, 1, 2]],
    )
}

fn grid(n: usize) -> Vec<Point3<f64>> {
    (0..n)
        .flat_map(|i| (0..n).map(move |j| Point3::new(i as f64 * 2., j as f64 * 3., 0.)))
        .collect()
}

fn error_kind(err: &anyhow::Error) -> &SpiderwebError {
    SpiderwebError::kind_of(err).unwrap()
}

fn distance_to_segment(p: &Point3<f64>, a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    let ab = b - a;
    let t = ((p - a).dot(&ab) / ab.norm_squared()).clamp(0., 1.);
    (p - (a + ab * t)).norm()
}

#[test]
fn partition_budget_spreads_the_remainder() {
    let mut budget = partition_budget(23, 5);
    assert_eq!(budget.iter().sum::<usize>(), 23);
    budget.sort();
    assert_eq!(budget, vec![4, 4, 5, 5, 5]);

    assert_eq!(partition_budget(3, 5), vec![1, 1, 1, 0, 0]);
    assert_eq!(partition_budget(10, 1), vec![10]);
    assert!(partition_budget(10, 0).is_empty());
}

#[test]
fn strand_starts_straight() {
    let strand = Strand::new(Point3::new(1., 2., 3.), Point3::new(3., 6., -1.));
    assert_eq!(strand.mid(), &Point3::new(2., 4., 1.));
    assert_relative_eq!(strand.length(), 6.);
    assert!(strand.connects(&Point3::new(3., 6., -1.), &Point3::new(1., 2., 3.)));

    let mut sagged = strand.clone();
    sagged.sag(-0.25);
    assert_eq!(sagged.start(), strand.start());
    assert_eq!(sagged.end(), strand.end());
    assert_eq!(sagged.mid(), &Point3::new(2., 4., 0.75));
}

#[test]
fn strand_converts_to_clamped_quadratic() {
    let strand = Strand::new(Point3::new(0., 0., 0.), Point3::new(2., 0., 0.));
    let spline = strand.to_spline(12).unwrap();
    assert_eq!(spline.order(), 3);
    assert_eq!(spline.point_count(), 3);
    assert_eq!(spline.resolution(), 12);
    assert!(spline.use_endpoint());
    assert!(!spline.cyclic());
    assert_eq!(spline.positions(), strand.points().to_vec());
}

#[test]
fn strand_transform_moves_every_point() {
    let strand = Strand::new(Point3::new(0., 0., 0.), Point3::new(2., 0., 0.));
    let m = Matrix4::new_translation(&Vector3::new(0., 1., 0.));
    let moved = strand.transformed(&m);
    assert_eq!(moved.points()[1], Point3::new(1., 1., 0.));
}

#[test]
fn drape_scales_with_length() {
    let mut strands = vec![
        Strand::new(Point3::new(0., 0., 0.), Point3::new(1., 0., 0.)),
        Strand::new(Point3::new(0., 0., 0.), Point3::new(0., 3., 0.)),
        Strand::new(Point3::new(1., 1., 0.), Point3::new(1., 1., 0.)),
        Strand::new(Point3::new(-4., 0., 0.), Point3::new(4., 0., 0.)),
    ];
    let mean = (1. + 3. + 0. + 8.) / 4.;
    let d = -0.5;
    DrapeSolver::new(d, d).apply(&mut strands, &mut RandomSource::new(0));

    for strand in strands.iter() {
        assert_relative_eq!(strand.mid().z, d * strand.length() / mean);
    }
}

#[test]
fn drape_stays_within_range_without_length_solver() {
    let mut strands: Vec<_> = grid(4)
        .windows(2)
        .map(|w| Strand::new(w[0], w[1]))
        .collect();
    let solver = DrapeSolver::new(0.5, -1.5).with_length_solver(false);
    solver.apply(&mut strands, &mut RandomSource::new(5));

    assert!(strands.iter().all(|s| (-1.5..=0.5).contains(&s.mid().z)));
}

#[test]
fn drape_restarts_the_stream() {
    let base: Vec<_> = grid(3)
        .windows(2)
        .map(|w| Strand::new(w[0], w[1]))
        .collect();
    let solver = DrapeSolver::new(-1., 0.);
    let mut rng = RandomSource::new(9);

    let mut a = base.clone();
    solver.apply(&mut a, &mut rng);
    let mut b = base.clone();
    solver.apply(&mut b, &mut rng);
    assert_eq!(a, b);
}

#[test]
fn drape_of_zero_length_strands_is_unscaled() {
    let p = Point3::new(1., 1., 1.);
    let mut strands = vec![Strand::new(p, p), Strand::new(p, p)];
    DrapeSolver::new(-0.5, -0.5).apply(&mut strands, &mut RandomSource::new(0));
    assert!(strands.iter().all(|s| s.mid().z == 0.5));
}

#[test]
fn options_are_validated() {
    let cases = [
        (StrandNetworkOptions::default().with_amount(1), "amount"),
        (
            StrandNetworkOptions::default().with_amount(1_000_000),
            "amount",
        ),
        (
            StrandNetworkOptions::default().with_main_iterations(0),
            "main_iterations",
        ),
        (
            StrandNetworkOptions::default().with_main_iterations(101),
            "main_iterations",
        ),
        (
            StrandNetworkOptions::default().with_strand_resolution(0),
            "strand_resolution",
        ),
        (
            StrandNetworkOptions::default().with_drape(f64::NAN, 0.),
            "drape_min",
        ),
    ];
    for (options, expected) in cases {
        let err = StrandNetworkGenerator::new(options).unwrap_err();
        match error_kind(&err) {
            SpiderwebError::InvalidOption { name, .. } => assert_eq!(*name, expected),
            other => panic!("unexpected error {:?}", other),
        }
    }
    assert!(StrandNetworkGenerator::new(StrandNetworkOptions::default()).is_ok());
}

#[test]
fn two_anchors_give_a_single_strand() {
    let a = Point3::new(0., 0., 0.);
    let b = Point3::new(2., 0., 0.);
    let generator = StrandNetworkGenerator::new(
        StrandNetworkOptions::default()
            .with_seed(0)
            .with_main_iterations(1)
            .with_drape(0., 0.),
    )
    .unwrap();
    let network = generator.generate_from_anchors(&[a, b]).unwrap();

    assert_eq!(network.main().len(), 1);
    assert_eq!(network.main()[0].points(), [a, Point3::new(1., 0., 0.), b]);
    assert!(network.sub().is_empty());
}

#[test]
fn every_main_iteration_spans_strands() {
    let a = Point3::new(0., 0., 0.);
    let b = Point3::new(2., 0., 0.);
    let generator = StrandNetworkGenerator::new(
        StrandNetworkOptions::default()
            .with_main_iterations(3)
            .with_drape(0., 0.),
    )
    .unwrap();
    let network = generator.generate_from_anchors(&[a, b]).unwrap();
    assert_eq!(network.main().len(), 3);
    assert!(network.main().iter().all(|s| s.connects(&a, &b)));
}

#[test]
fn a_single_anchor_is_insufficient() {
    let generator = StrandNetworkGenerator::new(StrandNetworkOptions::default()).unwrap();

    let err = generator
        .generate_from_anchors(&[Point3::new(0., 0., 0.)])
        .unwrap_err();
    assert_eq!(error_kind(&err), &SpiderwebError::InsufficientAnchors(1));

    // a pivot yields one point whatever the amount
    let generator = StrandNetworkGenerator::new(
        StrandNetworkOptions::default().with_method(SamplingMethod::Pivot),
    )
    .unwrap();
    let mesh = triangle();
    let sources: [&dyn AnchorSource<f64>; 1] = [&mesh];
    let err = generator.generate(&sources).unwrap_err();
    assert_eq!(error_kind(&err), &SpiderwebError::InsufficientAnchors(1));

    let err = generator.generate::<f64>(&[]).unwrap_err();
    assert_eq!(error_kind(&err), &SpiderwebError::InsufficientAnchors(0));
}

#[test]
fn identical_anchors_are_insufficient() {
    let p = Point3::new(1., 1., 1.);
    let generator = StrandNetworkGenerator::new(StrandNetworkOptions::default()).unwrap();
    let err = generator.generate_from_anchors(&[p, p, p]).unwrap_err();
    assert_eq!(error_kind(&err), &SpiderwebError::InsufficientAnchors(1));
}

#[test]
fn coincident_vertex_samples_never_exhaust_the_draw() {
    let mesh = triangle();
    let sources: [&dyn AnchorSource<f64>; 1] = [&mesh];
    for seed in 0..40 {
        let generator = StrandNetworkGenerator::new(
            StrandNetworkOptions::default()
                .with_amount(2)
                .with_method(SamplingMethod::Vertices)
                .with_seed(seed),
        )
        .unwrap();
        match generator.generate(&sources) {
            Ok(network) => assert_eq!(network.main().len(), 1),
            Err(err) => assert_eq!(error_kind(&err), &SpiderwebError::InsufficientAnchors(1)),
        }
    }
}

#[test]
fn drape_uses_the_mean_of_main_and_sub_strands() {
    let d = -1.;
    let generator =
        StrandNetworkGenerator::new(StrandNetworkOptions::default().with_drape(d, d)).unwrap();
    let network = generator.generate_from_anchors(&grid(3)).unwrap();
    assert!(!network.sub().is_empty());

    let mean = mean_length(network.strands()).unwrap();
    for strand in network.strands() {
        let straight = Strand::new(*strand.start(), *strand.end());
        assert_relative_eq!(
            strand.mid().z - straight.mid().z,
            d * strand.length() / mean,
            epsilon = 1e-12
        );
    }
}

#[test]
fn mean_length_skips_empty_and_zero_length_sets() {
    let p = Point3::new(1., 2., 3.);
    let empty: [Strand<f64>; 0] = [];
    assert_eq!(mean_length(&empty), None);
    assert_eq!(mean_length(&[Strand::new(p, p)]), None);
    let strands = [
        Strand::new(p, Point3::new(1., 2., 5.)),
        Strand::new(p, Point3::new(1., 6., 3.)),
    ];
    assert_eq!(mean_length(&strands), Some(3.));
}

#[test]
fn two_samples_from_one_source() {
    let generator = StrandNetworkGenerator::new(
        StrandNetworkOptions::default()
            .with_amount(2)
            .with_method(SamplingMethod::Surface),
    )
    .unwrap();
    let mesh = triangle();
    let sources: [&dyn AnchorSource<f64>; 1] = [&mesh];
    let network = generator.generate(&sources).unwrap();

    assert_eq!(network.main().len(), 1);
    let strand = &network.main()[0];
    assert_ne!(strand.start(), strand.end());
    assert_relative_eq!(strand.start().z, 0.);
    assert_relative_eq!(strand.end().z, 0.);
}

#[test]
fn amount_is_partitioned_over_sources() {
    let sources: Vec<_> = (0..5)
        .map(|i| FixedPoints::new(vec![Point3::new(i as f64, 0., 0.), Point3::new(i as f64, 1., 0.)]))
        .collect();
    let refs: Vec<&dyn AnchorSource<f64>> =
        sources.iter().map(|s| s as &dyn AnchorSource<f64>).collect();

    let generator =
        StrandNetworkGenerator::new(StrandNetworkOptions::default().with_amount(23)).unwrap();
    generator.generate(&refs).unwrap();

    let mut requests: Vec<usize> = sources
        .iter()
        .flat_map(|s| s.requests.borrow().clone())
        .collect();
    requests.sort();
    assert_eq!(requests, vec![4, 4, 5, 5, 5]);
}

#[test]
fn generation_is_reproducible() {
    let mesh = triangle().with_transform(Matrix4::new_nonuniform_scaling(&Vector3::new(10., 10., 10.)));
    let other = triangle().with_transform(Matrix4::new_translation(&Vector3::new(0., 0., 5.)));
    let sources: [&dyn AnchorSource<f64>; 2] = [&mesh, &other];
    let options = StrandNetworkOptions::default().with_amount(30).with_seed(42);

    let generator = StrandNetworkGenerator::new(options.clone()).unwrap();
    let a = generator.generate(&sources).unwrap();
    let b = generator.generate(&sources).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.seed(), 42);

    let generator = StrandNetworkGenerator::new(options.with_seed(43)).unwrap();
    let c = generator.generate(&sources).unwrap();
    assert_ne!(a, c);
}

#[test]
fn sub_strands_per_iteration() {
    let anchors = grid(3);
    for iterations in [0, 1, 4] {
        let generator = StrandNetworkGenerator::new(
            StrandNetworkOptions::default()
                .with_sub_iterations(iterations)
                .with_seed(7),
        )
        .unwrap();
        let network = generator.generate_from_anchors(&anchors).unwrap();
        let main = network.main().len();
        assert!(main >= 2);
        assert_eq!(network.sub().len(), main.div_ceil(2) * iterations);
    }
}

#[test]
fn sub_strands_hang_between_main_strands() {
    let anchors = grid(3);
    for distribution in [IndexDistribution::Triangular, IndexDistribution::Gaussian] {
        for include_ends in [false, true] {
            let generator = StrandNetworkGenerator::new(
                StrandNetworkOptions::default()
                    .with_drape(0., 0.)
                    .with_distribution(distribution)
                    .with_include_ends(include_ends),
            )
            .unwrap();
            let network = generator.generate_from_anchors(&anchors).unwrap();
            assert!(!network.sub().is_empty());

            let on_main = |p: &Point3<f64>| {
                network
                    .main()
                    .iter()
                    .any(|m| distance_to_segment(p, m.start(), m.end()) < 1e-9)
            };
            for sub in network.sub() {
                assert!(on_main(sub.start()));
                assert!(on_main(sub.end()));
                if !include_ends {
                    assert!(!anchors.contains(sub.start()));
                    assert!(!anchors.contains(sub.end()));
                }
            }
        }
    }
}

#[test]
fn curve_lists_main_strands_first() {
    let generator = StrandNetworkGenerator::new(
        StrandNetworkOptions::default()
            .with_strand_resolution(6)
            .with_seed(1),
    )
    .unwrap();
    let network = generator.generate_from_anchors(&grid(3)).unwrap();
    let curve = network.to_curve().unwrap();

    assert_eq!(curve.len(), network.main().len() + network.sub().len());
    assert_eq!(curve.resolution(), 6);
    for (spline, strand) in curve.splines().iter().zip(network.strands()) {
        assert_eq!(spline.positions(), strand.points().to_vec());
        assert_eq!(spline.order(), 3);
        assert!(spline.use_endpoint());
    }
    assert_eq!(
        curve.splines()[0].positions(),
        network.main()[0].points().to_vec()
    );
    assert_eq!(
        curve.splines()[network.main().len()].positions(),
        network.sub()[0].points().to_vec()
    );
}

#[test]
fn network_moves_as_a_whole() {
    let generator = StrandNetworkGenerator::new(StrandNetworkOptions::default()).unwrap();
    let network = generator.generate_from_anchors(&grid(2)).unwrap();
    let offset = Vector3::new(0., 0., 2.);
    let moved = network.transformed(&Matrix4::new_translation(&offset));
    for (a, b) in network.strands().zip(moved.strands()) {
        assert_relative_eq!(b.mid().z, a.mid().z + 2.);
    }
}
