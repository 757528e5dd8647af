use std::cmp::Ordering;

use arrsweeper::sweep::IncidentEnd;
use arrsweeper::{
    sweep, sweep_with_config, Arrangement, CountingGeometry, CurveEnd, Edge, Error, EventPoint,
    Geometry, GeometryError, Intersection, LinearCurve, LinearGeometry, LinearObject, LinearPoint,
    Operation, SweepConfig, Sweeper, VertexIdx, Visitor, XMonotone,
};
use assert_matches::assert_matches;
use kurbo::{Point, Vec2};
use num::{BigInt, BigRational};
use proptest::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn p(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

// An exact point, for looking up vertices.
fn v(x: f64, y: f64) -> LinearPoint {
    LinearPoint::new(x, y)
}

fn ratio(n: i64, d: i64) -> BigRational {
    BigRational::new(BigInt::from(n), BigInt::from(d))
}

fn seg(x0: f64, y0: f64, x1: f64, y1: f64) -> LinearObject {
    LinearObject::Segment(p(x0, y0), p(x1, y1))
}

fn unmerged() -> SweepConfig {
    SweepConfig {
        merge_mergeable_curves: false,
    }
}

fn arrangement(objects: &[LinearObject], config: SweepConfig) -> Arrangement<LinearPoint, LinearCurve> {
    init_tracing();
    let mut arr = Arrangement::new();
    sweep_with_config(&LinearGeometry, objects.to_vec(), config, &mut arr).unwrap();
    arr
}

/// Writes down every notification, in order.
#[derive(Debug, Default, PartialEq)]
struct Recorder {
    log: Vec<String>,
}

impl Visitor<LinearGeometry> for Recorder {
    fn vertex_created(
        &mut self,
        vertex: VertexIdx,
        point: &EventPoint<LinearPoint, LinearCurve>,
        incident: &[IncidentEnd<LinearCurve>],
    ) {
        self.log
            .push(format!("vertex {vertex:?} at {point}: {incident:?}"));
    }

    fn edge_created(&mut self, edge: &Edge<LinearCurve>, left: VertexIdx, right: VertexIdx) {
        self.log.push(format!("edge {left:?}-{right:?}: {edge:?}"));
    }

    fn curves_merged(&mut self, originals: &[LinearCurve], result: &LinearCurve) {
        self.log.push(format!("merged {originals:?} into {result:?}"));
    }
}

#[test]
fn crossing_segments() {
    let arr = arrangement(
        &[seg(0.0, 0.0, 2.0, 2.0), seg(0.0, 2.0, 2.0, 0.0)],
        SweepConfig::default(),
    );
    assert_eq!(arr.num_vertices(), 5);
    assert_eq!(arr.num_edges(), 4);

    let center = arr.find_vertex(&LinearGeometry, &v(1.0, 1.0)).unwrap();
    assert_eq!(arr.vertex(center).unwrap().degree, 4);
    let interior: Vec<_> = arr.vertices().iter().filter(|v| v.degree > 1).collect();
    assert_eq!(interior.len(), 1);
    assert_eq!(arr.num_faces(), Some(1));
}

#[test]
fn vertical_crosses_horizontal() {
    let arr = arrangement(
        &[seg(1.0, 0.0, 1.0, 2.0), seg(0.0, 1.0, 2.0, 1.0)],
        SweepConfig::default(),
    );
    assert_eq!(arr.num_vertices(), 5);
    assert_eq!(arr.num_edges(), 4);
    let center = arr.find_vertex(&LinearGeometry, &v(1.0, 1.0)).unwrap();
    assert_eq!(arr.vertex(center).unwrap().degree, 4);
}

#[test]
fn vertical_curves_are_located_by_extent() {
    init_tracing();
    // A vertical segment with an isolated point on it: locating the point
    // never needs to evaluate the vertical segment at an x coordinate.
    let g = CountingGeometry::new(LinearGeometry);
    let mut arr = Arrangement::new();
    sweep(
        &g,
        [seg(1.0, 0.0, 1.0, 2.0), seg(1.0, 1.0, 1.0, 1.0)],
        &mut arr,
    )
    .unwrap();
    assert_eq!(g.count(Operation::CompareYAtX), 0);
    assert_eq!(arr.num_vertices(), 3);
    assert_eq!(arr.num_edges(), 2);
    let middle = arr.find_vertex(g.inner(), &v(1.0, 1.0)).unwrap();
    assert_eq!(arr.vertex(middle).unwrap().degree, 2);
}

#[test]
fn collinear_chain_is_merged() {
    init_tracing();
    let input = [
        seg(0.0, 0.0, 1.0, 1.0),
        seg(1.0, 1.0, 2.0, 2.0),
        seg(2.0, 2.0, 3.0, 3.0),
    ];
    let mut arr = Arrangement::new();
    sweep(&LinearGeometry, input.clone(), &mut arr).unwrap();

    assert_eq!(arr.num_vertices(), 2);
    assert_eq!(arr.num_edges(), 1);
    let edge = &arr.edges()[0].edge;
    assert_eq!(edge.curve.min(), Some(&v(0.0, 0.0)));
    assert_eq!(edge.curve.max(), Some(&v(3.0, 3.0)));
    assert_eq!(edge.multiplicity, 1);
    assert_eq!(edge.sources, vec![0, 1, 2]);
    assert_eq!(arr.merges().len(), 1);
    assert_eq!(arr.merges()[0].0.len(), 3);

    // Both vertices come first, then the merge, then the edge.
    let mut rec = Recorder::default();
    sweep(&LinearGeometry, input, &mut rec).unwrap();
    assert_eq!(rec.log.len(), 4);
    assert!(rec.log[0].starts_with("vertex v_0"));
    assert!(rec.log[1].starts_with("vertex v_1"));
    assert!(rec.log[2].starts_with("merged"));
    assert!(rec.log[3].starts_with("edge v_0-v_1"));
}

#[test]
fn collinear_chain_without_merging() {
    let arr = arrangement(
        &[
            seg(0.0, 0.0, 1.0, 1.0),
            seg(1.0, 1.0, 2.0, 2.0),
            seg(2.0, 2.0, 3.0, 3.0),
        ],
        unmerged(),
    );
    assert_eq!(arr.num_vertices(), 4);
    assert_eq!(arr.num_edges(), 3);
    assert!(arr.merges().is_empty());
}

#[test]
fn overlapping_segments() {
    let arr = arrangement(
        &[seg(0.0, 0.0, 2.0, 0.0), seg(1.0, 0.0, 3.0, 0.0)],
        SweepConfig::default(),
    );
    assert_eq!(arr.num_vertices(), 4);
    let edges: Vec<_> = arr
        .edges()
        .iter()
        .map(|e| {
            (
                e.edge.curve.min().unwrap().to_point().x,
                e.edge.curve.max().unwrap().to_point().x,
                e.edge.multiplicity,
                e.edge.sources.clone(),
            )
        })
        .collect();
    assert_eq!(
        edges,
        vec![
            (0.0, 1.0, 1, vec![0]),
            (1.0, 2.0, 2, vec![0, 1]),
            (2.0, 3.0, 1, vec![1]),
        ]
    );
}

#[test]
fn identical_segments_share_an_edge() {
    let arr = arrangement(
        &[seg(0.0, 0.0, 2.0, 1.0), seg(2.0, 1.0, 0.0, 0.0)],
        SweepConfig::default(),
    );
    assert_eq!(arr.num_vertices(), 2);
    assert_eq!(arr.num_edges(), 1);
    assert_eq!(arr.edges()[0].edge.multiplicity, 2);
    assert_eq!(arr.edges()[0].edge.sources, vec![0, 1]);
}

#[test]
fn sweeps_are_repeatable() {
    init_tracing();
    let input = vec![
        seg(0.0, 0.0, 4.0, 4.0),
        seg(0.0, 4.0, 4.0, 0.0),
        seg(0.0, 2.0, 4.0, 2.0),
        seg(2.0, -1.0, 2.0, 5.0),
        seg(1.0, 1.0, 3.0, 3.0),
        seg(3.0, 0.0, 3.0, 0.0),
        LinearObject::Line {
            through: p(0.0, 1.0),
            direction: Vec2::new(1.0, 0.0),
        },
    ];
    let mut first = Recorder::default();
    let mut second = Recorder::default();
    sweep(&LinearGeometry, input.clone(), &mut first).unwrap();
    sweep(&LinearGeometry, input, &mut second).unwrap();
    assert!(!first.log.is_empty());
    assert_eq!(first, second);
}

#[test]
fn rays_on_one_asymptote_share_a_boundary_vertex() {
    init_tracing();
    let d = Vec2::new(1.0, 1.0);
    let arr = arrangement(
        &[
            LinearObject::Ray {
                source: p(0.0, 0.0),
                direction: d,
            },
            LinearObject::Ray {
                source: p(1.0, 1.0),
                direction: d,
            },
        ],
        SweepConfig::default(),
    );
    assert_eq!(arr.num_vertices(), 3);
    let boundary: Vec<_> = arr.vertices().iter().filter(|v| !v.point.is_finite()).collect();
    assert_eq!(boundary.len(), 1);
    assert_eq!(boundary[0].degree, 1);

    let last = &arr.edges()[arr.num_edges() - 1];
    assert_eq!(last.edge.multiplicity, 2);
    assert_eq!(last.edge.sources, vec![0, 1]);
    assert_eq!(arr.num_faces(), None);
}

#[test]
fn boundary_events_use_boundary_comparisons() {
    init_tracing();
    let g = CountingGeometry::new(LinearGeometry);
    let horizontal = Vec2::new(1.0, 0.0);
    let mut arr = Arrangement::new();
    sweep(
        &g,
        [
            LinearObject::Line {
                through: p(0.0, 1.0),
                direction: horizontal,
            },
            LinearObject::Line {
                through: p(5.0, 0.0),
                direction: -horizontal,
            },
        ],
        &mut arr,
    )
    .unwrap();
    assert_eq!(arr.num_vertices(), 4);
    assert_eq!(arr.num_edges(), 2);
    assert!(arr.vertices().iter().all(|v| !v.point.is_finite()));
    assert!(g.count(Operation::CompareYNearBoundary) > 0);
    assert_eq!(g.count(Operation::CompareXy), 0);
    assert_eq!(g.count(Operation::CompareYAtX), 0);
    assert_eq!(g.count(Operation::Split), 0);
}

#[test]
fn vertical_rays_reach_bottom_and_top() {
    let arr = arrangement(
        &[
            LinearObject::Ray {
                source: p(0.0, 0.0),
                direction: Vec2::new(0.0, 1.0),
            },
            LinearObject::Ray {
                source: p(0.0, 0.0),
                direction: Vec2::new(0.0, -1.0),
            },
            seg(-1.0, 1.0, 1.0, 1.0),
        ],
        SweepConfig::default(),
    );
    // Two boundary vertices, the crossing at (0, 1), and the ends of the
    // segment. The rays continue one another, so the origin is merged away.
    assert_eq!(arr.num_vertices(), 5);
    assert_eq!(arr.num_edges(), 4);
    assert_eq!(arr.vertices().iter().filter(|v| !v.point.is_finite()).count(), 2);
    assert_eq!(arr.find_vertex(&LinearGeometry, &v(0.0, 0.0)), None);
    let crossing = arr.find_vertex(&LinearGeometry, &v(0.0, 1.0)).unwrap();
    assert_eq!(arr.vertex(crossing).unwrap().degree, 4);
    assert_eq!(arr.merges().len(), 1);

    let arr = arrangement(
        &[
            LinearObject::Ray {
                source: p(0.0, 0.0),
                direction: Vec2::new(0.0, 1.0),
            },
            LinearObject::Ray {
                source: p(0.0, 0.0),
                direction: Vec2::new(0.0, -1.0),
            },
            seg(-1.0, 1.0, 1.0, 1.0),
        ],
        unmerged(),
    );
    assert_eq!(arr.num_vertices(), 6);
    assert_eq!(arr.num_edges(), 5);
}

#[test]
fn isolated_points_are_vertices() {
    let arr = arrangement(
        &[seg(0.0, 0.0, 2.0, 0.0), seg(1.0, 0.0, 1.0, 0.0), seg(5.0, 5.0, 5.0, 5.0)],
        SweepConfig::default(),
    );
    assert_eq!(arr.num_vertices(), 4);
    assert_eq!(arr.num_edges(), 2);
    let on_curve = arr.find_vertex(&LinearGeometry, &v(1.0, 0.0)).unwrap();
    let alone = arr.find_vertex(&LinearGeometry, &v(5.0, 5.0)).unwrap();
    assert_eq!(arr.vertex(on_curve).unwrap().degree, 2);
    assert_eq!(arr.vertex(alone).unwrap().degree, 0);
}

#[test]
fn polylines_keep_their_corners() {
    let arr = arrangement(
        &[LinearObject::Polyline(vec![
            p(0.0, 0.0),
            p(1.0, 1.0),
            p(2.0, 2.0),
            p(3.0, 0.0),
        ])],
        SweepConfig::default(),
    );
    // The collinear joint at (1, 1) is merged away; the corner at (2, 2) is not.
    assert_eq!(arr.num_vertices(), 3);
    assert_eq!(arr.num_edges(), 2);
    assert!(arr.edges().iter().all(|e| e.edge.sources == vec![0]));
}

#[test]
fn inserting_after_starting_fails() {
    let g = LinearGeometry;
    let mut sweeper = Sweeper::new(&g);
    sweeper
        .insert_curves([seg(0.0, 0.0, 1.0, 1.0), seg(0.0, 1.0, 1.0, 0.0)])
        .unwrap();
    let dump = sweeper.dump();
    assert!(dump.contains("state: Idle"));
    assert!(dump.contains("event queue (4 events)"));

    let mut arr = Arrangement::new();
    assert!(sweeper.step(&mut arr).unwrap());
    assert_matches!(
        sweeper.insert_curves([seg(5.0, 5.0, 6.0, 6.0)]),
        Err(Error::SweepInProgress)
    );
    assert!(sweeper.step(&mut arr).unwrap());

    let dump = sweeper.dump();
    assert!(dump.contains("state: Running"));
    assert!(dump.contains("status line (2 curves, bottom to top)"));
    assert!(dump.contains("c_0"));
    assert!(dump.contains("c_1"));

    sweeper.run(&mut arr).unwrap();
    assert!(!sweeper.step(&mut arr).unwrap());
    assert_eq!(arr.num_vertices(), 5);
}

/// A geometry that gets some operations wrong on purpose.
struct Faulty {
    // `split` always fails.
    no_splits: bool,
    // `equal_curves` always says no.
    nothing_is_equal: bool,
}

const NO_SPLITS: Faulty = Faulty {
    no_splits: true,
    nothing_is_equal: false,
};

impl Geometry for Faulty {
    type Point = LinearPoint;
    type XCurve = LinearCurve;
    type Curve = LinearObject;

    fn compare_x(&self, p1: &LinearPoint, p2: &LinearPoint) -> Ordering {
        LinearGeometry.compare_x(p1, p2)
    }

    fn compare_xy(&self, p1: &LinearPoint, p2: &LinearPoint) -> Ordering {
        LinearGeometry.compare_xy(p1, p2)
    }

    fn construct_min_vertex(&self, xc: &LinearCurve) -> LinearPoint {
        LinearGeometry.construct_min_vertex(xc)
    }

    fn construct_max_vertex(&self, xc: &LinearCurve) -> LinearPoint {
        LinearGeometry.construct_max_vertex(xc)
    }

    fn is_vertical(&self, xc: &LinearCurve) -> bool {
        LinearGeometry.is_vertical(xc)
    }

    fn compare_y_at_x(&self, p: &LinearPoint, xc: &LinearCurve) -> Ordering {
        LinearGeometry.compare_y_at_x(p, xc)
    }

    fn equal_points(&self, p1: &LinearPoint, p2: &LinearPoint) -> bool {
        LinearGeometry.equal_points(p1, p2)
    }

    fn equal_curves(&self, xc1: &LinearCurve, xc2: &LinearCurve) -> bool {
        !self.nothing_is_equal && LinearGeometry.equal_curves(xc1, xc2)
    }

    fn compare_y_at_x_left(&self, xc1: &LinearCurve, xc2: &LinearCurve, p: &LinearPoint) -> Ordering {
        LinearGeometry.compare_y_at_x_left(xc1, xc2, p)
    }

    fn compare_y_at_x_right(&self, xc1: &LinearCurve, xc2: &LinearCurve, p: &LinearPoint) -> Ordering {
        LinearGeometry.compare_y_at_x_right(xc1, xc2, p)
    }

    fn make_x_monotone(&self, cv: &LinearObject) -> Vec<XMonotone<LinearPoint, LinearCurve>> {
        LinearGeometry.make_x_monotone(cv)
    }

    fn split(
        &self,
        xc: &LinearCurve,
        p: &LinearPoint,
    ) -> Result<(LinearCurve, LinearCurve), GeometryError> {
        if self.no_splits {
            return Err(GeometryError::InvalidSplitPoint);
        }
        LinearGeometry.split(xc, p)
    }

    fn intersect(
        &self,
        xc1: &LinearCurve,
        xc2: &LinearCurve,
    ) -> Vec<Intersection<LinearPoint, LinearCurve>> {
        LinearGeometry.intersect(xc1, xc2)
    }

    fn are_mergeable(&self, xc1: &LinearCurve, xc2: &LinearCurve) -> bool {
        LinearGeometry.are_mergeable(xc1, xc2)
    }

    fn merge(&self, xc1: &LinearCurve, xc2: &LinearCurve) -> Result<LinearCurve, GeometryError> {
        LinearGeometry.merge(xc1, xc2)
    }

    fn construct_opposite(&self, xc: &LinearCurve) -> LinearCurve {
        LinearGeometry.construct_opposite(xc)
    }

    fn compare_endpoints_xy(&self, xc: &LinearCurve) -> Ordering {
        LinearGeometry.compare_endpoints_xy(xc)
    }
}

#[test]
fn failed_splits_abort_the_sweep() {
    init_tracing();
    let mut arr = Arrangement::new();
    let err = sweep(
        &NO_SPLITS,
        [seg(0.0, 0.0, 2.0, 2.0), seg(0.0, 2.0, 2.0, 0.0)],
        &mut arr,
    )
    .unwrap_err();
    assert_matches!(
        &err,
        Error::GeometryContractViolation {
            source: Some(GeometryError::InvalidSplitPoint),
            ..
        }
    );
    assert!(err.to_string().starts_with("geometry contract violation"));
}

#[test]
fn curves_without_splits_still_work() {
    // Nothing needs splitting here, so the broken geometry isn't noticed.
    let mut arr = Arrangement::new();
    sweep(
        &NO_SPLITS,
        [seg(0.0, 0.0, 1.0, 0.0), seg(1.0, 0.0, 2.0, 1.0)],
        &mut arr,
    )
    .unwrap();
    assert_eq!(arr.num_vertices(), 3);
    assert_eq!(arr.num_edges(), 2);
}

#[test]
fn overlaps_are_confirmed_with_equal_curves() {
    init_tracing();
    let input = [seg(0.0, 0.0, 2.0, 1.0), seg(2.0, 1.0, 0.0, 0.0)];
    let g = CountingGeometry::new(LinearGeometry);
    let mut arr = Arrangement::new();
    sweep(&g, input.clone(), &mut arr).unwrap();
    assert_eq!(g.count(Operation::EqualCurves), 1);
    assert_eq!(arr.num_edges(), 1);

    let g = Faulty {
        no_splits: false,
        nothing_is_equal: true,
    };
    let mut arr = Arrangement::new();
    let err = sweep(&g, input, &mut arr).unwrap_err();
    assert_matches!(
        &err,
        Error::GeometryContractViolation { reason, source: None, .. } if reason.contains("not equal")
    );
}

#[test]
fn crossings_off_the_float_grid() {
    init_tracing();
    // Neither crossing is representable as an `f64`: they are at (3/10, 1/10)
    // and (35/22, 15/22).
    let cases = [
        (
            [seg(0.0, 0.0, 3.0, 1.0), seg(0.0, 1.0, 1.0, -2.0)],
            LinearPoint::from_rationals(ratio(3, 10), ratio(1, 10)),
        ),
        (
            [seg(0.0, 0.0, 7.0, 3.0), seg(0.0, 1.0, 5.0, 0.0)],
            LinearPoint::from_rationals(ratio(35, 22), ratio(15, 22)),
        ),
    ];
    for (input, crossing) in cases {
        let arr = arrangement(&input, SweepConfig::default());
        assert_eq!(arr.num_vertices(), 5);
        assert_eq!(arr.num_edges(), 4);
        let center = arr.find_vertex(&LinearGeometry, &crossing).unwrap();
        assert_eq!(arr.vertex(center).unwrap().degree, 4);
    }
}

#[test]
fn neighbors_meeting_again_skip_their_old_crossing() {
    init_tracing();
    // The two long segments cross at (1, 1/3) and become neighbors again when
    // the short one in between ends. Their crossing is behind the sweep by
    // then, and must not be reported twice.
    let arr = arrangement(
        &[
            seg(0.0, 0.0, 6.0, 2.0),
            seg(0.0, 1.0, 6.0, -3.0),
            seg(2.0, 0.0, 3.0, 0.0),
        ],
        unmerged(),
    );
    let crossing = LinearPoint::from_rationals(ratio(1, 1), ratio(1, 3));
    let center = arr.find_vertex(&LinearGeometry, &crossing).unwrap();
    assert_eq!(arr.vertex(center).unwrap().degree, 4);
    assert_eq!(arr.num_vertices(), 7);
    assert_eq!(arr.num_edges(), 5);
}

fn grid_segment() -> impl Strategy<Value = LinearObject> {
    let dirs = prop_oneof![
        Just((1.0, 0.0)),
        Just((0.0, 1.0)),
        Just((1.0, 1.0)),
        Just((1.0, -1.0)),
    ];
    (-4i32..=4, -4i32..=4, dirs, 1i32..=4).prop_map(|(x, y, (dx, dy), len)| {
        let start = p(x as f64, y as f64);
        let len = len as f64;
        LinearObject::Segment(start, start + Vec2::new(dx * len, dy * len))
    })
}

// A segment between arbitrary small integer points, at any slope.
fn general_segment() -> impl Strategy<Value = LinearObject> {
    (-6i32..=6, -6i32..=6, -6i32..=6, -6i32..=6)
        .prop_filter("degenerate segment", |(x0, y0, x1, y1)| (x0, y0) != (x1, y1))
        .prop_map(|(x0, y0, x1, y1)| seg(x0 as f64, y0 as f64, x1 as f64, y1 as f64))
}

fn curve(obj: &LinearObject) -> LinearCurve {
    match obj {
        LinearObject::Segment(a, b) => LinearCurve::segment(*a, *b).unwrap(),
        _ => unreachable!(),
    }
}

proptest! {
    #[test]
    fn intersections_become_vertices(objects in prop::collection::vec(grid_segment(), 1..8)) {
        let g = LinearGeometry;
        let mut arr = Arrangement::new();
        sweep_with_config(&g, objects.clone(), unmerged(), &mut arr).unwrap();

        for (i, a) in objects.iter().enumerate() {
            for b in &objects[(i + 1)..] {
                for obj in g.intersect(&curve(a), &curve(b)) {
                    match obj {
                        Intersection::Point(q) => {
                            prop_assert!(arr.find_vertex(&g, &q).is_some(), "missing {q:?}");
                        }
                        Intersection::Overlap(xc) => {
                            for end in [CurveEnd::Min, CurveEnd::Max] {
                                let q = xc.end(end).unwrap();
                                prop_assert!(arr.find_vertex(&g, q).is_some(), "missing {q:?}");
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn general_position_sweeps_succeed(objects in prop::collection::vec(general_segment(), 1..10)) {
        let g = LinearGeometry;
        let mut arr = Arrangement::new();
        let result = sweep_with_config(&g, objects.clone(), unmerged(), &mut arr);
        prop_assert!(result.is_ok(), "{result:?}");

        for (i, a) in objects.iter().enumerate() {
            for b in &objects[(i + 1)..] {
                for obj in g.intersect(&curve(a), &curve(b)) {
                    if let Intersection::Point(q) = obj {
                        prop_assert!(arr.find_vertex(&g, &q).is_some(), "missing {q:?}");
                    }
                }
            }
        }
        let degrees: usize = arr.vertices().iter().map(|v| v.degree).sum();
        prop_assert_eq!(degrees, 2 * arr.num_edges());
    }

    #[test]
    fn length_is_conserved(
        objects in prop::collection::vec(grid_segment(), 1..8),
        merge in any::<bool>(),
    ) {
        let config = SweepConfig { merge_mergeable_curves: merge };
        let mut arr = Arrangement::new();
        sweep_with_config(&LinearGeometry, objects.clone(), config, &mut arr).unwrap();

        let input: f64 = objects.iter().map(|o| curve(o).length()).sum();
        let output: f64 = arr
            .edges()
            .iter()
            .map(|e| e.edge.curve.length() * e.edge.multiplicity as f64)
            .sum();
        prop_assert!((input - output).abs() < 1e-9 * (1.0 + input));

        for e in arr.edges() {
            prop_assert!(e.left < e.right);
            prop_assert!(!e.edge.sources.is_empty());
        }
    }
}

// Runs with `cargo test --features slow-asserts`, which checks the order of
// the status line after every event.
#[cfg(feature = "slow-asserts")]
#[test]
fn status_line_stays_ordered() {
    init_tracing();
    let mut input = Vec::new();
    for i in 0..6 {
        let t = i as f64;
        input.push(seg(0.0, t, 7.0, 5.0 - t));
        input.push(seg(t, -1.0, 6.0 - t / 2.0, 6.0));
    }
    input.push(LinearObject::Line {
        through: p(0.0, 2.0),
        direction: Vec2::new(3.0, 1.0),
    });
    input.push(LinearObject::Ray {
        source: p(3.0, 3.0),
        direction: Vec2::new(0.0, -1.0),
    });
    let mut sweeper = Sweeper::new(&LinearGeometry);
    sweeper.insert_curves(input).unwrap();
    let mut arr = Arrangement::new();
    while sweeper.step(&mut arr).unwrap() {}
    assert!(arr.num_vertices() > 0);
}
