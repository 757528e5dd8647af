//! A geometry decorator that counts how often each operation is called.
//!
//! This is handy for profiling a geometry, and for checking which parts of
//! the contract a sweep actually exercised (for example, that boundary events
//! were ordered using only the boundary comparators).

use std::cmp::Ordering;
use std::sync::atomic::{self, AtomicUsize};

use strum::{EnumCount, IntoEnumIterator};

use crate::geometry::{CurveEnd, Geometry, GeometryError, Intersection, ParameterSpace, XMonotone};

/// The operations of a [`Geometry`], one counter each.
///
/// The two overloads of the "compare x near boundary" predicate
/// ([`Geometry::compare_x_point_near_boundary`] and
/// [`Geometry::compare_x_near_boundary`]) share a counter.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::EnumCount,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[allow(missing_docs)]
pub enum Operation {
    CompareX,
    CompareXy,
    ConstructMinVertex,
    ConstructMaxVertex,
    IsVertical,
    CompareYAtX,
    EqualPoints,
    EqualCurves,
    CompareYAtXLeft,
    CompareYAtXRight,
    MakeXMonotone,
    Split,
    Intersect,
    AreMergeable,
    Merge,
    ConstructOpposite,
    CompareEndpointsXy,
    BoundaryInX,
    BoundaryInY,
    CompareXNearBoundary,
    CompareYNearBoundary,
    CompareXOnIdentification,
    CompareYOnIdentification,
}

impl Operation {
    /// A human-readable name, like `compare_y_at_x`.
    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// Wraps a geometry, forwarding every call and counting it.
///
/// The counters are atomic, so a `CountingGeometry` can be shared between
/// threads whenever the inner geometry can.
#[derive(Debug)]
pub struct CountingGeometry<G> {
    inner: G,
    counts: [AtomicUsize; Operation::COUNT],
}

impl<G> CountingGeometry<G> {
    /// Wraps `inner`, with all counters at zero.
    pub fn new(inner: G) -> Self {
        CountingGeometry {
            inner,
            counts: std::array::from_fn(|_| AtomicUsize::new(0)),
        }
    }

    /// The wrapped geometry.
    pub fn inner(&self) -> &G {
        &self.inner
    }

    /// Unwraps the inner geometry, discarding the counters.
    pub fn into_inner(self) -> G {
        self.inner
    }

    /// How many times `op` was called.
    pub fn count(&self, op: Operation) -> usize {
        self.counts[op as usize].load(atomic::Ordering::Relaxed)
    }

    /// The total number of calls, over all operations.
    pub fn total(&self) -> usize {
        Operation::iter().map(|op| self.count(op)).sum()
    }

    /// Sets all the counters back to zero.
    pub fn reset(&self) {
        for c in &self.counts {
            c.store(0, atomic::Ordering::Relaxed);
        }
    }

    fn bump(&self, op: Operation) {
        self.counts[op as usize].fetch_add(1, atomic::Ordering::Relaxed);
    }
}

impl<G: Default> Default for CountingGeometry<G> {
    fn default() -> Self {
        Self::new(G::default())
    }
}

impl<G> std::fmt::Display for CountingGeometry<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for op in Operation::iter() {
            writeln!(f, "{}: {}", op.name(), self.count(op))?;
        }
        write!(f, "total: {}", self.total())
    }
}

impl<G: Geometry> Geometry for CountingGeometry<G> {
    type Point = G::Point;
    type XCurve = G::XCurve;
    type Curve = G::Curve;

    fn compare_x(&self, p1: &Self::Point, p2: &Self::Point) -> Ordering {
        self.bump(Operation::CompareX);
        self.inner.compare_x(p1, p2)
    }

    fn compare_xy(&self, p1: &Self::Point, p2: &Self::Point) -> Ordering {
        self.bump(Operation::CompareXy);
        self.inner.compare_xy(p1, p2)
    }

    fn construct_min_vertex(&self, xc: &Self::XCurve) -> Self::Point {
        self.bump(Operation::ConstructMinVertex);
        self.inner.construct_min_vertex(xc)
    }

    fn construct_max_vertex(&self, xc: &Self::XCurve) -> Self::Point {
        self.bump(Operation::ConstructMaxVertex);
        self.inner.construct_max_vertex(xc)
    }

    fn is_vertical(&self, xc: &Self::XCurve) -> bool {
        self.bump(Operation::IsVertical);
        self.inner.is_vertical(xc)
    }

    fn compare_y_at_x(&self, p: &Self::Point, xc: &Self::XCurve) -> Ordering {
        self.bump(Operation::CompareYAtX);
        self.inner.compare_y_at_x(p, xc)
    }

    fn equal_points(&self, p1: &Self::Point, p2: &Self::Point) -> bool {
        self.bump(Operation::EqualPoints);
        self.inner.equal_points(p1, p2)
    }

    fn equal_curves(&self, xc1: &Self::XCurve, xc2: &Self::XCurve) -> bool {
        self.bump(Operation::EqualCurves);
        self.inner.equal_curves(xc1, xc2)
    }

    fn compare_y_at_x_left(
        &self,
        xc1: &Self::XCurve,
        xc2: &Self::XCurve,
        p: &Self::Point,
    ) -> Ordering {
        self.bump(Operation::CompareYAtXLeft);
        self.inner.compare_y_at_x_left(xc1, xc2, p)
    }

    fn compare_y_at_x_right(
        &self,
        xc1: &Self::XCurve,
        xc2: &Self::XCurve,
        p: &Self::Point,
    ) -> Ordering {
        self.bump(Operation::CompareYAtXRight);
        self.inner.compare_y_at_x_right(xc1, xc2, p)
    }

    fn make_x_monotone(&self, cv: &Self::Curve) -> Vec<XMonotone<Self::Point, Self::XCurve>> {
        self.bump(Operation::MakeXMonotone);
        self.inner.make_x_monotone(cv)
    }

    fn split(
        &self,
        xc: &Self::XCurve,
        p: &Self::Point,
    ) -> Result<(Self::XCurve, Self::XCurve), GeometryError> {
        self.bump(Operation::Split);
        self.inner.split(xc, p)
    }

    fn intersect(
        &self,
        xc1: &Self::XCurve,
        xc2: &Self::XCurve,
    ) -> Vec<Intersection<Self::Point, Self::XCurve>> {
        self.bump(Operation::Intersect);
        self.inner.intersect(xc1, xc2)
    }

    fn are_mergeable(&self, xc1: &Self::XCurve, xc2: &Self::XCurve) -> bool {
        self.bump(Operation::AreMergeable);
        self.inner.are_mergeable(xc1, xc2)
    }

    fn merge(&self, xc1: &Self::XCurve, xc2: &Self::XCurve) -> Result<Self::XCurve, GeometryError> {
        self.bump(Operation::Merge);
        self.inner.merge(xc1, xc2)
    }

    fn construct_opposite(&self, xc: &Self::XCurve) -> Self::XCurve {
        self.bump(Operation::ConstructOpposite);
        self.inner.construct_opposite(xc)
    }

    fn compare_endpoints_xy(&self, xc: &Self::XCurve) -> Ordering {
        self.bump(Operation::CompareEndpointsXy);
        self.inner.compare_endpoints_xy(xc)
    }

    fn parameter_space_in_x(&self, xc: &Self::XCurve, end: CurveEnd) -> ParameterSpace {
        self.bump(Operation::BoundaryInX);
        self.inner.parameter_space_in_x(xc, end)
    }

    fn parameter_space_in_y(&self, xc: &Self::XCurve, end: CurveEnd) -> ParameterSpace {
        self.bump(Operation::BoundaryInY);
        self.inner.parameter_space_in_y(xc, end)
    }

    fn compare_x_point_near_boundary(
        &self,
        p: &Self::Point,
        xc: &Self::XCurve,
        end: CurveEnd,
    ) -> Ordering {
        self.bump(Operation::CompareXNearBoundary);
        self.inner.compare_x_point_near_boundary(p, xc, end)
    }

    fn compare_x_near_boundary(
        &self,
        xc1: &Self::XCurve,
        end1: CurveEnd,
        xc2: &Self::XCurve,
        end2: CurveEnd,
    ) -> Ordering {
        self.bump(Operation::CompareXNearBoundary);
        self.inner.compare_x_near_boundary(xc1, end1, xc2, end2)
    }

    fn compare_y_near_boundary(
        &self,
        xc1: &Self::XCurve,
        xc2: &Self::XCurve,
        end: CurveEnd,
    ) -> Ordering {
        self.bump(Operation::CompareYNearBoundary);
        self.inner.compare_y_near_boundary(xc1, xc2, end)
    }

    fn compare_x_on_identification(&self, p1: &Self::Point, p2: &Self::Point) -> Ordering {
        self.bump(Operation::CompareXOnIdentification);
        self.inner.compare_x_on_identification(p1, p2)
    }

    fn compare_y_on_identification(&self, p1: &Self::Point, p2: &Self::Point) -> Ordering {
        self.bump(Operation::CompareYOnIdentification);
        self.inner.compare_y_on_identification(p1, p2)
    }
}
