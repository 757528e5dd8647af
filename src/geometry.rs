//! The geometric contract that the sweep is generic over.
//!
//! The sweep never looks inside a point or a curve: everything it needs to
//! know is asked through [`Geometry`]. A geometry for the bounded plane only
//! needs to implement the interior operations; the boundary operations have
//! defaults that are never called unless some curve end reports a boundary
//! through [`Geometry::parameter_space_in_x`] or
//! [`Geometry::parameter_space_in_y`].

use std::cmp::Ordering;

/// One of the two ends of an x-monotone curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum CurveEnd {
    /// The end that is smaller in the `compare_xy` order.
    Min,
    /// The end that is larger in the `compare_xy` order.
    Max,
}

impl CurveEnd {
    /// The other end.
    pub fn opposite(self) -> CurveEnd {
        match self {
            CurveEnd::Min => CurveEnd::Max,
            CurveEnd::Max => CurveEnd::Min,
        }
    }
}

/// Where a curve end lies in the parameter space, along one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ParameterSpace {
    /// A finite position.
    Interior,
    /// At `x = -∞` (or on the left side of a bounded parameter space).
    LeftBoundary,
    /// At `x = +∞`.
    RightBoundary,
    /// At `y = -∞`.
    BottomBoundary,
    /// At `y = +∞`.
    TopBoundary,
}

impl std::fmt::Display for ParameterSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ParameterSpace::Interior => "interior",
            ParameterSpace::LeftBoundary => "left boundary",
            ParameterSpace::RightBoundary => "right boundary",
            ParameterSpace::BottomBoundary => "bottom boundary",
            ParameterSpace::TopBoundary => "top boundary",
        };
        f.write_str(name)
    }
}

/// A piece produced by [`Geometry::make_x_monotone`].
#[derive(Clone, Debug, PartialEq)]
pub enum XMonotone<P, X> {
    /// An x-monotone curve.
    Curve(X),
    /// An isolated point.
    Point(P),
}

/// One connected component of the intersection of two x-monotone curves.
#[derive(Clone, Debug, PartialEq)]
pub enum Intersection<P, X> {
    /// The curves meet (cross or touch) at a single point.
    Point(P),
    /// The curves overlap along a common x-monotone piece.
    Overlap(X),
}

/// Errors reported by the constructive operations of a [`Geometry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    /// A curve was split at a point that isn't strictly inside it.
    #[error("split point is not in the interior of the curve")]
    InvalidSplitPoint,
    /// Two curves that aren't mergeable were merged.
    #[error("curves are not mergeable")]
    NotMergeable,
}

/// The operations that a sweep needs from its points and curves.
///
/// Every operation is a pure function of its arguments. In particular, the
/// comparisons must be consistent with one another: a geometry that answers
/// `Less` to one question and `Greater` to its mirror image will make the
/// sweep fail with [`Error::AmbiguousEventOrder`](crate::Error::AmbiguousEventOrder)
/// or [`Error::GeometryContractViolation`](crate::Error::GeometryContractViolation).
pub trait Geometry {
    /// A finite point.
    type Point: Clone + std::fmt::Debug;
    /// A curve that is monotone in x (or vertical), with two ends.
    type XCurve: Clone + std::fmt::Debug;
    /// An input curve, which might not be x-monotone.
    type Curve;

    /// Compares the x coordinates of two points.
    fn compare_x(&self, p1: &Self::Point, p2: &Self::Point) -> Ordering;

    /// Compares two points lexicographically: by x, and then by y.
    fn compare_xy(&self, p1: &Self::Point, p2: &Self::Point) -> Ordering;

    /// The smaller (in `compare_xy`) of the two ends. Only called if that end
    /// is in the interior of the parameter space.
    fn construct_min_vertex(&self, xc: &Self::XCurve) -> Self::Point;

    /// The larger (in `compare_xy`) of the two ends. Only called if that end
    /// is in the interior of the parameter space.
    fn construct_max_vertex(&self, xc: &Self::XCurve) -> Self::Point;

    /// Does this curve have no extent in x?
    fn is_vertical(&self, xc: &Self::XCurve) -> bool;

    /// Compares the point `p` with the curve `xc` at `p`'s x coordinate:
    /// `Less` if the point is below the curve.
    ///
    /// `p` must lie in the x-range of `xc`, and `xc` is never vertical.
    fn compare_y_at_x(&self, p: &Self::Point, xc: &Self::XCurve) -> Ordering;

    /// Are these the same point?
    fn equal_points(&self, p1: &Self::Point, p2: &Self::Point) -> bool;

    /// Are these the same curve?
    fn equal_curves(&self, xc1: &Self::XCurve, xc2: &Self::XCurve) -> bool;

    /// Compares two curves immediately to the left of `p`, a point they both
    /// contain and both extend to the left of.
    fn compare_y_at_x_left(
        &self,
        xc1: &Self::XCurve,
        xc2: &Self::XCurve,
        p: &Self::Point,
    ) -> Ordering;

    /// Compares two curves immediately to the right of `p`, a point they both
    /// contain and both extend to the right of.
    ///
    /// Two curves that overlap to the right of `p` compare equal.
    fn compare_y_at_x_right(
        &self,
        xc1: &Self::XCurve,
        xc2: &Self::XCurve,
        p: &Self::Point,
    ) -> Ordering;

    /// Decomposes a curve into x-monotone pieces and isolated points.
    fn make_x_monotone(&self, cv: &Self::Curve) -> Vec<XMonotone<Self::Point, Self::XCurve>>;

    /// Splits a curve at a point in its interior.
    fn split(
        &self,
        xc: &Self::XCurve,
        p: &Self::Point,
    ) -> Result<(Self::XCurve, Self::XCurve), GeometryError>;

    /// Computes the intersection of two curves, sorted from left to right.
    fn intersect(
        &self,
        xc1: &Self::XCurve,
        xc2: &Self::XCurve,
    ) -> Vec<Intersection<Self::Point, Self::XCurve>>;

    /// Can these two curves be merged into one? They must share an end and
    /// continue one another.
    fn are_mergeable(&self, xc1: &Self::XCurve, xc2: &Self::XCurve) -> bool;

    /// Merges two mergeable curves.
    fn merge(&self, xc1: &Self::XCurve, xc2: &Self::XCurve) -> Result<Self::XCurve, GeometryError>;

    /// The same curve with the opposite orientation.
    fn construct_opposite(&self, xc: &Self::XCurve) -> Self::XCurve;

    /// Compares the source and the target of an oriented curve: `Less` if the
    /// curve is directed from left to right.
    fn compare_endpoints_xy(&self, xc: &Self::XCurve) -> Ordering;

    /// Where a curve end lies along the x axis of the parameter space.
    fn parameter_space_in_x(&self, _xc: &Self::XCurve, _end: CurveEnd) -> ParameterSpace {
        ParameterSpace::Interior
    }

    /// Where a curve end lies along the y axis of the parameter space.
    fn parameter_space_in_y(&self, _xc: &Self::XCurve, _end: CurveEnd) -> ParameterSpace {
        ParameterSpace::Interior
    }

    /// Compares the x coordinate of `p` with the x coordinate of a curve end
    /// lying on the bottom or top boundary.
    fn compare_x_point_near_boundary(
        &self,
        _p: &Self::Point,
        _xc: &Self::XCurve,
        _end: CurveEnd,
    ) -> Ordering {
        Ordering::Equal
    }

    /// Compares the x coordinates of two curve ends lying on the bottom or
    /// top boundary.
    fn compare_x_near_boundary(
        &self,
        _xc1: &Self::XCurve,
        _end1: CurveEnd,
        _xc2: &Self::XCurve,
        _end2: CurveEnd,
    ) -> Ordering {
        Ordering::Equal
    }

    /// Compares two curves near the left boundary (for `CurveEnd::Min`) or
    /// near the right boundary (for `CurveEnd::Max`), where both of them have
    /// the given end.
    fn compare_y_near_boundary(
        &self,
        _xc1: &Self::XCurve,
        _xc2: &Self::XCurve,
        _end: CurveEnd,
    ) -> Ordering {
        Ordering::Equal
    }

    /// Compares the x coordinates of two points on an identified boundary.
    fn compare_x_on_identification(&self, _p1: &Self::Point, _p2: &Self::Point) -> Ordering {
        Ordering::Equal
    }

    /// Compares the y coordinates of two points on an identified boundary.
    fn compare_y_on_identification(&self, _p1: &Self::Point, _p2: &Self::Point) -> Ordering {
        Ordering::Equal
    }
}
