//! Straight-line geometry: segments, rays and lines in the plane.
//!
//! Input coordinates are `f64`s, but every vertex and every predicate works
//! with exact rationals: a finite `f64` converts to a rational without loss,
//! and the intersection of two lines through rational points is rational.
//! Every point that the geometry hands to the sweep therefore lies exactly
//! on the curves that produced it, whatever the slopes involved.
//!
//! Every x-monotone piece remembers the line that supports it, and all the
//! predicates are evaluated against that line. Splitting a segment at one of
//! its points produces two pieces that answer every predicate exactly as the
//! original did.
//!
//! Unbounded curves live in the unbounded plane: a non-vertical ray or line
//! reaches the left or right boundary at its unbounded ends, and a vertical
//! ray reaches the bottom or top boundary.

use std::cmp::Ordering;
use std::fmt;

use kurbo::{Point, Vec2};
use num::traits::{Signed, ToPrimitive, Zero};
use num::BigRational;

use crate::geometry::{CurveEnd, Geometry, GeometryError, Intersection, ParameterSpace, XMonotone};

/// An input curve for [`LinearGeometry`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum LinearObject {
    /// The segment from the first point to the second. If they coincide, this
    /// is an isolated point.
    Segment(Point, Point),
    /// A ray starting at `source` and heading in `direction`.
    Ray {
        /// The finite end of the ray.
        source: Point,
        /// The direction of the ray; must be non-zero.
        direction: Vec2,
    },
    /// The line through `through` with the given direction.
    Line {
        /// Any point on the line.
        through: Point,
        /// The direction of the line; must be non-zero.
        direction: Vec2,
    },
    /// A chain of segments through consecutive points.
    Polyline(Vec<Point>),
}

/// A point with exact rational coordinates.
///
/// The derived order is lexicographic, by `x` and then by `y`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinearPoint {
    x: BigRational,
    y: BigRational,
}

impl fmt::Debug for LinearPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

fn approx(r: &BigRational) -> f64 {
    r.to_f64().unwrap_or(f64::NAN)
}

impl LinearPoint {
    /// The point with the given coordinates.
    ///
    /// # Panics
    ///
    /// Panics if either coordinate is infinite or NaN.
    pub fn new(x: f64, y: f64) -> LinearPoint {
        match LinearPoint::from_point(Point::new(x, y)) {
            Some(p) => p,
            None => panic!("({x}, {y}) is not a finite point"),
        }
    }

    /// The exact value of a `kurbo` point, or `None` if it isn't finite.
    pub fn from_point(p: Point) -> Option<LinearPoint> {
        Some(LinearPoint {
            x: BigRational::from_float(p.x)?,
            y: BigRational::from_float(p.y)?,
        })
    }

    /// The point with the given rational coordinates.
    pub fn from_rationals(x: BigRational, y: BigRational) -> LinearPoint {
        LinearPoint { x, y }
    }

    /// The horizontal coordinate.
    pub fn x(&self) -> &BigRational {
        &self.x
    }

    /// The vertical coordinate.
    pub fn y(&self) -> &BigRational {
        &self.y
    }

    /// The closest `f64` approximation of this point.
    pub fn to_point(&self) -> Point {
        Point::new(approx(&self.x), approx(&self.y))
    }

    fn minus(&self, other: &LinearPoint) -> Vector {
        Vector {
            x: &self.x - &other.x,
            y: &self.y - &other.y,
        }
    }

    fn offset(&self, v: &Vector, t: &BigRational) -> LinearPoint {
        LinearPoint {
            x: &self.x + &v.x * t,
            y: &self.y + &v.y * t,
        }
    }
}

#[derive(Clone, PartialEq)]
struct Vector {
    x: BigRational,
    y: BigRational,
}

impl fmt::Debug for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}, {}>", self.x, self.y)
    }
}

impl Vector {
    fn from_vec2(v: Vec2) -> Option<Vector> {
        Some(Vector {
            x: BigRational::from_float(v.x)?,
            y: BigRational::from_float(v.y)?,
        })
    }

    fn cross(&self, other: &Vector) -> BigRational {
        &self.x * &other.y - &self.y * &other.x
    }

    fn is_zero(&self) -> bool {
        self.x.is_zero() && self.y.is_zero()
    }

    // Is this pointing to the right, or straight up?
    fn is_xy_positive(&self) -> bool {
        self.x.is_positive() || (self.x.is_zero() && self.y.is_positive())
    }

    fn negated(&self) -> Vector {
        Vector {
            x: -&self.x,
            y: -&self.y,
        }
    }
}

fn sign(r: &BigRational) -> Ordering {
    r.cmp(&BigRational::zero())
}

/// An x-monotone linear curve: a segment, a ray or a line.
///
/// The ends are in `compare_xy` order, so `min` is the left (or, for a
/// vertical curve, the lower) end. An end of `None` is unbounded.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearCurve {
    min: Option<LinearPoint>,
    max: Option<LinearPoint>,
    // The supporting line passes through `base` in direction `dir`, and `dir`
    // points from `min` towards `max`.
    base: LinearPoint,
    dir: Vector,
    // True if the curve is oriented from `max` to `min`.
    reversed: bool,
}

impl LinearCurve {
    /// The segment between two distinct points, oriented from `from` to `to`.
    ///
    /// Returns `None` if the points coincide or aren't finite.
    pub fn segment(from: Point, to: Point) -> Option<LinearCurve> {
        LinearCurve::between(LinearPoint::from_point(from)?, LinearPoint::from_point(to)?)
    }

    /// The ray from `source` in the direction `direction`.
    ///
    /// Returns `None` if the direction is zero, or if anything isn't finite.
    pub fn ray(source: Point, direction: Vec2) -> Option<LinearCurve> {
        LinearCurve::exact_ray(LinearPoint::from_point(source)?, Vector::from_vec2(direction)?)
    }

    /// The line through `through` with direction `direction`.
    ///
    /// Returns `None` if the direction is zero, or if anything isn't finite.
    pub fn line(through: Point, direction: Vec2) -> Option<LinearCurve> {
        LinearCurve::exact_line(LinearPoint::from_point(through)?, Vector::from_vec2(direction)?)
    }

    /// The segment between two distinct exact points, oriented from `from`
    /// to `to`.
    ///
    /// Returns `None` if the points coincide.
    pub fn between(from: LinearPoint, to: LinearPoint) -> Option<LinearCurve> {
        let (min, max, reversed) = match from.cmp(&to) {
            Ordering::Less => (from, to, false),
            Ordering::Greater => (to, from, true),
            Ordering::Equal => return None,
        };
        Some(LinearCurve {
            dir: max.minus(&min),
            base: min.clone(),
            min: Some(min),
            max: Some(max),
            reversed,
        })
    }

    fn exact_ray(source: LinearPoint, dir: Vector) -> Option<LinearCurve> {
        if dir.is_zero() {
            return None;
        }
        let ret = if dir.is_xy_positive() {
            LinearCurve {
                min: Some(source.clone()),
                max: None,
                base: source,
                dir,
                reversed: false,
            }
        } else {
            LinearCurve {
                min: None,
                max: Some(source.clone()),
                base: source,
                dir: dir.negated(),
                reversed: true,
            }
        };
        Some(ret)
    }

    fn exact_line(through: LinearPoint, dir: Vector) -> Option<LinearCurve> {
        if dir.is_zero() {
            return None;
        }
        let (dir, reversed) = if dir.is_xy_positive() {
            (dir, false)
        } else {
            (dir.negated(), true)
        };
        Some(LinearCurve {
            min: None,
            max: None,
            base: through,
            dir,
            reversed,
        })
    }

    /// The left (or lower) end, if it is finite.
    pub fn min(&self) -> Option<&LinearPoint> {
        self.min.as_ref()
    }

    /// The right (or upper) end, if it is finite.
    pub fn max(&self) -> Option<&LinearPoint> {
        self.max.as_ref()
    }

    /// The end on the given side, if it is finite.
    pub fn end(&self, end: CurveEnd) -> Option<&LinearPoint> {
        match end {
            CurveEnd::Min => self.min(),
            CurveEnd::Max => self.max(),
        }
    }

    /// The direction of the supporting line, pointing from `min` to `max`,
    /// rounded to `f64`.
    pub fn direction(&self) -> Vec2 {
        Vec2::new(approx(&self.dir.x), approx(&self.dir.y))
    }

    /// Is this a segment, with both ends finite?
    pub fn is_bounded(&self) -> bool {
        self.min.is_some() && self.max.is_some()
    }

    /// The length of the curve (infinite unless it is a segment), rounded to
    /// `f64`.
    pub fn length(&self) -> f64 {
        match (&self.min, &self.max) {
            (Some(p), Some(q)) => {
                let d = q.minus(p);
                approx(&d.x).hypot(approx(&d.y))
            }
            _ => f64::INFINITY,
        }
    }

    fn is_vertical(&self) -> bool {
        self.dir.x.is_zero()
    }

    // The side of the supporting line that `p` is on: `Greater` if `p` is to
    // the left of `dir`, which for non-vertical lines means above.
    fn side_of(&self, p: &LinearPoint) -> Ordering {
        sign(&self.dir.cross(&p.minus(&self.base)))
    }

    fn is_parallel_to(&self, other: &LinearCurve) -> bool {
        self.dir.cross(&other.dir).is_zero()
    }

    fn is_collinear_with(&self, other: &LinearCurve) -> bool {
        self.is_parallel_to(other) && self.side_of(&other.base) == Ordering::Equal
    }

    // Does the supporting line contain `p`, in the closed range of this curve?
    fn contains(&self, p: &LinearPoint) -> bool {
        self.side_of(p) == Ordering::Equal
            && self.min.as_ref().is_none_or(|m| m <= p)
            && self.max.as_ref().is_none_or(|m| p <= m)
    }

    fn with_ends(&self, min: Option<LinearPoint>, max: Option<LinearPoint>) -> LinearCurve {
        LinearCurve {
            min,
            max,
            base: self.base.clone(),
            dir: self.dir.clone(),
            reversed: self.reversed,
        }
    }

    // Compares slopes of two non-vertical curves.
    fn compare_slopes(&self, other: &LinearCurve) -> Ordering {
        // Both x components are positive, so this is dy1 / dx1 vs dy2 / dx2.
        (&self.dir.y * &other.dir.x).cmp(&(&other.dir.y * &self.dir.x))
    }
}

// The larger of two min ends, where `None` is unbounded below.
fn later_start(a: &Option<LinearPoint>, b: &Option<LinearPoint>) -> Option<LinearPoint> {
    match (a, b) {
        (Some(p), Some(q)) => Some(std::cmp::max(p, q).clone()),
        (p, None) | (None, p) => p.clone(),
    }
}

// The smaller of two max ends, where `None` is unbounded above.
fn earlier_end(a: &Option<LinearPoint>, b: &Option<LinearPoint>) -> Option<LinearPoint> {
    match (a, b) {
        (Some(p), Some(q)) => Some(std::cmp::min(p, q).clone()),
        (p, None) | (None, p) => p.clone(),
    }
}

// The x-monotone pieces of `cv`, or `None` if it has a non-finite coordinate.
fn exact_pieces(cv: &LinearObject) -> Option<Vec<XMonotone<LinearPoint, LinearCurve>>> {
    let ret = match cv {
        LinearObject::Segment(p, q) => {
            let p = LinearPoint::from_point(*p)?;
            match LinearCurve::between(p.clone(), LinearPoint::from_point(*q)?) {
                Some(xc) => vec![XMonotone::Curve(xc)],
                None => vec![XMonotone::Point(p)],
            }
        }
        LinearObject::Ray { source, direction } => {
            let source = LinearPoint::from_point(*source)?;
            match LinearCurve::exact_ray(source.clone(), Vector::from_vec2(*direction)?) {
                Some(xc) => vec![XMonotone::Curve(xc)],
                None => vec![XMonotone::Point(source)],
            }
        }
        LinearObject::Line { through, direction } => {
            LinearCurve::exact_line(LinearPoint::from_point(*through)?, Vector::from_vec2(*direction)?)
                .map(XMonotone::Curve)
                .into_iter()
                .collect()
        }
        LinearObject::Polyline(points) => {
            let points = points
                .iter()
                .map(|p| LinearPoint::from_point(*p))
                .collect::<Option<Vec<_>>>()?;
            let pieces: Vec<_> = points
                .windows(2)
                .filter_map(|w| LinearCurve::between(w[0].clone(), w[1].clone()))
                .map(XMonotone::Curve)
                .collect();
            match (pieces.is_empty(), points.into_iter().next()) {
                (true, Some(p)) => vec![XMonotone::Point(p)],
                _ => pieces,
            }
        }
    };
    Some(ret)
}

/// The geometry of segments, rays and lines, with `f64` input coordinates
/// and exact rational vertices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LinearGeometry;

impl Geometry for LinearGeometry {
    type Point = LinearPoint;
    type XCurve = LinearCurve;
    type Curve = LinearObject;

    fn compare_x(&self, p1: &LinearPoint, p2: &LinearPoint) -> Ordering {
        p1.x.cmp(&p2.x)
    }

    fn compare_xy(&self, p1: &LinearPoint, p2: &LinearPoint) -> Ordering {
        p1.cmp(p2)
    }

    /// # Panics
    ///
    /// Panics if the min end is unbounded.
    fn construct_min_vertex(&self, xc: &LinearCurve) -> LinearPoint {
        match &xc.min {
            Some(p) => p.clone(),
            None => panic!("the min end of {xc:?} is unbounded"),
        }
    }

    /// # Panics
    ///
    /// Panics if the max end is unbounded.
    fn construct_max_vertex(&self, xc: &LinearCurve) -> LinearPoint {
        match &xc.max {
            Some(p) => p.clone(),
            None => panic!("the max end of {xc:?} is unbounded"),
        }
    }

    fn is_vertical(&self, xc: &LinearCurve) -> bool {
        xc.is_vertical()
    }

    fn compare_y_at_x(&self, p: &LinearPoint, xc: &LinearCurve) -> Ordering {
        debug_assert!(!xc.is_vertical());
        xc.side_of(p)
    }

    fn equal_points(&self, p1: &LinearPoint, p2: &LinearPoint) -> bool {
        p1 == p2
    }

    fn equal_curves(&self, xc1: &LinearCurve, xc2: &LinearCurve) -> bool {
        xc1.min == xc2.min && xc1.max == xc2.max && xc1.is_collinear_with(xc2)
    }

    fn compare_y_at_x_left(&self, xc1: &LinearCurve, xc2: &LinearCurve, _p: &LinearPoint) -> Ordering {
        // To the left of a common point, a vertical curve runs downwards.
        match (xc1.is_vertical(), xc2.is_vertical()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => xc1.compare_slopes(xc2).reverse(),
        }
    }

    fn compare_y_at_x_right(&self, xc1: &LinearCurve, xc2: &LinearCurve, _p: &LinearPoint) -> Ordering {
        match (xc1.is_vertical(), xc2.is_vertical()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => xc1.compare_slopes(xc2),
        }
    }

    fn make_x_monotone(&self, cv: &LinearObject) -> Vec<XMonotone<LinearPoint, LinearCurve>> {
        exact_pieces(cv).unwrap_or_else(|| {
            tracing::warn!(?cv, "dropping a curve with non-finite coordinates");
            Vec::new()
        })
    }

    fn split(&self, xc: &LinearCurve, p: &LinearPoint) -> Result<(LinearCurve, LinearCurve), GeometryError> {
        let strictly_inside = xc.side_of(p) == Ordering::Equal
            && xc.min.as_ref().is_none_or(|m| m < p)
            && xc.max.as_ref().is_none_or(|m| p < m);
        if !strictly_inside {
            return Err(GeometryError::InvalidSplitPoint);
        }
        Ok((
            xc.with_ends(xc.min.clone(), Some(p.clone())),
            xc.with_ends(Some(p.clone()), xc.max.clone()),
        ))
    }

    fn intersect(&self, xc1: &LinearCurve, xc2: &LinearCurve) -> Vec<Intersection<LinearPoint, LinearCurve>> {
        if xc1.is_parallel_to(xc2) {
            if !xc1.is_collinear_with(xc2) {
                return Vec::new();
            }
            let lo = later_start(&xc1.min, &xc2.min);
            let hi = earlier_end(&xc1.max, &xc2.max);
            return match (&lo, &hi) {
                (Some(p), Some(q)) => match p.cmp(q) {
                    Ordering::Less => vec![Intersection::Overlap(xc1.with_ends(lo, hi))],
                    Ordering::Equal => vec![Intersection::Point(p.clone())],
                    Ordering::Greater => Vec::new(),
                },
                _ => vec![Intersection::Overlap(xc1.with_ends(lo, hi))],
            };
        }

        // The lines cross at `base1 + t * dir1`, and the division is exact.
        let t = xc2.base.minus(&xc1.base).cross(&xc2.dir) / xc1.dir.cross(&xc2.dir);
        let p = xc1.base.offset(&xc1.dir, &t);
        if xc1.contains(&p) && xc2.contains(&p) {
            vec![Intersection::Point(p)]
        } else {
            Vec::new()
        }
    }

    fn are_mergeable(&self, xc1: &LinearCurve, xc2: &LinearCurve) -> bool {
        let touch = |a: &Option<LinearPoint>, b: &Option<LinearPoint>| matches!((a, b), (Some(p), Some(q)) if p == q);
        xc1.is_collinear_with(xc2) && (touch(&xc1.max, &xc2.min) || touch(&xc2.max, &xc1.min))
    }

    fn merge(&self, xc1: &LinearCurve, xc2: &LinearCurve) -> Result<LinearCurve, GeometryError> {
        if !self.are_mergeable(xc1, xc2) {
            return Err(GeometryError::NotMergeable);
        }
        if xc1.max.is_some() && xc1.max == xc2.min {
            Ok(xc1.with_ends(xc1.min.clone(), xc2.max.clone()))
        } else {
            Ok(xc1.with_ends(xc2.min.clone(), xc1.max.clone()))
        }
    }

    fn construct_opposite(&self, xc: &LinearCurve) -> LinearCurve {
        LinearCurve {
            reversed: !xc.reversed,
            ..xc.clone()
        }
    }

    fn compare_endpoints_xy(&self, xc: &LinearCurve) -> Ordering {
        if xc.reversed {
            Ordering::Greater
        } else {
            Ordering::Less
        }
    }

    fn parameter_space_in_x(&self, xc: &LinearCurve, end: CurveEnd) -> ParameterSpace {
        match (xc.end(end), xc.is_vertical(), end) {
            (None, false, CurveEnd::Min) => ParameterSpace::LeftBoundary,
            (None, false, CurveEnd::Max) => ParameterSpace::RightBoundary,
            _ => ParameterSpace::Interior,
        }
    }

    fn parameter_space_in_y(&self, xc: &LinearCurve, end: CurveEnd) -> ParameterSpace {
        match (xc.end(end), xc.is_vertical(), end) {
            (None, true, CurveEnd::Min) => ParameterSpace::BottomBoundary,
            (None, true, CurveEnd::Max) => ParameterSpace::TopBoundary,
            _ => ParameterSpace::Interior,
        }
    }

    fn compare_x_point_near_boundary(&self, p: &LinearPoint, xc: &LinearCurve, _end: CurveEnd) -> Ordering {
        debug_assert!(xc.is_vertical());
        p.x.cmp(&xc.base.x)
    }

    fn compare_x_near_boundary(
        &self,
        xc1: &LinearCurve,
        _end1: CurveEnd,
        xc2: &LinearCurve,
        _end2: CurveEnd,
    ) -> Ordering {
        debug_assert!(xc1.is_vertical() && xc2.is_vertical());
        xc1.base.x.cmp(&xc2.base.x)
    }

    fn compare_y_near_boundary(&self, xc1: &LinearCurve, xc2: &LinearCurve, end: CurveEnd) -> Ordering {
        debug_assert!(!xc1.is_vertical() && !xc2.is_vertical());
        // Far away, the steeper line is on top to the right and at the bottom
        // to the left. Parallel lines keep their vertical offset.
        let by_slope = match end {
            CurveEnd::Max => xc1.compare_slopes(xc2),
            CurveEnd::Min => xc1.compare_slopes(xc2).reverse(),
        };
        by_slope.then_with(|| xc2.side_of(&xc1.base))
    }
}
