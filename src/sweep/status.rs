//! The status line: the curves crossing the sweep line, from bottom to top.

use std::cmp::Ordering;
use std::ops::Range;

use crate::geometry::{CurveEnd, Geometry, ParameterSpace};
use crate::treevec::TreeVec;

use super::event::EventPoint;
use super::subcurve::{CurveIdx, CurveVec, SubCurve};

/// Compares an event with a curve in the status line: `Less` if the event
/// is below the curve, `Equal` if the curve contains the event.
pub(crate) fn compare_event_to_curve<G: Geometry>(
    geometry: &G,
    event: &EventPoint<G::Point, G::XCurve>,
    xc: &G::XCurve,
) -> Ordering {
    match event {
        EventPoint::Finite(p) if geometry.is_vertical(xc) => {
            // A vertical curve in the status line has the same x as the
            // event, so only its extent matters.
            let finite_end = |end| {
                let in_y = geometry.parameter_space_in_y(xc, end);
                (in_y == ParameterSpace::Interior).then(|| match end {
                    CurveEnd::Min => geometry.construct_min_vertex(xc),
                    CurveEnd::Max => geometry.construct_max_vertex(xc),
                })
            };
            if let Some(min) = finite_end(CurveEnd::Min) {
                if geometry.compare_xy(p, &min) == Ordering::Less {
                    return Ordering::Less;
                }
            }
            match finite_end(CurveEnd::Max) {
                Some(max) if geometry.compare_xy(p, &max) == Ordering::Greater => Ordering::Greater,
                _ => Ordering::Equal,
            }
        }
        EventPoint::Finite(p) => geometry.compare_y_at_x(p, xc),
        EventPoint::Boundary {
            ps_x: ParameterSpace::LeftBoundary,
            curve,
            ..
        } => geometry.compare_y_near_boundary(curve, xc, CurveEnd::Min),
        EventPoint::Boundary {
            ps_x: ParameterSpace::RightBoundary,
            curve,
            ..
        } => geometry.compare_y_near_boundary(curve, xc, CurveEnd::Max),
        EventPoint::Boundary {
            ps_y: ParameterSpace::BottomBoundary,
            ..
        } => Ordering::Less,
        EventPoint::Boundary { curve, end, .. } => {
            // The top boundary: only a vertical curve heading to the same
            // place contains it.
            let reaches_top =
                geometry.parameter_space_in_y(xc, CurveEnd::Max) == ParameterSpace::TopBoundary;
            if reaches_top
                && geometry.compare_x_near_boundary(curve, *end, xc, CurveEnd::Max) == Ordering::Equal
            {
                Ordering::Equal
            } else {
                Ordering::Greater
            }
        }
    }
}

/// The sequence of active curves, ordered by their height just to the left
/// of the current sweep position.
///
/// Outside of event processing, the curves are always sorted; inside, the
/// curves through the current event are temporarily removed and reinserted.
#[derive(Clone, Debug, Default)]
pub struct StatusLine {
    curves: TreeVec<CurveIdx, 32>,
}

impl StatusLine {
    /// Creates an empty status line.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of active curves.
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    /// Are there no active curves?
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// The curve at position `pos`, counting from the bottom.
    pub fn get(&self, pos: usize) -> Option<CurveIdx> {
        self.curves.get(pos).copied()
    }

    /// The curve just below position `pos`.
    pub fn predecessor(&self, pos: usize) -> Option<CurveIdx> {
        self.get(pos.checked_sub(1)?)
    }

    /// The curve at position `pos`, which is just above anything inserted
    /// at `pos`.
    pub fn successor(&self, pos: usize) -> Option<CurveIdx> {
        self.get(pos)
    }

    /// Inserts `curve` at position `pos`.
    pub fn insert(&mut self, pos: usize, curve: CurveIdx) {
        self.curves.insert(pos, curve);
    }

    /// Removes `curve`, returning the position it was at.
    ///
    /// This scans the whole line; [`StatusLine::remove_range`] is the cheap
    /// way to remove the curves through an event.
    pub fn remove(&mut self, curve: CurveIdx) -> Option<usize> {
        let pos = self.curves.iter().position(|&c| c == curve)?;
        self.curves.remove(pos);
        Some(pos)
    }

    /// Removes and returns the curves in the given range, from the bottom up.
    pub fn remove_range(&mut self, range: Range<usize>) -> Vec<CurveIdx> {
        let start = range.start;
        range.map(|_| self.curves.remove(start)).collect()
    }

    /// Iterates over the active curves from the bottom up.
    pub fn iter(&self) -> impl Iterator<Item = CurveIdx> + '_ {
        self.curves.iter().copied()
    }

    /// Finds the contiguous range of curves that contain `event`.
    ///
    /// If no curve contains it, the range is empty and starts at the position
    /// where a curve through `event` would be inserted.
    pub(crate) fn locate<G: Geometry>(
        &self,
        geometry: &G,
        curves: &CurveVec<SubCurve<G::XCurve>>,
        event: &EventPoint<G::Point, G::XCurve>,
    ) -> Range<usize> {
        let cmp = |c: &CurveIdx| compare_event_to_curve(geometry, event, &curves[*c].curve);
        let start = self.curves.partition_point(|c| cmp(c) == Ordering::Greater);
        let end = self.curves.partition_point(|c| cmp(c) != Ordering::Less);
        start..end.max(start)
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Vec2};

    use super::*;
    use crate::counting::{CountingGeometry, Operation};
    use crate::linear::{LinearCurve, LinearGeometry, LinearPoint};

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn at(x: f64, y: f64) -> EventPoint<LinearPoint, LinearCurve> {
        EventPoint::Finite(LinearPoint::new(x, y))
    }

    fn status_of(curves: &[LinearCurve]) -> (StatusLine, CurveVec<SubCurve<LinearCurve>>) {
        let mut vec = CurveVec::default();
        let mut status = StatusLine::new();
        for (i, c) in curves.iter().enumerate() {
            let idx = vec.push(SubCurve::new(c.clone(), i));
            status.insert(status.len(), idx);
        }
        (status, vec)
    }

    #[test]
    fn locates_containing_range() {
        let g = LinearGeometry;
        let (status, curves) = status_of(&[
            LinearCurve::segment(p(0.0, 0.0), p(4.0, 0.0)).unwrap(),
            LinearCurve::segment(p(0.0, 0.0), p(4.0, 4.0)).unwrap(),
            LinearCurve::segment(p(0.0, 4.0), p(4.0, 0.0)).unwrap(),
            LinearCurve::segment(p(0.0, 5.0), p(4.0, 5.0)).unwrap(),
        ]);
        assert_eq!(status.locate(&g, &curves, &at(2.0, 2.0)), 1..3);
        assert_eq!(status.locate(&g, &curves, &at(2.0, 1.0)), 1..1);
        assert_eq!(status.locate(&g, &curves, &at(2.0, 9.0)), 4..4);
        assert_eq!(status.predecessor(1), Some(CurveIdx(0)));
        assert_eq!(status.predecessor(0), None);
        assert_eq!(status.successor(3), Some(CurveIdx(3)));
        assert_eq!(status.successor(4), None);
    }

    #[test]
    fn vertical_curves_use_their_extent() {
        let g = CountingGeometry::new(LinearGeometry);
        let (status, curves) = status_of(&[
            LinearCurve::segment(p(1.0, 0.0), p(1.0, 2.0)).unwrap(),
            LinearCurve::segment(p(0.0, 3.0), p(2.0, 3.0)).unwrap(),
        ]);
        assert_eq!(status.locate(&g, &curves, &at(1.0, 1.0)), 0..1);
        assert_eq!(status.locate(&g, &curves, &at(1.0, 2.0)), 0..1);
        assert_eq!(status.locate(&g, &curves, &at(1.0, 2.5)), 1..1);
        // The horizontal curve is compared with `compare_y_at_x`, but the
        // vertical one never is.
        let evaluations = g.count(Operation::CompareYAtX);
        assert!(evaluations > 0);
        let (status, curves) =
            status_of(&[LinearCurve::ray(p(1.0, 0.0), Vec2::new(0.0, 1.0)).unwrap()]);
        g.reset();
        assert_eq!(status.locate(&g, &curves, &at(1.0, 50.0)), 0..1);
        assert_eq!(g.count(Operation::CompareYAtX), 0);
    }

    #[test]
    fn remove_returns_positions() {
        let (mut status, _) = status_of(&[
            LinearCurve::segment(p(0.0, 0.0), p(1.0, 0.0)).unwrap(),
            LinearCurve::segment(p(0.0, 1.0), p(1.0, 1.0)).unwrap(),
            LinearCurve::segment(p(0.0, 2.0), p(1.0, 2.0)).unwrap(),
        ]);
        assert_eq!(status.remove(CurveIdx(1)), Some(1));
        assert_eq!(status.remove(CurveIdx(1)), None);
        assert_eq!(status.remove_range(0..2), vec![CurveIdx(0), CurveIdx(2)]);
        assert!(status.is_empty());
    }
}
