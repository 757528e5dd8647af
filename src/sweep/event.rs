//! Event points and the order in which the sweep visits them.

use std::cmp::Ordering;
use std::fmt;

use crate::geometry::{CurveEnd, Geometry, ParameterSpace};

use super::CurveIdx;

/// A place where the sweep stops: a finite point, or the end of a curve that
/// reaches the boundary of the parameter space.
#[derive(Clone, Debug, PartialEq)]
pub enum EventPoint<P, X> {
    /// A finite point.
    Finite(P),
    /// A pseudo-point on the boundary, identified by the curve end that
    /// reaches it.
    Boundary {
        /// Where the curve end lies along x.
        ps_x: ParameterSpace,
        /// Where the curve end lies along y.
        ps_y: ParameterSpace,
        /// A curve reaching the boundary here.
        curve: X,
        /// Which of `curve`'s ends reaches the boundary.
        end: CurveEnd,
    },
}

impl<P, X> EventPoint<P, X> {
    /// The point, if this event is finite.
    pub fn finite(&self) -> Option<&P> {
        match self {
            EventPoint::Finite(p) => Some(p),
            EventPoint::Boundary { .. } => None,
        }
    }

    /// Is this a finite point?
    pub fn is_finite(&self) -> bool {
        matches!(self, EventPoint::Finite(_))
    }
}

impl<P: fmt::Debug, X: fmt::Debug> fmt::Display for EventPoint<P, X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventPoint::Finite(p) => write!(f, "{p:?}"),
            EventPoint::Boundary {
                ps_x,
                ps_y,
                curve,
                end,
            } => {
                let ps = if *ps_x != ParameterSpace::Interior {
                    ps_x
                } else {
                    ps_y
                };
                write!(f, "{ps} ({end:?} end of {curve:?})")
            }
        }
    }
}

/// The event point at one end of a curve.
pub(crate) fn curve_end_point<G: Geometry>(
    geometry: &G,
    xc: &G::XCurve,
    end: CurveEnd,
) -> EventPoint<G::Point, G::XCurve> {
    let ps_x = geometry.parameter_space_in_x(xc, end);
    let ps_y = geometry.parameter_space_in_y(xc, end);
    if ps_x == ParameterSpace::Interior && ps_y == ParameterSpace::Interior {
        EventPoint::Finite(match end {
            CurveEnd::Min => geometry.construct_min_vertex(xc),
            CurveEnd::Max => geometry.construct_max_vertex(xc),
        })
    } else {
        EventPoint::Boundary {
            ps_x,
            ps_y,
            curve: xc.clone(),
            end,
        }
    }
}

/// The order of events along the sweep.
///
/// Finite points are ordered by `compare_xy`. Events on the left boundary
/// come before everything else and events on the right boundary after
/// everything else; among themselves they are ordered by the vertical order
/// of their curves near the boundary. Events on the bottom or top boundary
/// are placed among the finite points by their x coordinate, with the
/// bottom ones first and the top ones last among the events with that x.
pub(crate) fn compare_event_points<G: Geometry>(
    geometry: &G,
    a: &EventPoint<G::Point, G::XCurve>,
    b: &EventPoint<G::Point, G::XCurve>,
) -> Ordering {
    use ParameterSpace::*;

    // Among events with the same x, bottom comes first and top last.
    let y_rank = |ps: &ParameterSpace| match ps {
        BottomBoundary => 0,
        _ => 1,
    };

    match (a, b) {
        (EventPoint::Finite(p), EventPoint::Finite(q)) => geometry.compare_xy(p, q),
        (EventPoint::Finite(_), EventPoint::Boundary { .. }) => {
            compare_event_points(geometry, b, a).reverse()
        }
        (
            EventPoint::Boundary {
                ps_x,
                ps_y,
                curve,
                end,
            },
            EventPoint::Finite(q),
        ) => match ps_x {
            LeftBoundary => Ordering::Less,
            RightBoundary => Ordering::Greater,
            _ => geometry
                .compare_x_point_near_boundary(q, curve, *end)
                .reverse()
                .then(if *ps_y == BottomBoundary {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }),
        },
        (
            EventPoint::Boundary {
                ps_x: x1,
                ps_y: y1,
                curve: c1,
                end: e1,
            },
            EventPoint::Boundary {
                ps_x: x2,
                ps_y: y2,
                curve: c2,
                end: e2,
            },
        ) => match (x1, x2) {
            (LeftBoundary, LeftBoundary) => geometry.compare_y_near_boundary(c1, c2, CurveEnd::Min),
            (RightBoundary, RightBoundary) => {
                geometry.compare_y_near_boundary(c1, c2, CurveEnd::Max)
            }
            (LeftBoundary, _) | (_, RightBoundary) => Ordering::Less,
            (RightBoundary, _) | (_, LeftBoundary) => Ordering::Greater,
            _ => geometry
                .compare_x_near_boundary(c1, *e1, c2, *e2)
                .then(y_rank(y1).cmp(&y_rank(y2))),
        },
    }
}

/// The role of a curve at an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// The curve starts (has its min end) here.
    Starting(CurveIdx),
    /// The curve ends here or passes through here.
    Passing(CurveIdx),
    /// There's an isolated point here.
    Isolated,
}

/// A pending event: a point, and what happens there.
#[derive(Clone, Debug)]
pub struct Event<P, X> {
    /// Where the event is.
    pub point: EventPoint<P, X>,
    /// Curves whose min end is at this point.
    pub starting: Vec<CurveIdx>,
    /// Curves registered as ending at or passing through this point.
    pub passing: Vec<CurveIdx>,
    /// Whether an isolated point was inserted here.
    pub isolated: bool,
}

impl<P, X> Event<P, X> {
    pub(crate) fn new(point: EventPoint<P, X>) -> Self {
        Event {
            point,
            starting: Vec::new(),
            passing: Vec::new(),
            isolated: false,
        }
    }

    pub(crate) fn add_role(&mut self, role: Role) {
        let (list, c) = match role {
            Role::Starting(c) => (&mut self.starting, c),
            Role::Passing(c) => (&mut self.passing, c),
            Role::Isolated => {
                self.isolated = true;
                return;
            }
        };
        if !list.contains(&c) {
            list.push(c);
        }
    }
}
