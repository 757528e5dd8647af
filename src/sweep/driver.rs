use std::cmp::Ordering;
use std::fmt;

use tracing::{debug, instrument, trace};

use crate::geometry::{CurveEnd, Geometry, Intersection, ParameterSpace, XMonotone};
use crate::Error;

use super::event::{compare_event_points, curve_end_point, Event, EventPoint, Role};
use super::queue::{EventIdx, EventQueue};
use super::status::StatusLine;
use super::subcurve::{merge_sources, CurveIdx, CurveState, CurveVec, Prefix, SubCurve};
use super::{Edge, IncidentEnd, SweepConfig, VertexIdx, Visitor};

type EventPointOf<G> = EventPoint<<G as Geometry>::Point, <G as Geometry>::XCurve>;

/// Where a [`Sweeper`] is in its life.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SweepState {
    /// Accepting curves; no event has been processed.
    Idle,
    /// Processing events.
    Running,
    /// All events were processed, or the sweep failed.
    Finished,
}

// A piece of curve that ends at the current event, with everything needed
// to report it as an edge.
struct FinishedPiece<X> {
    curve: X,
    // The pieces `curve` was merged from, if it was merged across suppressed
    // vertices.
    merged_from: Vec<X>,
    left: Option<VertexIdx>,
    multiplicity: u32,
    sources: Vec<usize>,
}

/// Computes an arrangement by sweeping a line over a collection of curves.
///
/// Insert the curves with [`Sweeper::insert_curves`] (or
/// [`Sweeper::insert_x_monotone_curves`]), and then either drive the sweep
/// one event at a time with [`Sweeper::step`], or all at once with
/// [`Sweeper::run`].
pub struct Sweeper<'g, G: Geometry> {
    geometry: &'g G,
    config: SweepConfig,
    state: SweepState,
    queue: EventQueue<G::Point, G::XCurve>,
    status: StatusLine,
    curves: CurveVec<SubCurve<G::XCurve>>,
    current: Option<EventPointOf<G>>,
    next_source: usize,
    next_vertex: usize,
}

impl<'g, G: Geometry> Sweeper<'g, G> {
    /// Creates a sweeper with the default configuration.
    pub fn new(geometry: &'g G) -> Self {
        Self::with_config(geometry, SweepConfig::default())
    }

    /// Creates a sweeper.
    pub fn with_config(geometry: &'g G, config: SweepConfig) -> Self {
        Sweeper {
            geometry,
            config,
            state: SweepState::Idle,
            queue: EventQueue::new(),
            status: StatusLine::new(),
            curves: CurveVec::default(),
            current: None,
            next_source: 0,
            next_vertex: 0,
        }
    }

    /// The current state.
    pub fn state(&self) -> SweepState {
        self.state
    }

    /// The configuration this sweeper was created with.
    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// The pending events.
    pub fn queue(&self) -> &EventQueue<G::Point, G::XCurve> {
        &self.queue
    }

    /// The curves currently crossing the sweep line.
    pub fn status_line(&self) -> &StatusLine {
        &self.status
    }

    fn check_idle(&self) -> Result<(), Error> {
        if self.state == SweepState::Idle {
            Ok(())
        } else {
            Err(Error::SweepInProgress)
        }
    }

    /// Adds curves to the sweep, decomposing them with
    /// [`Geometry::make_x_monotone`].
    ///
    /// Each curve is numbered (starting from zero, and continuing across
    /// calls) and the numbers are reported as the [`Edge::sources`] of the
    /// edges it produces.
    pub fn insert_curves(&mut self, curves: impl IntoIterator<Item = G::Curve>) -> Result<(), Error> {
        self.check_idle()?;
        for cv in curves {
            let source = self.take_source();
            for piece in self.geometry.make_x_monotone(&cv) {
                match piece {
                    XMonotone::Curve(xc) => self.add_curve(xc, source)?,
                    XMonotone::Point(p) => {
                        self.queue
                            .insert_or_merge(self.geometry, EventPoint::Finite(p), Role::Isolated)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Adds curves that are already x-monotone.
    ///
    /// They are numbered in the same sequence as the curves passed to
    /// [`Sweeper::insert_curves`].
    pub fn insert_x_monotone_curves(
        &mut self,
        curves: impl IntoIterator<Item = G::XCurve>,
    ) -> Result<(), Error> {
        self.check_idle()?;
        for xc in curves {
            let source = self.take_source();
            self.add_curve(xc, source)?;
        }
        Ok(())
    }

    fn take_source(&mut self) -> usize {
        self.next_source += 1;
        self.next_source - 1
    }

    fn add_curve(&mut self, xc: G::XCurve, source: usize) -> Result<(), Error> {
        let g = self.geometry;
        let start = curve_end_point(g, &xc, CurveEnd::Min);
        let end = curve_end_point(g, &xc, CurveEnd::Max);
        let idx = self.curves.push(SubCurve::new(xc, source));
        self.queue.insert_or_merge(g, start, Role::Starting(idx))?;
        self.queue.insert_or_merge(g, end, Role::Passing(idx))?;
        Ok(())
    }

    /// Processes the next event.
    ///
    /// Returns `Ok(false)` if there were no more events. After an error, the
    /// sweep is finished.
    pub fn step<V: Visitor<G>>(&mut self, visitor: &mut V) -> Result<bool, Error> {
        if self.state == SweepState::Finished {
            return Ok(false);
        }
        self.state = SweepState::Running;

        let Some((idx, event)) = self.queue.pop_min() else {
            self.state = SweepState::Finished;
            return Ok(false);
        };
        if let Err(e) = self.process_event(idx, event, visitor) {
            self.state = SweepState::Finished;
            return Err(e);
        }
        Ok(true)
    }

    /// Processes all the events.
    #[instrument(skip_all, fields(events = self.queue.len(), curves = self.curves.len()))]
    pub fn run<V: Visitor<G>>(&mut self, visitor: &mut V) -> Result<(), Error> {
        while self.step(visitor)? {}
        debug!(vertices = self.next_vertex, "sweep finished");
        Ok(())
    }

    // Compares two curves leaving `point`, from bottom to top.
    fn compare_right(&self, a: CurveIdx, b: CurveIdx, point: &EventPointOf<G>) -> Ordering {
        let g = self.geometry;
        let (xa, xb) = (&self.curves[a].curve, &self.curves[b].curve);
        match (g.is_vertical(xa), g.is_vertical(xb)) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => match point {
                EventPoint::Finite(p) => g.compare_y_at_x_right(xa, xb, p),
                EventPoint::Boundary {
                    ps_x: ParameterSpace::LeftBoundary,
                    ..
                } => g.compare_y_near_boundary(xa, xb, CurveEnd::Min),
                EventPoint::Boundary { .. } => Ordering::Equal,
            },
        }
    }

    fn process_event<V: Visitor<G>>(
        &mut self,
        idx: EventIdx,
        event: Event<G::Point, G::XCurve>,
        visitor: &mut V,
    ) -> Result<(), Error> {
        let g = self.geometry;
        if let Some(prev) = &self.current {
            if compare_event_points(g, prev, &event.point) != Ordering::Less {
                return Err(Error::ambiguous_order(prev, &event.point));
            }
        }
        debug!(
            event = ?idx,
            point = %event.point,
            starting = event.starting.len(),
            passing = event.passing.len(),
            "processing event"
        );

        let range = self.status.locate(g, &self.curves, &event.point);
        let pos = range.start;
        let located = self.status.remove_range(range);
        for &c in &event.passing {
            if self.curves[c].state == CurveState::Active && !located.contains(&c) {
                return Err(Error::violation(
                    "a curve registered at an event does not contain it",
                    &self.curves[c].curve,
                    &event.point,
                ));
            }
        }

        // Cut every curve through the event into the finished part to the
        // left and the part still to be swept.
        let mut finished = Vec::with_capacity(located.len());
        let mut continuing = Vec::new();
        for c in located {
            let sub = &mut self.curves[c];
            let max = curve_end_point(g, &sub.curve, CurveEnd::Max);
            let piece = if compare_event_points(g, &max, &event.point) == Ordering::Equal {
                sub.state = CurveState::Finished;
                sub.curve.clone()
            } else {
                let Some(p) = event.point.finite() else {
                    return Err(Error::violation(
                        "a curve passes through a boundary event",
                        &sub.curve,
                        &event.point,
                    ));
                };
                let (left, right) = g.split(&sub.curve, p).map_err(|e| {
                    Error::geometry(e, "failed to split a curve at an event", &sub.curve, &event.point)
                })?;
                sub.curve = right;
                continuing.push(c);
                left
            };

            let mut sources = sub.sources.clone();
            let (curve, merged_from) = match sub.prefix.take() {
                None => (piece, Vec::new()),
                Some(prefix) => {
                    let merged = g.merge(&prefix.curve, &piece).map_err(|e| {
                        Error::geometry(e, "failed to merge across a vertex", &piece, &event.point)
                    })?;
                    merge_sources(&mut sources, &prefix.sources);
                    let mut parts = prefix.parts;
                    parts.push(piece);
                    (merged, parts)
                }
            };
            finished.push(FinishedPiece {
                curve,
                merged_from,
                left: sub.left_vertex,
                multiplicity: sub.multiplicity,
                sources,
            });
        }

        for &c in &event.starting {
            let sub = &mut self.curves[c];
            if sub.state == CurveState::Pending {
                sub.state = CurveState::Active;
                continuing.push(c);
            }
        }

        if finished.is_empty() && continuing.is_empty() && !event.isolated {
            trace!("nothing left at this event");
            self.current = Some(event.point);
            return Ok(());
        }

        // Sorting to the right of the event reverses the order of crossing
        // curves. Overlapping curves compare equal, and end up adjacent.
        continuing.sort_by(|&a, &b| self.compare_right(a, b, &event.point));
        let mut right: Vec<CurveIdx> = Vec::with_capacity(continuing.len());
        for c in continuing {
            match right.last().copied() {
                Some(prev) if self.compare_right(prev, c, &event.point) == Ordering::Equal => {
                    let survivor = self.collapse_overlap(prev, c)?;
                    if let Some(last) = right.last_mut() {
                        *last = survivor;
                    }
                }
                _ => right.push(c),
            }
        }

        if self.is_trivial_vertex(&event, &finished, &right) {
            if let (Some(piece), Some(&next)) = (finished.pop(), right.first()) {
                trace!(curve = ?next, "suppressing a vertex between mergeable curves");
                let sub = &mut self.curves[next];
                sub.left_vertex = piece.left;
                let parts = if piece.merged_from.is_empty() {
                    vec![piece.curve.clone()]
                } else {
                    piece.merged_from
                };
                sub.prefix = Some(Prefix {
                    curve: piece.curve,
                    parts,
                    sources: piece.sources,
                });
            }
        } else {
            self.report_vertex(&event.point, finished, &right, visitor)?;
        }

        for (i, &c) in right.iter().enumerate() {
            self.status.insert(pos + i, c);
        }

        if right.is_empty() {
            if let (Some(below), Some(above)) =
                (self.status.predecessor(pos), self.status.successor(pos))
            {
                self.intersect_neighbors(below, above, &event.point)?;
            }
        } else {
            if let Some(below) = self.status.predecessor(pos) {
                self.intersect_neighbors(below, right[0], &event.point)?;
            }
            for pair in right.windows(2) {
                self.intersect_neighbors(pair[0], pair[1], &event.point)?;
            }
            if let Some(above) = self.status.successor(pos + right.len()) {
                self.intersect_neighbors(right[right.len() - 1], above, &event.point)?;
            }
        }

        self.current = Some(event.point);
        self.check_invariants()
    }

    fn is_trivial_vertex(
        &self,
        event: &Event<G::Point, G::XCurve>,
        finished: &[FinishedPiece<G::XCurve>],
        right: &[CurveIdx],
    ) -> bool {
        let ([incoming], [outgoing]) = (finished, right) else {
            return false;
        };
        let outgoing = &self.curves[*outgoing];
        self.config.merge_mergeable_curves
            && event.point.is_finite()
            && !event.isolated
            && incoming.left.is_some()
            && incoming.multiplicity == outgoing.multiplicity
            && self.geometry.are_mergeable(&incoming.curve, &outgoing.curve)
    }

    fn report_vertex<V: Visitor<G>>(
        &mut self,
        point: &EventPointOf<G>,
        finished: Vec<FinishedPiece<G::XCurve>>,
        right: &[CurveIdx],
        visitor: &mut V,
    ) -> Result<(), Error> {
        let vertex = VertexIdx(self.next_vertex);
        self.next_vertex += 1;

        let incident: Vec<_> = finished
            .iter()
            .map(|piece| IncidentEnd {
                curve: piece.curve.clone(),
                end: CurveEnd::Max,
            })
            .chain(right.iter().map(|&c| IncidentEnd {
                curve: self.curves[c].curve.clone(),
                end: CurveEnd::Min,
            }))
            .collect();
        visitor.vertex_created(vertex, point, &incident);

        for piece in finished {
            let Some(left) = piece.left else {
                return Err(Error::violation(
                    "a curve ended without having started",
                    &piece.curve,
                    point,
                ));
            };
            if !piece.merged_from.is_empty() {
                visitor.curves_merged(&piece.merged_from, &piece.curve);
            }
            let edge = Edge {
                curve: piece.curve,
                multiplicity: piece.multiplicity,
                sources: piece.sources,
            };
            visitor.edge_created(&edge, left, vertex);
        }

        for &c in right {
            self.curves[c].left_vertex = Some(vertex);
        }
        Ok(())
    }

    // Two curves leave the current event along the same path. Keeps the one
    // that ends first, giving it the other one's multiplicity, and restarts
    // the longer one where the shorter one ends.
    fn collapse_overlap(&mut self, a: CurveIdx, b: CurveIdx) -> Result<CurveIdx, Error> {
        let g = self.geometry;
        let end_a = curve_end_point(g, &self.curves[a].curve, CurveEnd::Max);
        let end_b = curve_end_point(g, &self.curves[b].curve, CurveEnd::Max);
        let (keep, cut, at) = match compare_event_points(g, &end_a, &end_b) {
            Ordering::Equal => {
                if !g.equal_curves(&self.curves[a].curve, &self.curves[b].curve) {
                    return Err(Error::violation(
                        "overlapping curves with the same ends are not equal",
                        &self.curves[b].curve,
                        &end_b,
                    ));
                }
                trace!(kept = ?a, absorbed = ?b, "absorbing an overlapping curve");
                let absorbed = &mut self.curves[b];
                absorbed.state = CurveState::Absorbed;
                let (multiplicity, sources) =
                    (absorbed.multiplicity, std::mem::take(&mut absorbed.sources));
                self.curves[a].absorb(multiplicity, &sources);
                return Ok(a);
            }
            Ordering::Less => (a, b, end_a),
            Ordering::Greater => (b, a, end_b),
        };

        let Some(p) = at.finite() else {
            return Err(Error::violation(
                "overlapping curves diverge on the boundary",
                &self.curves[cut].curve,
                &at,
            ));
        };
        let (_, rest) = g.split(&self.curves[cut].curve, p).map_err(|e| {
            Error::geometry(e, "failed to split an overlapping curve", &self.curves[cut].curve, &at)
        })?;
        trace!(kept = ?keep, restarted = ?cut, at = %at, "collapsing an overlap");

        let (multiplicity, sources) = (self.curves[cut].multiplicity, self.curves[cut].sources.clone());
        self.curves[keep].absorb(multiplicity, &sources);
        let restarted = &mut self.curves[cut];
        restarted.curve = rest;
        restarted.state = CurveState::Pending;
        restarted.left_vertex = None;
        self.queue.insert_or_merge(g, at, Role::Starting(cut))?;
        Ok(keep)
    }

    fn intersect_neighbors(
        &mut self,
        below: CurveIdx,
        above: CurveIdx,
        current: &EventPointOf<G>,
    ) -> Result<(), Error> {
        let g = self.geometry;
        let found = g.intersect(&self.curves[below].curve, &self.curves[above].curve);
        trace!(?below, ?above, found = found.len(), "intersecting neighbors");

        for obj in found {
            let point = match obj {
                Intersection::Point(p) => EventPoint::Finite(p),
                Intersection::Overlap(xc) => curve_end_point(g, &xc, CurveEnd::Min),
            };
            match compare_event_points(g, &point, current) {
                Ordering::Greater => {}
                // Curves leaving the current event touch there.
                Ordering::Equal => continue,
                // A crossing that was already swept, for two curves that are
                // neighbors again.
                Ordering::Less => {
                    trace!(%point, "skipping a crossing behind the sweep line");
                    continue;
                }
            }
            self.queue
                .insert_or_merge(g, point.clone(), Role::Passing(below))?;
            self.queue.insert_or_merge(g, point, Role::Passing(above))?;
        }
        Ok(())
    }

    #[cfg(feature = "slow-asserts")]
    fn check_invariants(&self) -> Result<(), Error> {
        let g = self.geometry;
        let active: Vec<_> = self.status.iter().collect();
        for pair in active.windows(2) {
            let (lo, hi) = (&self.curves[pair[0]].curve, &self.curves[pair[1]].curve);
            let start_lo = curve_end_point(g, lo, CurveEnd::Min);
            let start_hi = curve_end_point(g, hi, CurveEnd::Min);
            // Compare the two curves at the later of their starts.
            let ordered = if compare_event_points(g, &start_lo, &start_hi) == Ordering::Greater {
                match super::status::compare_event_to_curve(g, &start_lo, hi) {
                    Ordering::Less => true,
                    Ordering::Equal => self.compare_right(pair[0], pair[1], &start_lo) != Ordering::Greater,
                    Ordering::Greater => false,
                }
            } else {
                match super::status::compare_event_to_curve(g, &start_hi, lo) {
                    Ordering::Greater => true,
                    Ordering::Equal => self.compare_right(pair[0], pair[1], &start_hi) != Ordering::Greater,
                    Ordering::Less => false,
                }
            };
            if !ordered {
                return Err(Error::violation("the status line is out of order", hi, &start_hi));
            }
        }
        Ok(())
    }

    #[cfg(not(feature = "slow-asserts"))]
    fn check_invariants(&self) -> Result<(), Error> {
        Ok(())
    }

    /// A human-readable dump of the sweep's state: the current event, the
    /// pending events, and the status line.
    pub fn dump(&self) -> String {
        SweepDump { sweeper: self }.to_string()
    }
}

struct SweepDump<'a, 'g, G: Geometry> {
    sweeper: &'a Sweeper<'g, G>,
}

impl<G: Geometry> fmt::Display for SweepDump<'_, '_, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.sweeper;
        writeln!(f, "state: {:?}", s.state)?;
        match &s.current {
            Some(point) => writeln!(f, "last event: {point}")?,
            None => writeln!(f, "last event: none")?,
        }

        writeln!(f, "event queue ({} events):", s.queue.len())?;
        for ev in s.queue.iter() {
            write!(f, "  {}: starting {:?}, passing {:?}", ev.point, ev.starting, ev.passing)?;
            if ev.isolated {
                write!(f, ", isolated point")?;
            }
            writeln!(f)?;
        }

        writeln!(f, "status line ({} curves, bottom to top):", s.status.len())?;
        for c in s.status.iter() {
            let sub = &s.curves[c];
            writeln!(f, "  {c:?} (x{}): {:?}", sub.multiplicity, sub.curve)?;
        }
        Ok(())
    }
}
