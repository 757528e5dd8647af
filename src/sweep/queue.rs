//! The event queue.

use std::cmp::Ordering;

use crate::geometry::Geometry;
use crate::treevec::TreeVec;
use crate::Error;

use super::event::{compare_event_points, Event, EventPoint, Role};

/// An index into the event arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventIdx(pub usize);

#[derive(Clone)]
struct EventVec<T> {
    inner: Vec<T>,
}

impl_typed_vec!(EventVec, EventIdx, "e");

/// The pending events of a sweep, in sweep order.
///
/// Events are stored in an arena and the queue itself is a sorted sequence
/// of arena indices. Inserting at a point that is already queued merges into
/// the existing event, so that every point is visited once.
#[derive(Clone, Debug)]
pub struct EventQueue<P, X> {
    events: EventVec<Option<Event<P, X>>>,
    order: TreeVec<EventIdx, 32>,
}

impl<P, X> Default for EventQueue<P, X> {
    fn default() -> Self {
        EventQueue {
            events: EventVec::default(),
            order: TreeVec::new(),
        }
    }
}

impl<P: Clone + std::fmt::Debug, X: Clone + std::fmt::Debug> EventQueue<P, X> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of pending events.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Are there no more pending events?
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn event(&self, idx: EventIdx) -> &Event<P, X> {
        match &self.events[idx] {
            Some(ev) => ev,
            None => unreachable!("{idx:?} was queued after being popped"),
        }
    }

    /// Adds `role` to the event at `point`, creating the event if there
    /// isn't one.
    ///
    /// Fails if the geometry's ordering isn't consistent around `point`:
    /// if some queued event is equal to `point` in one direction but not the
    /// other, or is on both sides of it.
    pub fn insert_or_merge<G>(
        &mut self,
        geometry: &G,
        point: EventPoint<P, X>,
        role: Role,
    ) -> Result<EventIdx, Error>
    where
        G: Geometry<Point = P, XCurve = X>,
    {
        let pos = self
            .order
            .partition_point(|&idx| compare_event_points(geometry, &self.event(idx).point, &point) == Ordering::Less);

        if let Some(&idx) = self.order.get(pos) {
            let existing = &self.event(idx).point;
            let backward = compare_event_points(geometry, &point, existing);
            let same_point = match (existing, &point) {
                (EventPoint::Finite(p), EventPoint::Finite(q)) => geometry.equal_points(p, q),
                _ => true,
            };
            match compare_event_points(geometry, existing, &point) {
                Ordering::Equal if backward == Ordering::Equal && same_point => {
                    if let Some(ev) = self.events[idx].as_mut() {
                        ev.add_role(role);
                    }
                    return Ok(idx);
                }
                Ordering::Greater if backward == Ordering::Less => {}
                _ => return Err(Error::ambiguous_order(existing, &point)),
            }
        }

        if pos > 0 {
            let prev = &self.event(self.order[pos - 1]).point;
            if compare_event_points(geometry, &point, prev) != Ordering::Greater {
                return Err(Error::ambiguous_order(prev, &point));
            }
        }

        let mut ev = Event::new(point);
        ev.add_role(role);
        let idx = self.events.push(Some(ev));
        self.order.insert(pos, idx);
        Ok(idx)
    }

    /// The first pending event, if there is one.
    pub fn peek_min(&self) -> Option<&Event<P, X>> {
        let idx = *self.order.get(0)?;
        self.events[idx].as_ref()
    }

    /// Removes and returns the first pending event.
    pub fn pop_min(&mut self) -> Option<(EventIdx, Event<P, X>)> {
        if self.order.is_empty() {
            return None;
        }
        let idx = self.order.remove(0);
        self.events[idx].take().map(|ev| (idx, ev))
    }

    /// Iterates over the pending events in order.
    pub fn iter(&self) -> impl Iterator<Item = &Event<P, X>> + '_ {
        self.order.iter().filter_map(|&idx| self.events[idx].as_ref())
    }
}
