//! Bookkeeping for the x-monotone curves owned by a sweep.

use super::VertexIdx;

/// An index into the curve arena of a sweep.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CurveIdx(pub usize);

#[derive(Clone)]
pub(crate) struct CurveVec<T> {
    inner: Vec<T>,
}

impl_typed_vec!(CurveVec, CurveIdx, "c");

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CurveState {
    // Waiting for the event at its min end.
    Pending,
    // In the status line.
    Active,
    Finished,
    // Swallowed by an overlapping curve with the same extent.
    Absorbed,
}

/// Pieces that were joined across suppressed vertices, waiting for the
/// curve that continues them to end.
#[derive(Clone, Debug)]
pub(crate) struct Prefix<X> {
    pub curve: X,
    pub parts: Vec<X>,
    pub sources: Vec<usize>,
}

/// A curve as the sweep sees it: only the part to the right of the sweep
/// line is stored, the rest has already been reported.
#[derive(Clone, Debug)]
pub(crate) struct SubCurve<X> {
    pub curve: X,
    pub state: CurveState,
    // How many input curves run along this one.
    pub multiplicity: u32,
    // Sorted indices of the input curves this one comes from.
    pub sources: Vec<usize>,
    // The vertex at which the unreported part to the left of the sweep line
    // starts. `None` until the curve's first event has been processed.
    pub left_vertex: Option<VertexIdx>,
    pub prefix: Option<Prefix<X>>,
}

impl<X> SubCurve<X> {
    pub fn new(curve: X, source: usize) -> Self {
        SubCurve {
            curve,
            state: CurveState::Pending,
            multiplicity: 1,
            sources: vec![source],
            left_vertex: None,
            prefix: None,
        }
    }

    /// Takes over the input curves of an overlapping curve.
    pub fn absorb(&mut self, multiplicity: u32, sources: &[usize]) {
        self.multiplicity += multiplicity;
        merge_sources(&mut self.sources, sources);
    }
}

/// Adds `other` to the sorted list `into`, skipping duplicates.
pub(crate) fn merge_sources(into: &mut Vec<usize>, other: &[usize]) {
    for &s in other {
        if let Err(i) = into.binary_search(&s) {
            into.insert(i, s);
        }
    }
}
