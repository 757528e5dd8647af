//! The sweep-line implementation.
//!
//! The main entry point is [`Sweeper`], which sweeps a vertical line from
//! left to right across a collection of curves, stopping at every curve end
//! and every intersection. At each stop it reports the arrangement's vertex
//! there, and the edges ending there, to a [`Visitor`].
//!
//! Two pieces of state drive the sweep: the [`EventQueue`] of points still
//! to visit, and the [`StatusLine`] of curves crossing the sweep line. A
//! crossing between two curves is realized by removing the curves through
//! an event and reinserting them in their order to the right of it.

mod driver;
mod event;
pub mod queue;
pub mod status;
mod subcurve;

pub use driver::{SweepState, Sweeper};
pub use event::{Event, EventPoint, Role};
pub use queue::{EventIdx, EventQueue};
pub use status::StatusLine;
pub use subcurve::CurveIdx;

use crate::geometry::{CurveEnd, Geometry};
use crate::Error;

/// An index of a vertex, in the order that vertices are reported.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct VertexIdx(pub usize);

impl std::fmt::Debug for VertexIdx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v_{}", self.0)
    }
}

/// An edge of the arrangement: a maximal piece of curve with no vertex in
/// its interior.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge<X> {
    /// The geometry of the edge.
    pub curve: X,
    /// The number of input curves running along this edge.
    pub multiplicity: u32,
    /// The indices (in input order) of the input curves running along this
    /// edge, sorted.
    pub sources: Vec<usize>,
}

/// A curve incident to a vertex, together with the end of it that touches
/// the vertex.
#[derive(Clone, Debug, PartialEq)]
pub struct IncidentEnd<X> {
    /// The incident curve. For curves ending at the vertex this is the
    /// finished edge; for curves leaving it, the part still to be swept.
    pub curve: X,
    /// Which end of `curve` is at the vertex.
    pub end: CurveEnd,
}

/// Receives the arrangement as the sweep discovers it.
///
/// For each event, the vertex is reported first, then any merges, and then
/// the edges that end at the vertex. An edge is reported only after both
/// of its vertices.
pub trait Visitor<G: Geometry> {
    /// A vertex was created at `point`.
    fn vertex_created(
        &mut self,
        vertex: VertexIdx,
        point: &EventPoint<G::Point, G::XCurve>,
        incident: &[IncidentEnd<G::XCurve>],
    );

    /// An edge from `left` to `right` was completed.
    fn edge_created(&mut self, edge: &Edge<G::XCurve>, left: VertexIdx, right: VertexIdx);

    /// Some curves meeting at suppressed vertices were merged into one.
    fn curves_merged(&mut self, _originals: &[G::XCurve], _result: &G::XCurve) {}
}

/// Options for a sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// If true, vertices where exactly one curve ends and a mergeable curve
    /// continues are suppressed, and the two edges merged.
    pub merge_mergeable_curves: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        SweepConfig {
            merge_mergeable_curves: true,
        }
    }
}

/// Sweeps over `curves`, reporting the arrangement to `visitor`.
pub fn sweep<G, V>(
    geometry: &G,
    curves: impl IntoIterator<Item = G::Curve>,
    visitor: &mut V,
) -> Result<(), Error>
where
    G: Geometry,
    V: Visitor<G>,
{
    sweep_with_config(geometry, curves, SweepConfig::default(), visitor)
}

/// Sweeps over `curves` with the given options, reporting the arrangement to
/// `visitor`.
pub fn sweep_with_config<G, V>(
    geometry: &G,
    curves: impl IntoIterator<Item = G::Curve>,
    config: SweepConfig,
    visitor: &mut V,
) -> Result<(), Error>
where
    G: Geometry,
    V: Visitor<G>,
{
    let mut sweeper = Sweeper::with_config(geometry, config);
    sweeper.insert_curves(curves)?;
    sweeper.run(visitor)
}
