//! A visitor that records the whole arrangement.

use crate::geometry::Geometry;
use crate::sweep::{Edge, EventPoint, IncidentEnd, VertexIdx, Visitor};

/// A vertex of an [`Arrangement`].
#[derive(Clone, Debug, PartialEq)]
pub struct Vertex<P, X> {
    /// Where the vertex is.
    pub point: EventPoint<P, X>,
    /// The number of edges incident to this vertex.
    pub degree: usize,
}

/// An edge of an [`Arrangement`], together with its endpoints.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeRecord<X> {
    /// The edge.
    pub edge: Edge<X>,
    /// The vertex at the edge's min end.
    pub left: VertexIdx,
    /// The vertex at the edge's max end.
    pub right: VertexIdx,
}

/// The arrangement of a collection of curves, as reported by a sweep.
///
/// Vertices are numbered in the order the sweep created them, which is the
/// sweep order; edges are stored in the order they were completed.
#[derive(Clone, Debug, PartialEq)]
pub struct Arrangement<P, X> {
    vertices: Vec<Vertex<P, X>>,
    edges: Vec<EdgeRecord<X>>,
    merges: Vec<(Vec<X>, X)>,
}

impl<P, X> Default for Arrangement<P, X> {
    fn default() -> Self {
        Arrangement {
            vertices: Vec::new(),
            edges: Vec::new(),
            merges: Vec::new(),
        }
    }
}

impl<P, X> Arrangement<P, X> {
    /// Creates an empty arrangement, ready to be filled in by a sweep.
    pub fn new() -> Self {
        Self::default()
    }

    /// All the vertices, in sweep order.
    pub fn vertices(&self) -> &[Vertex<P, X>] {
        &self.vertices
    }

    /// All the edges, in the order they were completed.
    pub fn edges(&self) -> &[EdgeRecord<X>] {
        &self.edges
    }

    /// The merges performed across suppressed vertices: the original pieces,
    /// and the curve they were merged into.
    pub fn merges(&self) -> &[(Vec<X>, X)] {
        &self.merges
    }

    /// The number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// The number of edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// The vertex with the given index.
    pub fn vertex(&self, idx: VertexIdx) -> Option<&Vertex<P, X>> {
        self.vertices.get(idx.0)
    }

    /// Finds the finite vertex at `p`.
    pub fn find_vertex<G>(&self, geometry: &G, p: &P) -> Option<VertexIdx>
    where
        G: Geometry<Point = P, XCurve = X>,
    {
        self.vertices
            .iter()
            .position(|v| v.point.finite().is_some_and(|q| geometry.equal_points(p, q)))
            .map(VertexIdx)
    }

    /// The number of connected components, counting isolated vertices.
    pub fn connected_components(&self) -> usize {
        let mut parent: Vec<usize> = (0..self.vertices.len()).collect();
        fn root(parent: &mut [usize], mut i: usize) -> usize {
            while parent[i] != i {
                parent[i] = parent[parent[i]];
                i = parent[i];
            }
            i
        }

        let mut components = self.vertices.len();
        for e in &self.edges {
            let a = root(&mut parent, e.left.0);
            let b = root(&mut parent, e.right.0);
            if a != b {
                parent[a] = b;
                components -= 1;
            }
        }
        components
    }

    /// The number of faces, including the unbounded one.
    ///
    /// Euler's formula only applies if the arrangement is bounded, so this
    /// returns `None` if any vertex lies on the boundary.
    pub fn num_faces(&self) -> Option<usize> {
        if !self.vertices.iter().all(|v| v.point.is_finite()) {
            return None;
        }
        // E - V + C + 1, where E + C + 1 >= V.
        Some(self.edges.len() + self.connected_components() + 1 - self.vertices.len())
    }
}

impl<G: Geometry> Visitor<G> for Arrangement<G::Point, G::XCurve> {
    fn vertex_created(
        &mut self,
        vertex: VertexIdx,
        point: &EventPoint<G::Point, G::XCurve>,
        _incident: &[IncidentEnd<G::XCurve>],
    ) {
        debug_assert_eq!(vertex.0, self.vertices.len());
        self.vertices.push(Vertex {
            point: point.clone(),
            degree: 0,
        });
    }

    fn edge_created(&mut self, edge: &Edge<G::XCurve>, left: VertexIdx, right: VertexIdx) {
        self.vertices[left.0].degree += 1;
        self.vertices[right.0].degree += 1;
        self.edges.push(EdgeRecord {
            edge: edge.clone(),
            left,
            right,
        });
    }

    fn curves_merged(&mut self, originals: &[G::XCurve], result: &G::XCurve) {
        self.merges.push((originals.to_vec(), result.clone()));
    }
}

#[cfg(feature = "debug-svg")]
impl Arrangement<crate::linear::LinearPoint, crate::linear::LinearCurve> {
    /// Draws the arrangement: vertices as dots, edges as lines with a stroke
    /// width proportional to their multiplicity.
    ///
    /// Unbounded edges are drawn as far as the bounding box of the finite
    /// vertices, grown by a margin.
    pub fn dump_svg(&self) -> svg::Document {
        let points: Vec<_> = self
            .vertices
            .iter()
            .filter_map(|v| v.point.finite())
            .map(|p| p.to_point())
            .collect();
        let bbox = points
            .iter()
            .fold(None::<kurbo::Rect>, |bbox, p| match bbox {
                None => Some(kurbo::Rect::from_points(*p, *p)),
                Some(b) => Some(b.union_pt(*p)),
            })
            .unwrap_or(kurbo::Rect::new(-1.0, -1.0, 1.0, 1.0));
        let pad = 1.0 + 0.1 * bbox.width().max(bbox.height());
        let reach = 2.0 * (bbox.width() + bbox.height() + pad);
        let stroke_width = pad / 20.0;

        let mut doc = svg::Document::new().set(
            "viewBox",
            (
                bbox.min_x() - pad,
                bbox.min_y() - pad,
                bbox.width() + 2.0 * pad,
                bbox.height() + 2.0 * pad,
            ),
        );

        for rec in &self.edges {
            let curve = &rec.edge.curve;
            let dir = curve.direction().normalize();
            let (p, q) = match (curve.min().map(|p| p.to_point()), curve.max().map(|q| q.to_point())) {
                (Some(p), Some(q)) => (p, q),
                (Some(p), None) => (p, p + dir * reach),
                (None, Some(q)) => (q - dir * reach, q),
                // Lines with no vertex on them are left out.
                (None, None) => continue,
            };
            let line = svg::node::element::Line::new()
                .set("x1", p.x)
                .set("y1", p.y)
                .set("x2", q.x)
                .set("y2", q.y)
                .set("stroke", "black")
                .set("stroke-width", stroke_width * rec.edge.multiplicity as f64)
                .set("stroke-linecap", "round");
            doc = doc.add(line);
        }

        for p in points {
            let dot = svg::node::element::Circle::new()
                .set("cx", p.x)
                .set("cy", p.y)
                .set("r", 2.0 * stroke_width)
                .set("fill", "red");
            doc = doc.add(dot);
        }
        doc
    }
}
