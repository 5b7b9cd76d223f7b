//! Bounding-box pre-filter over vertex coordinates.

use geo::{BoundingRect, Polygon};
use rstar::primitives::GeomWithData;
use rstar::{Envelope, RTree, SelectionFunction, AABB};

use crate::grid::Vertex;

type IndexedVertex = GeomWithData<[f64; 2], usize>;

/// R-tree of vertex points keyed by their position in the input slice.
pub(crate) struct VertexIndex {
    tree: RTree<IndexedVertex>,
}

impl VertexIndex {
    pub(crate) fn new(vertices: &[Vertex]) -> Self {
        let entries = vertices
            .iter()
            .enumerate()
            .map(|(i, v)| GeomWithData::new([v.point.x(), v.point.y()], i))
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Input positions of the vertices inside the polygon's bounding box,
    /// ascending.
    pub(crate) fn candidates(&self, polygon: &Polygon<f64>) -> Vec<usize> {
        let Some(rect) = polygon.bounding_rect() else {
            return Vec::new();
        };
        let selection = InEnvelope(AABB::from_corners(
            [rect.min().x, rect.min().y],
            [rect.max().x, rect.max().y],
        ));
        let mut hits: Vec<usize> = self
            .tree
            .locate_with_selection_function(selection)
            .map(|entry| entry.data)
            .collect();
        hits.sort_unstable();
        hits
    }
}

struct InEnvelope(AABB<[f64; 2]>);

impl SelectionFunction<IndexedVertex> for InEnvelope {
    fn should_unpack_parent(&self, envelope: &AABB<[f64; 2]>) -> bool {
        self.0.intersects(envelope)
    }

    fn should_unpack_leaf(&self, leaf: &IndexedVertex) -> bool {
        self.0.contains_point(leaf.geom())
    }
}
