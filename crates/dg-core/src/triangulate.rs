//! Triangulation of primary room centres

use crate::geometry::Point;

/// Produces a triangulation over a point set.
///
/// The returned list is consumed in consecutive triples, each triple naming
/// one triangle by indices into `points`. Degenerate inputs (fewer than three
/// points, all points collinear) may yield an empty list.
pub trait Triangulator {
    fn triangulate(&self, points: &[Point]) -> Vec<usize>;
}

/// Delaunay triangulation backed by the `delaunator` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct DelaunayTriangulator;

impl Triangulator for DelaunayTriangulator {
    fn triangulate(&self, points: &[Point]) -> Vec<usize> {
        if points.len() < 3 {
            return Vec::new();
        }
        let input: Vec<delaunator::Point> = points
            .iter()
            .map(|p| delaunator::Point { x: p.x, y: p.y })
            .collect();
        delaunator::triangulate(&input).triangles
    }
}
