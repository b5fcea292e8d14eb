//! Connectivity reduction
//!
//! Turns the triangulation of primary room centres into a minimum spanning
//! tree. Edges are taken cheapest first; an edge either starts a new
//! fragment, extends one fragment with a new vertex, bridges two fragments
//! into one, or is discarded because both ends already share a fragment.
//! Fragment membership is tracked with a disjoint-set forest.

use core::cmp::Ordering;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};
use crate::geometry::{Point, distance};

/// Weighted undirected edge between two point indices, stored with `a < b`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
    pub weight: f64,
}

impl Edge {
    /// Edge between two indexed points, weighted by their Euclidean distance
    pub fn new(a: usize, b: usize, points: &[Point]) -> Self {
        Self::with_weight(a, b, distance(points[a], points[b]))
    }

    /// Edge with an explicit weight; endpoints are reordered so `a < b`
    pub fn with_weight(a: usize, b: usize, weight: f64) -> Self {
        let (a, b) = if a <= b { (a, b) } else { (b, a) };
        Self { a, b, weight }
    }

    pub fn key(&self) -> (usize, usize) {
        (self.a, self.b)
    }

    pub fn touches(&self, vertex: usize) -> bool {
        self.a == vertex || self.b == vertex
    }

    /// Ascending weight, ties broken by endpoint pair
    pub fn cmp_ascending(&self, other: &Edge) -> Ordering {
        self.weight
            .total_cmp(&other.weight)
            .then_with(|| self.key().cmp(&other.key()))
    }
}

/// Sort edges cheapest first, ties by endpoint pair
pub fn sort_edges(edges: &mut [Edge]) {
    edges.sort_by(Edge::cmp_ascending);
}

/// Derive the deduplicated edge set of a triangle index list.
///
/// Each triple `(p, q, r)` contributes `(p, q)`, `(q, r)` and `(r, p)`.
/// Self-edges, out-of-range indices and a trailing partial triple are
/// ignored. The result is sorted with [`sort_edges`].
pub fn edges_from_triangles(points: &[Point], triangles: &[usize]) -> Vec<Edge> {
    let mut unique: HashMap<(usize, usize), Edge> = HashMap::new();

    for tri in triangles.chunks_exact(3) {
        let pairs = [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])];
        for (p, q) in pairs {
            if p == q || p >= points.len() || q >= points.len() {
                tracing::trace!(p, q, "skipping unusable triangle edge");
                continue;
            }
            let edge = Edge::new(p, q, points);
            unique.insert(edge.key(), edge);
        }
    }

    let mut edges: Vec<Edge> = unique.into_values().collect();
    sort_edges(&mut edges);
    edges
}

/// Every pairwise edge of the point set, sorted
pub fn complete_graph_edges(points: &[Point]) -> Vec<Edge> {
    let mut edges: Vec<Edge> = (0..points.len())
        .flat_map(|a| (a + 1..points.len()).map(move |b| (a, b)))
        .map(|(a, b)| Edge::new(a, b, points))
        .collect();
    sort_edges(&mut edges);
    edges
}

/// Disjoint-set forest over vertex indices with path halving and union by size
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
    components: usize,
}

impl DisjointSet {
    /// Create a forest where every vertex is its own component
    pub fn new(count: usize) -> Self {
        Self {
            parent: (0..count).collect(),
            size: vec![1; count],
            components: count,
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Representative of the component containing `x`
    pub fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Number of vertices in the component containing `x`
    pub fn component_size(&mut self, x: usize) -> usize {
        let root = self.find(x);
        self.size[root]
    }

    /// Check if two vertices are in the same component
    pub fn are_connected(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }

    /// Merge the components of `a` and `b`. Returns false if they were
    /// already connected.
    pub fn merge(&mut self, a: usize, b: usize) -> bool {
        let mut ra = self.find(a);
        let mut rb = self.find(b);
        if ra == rb {
            return false;
        }
        if self.size[ra] < self.size[rb] {
            core::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        self.size[ra] += self.size[rb];
        self.components -= 1;
        true
    }

    pub fn component_count(&self) -> usize {
        self.components
    }

    /// Check if all vertices are connected
    pub fn all_connected(&self) -> bool {
        self.components <= 1
    }
}

/// What the reducer did with one edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeDecision {
    /// Neither end was in a fragment; the edge starts a new one
    Started,
    /// One end was new; the edge extends that end's fragment
    Extended,
    /// The ends were in different fragments, which are now one
    Bridged,
    /// Both ends were already in the same fragment
    Discarded,
}

/// Counts of each [`EdgeDecision`] over one reduction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReductionStats {
    pub started: usize,
    pub extended: usize,
    pub bridged: usize,
    pub discarded: usize,
}

impl ReductionStats {
    fn record(&mut self, decision: EdgeDecision) {
        match decision {
            EdgeDecision::Started => self.started += 1,
            EdgeDecision::Extended => self.extended += 1,
            EdgeDecision::Bridged => self.bridged += 1,
            EdgeDecision::Discarded => self.discarded += 1,
        }
    }
}

/// An acyclic connected group of accepted edges, in acceptance order.
/// A vertex no edge reached forms an empty fragment.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Fragment {
    pub edges: Vec<Edge>,
}

impl Fragment {
    pub fn total_weight(&self) -> f64 {
        self.edges.iter().map(|e| e.weight).sum()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// A minimum spanning tree over the primary room centres
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpanningTree {
    pub edges: Vec<Edge>,
}

impl SpanningTree {
    pub fn total_weight(&self) -> f64 {
        self.edges.iter().map(|e| e.weight).sum()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Result of reducing an edge set: one fragment per connected component
#[derive(Debug, Clone, PartialEq)]
pub struct Forest {
    point_count: usize,
    /// Largest fragment first
    fragments: Vec<Fragment>,
    stats: ReductionStats,
}

impl Forest {
    pub fn point_count(&self) -> usize {
        self.point_count
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn stats(&self) -> ReductionStats {
        self.stats
    }

    /// The fragment with the most edges
    pub fn largest(&self) -> Option<&Fragment> {
        self.fragments.first()
    }

    /// Exactly one fragment covers every point
    pub fn is_spanning(&self) -> bool {
        self.fragments.len() == 1
    }

    /// The spanning tree, or `DisconnectedPrimarySet` if more than one
    /// fragment remains
    pub fn into_tree(self) -> Result<SpanningTree> {
        if !self.is_spanning() {
            return Err(LayoutError::DisconnectedPrimarySet {
                primary_count: self.point_count,
                fragments: self.fragments.len(),
            });
        }
        let edges = self.fragments.into_iter().next().map(|f| f.edges).unwrap_or_default();
        Ok(SpanningTree { edges })
    }
}

/// Greedily reduce `edges` over `point_count` vertices to a minimum
/// spanning forest. Edges referencing a vertex `>= point_count` are skipped.
pub fn reduce(point_count: usize, edges: &[Edge]) -> Forest {
    let mut sorted = edges.to_vec();
    sort_edges(&mut sorted);

    let mut sets = DisjointSet::new(point_count);
    let mut stats = ReductionStats::default();
    let mut accepted = Vec::with_capacity(point_count.saturating_sub(1));

    for edge in sorted {
        if edge.a >= point_count || edge.b >= point_count {
            continue;
        }
        let decision = classify(&mut sets, &edge);
        stats.record(decision);
        if decision != EdgeDecision::Discarded {
            sets.merge(edge.a, edge.b);
            accepted.push(edge);
        }
    }

    let fragments = group_fragments(&mut sets, accepted);
    tracing::debug!(
        points = point_count,
        fragments = fragments.len(),
        ?stats,
        "reduced edge set"
    );

    Forest {
        point_count,
        fragments,
        stats,
    }
}

fn classify(sets: &mut DisjointSet, edge: &Edge) -> EdgeDecision {
    if sets.are_connected(edge.a, edge.b) {
        return EdgeDecision::Discarded;
    }
    match (sets.component_size(edge.a), sets.component_size(edge.b)) {
        (1, 1) => EdgeDecision::Started,
        (1, _) | (_, 1) => EdgeDecision::Extended,
        _ => EdgeDecision::Bridged,
    }
}

/// Split accepted edges by component. Components are ordered by edge count
/// (largest first), then by their lowest vertex.
fn group_fragments(sets: &mut DisjointSet, accepted: Vec<Edge>) -> Vec<Fragment> {
    let mut by_root: HashMap<usize, usize> = HashMap::new();
    let mut fragments: Vec<(usize, Fragment)> = Vec::new();

    for vertex in 0..sets.len() {
        let root = sets.find(vertex);
        by_root.entry(root).or_insert_with(|| {
            fragments.push((vertex, Fragment::default()));
            fragments.len() - 1
        });
    }

    for edge in accepted {
        let root = sets.find(edge.a);
        if let Some(&idx) = by_root.get(&root) {
            fragments[idx].1.edges.push(edge);
        }
    }

    fragments.sort_by(|(va, fa), (vb, fb)| fb.len().cmp(&fa.len()).then(va.cmp(vb)));
    fragments.into_iter().map(|(_, f)| f).collect()
}

/// Minimum spanning tree over `points` using the edges of `triangles`.
///
/// A triangulation with no triangles (two points, or all points collinear)
/// falls back to the complete graph, whose minimum spanning tree is the
/// chain along the line. Fewer than two points, or a point the edges never
/// reach, is `DisconnectedPrimarySet`.
pub fn minimum_spanning_tree(points: &[Point], triangles: &[usize]) -> Result<SpanningTree> {
    if points.len() < 2 {
        return Err(LayoutError::DisconnectedPrimarySet {
            primary_count: points.len(),
            fragments: points.len(),
        });
    }

    let mut edges = edges_from_triangles(points, triangles);
    if edges.is_empty() {
        tracing::debug!(points = points.len(), "no triangles, using complete graph");
        edges = complete_graph_edges(points);
    }

    reduce(points.len(), &edges).into_tree()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangulate::{DelaunayTriangulator, Triangulator};
    use proptest::prelude::*;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 10.0),
        ]
    }

    /// Cheapest spanning tree weight by trying every (n-1)-subset of edges
    fn brute_force_mst_weight(point_count: usize, edges: &[Edge]) -> Option<f64> {
        let k = point_count - 1;
        let mut best: Option<f64> = None;
        let mut chosen = Vec::with_capacity(k);
        subsets(edges, k, 0, &mut chosen, &mut |subset: &[Edge]| {
            let mut sets = DisjointSet::new(point_count);
            if subset.iter().all(|e| sets.merge(e.a, e.b)) {
                let weight: f64 = subset.iter().map(|e| e.weight).sum();
                best = Some(best.map_or(weight, |b: f64| b.min(weight)));
            }
        });
        best
    }

    fn subsets(edges: &[Edge], k: usize, start: usize, chosen: &mut Vec<Edge>, visit: &mut dyn FnMut(&[Edge])) {
        if chosen.len() == k {
            visit(chosen);
            return;
        }
        for i in start..edges.len() {
            chosen.push(edges[i]);
            subsets(edges, k, i + 1, chosen, visit);
            chosen.pop();
        }
    }

    #[test]
    fn test_edge_weight_uses_both_axes() {
        let points = [Point::new(0.0, 0.0), Point::new(3.0, 4.0)];
        let edge = Edge::new(1, 0, &points);
        assert_eq!(edge.key(), (0, 1));
        assert_eq!(edge.weight, 5.0);
    }

    #[test]
    fn test_edges_from_triangles_dedupes_shared_sides() {
        let points = square();
        // Two triangles sharing the 1-2 diagonal
        let edges = edges_from_triangles(&points, &[0, 1, 2, 1, 3, 2]);
        assert_eq!(edges.len(), 5);
        let keys: Vec<_> = edges.iter().map(Edge::key).collect();
        assert_eq!(keys, vec![(0, 1), (0, 2), (1, 3), (2, 3), (1, 2)]);
    }

    #[test]
    fn test_edges_from_triangles_skips_bad_indices() {
        let points = square();
        let edges = edges_from_triangles(&points, &[0, 1, 9, 2, 2, 3, 0]);
        let keys: Vec<_> = edges.iter().map(Edge::key).collect();
        assert_eq!(keys, vec![(0, 1), (2, 3)]);
    }

    #[test]
    fn test_tie_break_by_indices() {
        let mut edges = vec![
            Edge::with_weight(2, 3, 1.0),
            Edge::with_weight(1, 0, 1.0),
            Edge::with_weight(0, 2, 0.5),
            Edge::with_weight(0, 3, 1.0),
        ];
        sort_edges(&mut edges);
        let keys: Vec<_> = edges.iter().map(Edge::key).collect();
        assert_eq!(keys, vec![(0, 2), (0, 1), (0, 3), (2, 3)]);
    }

    #[test]
    fn test_numeric_not_lexicographic_order() {
        let mut edges = vec![Edge::with_weight(0, 1, 10.0), Edge::with_weight(1, 2, 9.0)];
        sort_edges(&mut edges);
        assert_eq!(edges[0].weight, 9.0);
    }

    #[test]
    fn test_square_mst() {
        let points = square();
        let edges = complete_graph_edges(&points);
        assert_eq!(edges.len(), 6);

        let forest = reduce(points.len(), &edges);
        let stats = forest.stats();
        assert_eq!(stats.started, 1);
        assert_eq!(stats.extended, 2);
        assert_eq!(stats.bridged, 0);
        assert_eq!(stats.discarded, 3);

        let tree = forest.into_tree().unwrap();
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.total_weight(), 30.0);
        assert!(tree.edges.iter().all(|e| e.weight == 10.0));
        assert_eq!(brute_force_mst_weight(4, &edges), Some(30.0));
    }

    #[test]
    fn test_bridging_two_fragments() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(101.0, 0.0),
        ];
        let forest = reduce(points.len(), &complete_graph_edges(&points));
        let stats = forest.stats();
        assert_eq!(stats.started, 2);
        assert_eq!(stats.bridged, 1);
        assert_eq!(stats.discarded, 3);

        let tree = forest.into_tree().unwrap();
        assert_eq!(tree.total_weight(), 101.0);
    }

    #[test]
    fn test_disconnected_edge_set() {
        let edges = vec![Edge::with_weight(0, 1, 1.0), Edge::with_weight(2, 3, 1.0)];
        let forest = reduce(4, &edges);
        assert_eq!(forest.fragments().len(), 2);
        assert!(!forest.is_spanning());
        assert_eq!(
            forest.into_tree(),
            Err(LayoutError::DisconnectedPrimarySet {
                primary_count: 4,
                fragments: 2
            })
        );
    }

    #[test]
    fn test_isolated_vertex_is_a_fragment() {
        let forest = reduce(3, &[Edge::with_weight(0, 2, 4.0)]);
        assert_eq!(forest.fragments().len(), 2);
        assert_eq!(forest.largest().map(Fragment::len), Some(1));
        assert!(forest.fragments()[1].is_empty());
    }

    #[test]
    fn test_mst_needs_two_points() {
        let result = minimum_spanning_tree(&[Point::new(1.0, 1.0)], &[]);
        assert!(matches!(
            result,
            Err(LayoutError::DisconnectedPrimarySet { primary_count: 1, .. })
        ));
    }

    #[test]
    fn test_mst_of_two_points_without_triangles() {
        let points = [Point::new(0.0, 0.0), Point::new(0.0, 7.0)];
        let tree = minimum_spanning_tree(&points, &[]).unwrap();
        assert_eq!(tree.edges, vec![Edge::with_weight(0, 1, 7.0)]);
    }

    #[test]
    fn test_mst_of_collinear_points() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(20.0, 0.0),
            Point::new(5.0, 0.0),
        ];
        let tree = minimum_spanning_tree(&points, &[]).unwrap();
        assert_eq!(tree.total_weight(), 20.0);
        let keys: Vec<_> = tree.edges.iter().map(Edge::key).collect();
        assert_eq!(keys, vec![(0, 2), (1, 2)]);
    }

    #[test]
    fn test_disjoint_set() {
        let mut sets = DisjointSet::new(5);

        assert!(!sets.are_connected(0, 1));
        assert!(sets.merge(0, 1));
        assert!(sets.are_connected(0, 1));
        assert!(!sets.are_connected(0, 2));

        assert!(sets.merge(1, 2));
        assert!(sets.are_connected(0, 2));
        assert!(!sets.merge(2, 0));
        assert_eq!(sets.component_size(2), 3);

        assert!(!sets.all_connected());
        sets.merge(2, 3);
        sets.merge(3, 4);
        assert!(sets.all_connected());
        assert_eq!(sets.component_count(), 1);
    }

    fn distinct_points(max: usize) -> impl Strategy<Value = Vec<Point>> {
        prop::collection::hash_set((0i32..100, 0i32..100), 3..max).prop_map(|set| {
            let mut coords: Vec<_> = set.into_iter().collect();
            coords.sort();
            coords
                .into_iter()
                .map(|(x, y)| Point::new(x as f64, y as f64))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn delaunay_mst_spans_all_points(points in distinct_points(20)) {
            let triangles = DelaunayTriangulator.triangulate(&points);
            let tree = minimum_spanning_tree(&points, &triangles).unwrap();

            prop_assert_eq!(tree.len(), points.len() - 1);
            let mut sets = DisjointSet::new(points.len());
            for edge in &tree.edges {
                prop_assert!(sets.merge(edge.a, edge.b), "cycle through {:?}", edge);
            }
            prop_assert!(sets.all_connected());
        }

        #[test]
        fn reduction_matches_brute_force(points in distinct_points(7)) {
            let edges = complete_graph_edges(&points);
            let tree = reduce(points.len(), &edges).into_tree().unwrap();
            let best = brute_force_mst_weight(points.len(), &edges).unwrap();
            prop_assert!((tree.total_weight() - best).abs() < 1e-9);
        }
    }
}
