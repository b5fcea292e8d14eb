//! dg-core: dungeon floor plan synthesis
//!
//! Scatters rectangular rooms, relaxes them until none overlap, picks the
//! large rooms as hubs, joins the hubs with a minimum spanning tree over
//! their Delaunay triangulation and routes corridors along the tree edges.
//! Ordinary rooms a corridor passes through are promoted so the final map
//! is fully traversable.
//!
//! This crate contains no rendering or I/O besides loading a config file.

pub mod config;
pub mod error;
pub mod geometry;
pub mod reduce;
pub mod relax;
pub mod room;
pub mod route;
pub mod select;
pub mod session;
pub mod source;
pub mod triangulate;

mod rng;

pub use config::{LayoutConfig, NonConvergencePolicy, SpawnRegion};
pub use error::{LayoutError, Result};
pub use geometry::{Point, Segment, distance, segments_intersect};
pub use reduce::{Edge, Forest, Fragment, SpanningTree, minimum_spanning_tree, reduce};
pub use relax::{PassReport, Relaxer, relax};
pub use rng::LayoutRng;
pub use room::{Room, RoomKind, min_vertex_distance, overlaps, rectangle_boundary_intersects};
pub use route::{Corridor, ElbowPolicy, promote_intersected, route, route_edge};
pub use select::select_primary;
pub use session::{FloorPlan, LayoutSession, Renderer, generate_floor_plan};
pub use source::{FixedSource, RoomSource, ScatterSource};
pub use triangulate::{DelaunayTriangulator, Triangulator};
