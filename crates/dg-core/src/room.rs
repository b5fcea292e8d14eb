//! Room types and rectangle predicates
//!
//! A room is an axis-aligned rectangle with a kind tag. Rooms are created
//! once by a room source, moved by the relaxer and re-tagged by the primary
//! selector and the corridor router. They are never destroyed.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::geometry::{Point, Segment, distance, segments_intersect};

/// Role of a room in the connectivity graph
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum RoomKind {
    /// Plain room, not part of the hub graph
    #[default]
    Ordinary,
    /// Hub room, or a room a corridor passes through
    Primary,
}

/// Rectangle representing a room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub kind: RoomKind,
}

impl Room {
    /// Create a new ordinary room
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::with_kind(x, y, width, height, RoomKind::Ordinary)
    }

    /// Create a room with a specific kind
    pub fn with_kind(x: f64, y: f64, width: f64, height: f64, kind: RoomKind) -> Self {
        Self {
            x,
            y,
            width,
            height,
            kind,
        }
    }

    /// Positive, finite size and finite position
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }

    pub fn is_primary(&self) -> bool {
        self.kind == RoomKind::Primary
    }

    /// Tag this room as primary. Idempotent.
    pub fn promote(&mut self) {
        self.kind = RoomKind::Primary;
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Get center point of room
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Corners in clockwise order starting at the top-left
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.right(), self.y),
            Point::new(self.right(), self.bottom()),
            Point::new(self.x, self.bottom()),
        ]
    }

    /// The four boundary edges: top, right, bottom, left
    pub fn boundary_edges(&self) -> [Segment; 4] {
        let [tl, tr, br, bl] = self.corners();
        [
            Segment::between(tl, tr),
            Segment::between(tr, br),
            Segment::between(bl, br),
            Segment::between(tl, bl),
        ]
    }

    /// Move the room by the given offset
    pub fn translate(&mut self, offset: Point) {
        self.x += offset.x;
        self.y += offset.y;
    }

    /// Check if point is strictly inside the room
    pub fn contains(&self, p: Point) -> bool {
        p.x > self.x && p.x < self.right() && p.y > self.y && p.y < self.bottom()
    }
}

/// True iff the open interiors of the two rectangles intersect.
/// Rooms that share an edge do not overlap.
pub fn overlaps(a: &Room, b: &Room) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

/// Smallest distance between any corner of `a` and any corner of `b`.
///
/// Cheaper than the true rectangle distance and ignores edge-to-edge
/// nearest points; only used as a proximity heuristic.
pub fn min_vertex_distance(a: &Room, b: &Room) -> f64 {
    let theirs = b.corners();
    a.corners()
        .iter()
        .flat_map(|p| theirs.iter().map(move |q| distance(*p, *q)))
        .fold(f64::INFINITY, f64::min)
}

/// True iff the segment crosses or touches any of the room's four edges.
/// A segment lying entirely inside the room does not count.
pub fn rectangle_boundary_intersects(segment: &Segment, room: &Room) -> bool {
    room.boundary_edges()
        .iter()
        .any(|edge| segments_intersect(segment, edge))
}
