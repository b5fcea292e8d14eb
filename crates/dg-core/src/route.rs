//! Corridor routing (hallways between hub rooms)
//!
//! Each spanning-tree edge becomes a polyline between the two rooms'
//! centres: straight when the centres are nearly aligned on one axis, an
//! elbow otherwise. Ordinary rooms a corridor crosses are then promoted so
//! the corridor network passes through them.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::geometry::{Point, Segment};
use crate::reduce::SpanningTree;
use crate::room::{Room, RoomKind, rectangle_boundary_intersects};

/// Default alignment tolerance for straight corridors
pub const DEFAULT_ALIGNMENT_TOLERANCE: f64 = 20.0;

/// How elbow corridors choose their first leg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ElbowPolicy {
    /// Always vertical leg first, then horizontal
    #[default]
    VerticalFirst,
    /// Horizontal first when the source is above the destination and a
    /// horizontal leg from the source would reach the destination's wall;
    /// vertical first otherwise
    AvoidDestination,
}

/// Polyline connecting two rooms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Corridor {
    /// Room index the corridor starts at
    pub from: usize,
    /// Room index the corridor ends at
    pub to: usize,
    pub points: Vec<Point>,
}

impl Corridor {
    /// Consecutive point pairs as segments
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.points.windows(2).map(|w| Segment::between(w[0], w[1]))
    }

    pub fn length(&self) -> f64 {
        self.segments().map(|s| s.length()).sum()
    }
}

/// Corridor polyline between the centres of two rooms
pub fn route_edge(from: &Room, to: &Room, tolerance: f64, policy: ElbowPolicy) -> Vec<Point> {
    let m1 = from.center();
    let m2 = to.center();

    if (m1.x - m2.x).abs() < tolerance {
        return vec![m1, Point::new(m1.x, m2.y)];
    }
    if (m1.y - m2.y).abs() < tolerance {
        return vec![m1, Point::new(m2.x, m1.y)];
    }

    if policy == ElbowPolicy::AvoidDestination && m1.y < m2.y {
        let horizontal_leg = Segment::between(m1, Point::new(m2.x, m1.y));
        if rectangle_boundary_intersects(&horizontal_leg, to) {
            return vec![m1, Point::new(m2.x, m1.y), m2];
        }
    }
    vec![m1, Point::new(m1.x, m2.y), m2]
}

/// Route every tree edge. `hubs[i]` is the room index of tree vertex `i`.
pub fn route(
    tree: &SpanningTree,
    rooms: &[Room],
    hubs: &[usize],
    tolerance: f64,
    policy: ElbowPolicy,
) -> Vec<Corridor> {
    tree.edges
        .iter()
        .filter_map(|edge| {
            let from = *hubs.get(edge.a)?;
            let to = *hubs.get(edge.b)?;
            let points = route_edge(rooms.get(from)?, rooms.get(to)?, tolerance, policy);
            Some(Corridor { from, to, points })
        })
        .collect()
}

/// Promote every ordinary room whose boundary a corridor segment crosses.
///
/// Only rooms that were ordinary when called are tested. Returns the
/// promoted room indices in ascending order; calling again with the same
/// corridors promotes nothing new.
pub fn promote_intersected(rooms: &mut [Room], corridors: &[Corridor]) -> Vec<usize> {
    let segments: Vec<Segment> = corridors.iter().flat_map(Corridor::segments).collect();

    let mut promoted = Vec::new();
    for (idx, room) in rooms.iter_mut().enumerate() {
        if room.kind != RoomKind::Ordinary {
            continue;
        }
        if segments.iter().any(|s| rectangle_boundary_intersects(s, room)) {
            room.promote();
            promoted.push(idx);
        }
    }

    tracing::debug!(count = promoted.len(), "promoted connector rooms");
    promoted
}
