//! Primary room selection
//!
//! Rooms noticeably larger than average become the hubs of the corridor
//! graph.

use crate::room::{Room, RoomKind};

/// Default multiple of the mean area a room must exceed to become primary
pub const DEFAULT_PRIMARY_AREA_FACTOR: f64 = 1.25;

/// Mean room area, or `None` for an empty slice
pub fn mean_area(rooms: &[Room]) -> Option<f64> {
    if rooms.is_empty() {
        return None;
    }
    Some(rooms.iter().map(Room::area).sum::<f64>() / rooms.len() as f64)
}

/// Tag every room whose area strictly exceeds `mean * factor` as primary and
/// every other room as ordinary. Returns the number of primary rooms.
pub fn select_primary(rooms: &mut [Room], factor: f64) -> usize {
    let Some(mean) = mean_area(rooms) else {
        return 0;
    };
    let cutoff = mean * factor;

    let mut primaries = 0;
    for room in rooms.iter_mut() {
        room.kind = if room.area() > cutoff {
            primaries += 1;
            RoomKind::Primary
        } else {
            RoomKind::Ordinary
        };
    }

    tracing::debug!(mean, cutoff, primaries, "selected primary rooms");
    primaries
}
