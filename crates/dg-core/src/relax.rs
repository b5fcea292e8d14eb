//! Layout relaxation ("steering")
//!
//! Overlapping or crowded rooms push each other apart one unit per pass
//! until a pass finds nothing left to separate.
//!
//! Rooms are updated in order and each room reads the positions its
//! predecessors already moved to in the same pass. The result therefore
//! depends on room order but is deterministic for a given order.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{LayoutError, Result};
use crate::geometry::Point;
use crate::room::{Room, min_vertex_distance, overlaps};

/// Distance a crowded room moves per pass
pub const STEP_SIZE: f64 = 1.0;

/// Outcome of a single relaxation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PassReport {
    /// Rooms that had at least one neighbour
    pub crowded: usize,
    /// Rooms that actually moved
    pub moved: usize,
}

impl PassReport {
    /// A pass is stable when no room had a neighbour
    pub fn is_stable(&self) -> bool {
        self.crowded == 0
    }
}

/// Pushes rooms apart until none overlap or sit closer than the threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Relaxer {
    proximity_threshold: f64,
}

impl Relaxer {
    pub fn new(proximity_threshold: f64) -> Self {
        Self {
            proximity_threshold,
        }
    }

    pub fn proximity_threshold(&self) -> f64 {
        self.proximity_threshold
    }

    /// Whether `b` pushes on `a`
    pub fn is_neighbor(&self, a: &Room, b: &Room) -> bool {
        overlaps(a, b) || min_vertex_distance(a, b) < self.proximity_threshold
    }

    /// Run one relaxation pass over all rooms
    pub fn step(&self, rooms: &mut [Room]) -> PassReport {
        let mut report = PassReport::default();

        for i in 0..rooms.len() {
            let (sum, neighbors) = self.repulsion(rooms, i);
            if neighbors == 0 {
                continue;
            }
            report.crowded += 1;

            let away = -(sum / neighbors as f64);
            match away.normalized() {
                Some(dir) => {
                    rooms[i].translate(Point::new(dir.x * STEP_SIZE, dir.y * STEP_SIZE));
                    report.moved += 1;
                }
                None => {
                    tracing::trace!(room = i, neighbors, "zero-length steering vector, not moving");
                }
            }
        }

        report
    }

    /// Sum of centre offsets towards every neighbour of `rooms[i]`
    fn repulsion(&self, rooms: &[Room], i: usize) -> (Point, usize) {
        let a = &rooms[i];
        let center = a.center();
        rooms
            .iter()
            .enumerate()
            .filter(|&(j, b)| j != i && self.is_neighbor(a, b))
            .fold((Point::default(), 0), |(sum, count), (_, b)| {
                (sum + (b.center() - center), count + 1)
            })
    }

    /// Step until a stable pass, returning the number of passes run
    /// (including the stable one).
    ///
    /// `cancel` is checked before every pass.
    pub fn run_to_convergence(
        &self,
        rooms: &mut [Room],
        max_passes: usize,
        cancel: Option<&AtomicBool>,
    ) -> Result<usize> {
        for pass in 0..max_passes {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                return Err(LayoutError::Cancelled { passes: pass });
            }

            let report = self.step(rooms);
            tracing::trace!(pass, crowded = report.crowded, moved = report.moved, "relaxation pass");
            if report.is_stable() {
                return Ok(pass + 1);
            }
        }

        Err(LayoutError::NonConvergence { passes: max_passes })
    }
}

/// Run one pass with the given threshold; true when the pass was stable
pub fn relax(rooms: &mut [Room], proximity_threshold: f64) -> bool {
    Relaxer::new(proximity_threshold).step(rooms).is_stable()
}
