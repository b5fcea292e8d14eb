//! Room sources
//!
//! A room source produces the initial, usually overlapping, set of rooms the
//! relaxer spreads out.

use crate::config::SpawnRegion;
use crate::rng::LayoutRng;
use crate::room::Room;

/// Produces the initial rooms of a generation run
pub trait RoomSource {
    /// Generate `count` rooms around the spawn region.
    /// Every returned room must have a positive width and height.
    fn generate(&mut self, count: usize, spawn: &SpawnRegion) -> Vec<Room>;

    /// Seed that reproduces this source's rooms, if it has one
    fn seed(&self) -> Option<u64> {
        None
    }
}

/// Scatters rooms of pseudo-random size around the spawn centre.
///
/// Top-left corners are integer offsets in `[-radius, radius)` from the
/// centre. Sizes are `|sin(k)| * 100 + 10` by `|cos(k)| * 100 + 10` for
/// integer `k` in `1..=80`, so every side lies in `[10, 110]`.
#[derive(Debug, Clone)]
pub struct ScatterSource {
    rng: LayoutRng,
}

/// Upper bound of the integer fed to sin/cos for room sizes
const SIZE_SEEDS: u32 = 80;
const SIZE_SCALE: f64 = 100.0;
const MIN_SIDE: f64 = 10.0;

impl ScatterSource {
    pub fn new(rng: LayoutRng) -> Self {
        Self { rng }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self::new(LayoutRng::new(seed))
    }

    fn scatter_one(&mut self, spawn: &SpawnRegion) -> Room {
        let x = spawn.center.x + self.rng.offset(spawn.radius) as f64;
        let y = spawn.center.y + self.rng.offset(spawn.radius) as f64;
        let height = (self.rng.rnd(SIZE_SEEDS) as f64).sin().abs() * SIZE_SCALE + MIN_SIDE;
        let width = (self.rng.rnd(SIZE_SEEDS) as f64).cos().abs() * SIZE_SCALE + MIN_SIDE;
        Room::new(x, y, width, height)
    }
}

impl RoomSource for ScatterSource {
    fn generate(&mut self, count: usize, spawn: &SpawnRegion) -> Vec<Room> {
        (0..count).map(|_| self.scatter_one(spawn)).collect()
    }

    fn seed(&self) -> Option<u64> {
        Some(self.rng.seed())
    }
}

/// Hands back a fixed list of rooms, ignoring the spawn region.
///
/// `count` truncates the list; it never pads it.
#[derive(Debug, Clone, Default)]
pub struct FixedSource {
    rooms: Vec<Room>,
}

impl FixedSource {
    pub fn new(rooms: Vec<Room>) -> Self {
        Self { rooms }
    }
}

impl RoomSource for FixedSource {
    fn generate(&mut self, count: usize, _spawn: &SpawnRegion) -> Vec<Room> {
        self.rooms.iter().take(count).cloned().collect()
    }
}
