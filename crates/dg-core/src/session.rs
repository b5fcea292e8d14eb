//! Floor plan generation
//!
//! A [`LayoutSession`] owns the rooms of one generation run and drives them
//! through relaxation, primary selection, triangulation, reduction and
//! corridor routing. Batch callers use [`LayoutSession::run`]; animated
//! callers call [`LayoutSession::step`] once per frame and
//! [`LayoutSession::finish`] once the layout has settled.

use std::sync::atomic::AtomicBool;

use serde::{Deserialize, Serialize};

use crate::config::{LayoutConfig, NonConvergencePolicy};
use crate::error::{LayoutError, Result};
use crate::geometry::Point;
use crate::reduce::{SpanningTree, minimum_spanning_tree};
use crate::relax::{PassReport, Relaxer};
use crate::room::Room;
use crate::route::{Corridor, promote_intersected, route};
use crate::select::select_primary;
use crate::source::{RoomSource, ScatterSource};
use crate::triangulate::{DelaunayTriangulator, Triangulator};

/// Finished layout handed to renderers
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FloorPlan {
    pub rooms: Vec<Room>,
    pub corridors: Vec<Corridor>,
    pub tree: SpanningTree,
    /// Room index of each spanning-tree vertex
    pub hubs: Vec<usize>,
    /// Rooms promoted because a corridor crosses them
    pub promoted: Vec<usize>,
    /// Relaxation passes run
    pub passes: usize,
    /// Whether relaxation reached a stable pass
    pub converged: bool,
    /// Seed of the room source, when it had one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl FloorPlan {
    /// Layout of zero or one room: nothing to separate or connect
    pub fn trivial(rooms: Vec<Room>) -> Self {
        Self {
            rooms,
            converged: true,
            ..Self::default()
        }
    }

    pub fn is_trivial(&self) -> bool {
        self.rooms.len() <= 1
    }

    pub fn primary_count(&self) -> usize {
        self.rooms.iter().filter(|r| r.is_primary()).count()
    }
}

/// Consumes finished floor plans
pub trait Renderer {
    fn render(&mut self, plan: &FloorPlan);
}

/// State of one generation run
#[derive(Debug, Clone)]
pub struct LayoutSession<T: Triangulator = DelaunayTriangulator> {
    config: LayoutConfig,
    rooms: Vec<Room>,
    relaxer: Relaxer,
    triangulator: T,
    passes: usize,
    settled: bool,
    seed: Option<u64>,
}

impl LayoutSession {
    /// Session over the given rooms with the default triangulator
    pub fn new(config: LayoutConfig, rooms: Vec<Room>) -> Result<Self> {
        Self::with_triangulator(config, rooms, DelaunayTriangulator)
    }

    /// Session over `config.room_count` rooms drawn from `source`
    pub fn generate(config: LayoutConfig, source: &mut dyn RoomSource) -> Result<Self> {
        let rooms = source.generate(config.room_count, &config.spawn);
        let mut session = Self::new(config, rooms)?;
        session.seed = source.seed();
        Ok(session)
    }
}

impl<T: Triangulator> LayoutSession<T> {
    pub fn with_triangulator(config: LayoutConfig, rooms: Vec<Room>, triangulator: T) -> Result<Self> {
        config.validate()?;
        if let Some(index) = rooms.iter().position(|r| !r.is_valid()) {
            return Err(LayoutError::DegenerateRoom { index });
        }

        Ok(Self {
            relaxer: Relaxer::new(config.proximity_threshold),
            config,
            rooms,
            triangulator,
            passes: 0,
            settled: false,
            seed: None,
        })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Relaxation passes run so far
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Seed of the room source the session was generated from
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// True once a relaxation pass found nothing to separate
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Run one relaxation pass. Does nothing once settled.
    pub fn step(&mut self) -> PassReport {
        if self.settled {
            return PassReport::default();
        }
        let report = self.relaxer.step(&mut self.rooms);
        self.passes += 1;
        self.settled = report.is_stable();
        report
    }

    /// Relax until settled or the pass cap is reached.
    ///
    /// Returns whether the layout settled. Hitting the cap is an error under
    /// [`NonConvergencePolicy::Abort`] and a warning under `Proceed`.
    pub fn relax(&mut self, cancel: Option<&AtomicBool>) -> Result<bool> {
        if self.settled {
            return Ok(true);
        }

        let remaining = self.config.max_relax_passes.saturating_sub(self.passes);
        match self.relaxer.run_to_convergence(&mut self.rooms, remaining, cancel) {
            Ok(passes) => {
                self.passes += passes;
                self.settled = true;
                tracing::debug!(passes = self.passes, "layout settled");
                Ok(true)
            }
            Err(LayoutError::Cancelled { passes }) => {
                self.passes += passes;
                Err(LayoutError::Cancelled {
                    passes: self.passes,
                })
            }
            Err(LayoutError::NonConvergence { passes }) => {
                self.passes += passes;
                match self.config.on_non_convergence {
                    NonConvergencePolicy::Abort => Err(LayoutError::NonConvergence {
                        passes: self.passes,
                    }),
                    NonConvergencePolicy::Proceed => {
                        tracing::warn!(passes = self.passes, "layout did not settle, continuing anyway");
                        Ok(false)
                    }
                }
            }
            Err(other) => Err(other),
        }
    }

    /// Select primaries, connect them and route corridors over the current
    /// room positions
    pub fn finish(mut self) -> Result<FloorPlan> {
        if self.rooms.len() <= 1 {
            return Ok(FloorPlan {
                seed: self.seed,
                ..FloorPlan::trivial(self.rooms)
            });
        }

        select_primary(&mut self.rooms, self.config.primary_area_factor);
        let hubs: Vec<usize> = self
            .rooms
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_primary())
            .map(|(i, _)| i)
            .collect();
        if hubs.len() < 2 {
            return Err(LayoutError::DisconnectedPrimarySet {
                primary_count: hubs.len(),
                fragments: hubs.len(),
            });
        }

        let centers: Vec<Point> = hubs.iter().map(|&i| self.rooms[i].center()).collect();
        let triangles = self.triangulator.triangulate(&centers);
        tracing::debug!(hubs = hubs.len(), triangles = triangles.len() / 3, "triangulated hubs");

        let tree = minimum_spanning_tree(&centers, &triangles)?;
        let corridors = route(
            &tree,
            &self.rooms,
            &hubs,
            self.config.corridor_alignment_tolerance,
            self.config.elbow_policy,
        );
        let promoted = promote_intersected(&mut self.rooms, &corridors);
        tracing::debug!(
            corridors = corridors.len(),
            promoted = promoted.len(),
            "routed corridors"
        );

        Ok(FloorPlan {
            rooms: self.rooms,
            corridors,
            tree,
            hubs,
            promoted,
            passes: self.passes,
            converged: self.settled,
            seed: self.seed,
        })
    }

    /// Run the whole pipeline
    pub fn run(mut self, cancel: Option<&AtomicBool>) -> Result<FloorPlan> {
        if self.rooms.len() <= 1 {
            tracing::debug!(rooms = self.rooms.len(), "trivial layout");
        } else {
            self.relax(cancel)?;
        }
        self.finish()
    }
}

/// Generate a floor plan from scattered rooms for the given seed
pub fn generate_floor_plan(config: LayoutConfig, seed: u64) -> Result<FloorPlan> {
    let mut source = ScatterSource::from_seed(seed);
    LayoutSession::generate(config, &mut source)?.run(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::RoomKind;
    use crate::source::FixedSource;

    /// Four big hubs on a square, one small room on the top corridor and
    /// one in the middle
    fn square_layout() -> Vec<Room> {
        vec![
            Room::new(-20.0, -20.0, 40.0, 40.0),
            Room::new(180.0, -20.0, 40.0, 40.0),
            Room::new(-20.0, 180.0, 40.0, 40.0),
            Room::new(180.0, 180.0, 40.0, 40.0),
            Room::new(95.0, -5.0, 10.0, 10.0),
            Room::new(95.0, 95.0, 10.0, 10.0),
        ]
    }

    #[test]
    fn test_trivial_layouts() {
        let empty = LayoutSession::new(LayoutConfig::default(), Vec::new())
            .unwrap()
            .run(None)
            .unwrap();
        assert!(empty.is_trivial());
        assert!(empty.corridors.is_empty());

        let single = LayoutSession::new(LayoutConfig::default(), vec![Room::new(0.0, 0.0, 5.0, 5.0)])
            .unwrap()
            .run(None)
            .unwrap();
        assert!(single.is_trivial());
        assert_eq!(single.rooms.len(), 1);
        assert_eq!(single.rooms[0].kind, RoomKind::Ordinary);
    }

    #[test]
    fn test_square_pipeline() {
        let plan = LayoutSession::new(LayoutConfig::default(), square_layout())
            .unwrap()
            .run(None)
            .unwrap();

        assert!(plan.converged);
        assert_eq!(plan.passes, 1);
        assert_eq!(plan.hubs, vec![0, 1, 2, 3]);
        assert_eq!(plan.tree.len(), 3);
        assert_eq!(plan.tree.total_weight(), 600.0);
        assert_eq!(plan.corridors.len(), 3);
        assert!(plan.corridors.iter().all(|c| c.points.len() == 2));

        assert_eq!(plan.promoted, vec![4]);
        assert!(plan.rooms[4].is_primary());
        assert!(!plan.rooms[5].is_primary());
        assert_eq!(plan.primary_count(), 5);
    }

    #[test]
    fn test_degenerate_room_rejected() {
        let rooms = vec![Room::new(0.0, 0.0, 5.0, 5.0), Room::new(0.0, 0.0, 0.0, 5.0)];
        let result = LayoutSession::new(LayoutConfig::default(), rooms);
        assert!(matches!(result, Err(LayoutError::DegenerateRoom { index: 1 })));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = LayoutConfig {
            primary_area_factor: -1.0,
            ..LayoutConfig::default()
        };
        assert!(matches!(
            LayoutSession::new(config, Vec::new()),
            Err(LayoutError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_no_primaries() {
        let rooms = vec![Room::new(0.0, 0.0, 10.0, 10.0), Room::new(50.0, 0.0, 10.0, 10.0)];
        let result = LayoutSession::new(LayoutConfig::default(), rooms).unwrap().run(None);
        assert_eq!(
            result,
            Err(LayoutError::DisconnectedPrimarySet {
                primary_count: 0,
                fragments: 0
            })
        );
    }

    fn stuck_layout() -> Vec<Room> {
        vec![
            Room::new(0.0, 0.0, 10.0, 10.0),
            Room::new(0.0, 0.0, 10.0, 10.0),
            Room::new(100.0, 0.0, 50.0, 50.0),
            Room::new(300.0, 0.0, 50.0, 50.0),
        ]
    }

    #[test]
    fn test_non_convergence_aborts() {
        let config = LayoutConfig {
            max_relax_passes: 10,
            ..LayoutConfig::default()
        };
        let result = LayoutSession::new(config, stuck_layout()).unwrap().run(None);
        assert_eq!(result, Err(LayoutError::NonConvergence { passes: 10 }));
    }

    #[test]
    fn test_non_convergence_can_proceed() {
        let config = LayoutConfig {
            max_relax_passes: 10,
            on_non_convergence: NonConvergencePolicy::Proceed,
            ..LayoutConfig::default()
        };
        let plan = LayoutSession::new(config, stuck_layout()).unwrap().run(None).unwrap();
        assert!(!plan.converged);
        assert_eq!(plan.passes, 10);
        assert_eq!(plan.hubs, vec![2, 3]);
        assert_eq!(
            plan.corridors[0].points,
            vec![Point::new(125.0, 25.0), Point::new(325.0, 25.0)]
        );
    }

    #[test]
    fn test_cancelled_before_first_pass() {
        let cancel = AtomicBool::new(true);
        let result = LayoutSession::new(LayoutConfig::default(), stuck_layout())
            .unwrap()
            .run(Some(&cancel));
        assert_eq!(result, Err(LayoutError::Cancelled { passes: 0 }));
    }

    #[test]
    fn test_stepping_matches_batch_run() {
        let config = LayoutConfig {
            room_count: 30,
            ..LayoutConfig::default()
        };
        let batch = LayoutSession::generate(config.clone(), &mut ScatterSource::from_seed(11))
            .unwrap()
            .run(None)
            .unwrap();

        let mut session = LayoutSession::generate(config, &mut ScatterSource::from_seed(11)).unwrap();
        while !session.is_settled() {
            session.step();
        }
        assert_eq!(session.passes(), batch.passes);
        assert_eq!(session.finish().unwrap(), batch);
    }

    #[test]
    fn test_step_after_settling_is_a_no_op() {
        let mut session = LayoutSession::new(LayoutConfig::default(), square_layout()).unwrap();
        assert!(session.step().is_stable());
        assert!(session.is_settled());
        session.step();
        assert_eq!(session.passes(), 1);
    }

    #[test]
    fn test_fixed_source() {
        let config = LayoutConfig {
            room_count: 4,
            ..LayoutConfig::default()
        };
        let session = LayoutSession::generate(config, &mut FixedSource::new(square_layout())).unwrap();
        assert_eq!(session.rooms().len(), 4);
        assert_eq!(session.seed(), None);
    }

    #[test]
    fn test_plan_records_seed_for_replay() {
        let config = LayoutConfig {
            room_count: 30,
            ..LayoutConfig::default()
        };
        let plan = generate_floor_plan(config.clone(), 2024).unwrap();
        assert_eq!(plan.seed, Some(2024));

        let seed = plan.seed.unwrap();
        assert_eq!(generate_floor_plan(config, seed).unwrap(), plan);

        let single = LayoutSession::generate(
            LayoutConfig {
                room_count: 1,
                ..LayoutConfig::default()
            },
            &mut ScatterSource::from_seed(3),
        )
        .unwrap()
        .run(None)
        .unwrap();
        assert!(single.is_trivial());
        assert_eq!(single.seed, Some(3));
    }

    struct CountingRenderer {
        corridors: usize,
    }

    impl Renderer for CountingRenderer {
        fn render(&mut self, plan: &FloorPlan) {
            self.corridors += plan.corridors.len();
        }
    }

    #[test]
    fn test_renderer_sees_plan() {
        let plan = generate_floor_plan(LayoutConfig::default(), 42).unwrap();
        let mut renderer = CountingRenderer { corridors: 0 };
        renderer.render(&plan);
        assert_eq!(renderer.corridors, plan.tree.len());
    }
}
