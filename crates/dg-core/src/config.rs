//! Layout configuration
//!
//! Tunables the pipeline depends on, loadable from a JSON file. Missing
//! fields fall back to the defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{LayoutError, Result};
use crate::geometry::Point;
use crate::route::ElbowPolicy;

/// Area rooms are scattered over by the room source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnRegion {
    pub center: Point,
    /// Half-width of the square rooms' top-left corners are drawn from
    pub radius: u32,
}

impl Default for SpawnRegion {
    fn default() -> Self {
        Self {
            center: Point::new(400.0, 300.0),
            radius: 40,
        }
    }
}

/// What to do when the relaxer hits its pass cap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum NonConvergencePolicy {
    /// Fail the run with `NonConvergence`
    #[default]
    Abort,
    /// Log a warning and continue with the current layout
    Proceed,
}

/// Parameters for one generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub room_count: usize,
    /// Rooms closer than this (corner to corner) still push each other apart
    pub proximity_threshold: f64,
    /// Rooms larger than `mean area * factor` become primary
    pub primary_area_factor: f64,
    /// Centres closer than this on one axis get a straight corridor
    pub corridor_alignment_tolerance: f64,
    pub max_relax_passes: usize,
    pub spawn: SpawnRegion,
    pub elbow_policy: ElbowPolicy,
    pub on_non_convergence: NonConvergencePolicy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            room_count: 50,
            proximity_threshold: 0.0,
            primary_area_factor: 1.25,
            corridor_alignment_tolerance: 20.0,
            max_relax_passes: 100_000,
            spawn: SpawnRegion::default(),
            elbow_policy: ElbowPolicy::default(),
            on_non_convergence: NonConvergencePolicy::default(),
        }
    }
}

impl LayoutConfig {
    /// Load a config from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| LayoutError::ConfigIo(e.to_string()))?;

        Self::parse_config(&contents)
    }

    /// Parse and validate a JSON config string
    pub fn parse_config(contents: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(contents).map_err(|e| LayoutError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_config_string(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if !self.proximity_threshold.is_finite() || self.proximity_threshold < 0.0 {
            return Err(LayoutError::InvalidConfig(format!(
                "proximity_threshold must be finite and >= 0, got {}",
                self.proximity_threshold
            )));
        }
        if !self.primary_area_factor.is_finite() || self.primary_area_factor <= 0.0 {
            return Err(LayoutError::InvalidConfig(format!(
                "primary_area_factor must be finite and > 0, got {}",
                self.primary_area_factor
            )));
        }
        if !self.corridor_alignment_tolerance.is_finite() || self.corridor_alignment_tolerance < 0.0 {
            return Err(LayoutError::InvalidConfig(format!(
                "corridor_alignment_tolerance must be finite and >= 0, got {}",
                self.corridor_alignment_tolerance
            )));
        }
        if self.max_relax_passes == 0 {
            return Err(LayoutError::InvalidConfig(
                "max_relax_passes must be at least 1".to_string(),
            ));
        }
        if self.spawn.radius == 0 {
            return Err(LayoutError::InvalidConfig(
                "spawn radius must be at least 1".to_string(),
            ));
        }
        if !self.spawn.center.x.is_finite() || !self.spawn.center.y.is_finite() {
            return Err(LayoutError::InvalidConfig(
                "spawn center must be finite".to_string(),
            ));
        }
        Ok(())
    }
}
