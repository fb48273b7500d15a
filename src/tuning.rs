//! Data-driven game balance
//!
//! Every number that shapes a run lives here so a JSON file can rebalance
//! the game without a rebuild. Missing fields fall back to the stock values.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::DEFAULT_FOV;

/// Errors raised while loading or validating a [`Tuning`]
#[derive(Error, Debug)]
pub enum TuningError {
    /// The tuning file could not be read.
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),

    /// The tuning file is not valid JSON for this schema.
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field is outside the range the simulation can work with.
    #[error("tuning field `{field}` out of range: {value}")]
    OutOfRange {
        /// Field name as written in the JSON file.
        field: &'static str,
        /// Offending value.
        value: f64,
    },

    /// At least one ray is needed to build a frame.
    #[error("ray_count must be at least 1")]
    ZeroRayCount,
}

/// Game balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === View ===
    /// Horizontal field of view (radians)
    pub fov: f32,
    /// Rays (wall slices) per frame
    pub ray_count: usize,
    /// Rays give up past this distance
    pub max_view_distance: f32,

    // === Player ===
    /// Distance covered per tick while a move key is held
    pub move_speed: f32,
    /// Heading change per tick while a turn key is held
    pub rotate_speed: f32,
    pub max_health: f32,

    // === World ===
    /// Chance that a generated cell is a wall
    pub wall_probability: f64,

    // === Pages ===
    /// Chance that a freshly generated chunk receives a page
    pub page_spawn_chance: f64,
    /// No new pages while this many are still lying around
    pub max_outstanding_pages: usize,
    /// Pages needed to win
    pub pages_to_win: u32,
    pub page_pickup_radius: f32,
    /// Number of distinct page images the renderer knows about
    pub page_image_count: u32,

    // === Hazards ===
    pub hazard_spawn_chance: f64,
    pub hazard_trigger_radius: f32,

    // === Monster ===
    pub monster_base_speed: f32,
    /// Added to monster speed for every collected page
    pub monster_speed_increment: f32,
    pub capture_distance: f32,
    pub monster_start: (f32, f32),

    // === Light ===
    pub battery_max: f32,
    /// Battery drained per tick at mode multiplier 1.0
    pub battery_drain: f32,
    /// Battery regained per tick while the light is off
    pub battery_recharge: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            fov: DEFAULT_FOV,
            ray_count: 100,
            max_view_distance: 24.0,

            move_speed: 0.1,
            rotate_speed: 0.1,
            max_health: 100.0,

            wall_probability: 0.15,

            page_spawn_chance: 0.35,
            max_outstanding_pages: 3,
            pages_to_win: 8,
            page_pickup_radius: 0.5,
            page_image_count: 8,

            hazard_spawn_chance: 0.2,
            hazard_trigger_radius: 0.5,

            monster_base_speed: 0.01,
            monster_speed_increment: 0.004,
            capture_distance: 0.2,
            monster_start: (6.5, 6.5),

            battery_max: 100.0,
            battery_drain: 0.05,
            battery_recharge: 0.02,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a JSON tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Check every field the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.ray_count == 0 {
            return Err(TuningError::ZeroRayCount);
        }

        let probabilities = [
            ("wall_probability", self.wall_probability),
            ("page_spawn_chance", self.page_spawn_chance),
            ("hazard_spawn_chance", self.hazard_spawn_chance),
        ];
        for (field, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(TuningError::OutOfRange { field, value });
            }
        }

        let positive = [
            ("fov", self.fov),
            ("max_view_distance", self.max_view_distance),
            ("max_health", self.max_health),
            ("page_pickup_radius", self.page_pickup_radius),
            ("hazard_trigger_radius", self.hazard_trigger_radius),
            ("capture_distance", self.capture_distance),
            ("battery_max", self.battery_max),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(TuningError::OutOfRange {
                    field,
                    value: value as f64,
                });
            }
        }

        let non_negative = [
            ("move_speed", self.move_speed),
            ("rotate_speed", self.rotate_speed),
            ("monster_base_speed", self.monster_base_speed),
            ("monster_speed_increment", self.monster_speed_increment),
            ("battery_drain", self.battery_drain),
            ("battery_recharge", self.battery_recharge),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(TuningError::OutOfRange {
                    field,
                    value: value as f64,
                });
            }
        }

        if self.fov >= std::f32::consts::TAU {
            return Err(TuningError::OutOfRange {
                field: "fov",
                value: self.fov as f64,
            });
        }
        if self.pages_to_win == 0 {
            return Err(TuningError::OutOfRange {
                field: "pages_to_win",
                value: 0.0,
            });
        }
        if self.page_image_count == 0 {
            return Err(TuningError::OutOfRange {
                field: "page_image_count",
                value: 0.0,
            });
        }

        Ok(())
    }
}
