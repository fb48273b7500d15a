//! Lantern Maze - a raycast maze over an endless, lazily generated tile world
//!
//! Core modules:
//! - `sim`: Deterministic simulation (world chunks, ray casting, monster, pages, hazards, light)
//! - `tuning`: Data-driven game balance
//!
//! Drawing, menus and audio belong to the embedding renderer; it feeds
//! [`sim::TickInput`] in and draws the [`sim::Frame`] that comes out.

pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Chunk width in cells
    pub const CHUNK_WIDTH: usize = 8;
    /// Chunk height in cells
    pub const CHUNK_HEIGHT: usize = 7;

    /// Ray march step length (world units)
    pub const RAY_STEP: f32 = 0.1;
    /// Offset of the confirmation samples around a wall hit
    pub const WALL_CONFIRM_OFFSET: f32 = 0.05;
    /// A line-of-sight march has reached its target inside this radius
    pub const LOS_REACH: f32 = 0.1;

    /// Default horizontal field of view (60 degrees)
    pub const DEFAULT_FOV: f32 = std::f32::consts::PI / 3.0;

    /// Keeps apparent height finite for zero-distance hits
    pub const HEIGHT_EPSILON: f32 = 0.0001;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    if !angle.is_finite() {
        return 0.0;
    }
    // Headings are never normalized, so fold large values first
    angle %= 2.0 * PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Signed angle from `heading` to the direction `from -> to`, in [-π, π)
#[inline]
pub fn angle_to(from: Vec2, heading: f32, to: Vec2) -> f32 {
    let d = to - from;
    normalize_angle(d.y.atan2(d.x) - heading)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_wraps() {
        assert!((normalize_angle(3.0 * PI + 0.5) - (0.5 - PI)).abs() < 1e-4);
        assert!((normalize_angle(-0.5) + 0.5).abs() < 1e-6);
        assert!((normalize_angle(20.0 * PI + 0.25) - 0.25).abs() < 1e-3);
    }

    #[test]
    fn test_angle_to_handles_unbounded_heading() {
        let from = Vec2::ZERO;
        let to = Vec2::new(0.0, 1.0);
        // Heading that has spun around four times
        let rel = angle_to(from, 8.0 * PI, to);
        assert!((rel - PI / 2.0).abs() < 1e-3);
    }
}
