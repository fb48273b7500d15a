//! The pursuer
//!
//! Walks straight at the player through walls; speed grows with every
//! collected page.

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monster {
    pub pos: Vec2,
    /// Distance per tick, recomputed every tick
    pub speed: f32,
}

impl Monster {
    pub fn new(pos: Vec2, base_speed: f32) -> Self {
        Self {
            pos,
            speed: base_speed,
        }
    }

    /// Speed for a given number of collected pages
    pub fn speed_for(base_speed: f32, increment: f32, pages_collected: u32) -> f32 {
        base_speed + pages_collected as f32 * increment
    }

    /// Step toward `target`; returns true once within `capture_distance`
    ///
    /// The step never overshoots, so distance to a stationary target is
    /// non-increasing.
    pub fn pursue(&mut self, target: Vec2, speed: f32, capture_distance: f32) -> bool {
        self.speed = speed;

        let to_target = target - self.pos;
        let dist = to_target.length();
        if dist > 0.0 && dist.is_finite() {
            let step = self.speed.min(dist);
            self.pos += to_target / dist * step;
        }

        self.pos.distance(target) < capture_distance
    }
}
