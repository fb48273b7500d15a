//! Player pose and movement
//!
//! Moves are proposed along the heading, clamped out of negative space and
//! only committed when the target cell is open. The heading is never
//! normalized; use [`crate::angle_to`] for relative angles.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::world::World;

/// Spawn point inside the origin chunk
pub const PLAYER_SPAWN: Vec2 = Vec2::new(1.5, 1.5);

/// The viewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Heading in radians (unbounded)
    pub angle: f32,
    /// Current distance per move tick (hazards lower it)
    pub move_speed: f32,
    /// Stored default that trap expiry restores
    pub base_move_speed: f32,
    pub rotate_speed: f32,
    pub health: f32,
    pub max_health: f32,
}

impl Player {
    pub fn new(move_speed: f32, rotate_speed: f32, max_health: f32) -> Self {
        Self {
            pos: PLAYER_SPAWN,
            angle: 0.0,
            move_speed,
            base_move_speed: move_speed,
            rotate_speed,
            health: max_health,
            max_health,
        }
    }

    pub fn turn_left(&mut self) {
        self.angle -= self.rotate_speed;
    }

    pub fn turn_right(&mut self) {
        self.angle += self.rotate_speed;
    }

    /// Unit vector along the heading
    pub fn facing(&self) -> Vec2 {
        Vec2::new(self.angle.cos(), self.angle.sin())
    }

    /// Where a move of `distance` along the heading would land
    pub fn propose_move(&self, distance: f32) -> Vec2 {
        (self.pos + self.facing() * distance).max(Vec2::ZERO)
    }

    /// Commit `candidate` if it resolves to an open cell
    ///
    /// The caller is responsible for generating the chunks around the
    /// candidate first; ungenerated space reads as wall and rejects the move.
    pub fn apply_move(&mut self, candidate: Vec2, world: &World) -> bool {
        if world.wall_at(candidate) {
            return false;
        }
        self.pos = candidate;
        true
    }

    pub fn damage(&mut self, amount: f32) {
        self.health = (self.health - amount).clamp(0.0, self.max_health);
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }
}
