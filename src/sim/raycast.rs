//! Fixed-step ray marching over the chunk world
//!
//! Rays advance in `RAY_STEP` increments. A wall sample only counts once the
//! samples around it agree, which stops rays from threading the corner
//! between two diagonal walls and leaving seams between slices. Every march
//! is bounded by a step budget derived from the view distance.

use glam::Vec2;

use super::world::World;
use crate::consts::{LOS_REACH, RAY_STEP, WALL_CONFIRM_OFFSET};

/// Offsets sampled around a candidate hit
const CONFIRM_OFFSETS: [Vec2; 4] = [
    Vec2::new(WALL_CONFIRM_OFFSET, 0.0),
    Vec2::new(-WALL_CONFIRM_OFFSET, 0.0),
    Vec2::new(0.0, WALL_CONFIRM_OFFSET),
    Vec2::new(0.0, -WALL_CONFIRM_OFFSET),
];

/// Steps allowed for a march of `distance` world units
#[inline]
pub fn step_budget(distance: f32) -> u32 {
    if !distance.is_finite() || distance <= 0.0 {
        return 0;
    }
    (distance / RAY_STEP).ceil() as u32
}

/// Whether a wall sample is backed by its neighbours
fn confirmed_wall(world: &World, p: Vec2) -> bool {
    CONFIRM_OFFSETS.iter().all(|o| world.wall_at(p + *o))
}

/// Cast a ray and return the distance to the first confirmed wall
///
/// The result is always in `[0, max_distance]`:
/// - a confirmed hit reports the distance where the wall was first sampled
/// - leaving positive world space returns the distance travelled so far
/// - running out of step budget returns `max_distance`
pub fn cast_ray(world: &World, origin: Vec2, angle: f32, max_distance: f32) -> f32 {
    let max_distance = if max_distance.is_finite() { max_distance.max(0.0) } else { 0.0 };
    let dir = Vec2::new(angle.cos(), angle.sin());
    if !origin.is_finite() || !dir.is_finite() {
        return 0.0;
    }

    let mut first_wall: Option<f32> = None;

    for i in 1..=step_budget(max_distance) {
        // Position from the step index, not an accumulated sum
        let d = i as f32 * RAY_STEP;
        let p = origin + dir * d;

        if p.x < 0.0 || p.y < 0.0 {
            return (d - RAY_STEP).clamp(0.0, max_distance);
        }

        if world.wall_at(p) {
            let start = *first_wall.get_or_insert(d);
            if confirmed_wall(world, p) {
                return start.min(max_distance);
            }
        } else {
            first_wall = None;
        }
    }

    max_distance
}

/// Whether an unobstructed line joins `from` and `to`
///
/// Marches from `from` toward `to`; reaching within `LOS_REACH` of the
/// target wins, sampling a wall first loses.
pub fn line_of_sight(world: &World, from: Vec2, to: Vec2, max_distance: f32) -> bool {
    let delta = to - from;
    let dist = delta.length();
    if !dist.is_finite() || dist > max_distance {
        return false;
    }
    if dist <= LOS_REACH {
        return true;
    }
    let dir = delta / dist;

    // One extra step so the final sample lands on the target
    for i in 1..=step_budget(dist) + 1 {
        let p = from + dir * (i as f32 * RAY_STEP);
        if p.distance(to) <= LOS_REACH {
            return true;
        }
        if world.wall_at(p) {
            return false;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::world::{Cell, Chunk, ChunkCoord, spawn_chunk};
    use crate::consts::{CHUNK_HEIGHT, CHUNK_WIDTH};

    fn open_chunk() -> Chunk {
        Chunk::from_cells([[Cell::Open; CHUNK_WIDTH]; CHUNK_HEIGHT])
    }

    /// Spawn chunk at the origin surrounded by open chunks
    fn spawn_world() -> World {
        let mut world = World::new();
        for coord in ChunkCoord::ORIGIN.neighborhood() {
            world.insert(coord, open_chunk());
        }
        world.insert(ChunkCoord::ORIGIN, spawn_chunk());
        world
    }

    #[test]
    fn test_cast_hits_wall_east_of_spawn() {
        let world = spawn_world();
        // Wall block at column 3 of row 1, face at x = 3.0
        let d = cast_ray(&world, Vec2::new(1.5, 1.5), 0.0, 24.0);
        assert!((d - 1.5).abs() <= RAY_STEP + 1e-3, "distance {d}");
    }

    #[test]
    fn test_cast_known_distance_from_other_origin() {
        let world = spawn_world();
        let d = cast_ray(&world, Vec2::new(1.0, 1.5), 0.0, 24.0);
        assert!((d - 2.0).abs() <= RAY_STEP + 1e-3, "distance {d}");
    }

    #[test]
    fn test_cast_stops_at_ungenerated_space() {
        let world = spawn_world();
        // Row 3 is open all the way; the chunk east of (1, 0) does not exist
        let d = cast_ray(&world, Vec2::new(0.5, 3.5), 0.0, 100.0);
        assert!((d - 15.5).abs() <= RAY_STEP + 1e-3, "distance {d}");
    }

    #[test]
    fn test_cast_into_negative_space_cuts_off() {
        let world = spawn_world();
        let d = cast_ray(&world, Vec2::new(0.5, 3.5), std::f32::consts::PI, 100.0);
        assert!(d >= 0.0 && d <= 0.5 + 1e-3, "distance {d}");
    }

    #[test]
    fn test_cast_respects_step_budget() {
        let mut world = World::new();
        for y in 0..3 {
            for x in 0..20 {
                world.insert(ChunkCoord::new(x, y), open_chunk());
            }
        }
        let d = cast_ray(&world, Vec2::new(0.5, 10.5), 0.0, 5.0);
        assert_eq!(d, 5.0);
    }

    #[test]
    fn test_cast_never_negative() {
        let world = spawn_world();
        for i in 0..64 {
            let angle = i as f32 * 0.1;
            let d = cast_ray(&world, Vec2::new(1.5, 1.5), angle, 24.0);
            assert!(d >= 0.0);
        }
        assert_eq!(cast_ray(&world, Vec2::new(f32::NAN, 1.0), 0.0, 24.0), 0.0);
    }

    #[test]
    fn test_line_of_sight_blocked_and_clear() {
        let world = spawn_world();
        // Across the open top row
        assert!(line_of_sight(&world, Vec2::new(0.5, 0.5), Vec2::new(6.5, 0.5), 24.0));
        // Through the block at (3, 1)
        assert!(!line_of_sight(&world, Vec2::new(1.5, 1.5), Vec2::new(6.5, 1.5), 24.0));
        // Beyond view distance
        assert!(!line_of_sight(&world, Vec2::new(0.5, 0.5), Vec2::new(6.5, 0.5), 3.0));
    }
}
