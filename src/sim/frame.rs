//! Frame descriptor for the external renderer
//!
//! Built from a shared borrow of the game state; nothing here mutates the
//! world. Screen positions are normalized to [0, 1] across the view and
//! heights are fractions of the viewport height.

use glam::Vec2;
use serde::Serialize;

use super::light::LightMode;
use super::raycast::cast_ray;
use super::state::{GamePhase, GameState};
use crate::angle_to;
use crate::consts::HEIGHT_EPSILON;

/// Brightness multiplier for walls beyond the light radius
const UNLIT_DIMMING: f32 = 0.5;
/// Shade lost per world unit of distance, out of 255
const SHADE_FALLOFF: f32 = 20.0;

/// One vertical wall strip
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WallSlice {
    pub angle: f32,
    pub distance: f32,
    pub height: f32,
    /// Brightness in [0, 1]
    pub shade: f32,
}

/// An entity placed on screen
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Projection {
    pub screen_x: f32,
    pub distance: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageProjection {
    pub id: u32,
    pub image: u32,
    pub projection: Projection,
}

/// Text overlay data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub pos: Vec2,
    pub angle: f32,
    pub health: f32,
    pub max_health: f32,
    pub collected: u32,
    pub total: u32,
    pub battery_percent: f32,
    pub light_on: bool,
    pub light_mode: LightMode,
    pub light_radius: f32,
    pub phase: GamePhase,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    /// Left to right, one per ray
    pub slices: Vec<WallSlice>,
    pub monster: Option<Projection>,
    /// Far to near, ready for painter's-order drawing
    pub pages: Vec<PageProjection>,
    pub hud: Hud,
}

/// Angle of ray `index` out of `count` across the field of view
#[inline]
pub fn ray_angle(heading: f32, fov: f32, index: usize, count: usize) -> f32 {
    heading - fov / 2.0 + (index as f32 / count.max(1) as f32) * fov
}

/// On-screen height for something at `distance`
#[inline]
pub fn apparent_height(distance: f32) -> f32 {
    (1.0 / (distance + HEIGHT_EPSILON)).min(1.0)
}

/// Wall brightness, dimmer outside the light radius
pub fn shade(distance: f32, light_radius: f32) -> f32 {
    let base = 1.0 - (distance * SHADE_FALLOFF).min(255.0) / 255.0;
    if distance > light_radius {
        base * UNLIT_DIMMING
    } else {
        base
    }
}

/// Project a point into the view, if it lies inside the field of view
pub fn project(viewer: Vec2, heading: f32, fov: f32, target: Vec2) -> Option<Projection> {
    let rel = angle_to(viewer, heading, target);
    if rel.abs() > fov * 0.5 {
        return None;
    }
    let distance = viewer.distance(target);
    Some(Projection {
        screen_x: (rel + fov * 0.5) / fov,
        distance,
        height: apparent_height(distance),
    })
}

/// Build the frame for the current state
pub fn build_frame(state: &GameState) -> Frame {
    let tuning = &state.tuning;
    let player = &state.player;
    let light_radius = state.light.radius();

    let slices = (0..tuning.ray_count)
        .map(|i| {
            let angle = ray_angle(player.angle, tuning.fov, i, tuning.ray_count);
            let distance = cast_ray(&state.world, player.pos, angle, tuning.max_view_distance);
            WallSlice {
                angle,
                distance,
                height: apparent_height(distance),
                shade: shade(distance, light_radius),
            }
        })
        .collect();

    let monster = project(player.pos, player.angle, tuning.fov, state.monster.pos);

    let mut pages: Vec<PageProjection> = state
        .pages
        .visible(
            &state.world,
            player.pos,
            player.angle,
            tuning.fov,
            tuning.max_view_distance,
        )
        .filter_map(|page| {
            project(player.pos, player.angle, tuning.fov, page.pos).map(|projection| PageProjection {
                id: page.id,
                image: page.image,
                projection,
            })
        })
        .collect();
    pages.sort_by(|a, b| {
        b.projection
            .distance
            .partial_cmp(&a.projection.distance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Frame {
        slices,
        monster,
        pages,
        hud: Hud {
            pos: player.pos,
            angle: player.angle,
            health: player.health,
            max_health: player.max_health,
            collected: state.pages.collected(),
            total: tuning.pages_to_win,
            battery_percent: state.light.battery_percent(),
            light_on: state.light.on,
            light_mode: state.light.mode,
            light_radius,
            phase: state.phase,
        },
    }
}
