//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod frame;
pub mod hazards;
pub mod light;
pub mod monster;
pub mod pages;
pub mod player;
pub mod raycast;
pub mod state;
pub mod tick;
pub mod world;

pub use frame::{Frame, Hud, PageProjection, Projection, WallSlice, build_frame};
pub use hazards::{Hazard, HazardField, HazardKind, HazardPhase};
pub use light::{LightMode, LightState};
pub use monster::Monster;
pub use pages::{Page, PageSet, is_visible};
pub use player::{PLAYER_SPAWN, Player};
pub use raycast::{cast_ray, line_of_sight};
pub use state::{GamePhase, GameState};
pub use tick::{FixedStep, TickInput, tick};
pub use world::{Cell, Chunk, ChunkCoord, World, generate_chunk, spawn_chunk};
