//! Game state and core simulation types
//!
//! `GameState` owns everything a run needs. The tick is its only writer;
//! the frame builder only reads it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::frame::{Frame, build_frame};
use super::hazards::HazardField;
use super::light::LightState;
use super::monster::Monster;
use super::pages::{PageSet, PageSpawnRules};
use super::player::Player;
use super::world::World;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Playing,
    /// The monster reached the player
    Caught,
    /// All pages collected
    Won,
    /// Health ran out
    Perished,
}

impl GamePhase {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GamePhase::Playing)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Playing => "Playing",
            GamePhase::Caught => "Caught",
            GamePhase::Won => "Won",
            GamePhase::Perished => "Perished",
        }
    }
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub tuning: Tuning,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub player: Player,
    pub monster: Monster,
    pub world: World,
    pub pages: PageSet,
    pub hazards: HazardField,
    pub light: LightState,
}

impl GameState {
    /// Create a new game state with the given seed and stock tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new game state with the given seed and tuning
    ///
    /// Tuning that fails validation is replaced by the stock values.
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let tuning = match tuning.validate() {
            Ok(()) => tuning,
            Err(err) => {
                log::warn!("{err}; using default tuning");
                Tuning::default()
            }
        };
        let (mx, my) = tuning.monster_start;
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            phase: GamePhase::Playing,
            player: Player::new(tuning.move_speed, tuning.rotate_speed, tuning.max_health),
            monster: Monster::new(Vec2::new(mx, my), tuning.monster_base_speed),
            world: World::new(),
            pages: PageSet::new(),
            hazards: HazardField::new(),
            light: LightState::new(
                tuning.battery_max,
                tuning.battery_drain,
                tuning.battery_recharge,
            ),
            tuning,
        };

        // Spawn chunk and its neighbours exist before the first tick
        state.ensure_around(state.player.pos);
        log::info!("Started new game with seed: {}", seed);
        state
    }

    fn page_rules(&self) -> PageSpawnRules {
        PageSpawnRules {
            chance: self.tuning.page_spawn_chance,
            max_outstanding: self.tuning.max_outstanding_pages,
            image_count: self.tuning.page_image_count,
            pickup_radius: self.tuning.page_pickup_radius,
        }
    }

    /// Generate missing chunks around `pos` and populate the new ones
    pub fn ensure_around(&mut self, pos: Vec2) {
        let generated =
            self.world
                .ensure_neighborhood(pos, &mut self.rng, self.tuning.wall_probability);
        let rules = self.page_rules();
        for coord in generated {
            let Some(chunk) = self.world.chunk(coord) else {
                continue;
            };
            self.pages.offer_chunk(coord, chunk, &rules, &mut self.rng);
            self.hazards
                .offer_chunk(coord, chunk, self.tuning.hazard_spawn_chance, &mut self.rng);
        }
    }

    /// Move the player `distance` along the heading
    ///
    /// Chunks around the target are generated before the wall test, so the
    /// test never sees ungenerated space. Returns whether the move happened.
    pub fn move_player(&mut self, distance: f32) -> bool {
        let candidate = self.player.propose_move(distance);
        self.ensure_around(candidate);
        self.player.apply_move(candidate, &self.world)
    }

    /// Monster speed for the current page count
    pub fn monster_speed(&self) -> f32 {
        Monster::speed_for(
            self.tuning.monster_base_speed,
            self.tuning.monster_speed_increment,
            self.pages.collected(),
        )
    }

    /// Start a fresh run; only valid once the current run has ended
    ///
    /// The whole state is replaced in one assignment, so no half-reset state
    /// is ever observable.
    pub fn reset(&mut self) -> bool {
        if !self.phase.is_terminal() {
            return false;
        }
        let seed: u64 = self.rng.random();
        log::info!("Resetting after {} (tick {})", self.phase.as_str(), self.time_ticks);
        *self = Self::with_tuning(seed, self.tuning.clone());
        true
    }

    /// Renderable snapshot of the current state
    pub fn frame(&self) -> Frame {
        build_frame(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::player::PLAYER_SPAWN;
    use crate::sim::world::ChunkCoord;
    use proptest::prelude::*;

    #[test]
    fn test_new_state_generates_spawn_neighborhood() {
        let state = GameState::new(1);
        assert_eq!(state.world.len(), 9);
        assert!(!state.world.wall_at(PLAYER_SPAWN));
        assert_eq!(state.phase, GamePhase::Playing);
        // Hazards never land in the spawn chunk
        assert!(state
            .hazards
            .iter()
            .all(|h| ChunkCoord::containing(h.pos) != Some(ChunkCoord::ORIGIN)));
    }

    #[test]
    fn test_same_seed_same_world() {
        let mut a = GameState::new(77);
        let mut b = GameState::new(77);
        for _ in 0..40 {
            a.move_player(0.3);
            b.move_player(0.3);
        }
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.world.len(), b.world.len());
        assert_eq!(a.pages.len(), b.pages.len());
        assert_eq!(a.hazards.len(), b.hazards.len());
    }

    #[test]
    fn test_move_into_wall_is_rejected() {
        let mut state = GameState::new(3);
        // Column 3 of row 1 is a wall
        state.player.pos = Vec2::new(2.5, 1.5);
        assert!(!state.move_player(1.0));
        assert_eq!(state.player.pos, Vec2::new(2.5, 1.5));
        assert!(state.move_player(0.4));
        assert!((state.player.pos.x - 2.9).abs() < 1e-5);
    }

    #[test]
    fn test_move_generates_chunks_ahead() {
        let mut state = GameState::new(3);
        state.player.pos = Vec2::new(7.5, 0.5);
        state.move_player(0.6);
        assert!(state.world.contains(ChunkCoord::new(2, 0)));
    }

    #[test]
    fn test_invalid_tuning_falls_back_to_default() {
        let tuning = Tuning {
            wall_probability: f64::NAN,
            page_spawn_chance: f64::NAN,
            ..Tuning::default()
        };
        let mut state = GameState::with_tuning(4, tuning);
        assert_eq!(state.tuning, Tuning::default());
        assert_eq!(state.world.len(), 9);
        assert!(state.move_player(0.1));
    }

    #[test]
    fn test_far_positions_do_not_panic() {
        let mut state = GameState::new(8);
        state.ensure_around(Vec2::new(1.0e12, 1.0e12));
        state.ensure_around(Vec2::new(-1.0e12, -1.0e12));
        assert!(state.world.len() > 9);

        state.player.pos = Vec2::new(1.0e12, 0.5);
        state.move_player(0.5);
        assert!(state.world.contains(ChunkCoord::new(i32::MAX, 0)));
    }

    #[test]
    fn test_reset_rejected_while_playing() {
        let mut state = GameState::new(5);
        state.player.pos = Vec2::new(0.5, 0.5);
        assert!(!state.reset());
        assert_eq!(state.player.pos, Vec2::new(0.5, 0.5));
    }

    #[test]
    fn test_reset_replaces_everything() {
        let mut state = GameState::new(5);
        for _ in 0..30 {
            state.move_player(0.3);
        }
        state.pages.place(Vec2::new(0.5, 0.5), 0);
        state.pages.check_collection(Vec2::new(0.5, 0.5), 0.5);
        state.phase = GamePhase::Caught;
        state.time_ticks = 99;

        assert!(state.reset());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.player.pos, PLAYER_SPAWN);
        assert_eq!(state.monster.pos, Vec2::new(6.5, 6.5));
        assert_eq!(state.pages.collected(), 0);
        assert_eq!(state.world.len(), 9);
        assert_ne!(state.seed, 5);
    }

    proptest! {
        #[test]
        fn prop_moves_never_end_in_wall(
            seed in any::<u64>(),
            steps in proptest::collection::vec((-1.0f32..1.0, -0.6f32..0.6), 1..80),
        ) {
            let mut state = GameState::new(seed);
            for (turn, dist) in steps {
                state.player.angle += turn;
                let before = state.player.pos;
                let moved = state.move_player(dist);
                prop_assert!(!state.world.wall_at(state.player.pos));
                if !moved {
                    prop_assert_eq!(state.player.pos, before);
                }
            }
        }
    }
}
