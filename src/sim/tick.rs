//! Fixed timestep simulation tick
//!
//! One tick runs, in order: input and player movement, monster pursuit,
//! page collection, hazards, then the light battery. A terminal phase
//! freezes everything until a reset.

use super::state::{GamePhase, GameState};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Input for a single tick
///
/// Movement and turning are held keys and fire every tick they are set;
/// the rest are one-shot commands the caller clears after a tick.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub turn_left: bool,
    pub turn_right: bool,
    pub move_forward: bool,
    pub move_backward: bool,
    pub toggle_light: bool,
    pub cycle_light_mode: bool,
    /// Start a new run (ignored unless the current one has ended)
    pub reset: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.reset && state.reset() {
        return;
    }

    if state.phase.is_terminal() {
        return;
    }

    state.time_ticks += 1;

    // Player
    if input.turn_left {
        state.player.turn_left();
    }
    if input.turn_right {
        state.player.turn_right();
    }
    if input.move_forward {
        let distance = state.player.move_speed;
        state.move_player(distance);
    }
    if input.move_backward {
        let distance = state.player.move_speed;
        state.move_player(-distance);
    }
    if input.toggle_light {
        state.light.toggle();
    }
    if input.cycle_light_mode {
        state.light.cycle_mode();
    }

    // Monster
    let speed = state.monster_speed();
    if state
        .monster
        .pursue(state.player.pos, speed, state.tuning.capture_distance)
    {
        state.phase = GamePhase::Caught;
        log::info!("Caught by the monster at tick {}", state.time_ticks);
        return;
    }

    // Pages
    let picked = state
        .pages
        .check_collection(state.player.pos, state.tuning.page_pickup_radius);
    if picked > 0 {
        state.monster.speed = state.monster_speed();
        log::info!(
            "Pages: {}/{}",
            state.pages.collected(),
            state.tuning.pages_to_win
        );
        if state.pages.collected() >= state.tuning.pages_to_win {
            state.phase = GamePhase::Won;
            log::info!("All pages collected at tick {}", state.time_ticks);
            return;
        }
    }

    // Hazards
    state
        .hazards
        .trigger_near(state.player.pos, state.tuning.hazard_trigger_radius);
    state.hazards.tick(&mut state.player, &mut state.light);
    if state.player.is_dead() {
        state.phase = GamePhase::Perished;
        log::info!("Perished at tick {}", state.time_ticks);
        return;
    }

    // Light
    state.light.tick();
}

/// Turns variable frame time into whole simulation ticks
#[derive(Debug, Clone, Default)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bank `elapsed` seconds and return how many ticks to run now
    ///
    /// Capped at `MAX_SUBSTEPS` to prevent a spiral of death; the excess
    /// is dropped.
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        if elapsed.is_finite() && elapsed > 0.0 {
            self.accumulator += elapsed.min(0.1);
        }
        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        if steps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::sim::hazards::{HazardKind, HazardPhase};
    use crate::sim::light::LightMode;
    use glam::Vec2;

    fn quiet_tuning() -> Tuning {
        Tuning {
            page_spawn_chance: 0.0,
            hazard_spawn_chance: 0.0,
            ..Tuning::default()
        }
    }

    fn forward() -> TickInput {
        TickInput {
            move_forward: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_cast_east_from_spawn() {
        let state = GameState::with_tuning(1, quiet_tuning());
        let d = crate::sim::cast_ray(&state.world, state.player.pos, state.player.angle, 24.0);
        // Block face at x = 3.0 in the spawn chunk
        assert!((d - 1.5).abs() <= 0.1 + 1e-3, "distance {d}");
    }

    #[test]
    fn test_monster_first_tick_scenario() {
        let tuning = Tuning {
            monster_base_speed: 0.001,
            monster_speed_increment: 0.0,
            ..quiet_tuning()
        };
        let mut state = GameState::with_tuning(1, tuning);
        assert_eq!(state.player.pos, Vec2::new(1.5, 1.5));
        assert_eq!(state.monster.pos, Vec2::new(6.5, 6.5));

        tick(&mut state, &TickInput::default());
        let expected = Vec2::new(6.5, 6.5) + (Vec2::new(1.5, 1.5) - Vec2::new(6.5, 6.5)).normalize() * 0.001;
        assert!(state.monster.pos.distance(expected) < 1e-6);

        let mut last = state.monster.pos.distance(state.player.pos);
        for _ in 0..100 {
            tick(&mut state, &TickInput::default());
            let d = state.monster.pos.distance(state.player.pos);
            assert!(d < last);
            last = d;
        }
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_caught_freezes_until_reset() {
        let tuning = Tuning {
            monster_base_speed: 1.0,
            ..quiet_tuning()
        };
        let mut state = GameState::with_tuning(1, tuning);
        for _ in 0..20 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.phase, GamePhase::Caught);
        assert!(state.monster.pos.distance(state.player.pos) < 0.2);

        let ticks = state.time_ticks;
        tick(&mut state, &forward());
        assert_eq!(state.time_ticks, ticks);

        tick(
            &mut state,
            &TickInput {
                reset: true,
                ..Default::default()
            },
        );
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.player.pos, Vec2::new(1.5, 1.5));
    }

    #[test]
    fn test_reset_ignored_while_playing() {
        let mut state = GameState::with_tuning(1, quiet_tuning());
        let seed = state.seed;
        tick(
            &mut state,
            &TickInput {
                reset: true,
                ..Default::default()
            },
        );
        assert_eq!(state.seed, seed);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_page_collection_scenario() {
        let mut state = GameState::with_tuning(1, quiet_tuning());
        state.pages.place(Vec2::new(3.5, 3.5), 0);
        state.player.pos = Vec2::new(3.4, 3.5);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.pages.collected(), 1);
        assert_eq!(state.monster.speed, state.monster_speed());
        assert_eq!(
            state.monster.speed,
            state.tuning.monster_base_speed + state.tuning.monster_speed_increment
        );

        tick(&mut state, &TickInput::default());
        assert_eq!(state.pages.collected(), 1);
    }

    #[test]
    fn test_no_page_collected_without_moving() {
        for seed in 0..2000 {
            let mut state = GameState::new(seed);
            tick(&mut state, &TickInput::default());
            assert_eq!(state.pages.collected(), 0, "seed {seed}");
            assert_eq!(state.monster.speed, state.tuning.monster_base_speed);
        }
    }

    #[test]
    fn test_collecting_last_page_wins() {
        let tuning = Tuning {
            pages_to_win: 2,
            ..quiet_tuning()
        };
        let mut state = GameState::with_tuning(1, tuning);
        state.pages.place(Vec2::new(0.5, 0.5), 0);
        state.pages.place(Vec2::new(0.7, 0.5), 1);
        state.player.pos = Vec2::new(0.6, 0.5);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Won);
        assert_eq!(state.frame().hud.phase, GamePhase::Won);
    }

    #[test]
    fn test_walking_generates_world() {
        let mut state = GameState::with_tuning(1, quiet_tuning());
        // Row 0 is open along the top of the spawn chunk
        state.player.pos = Vec2::new(0.5, 0.5);
        for _ in 0..100 {
            tick(&mut state, &forward());
        }
        assert!(state.player.pos.x > 5.0);
        assert!(!state.world.wall_at(state.player.pos));
        assert!(state.world.len() > 9);
    }

    #[test]
    fn test_hazard_triggers_and_expires() {
        let mut state = GameState::with_tuning(1, quiet_tuning());
        let pos = state.player.pos;
        state.hazards.place(pos, HazardKind::Trap, 1.0);

        tick(&mut state, &TickInput::default());
        assert!(state.player.move_speed < state.player.base_move_speed);

        for _ in 0..HazardKind::Trap.profile().max_duration {
            tick(&mut state, &TickInput::default());
        }
        let hazard = state.hazards.iter().next().unwrap();
        assert_eq!(hazard.phase, HazardPhase::Spent);
        assert_eq!(state.player.move_speed, state.player.base_move_speed);
    }

    #[test]
    fn test_poison_can_kill() {
        let tuning = Tuning {
            max_health: 1.0,
            ..quiet_tuning()
        };
        let mut state = GameState::with_tuning(1, tuning);
        let pos = state.player.pos;
        state.hazards.place(pos, HazardKind::Poison, 1.5);
        for _ in 0..40 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.phase, GamePhase::Perished);
    }

    #[test]
    fn test_light_commands() {
        let mut state = GameState::with_tuning(1, quiet_tuning());

        // Cycling while off is a no-op
        tick(
            &mut state,
            &TickInput {
                cycle_light_mode: true,
                ..Default::default()
            },
        );
        assert_eq!(state.light.mode, LightMode::Standard);

        tick(
            &mut state,
            &TickInput {
                toggle_light: true,
                cycle_light_mode: true,
                ..Default::default()
            },
        );
        assert!(state.light.on);
        assert_eq!(state.light.mode, LightMode::Focused);
        assert!(state.light.battery < state.light.max_battery);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);

        let inputs = [
            forward(),
            TickInput {
                turn_right: true,
                move_forward: true,
                ..Default::default()
            },
            TickInput {
                toggle_light: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for _ in 0..50 {
            for input in &inputs {
                tick(&mut state1, input);
                tick(&mut state2, input);
            }
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.player.pos, state2.player.pos);
        assert_eq!(state1.monster.pos, state2.monster.pos);
        assert_eq!(state1.world.len(), state2.world.len());
        assert_eq!(state1.frame(), state2.frame());
    }

    #[test]
    fn test_fixed_step_caps_substeps() {
        let mut step = FixedStep::new();
        assert_eq!(step.advance(SIM_DT * 0.5), 0);
        assert_eq!(step.advance(SIM_DT * 0.6), 1);
        assert_eq!(step.advance(10.0), MAX_SUBSTEPS);
        // Backlog beyond the cap is dropped
        assert!(step.advance(0.0) <= 1);
    }
}
