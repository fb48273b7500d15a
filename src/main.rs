//! Lantern Maze entry point
//!
//! Runs a headless session: an autopilot walks the maze, frame summaries
//! go to the log, and the final frame is printed as JSON for a renderer.
//!
//! Usage: `lantern-maze [tuning.json] [seed]`

use lantern_maze::Tuning;
use lantern_maze::consts::SIM_DT;
use lantern_maze::sim::{FixedStep, GameState, TickInput, cast_ray, tick};

/// Simulated frames per run
const SESSION_FRAMES: u32 = 3600;
/// Simulated frame time (slightly uneven to exercise the accumulator)
const FRAME_TIME: f32 = 1.0 / 58.0;
/// Log a frame summary this often
const LOG_EVERY: u32 = 300;
/// Turn instead of walking when the wall ahead is closer than this
const AUTOPILOT_CLEARANCE: f32 = 0.6;

/// Pick the next input for the demo player
fn autopilot_input(state: &GameState) -> TickInput {
    if state.phase.is_terminal() {
        return TickInput {
            reset: true,
            ..Default::default()
        };
    }

    let player = &state.player;
    let ahead = cast_ray(
        &state.world,
        player.pos,
        player.angle,
        state.tuning.max_view_distance,
    );

    // Vary direction over time so the walk does not settle into a loop
    let time_factor = state.time_ticks as f32 * 0.01;
    let drift = time_factor.sin() * 0.5 + (time_factor * 0.7).sin() * 0.25;

    TickInput {
        move_forward: ahead > AUTOPILOT_CLEARANCE,
        turn_right: ahead <= AUTOPILOT_CLEARANCE || drift > 0.6,
        turn_left: drift < -0.6,
        toggle_light: !state.light.on && state.light.battery_percent() > 50.0,
        cycle_light_mode: state.time_ticks % 600 == 599,
        ..Default::default()
    }
}

fn load_tuning(path: Option<&String>) -> Tuning {
    let Some(path) = path else {
        return Tuning::default();
    };
    match Tuning::load(path) {
        Ok(tuning) => tuning,
        Err(err) => {
            log::warn!("{err}; using default tuning");
            Tuning::default()
        }
    }
}

fn main() {
    env_logger::init();
    log::info!("Lantern Maze (headless) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let tuning = load_tuning(args.first());
    let seed = args
        .get(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x1A57_E4);

    let mut state = GameState::with_tuning(seed, tuning);
    let mut step = FixedStep::new();
    let mut runs = 1;

    for frame_index in 0..SESSION_FRAMES {
        for _ in 0..step.advance(FRAME_TIME) {
            let input = autopilot_input(&state);
            if input.reset {
                runs += 1;
            }
            tick(&mut state, &input);
        }

        if frame_index % LOG_EVERY == 0 {
            let frame = state.frame();
            let nearest = frame
                .slices
                .iter()
                .map(|s| s.distance)
                .fold(f32::INFINITY, f32::min);
            log::info!(
                "t={:.1}s pos=({:.2}, {:.2}) angle={:.1}° pages={}/{} battery={:.0}% light={} nearest_wall={:.2} monster_in_view={} chunks={}",
                state.time_ticks as f32 * SIM_DT,
                frame.hud.pos.x,
                frame.hud.pos.y,
                frame.hud.angle.to_degrees(),
                frame.hud.collected,
                frame.hud.total,
                frame.hud.battery_percent,
                if frame.hud.light_on {
                    frame.hud.light_mode.as_str()
                } else {
                    "Off"
                },
                nearest,
                frame.monster.is_some(),
                state.world.len(),
            );
        }
    }

    log::info!(
        "Session over after {} run(s); final phase {}",
        runs,
        state.phase.as_str()
    );

    match serde_json::to_string_pretty(&state.frame()) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("Failed to serialize frame: {err}"),
    }
}
