//! Toroid Duel headless runner
//!
//! Drives a full match at the fixed tick rate with a simple scripted player,
//! printing the outcome. Seed comes from the first CLI argument, or entropy.

use toroid_duel::consts::*;
use toroid_duel::normalize_angle;
use toroid_duel::sim::{Arena, GamePhase, GameState, TickInput, tick};

use rand::Rng;

/// Safety cap: ten minutes of simulated time
const MAX_TICKS: u64 = 10 * 60 * TICK_RATE as u64;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(|| rand::rng().random());

    log::info!("Toroid Duel starting, seed {seed}");
    let mut state = GameState::new(seed);

    while state.phase == GamePhase::Playing && state.time_ticks < MAX_TICKS {
        let input = scripted_player_input(&state);
        tick(&mut state, &input);
    }

    match state.phase {
        GamePhase::GameOver { winner } => {
            println!(
                "{winner:?} wins after {:.1}s (seed {seed})",
                state.time_ticks as f64 * MS_PER_TICK / 1000.0
            );
        }
        GamePhase::Playing => {
            println!(
                "draw: match still running after {:.1}s (seed {seed})",
                MAX_TICKS as f64 * MS_PER_TICK / 1000.0
            );
        }
    }
    println!(
        "player shield {:.0}, hostile shield {:.0}, torpedoes spent {}/{}",
        state.player.shield_strength,
        state.hostile.shield_strength,
        TORPEDO_CAPACITY - state.player.torpedo_count,
        TORPEDO_CAPACITY
    );
}

/// Minimal stand-in for keyboard input: chase the hostile and fire when
/// roughly lined up
fn scripted_player_input(state: &GameState) -> TickInput {
    let arena: &Arena = &state.arena;
    let bearing = arena.bearing(state.player.pos, state.hostile.pos);
    let error = normalize_angle(bearing - state.player.angle);
    let distance = arena.distance(state.player.pos, state.hostile.pos);

    let aligned = error.abs() < 0.2;
    TickInput {
        rotate: if error.abs() > 0.05 { error.signum() } else { 0.0 },
        accelerate: distance > 200.0,
        decelerate: distance <= 200.0,
        fire_torpedo: aligned && (150.0..400.0).contains(&distance),
        fire_laser: aligned && distance < LASER_RANGE,
    }
}
