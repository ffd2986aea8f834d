//! Match state owned by the simulation driver
//!
//! All state needed to reproduce a match from a seed lives here. The driver
//! owns both ships and the projectile collections; the tactical controller
//! never touches them except through its returned `AiAction`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

use super::ai::{AiConfig, TacticalController};
use super::geometry::Arena;
use super::projectile::{Laser, ShipId, Torpedo};
use super::ship::Ship;

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    GameOver { winner: ShipId },
}

/// Complete match state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Match seed for reproducibility
    pub seed: u64,
    /// Injected RNG; every random draw in the sim comes from here
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub arena: Arena,
    pub player: Ship,
    pub hostile: Ship,
    pub controller: TacticalController,
    /// Live torpedoes, driver-owned
    pub torpedoes: Vec<Torpedo>,
    /// Live laser beams, driver-owned
    pub lasers: Vec<Laser>,
}

impl GameState {
    /// Create a new match. The player starts at a fixed berth; the hostile
    /// spawns at a seeded random position with its handicap applied.
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, AiConfig::default())
    }

    pub fn with_config(seed: u64, config: AiConfig) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let arena = Arena::new(ARENA_WIDTH, ARENA_HEIGHT);

        let player = Ship::new(ShipId::Player, Self::player_berth(&arena));

        let spawn = Vec2::new(
            rng.random_range(0.0..arena.width),
            rng.random_range(0.0..arena.height),
        );
        let mut hostile = Ship::new(ShipId::Hostile, spawn);
        hostile.rotation_speed *= AI_ROTATION_FACTOR;
        hostile.acceleration *= AI_ACCELERATION_FACTOR;
        hostile.max_speed *= AI_MAX_SPEED_FACTOR;

        let controller = TacticalController::new(arena, config, hostile.pos);

        Self {
            seed,
            rng,
            time_ticks: 0,
            phase: GamePhase::Playing,
            arena,
            player,
            hostile,
            controller,
            torpedoes: Vec::new(),
            lasers: Vec::new(),
        }
    }

    fn player_berth(arena: &Arena) -> Vec2 {
        Vec2::new(arena.width / 4.0, arena.height / 2.0)
    }

    fn hostile_berth(arena: &Arena) -> Vec2 {
        Vec2::new(3.0 * arena.width / 4.0, arena.height / 2.0)
    }

    /// Simulation clock in milliseconds, driven by the fixed tick
    pub fn now_ms(&self) -> f64 {
        self.time_ticks as f64 * MS_PER_TICK
    }

    /// Restart the match in place: ships back to their berths, projectiles
    /// cleared, clock and phase reset. The RNG stream continues.
    pub fn reset(&mut self) {
        let arena = self.arena;
        self.player.reset(Self::player_berth(&arena));
        self.hostile.reset(Self::hostile_berth(&arena));
        self.controller = TacticalController::new(arena, self.controller.config, self.hostile.pos);
        self.torpedoes.clear();
        self.lasers.clear();
        self.time_ticks = 0;
        self.phase = GamePhase::Playing;
        log::info!("match reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_applies_hostile_handicap() {
        let state = GameState::new(1);
        assert!(state.hostile.rotation_speed < state.player.rotation_speed);
        assert!(state.hostile.acceleration < state.player.acceleration);
        assert!(state.hostile.max_speed < state.player.max_speed);
    }

    #[test]
    fn test_same_seed_same_spawn() {
        let a = GameState::new(42);
        let b = GameState::new(42);
        assert_eq!(a.hostile.pos, b.hostile.pos);
    }

    #[test]
    fn test_spawn_inside_arena() {
        for seed in 0..20 {
            let state = GameState::new(seed);
            let p = state.hostile.pos;
            assert!(p.x >= 0.0 && p.x < ARENA_WIDTH);
            assert!(p.y >= 0.0 && p.y < ARENA_HEIGHT);
        }
    }

    #[test]
    fn test_reset_clears_match() {
        let mut state = GameState::new(3);
        state.torpedoes.push(Torpedo {
            pos: Vec2::ZERO,
            vel: Vec2::X,
            life: 10,
            owner: ShipId::Player,
        });
        state.player.handle_collision(SHIELD_MAX);
        state.phase = GamePhase::GameOver {
            winner: ShipId::Hostile,
        };
        state.time_ticks = 500;

        state.reset();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_ticks, 0);
        assert!(state.torpedoes.is_empty());
        assert!(!state.player.is_exploding);
        assert_eq!(state.hostile.pos, Vec2::new(600.0, 300.0));
    }

    #[test]
    fn test_clock_advances_with_ticks() {
        let mut state = GameState::new(1);
        assert_eq!(state.now_ms(), 0.0);
        state.time_ticks = 60;
        assert!((state.now_ms() - 1000.0).abs() < 1e-6);
    }

    #[test]
    fn test_state_round_trips_through_serde() {
        let state = GameState::new(9);
        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.seed, state.seed);
        assert_eq!(back.hostile.pos, state.hostile.pos);
        assert_eq!(back.phase, state.phase);
    }
}
