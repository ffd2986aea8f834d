//! Toroid Duel - two-ship space combat in a wrap-around arena
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, entities, combat, tactical AI)
//!
//! Rendering, input wiring, and frame scheduling are external collaborators;
//! everything here is headless and reproducible from a seed.

pub mod sim;

pub use sim::{GamePhase, GameState, TickInput, tick};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (60 Hz, matching the original frame clock)
    pub const TICK_RATE: f32 = 60.0;
    /// Milliseconds of simulation time per tick
    pub const MS_PER_TICK: f64 = 1000.0 / TICK_RATE as f64;

    /// Arena dimensions (toroidal: opposite edges identified)
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Ship defaults
    pub const SHIP_RADIUS: f32 = 10.0;
    pub const SHIP_ROTATION_SPEED: f32 = 0.11; // radians per tick
    pub const SHIP_ACCELERATION: f32 = 0.1;
    pub const SHIP_DECELERATION: f32 = 0.2;
    pub const SHIP_MAX_SPEED: f32 = 6.0;
    pub const SHIELD_MAX: f32 = 600.0;
    pub const SHIELD_RECHARGE_RATE: f32 = 0.2;
    pub const SHIELD_IMPACT_DECAY: f32 = 0.05;
    pub const EXPLOSION_DURATION_TICKS: u32 = 60;
    pub const EXPLOSION_GROWTH: f32 = 2.0;

    /// Torpedo defaults
    pub const TORPEDO_CAPACITY: u32 = 10;
    pub const TORPEDO_RELOAD_TICKS: u32 = 180; // 3 seconds at 60 Hz
    pub const TORPEDO_SPEED: f32 = 4.0;
    /// Fraction of the firing ship's velocity inherited by the torpedo
    pub const TORPEDO_MOMENTUM_FACTOR: f32 = 0.5;
    pub const TORPEDO_LIFETIME_TICKS: u32 = 420;
    pub const TORPEDO_DAMAGE: f32 = 300.0;
    /// Hit distance = ship radius + this buffer
    pub const TORPEDO_HIT_BUFFER: f32 = 20.0;

    /// Laser defaults
    pub const LASER_RANGE: f32 = 400.0;
    pub const LASER_DURATION_TICKS: u32 = 30;
    pub const LASER_COOLDOWN_TICKS: u32 = 60;
    pub const LASER_DAMAGE: f32 = 2.0;
    /// Beam alignment tolerance (radians) for a hit
    pub const LASER_ANGLE_TOLERANCE: f32 = 0.1;

    /// Handicap applied to the AI ship at spawn
    pub const AI_ROTATION_FACTOR: f32 = 0.3;
    pub const AI_ACCELERATION_FACTOR: f32 = 0.3;
    pub const AI_MAX_SPEED_FACTOR: f32 = 0.8;
}

/// Normalize an angle to (-π, π]
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let mut a = angle.rem_euclid(TAU);
    if a > PI {
        a -= TAU;
    }
    a
}

/// Normalize a heading to [0, 2π)
#[inline]
pub fn normalize_heading(angle: f32) -> f32 {
    use std::f32::consts::TAU;
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    let h = angle.rem_euclid(TAU);
    if h >= TAU { 0.0 } else { h }
}
