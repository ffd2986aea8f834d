//! Tactical controller: the hostile ship's decision/control state machine
//!
//! Behavior modes are re-evaluated on a fixed cadence rather than every tick
//! to avoid thrashing; per-tick steering and fire control run every update.
//! All perception (distance, bearing) goes through the toroidal arena
//! primitives, so a target near the opposite edge reads as nearby.
//!
//! The controller mutates only its own ship and its own state. Weapon
//! discharges are returned as an `AiAction`; the driver inserts them into the
//! shared projectile collections.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_6};

use super::geometry::Arena;
use super::projectile::{Laser, Torpedo};
use super::ship::Ship;
use crate::consts::TORPEDO_SPEED;
use crate::{normalize_angle, normalize_heading};

/// Intercept prediction: fixed-point iteration bounds
const MAX_INTERCEPT_ITERATIONS: u32 = 10;
/// Stop when successive time-to-intercept estimates differ by less than this
const INTERCEPT_CONVERGENCE: f32 = 1.0;

/// Behavior modes of the tactical state machine.
///
/// `Flank` and `TurnToPlayer` are structurally supported (reachable via
/// [`TacticalController::set_mode`] and fully behaved) but no transition rule
/// enters them; they are reserved extension points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BehaviorMode {
    Pursue,
    Evade,
    Attack,
    Flank,
    TurnToPlayer,
}

/// Externally visible result of one controller tick. At most one weapon
/// discharge is reported; the driver performs the insertion.
#[derive(Debug, Clone, Copy)]
pub enum AiAction {
    None,
    FireTorpedo(Torpedo),
    FireLaser(Laser),
}

/// Tunable controller parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AiConfig {
    /// Preferred engagement range; also the laser gate range
    pub optimal_distance: f32,
    /// Mode re-evaluation cadence
    pub reevaluate_interval_ms: f64,
    /// How often a new evasion heading is picked while evading
    pub evade_turn_interval_ms: f64,
    /// Shield fraction below which the controller switches to Evade
    pub evade_entry_shield: f32,
    /// Shield fraction above which Evade exits immediately (tick-level)
    pub evade_exit_shield: f32,
    pub torpedo_cooldown_ms: f64,
    /// Assumed projectile speed for intercept prediction
    pub torpedo_speed: f32,
    pub min_fire_distance: f32,
    pub max_fire_distance: f32,
    /// Per-tick chance that an otherwise-valid torpedo shot is attempted
    pub firing_probability: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            optimal_distance: 250.0,
            reevaluate_interval_ms: 2000.0,
            evade_turn_interval_ms: 1000.0,
            evade_entry_shield: 0.3,
            evade_exit_shield: 0.5,
            torpedo_cooldown_ms: 1000.0,
            torpedo_speed: TORPEDO_SPEED,
            min_fire_distance: 100.0,
            max_fire_distance: 400.0,
            firing_probability: 0.1,
        }
    }
}

/// One controller instance per AI ship; lifetime matches the ship's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TacticalController {
    pub config: AiConfig,
    arena: Arena,
    mode: BehaviorMode,
    last_mode_eval_ms: f64,
    last_torpedo_fire_ms: f64,
    last_evade_turn_ms: f64,
    /// Heading the ship steers toward while evading
    evade_heading: f32,
    /// Fallback for numeric-failure recovery during evasion
    last_good_pos: Vec2,
}

impl TacticalController {
    pub fn new(arena: Arena, config: AiConfig, ship_pos: Vec2) -> Self {
        Self {
            config,
            arena,
            mode: BehaviorMode::Pursue,
            // Backdated so every cadence gate is open on the first update
            last_mode_eval_ms: -(config.reevaluate_interval_ms + 1.0),
            last_torpedo_fire_ms: -(config.torpedo_cooldown_ms + 1.0),
            last_evade_turn_ms: -(config.evade_turn_interval_ms + 1.0),
            evade_heading: 0.0,
            last_good_pos: ship_pos,
        }
    }

    pub fn mode(&self) -> BehaviorMode {
        self.mode
    }

    /// Force a mode directly (tests, and the reserved `Flank` /
    /// `TurnToPlayer` extension points)
    pub fn set_mode(&mut self, mode: BehaviorMode) {
        self.mode = mode;
    }

    /// Run one controller tick: mode selection, steering, then fire control.
    ///
    /// `live_torpedoes` is the shared projectile collection, offered for
    /// evasive reasoning; the current transition rules do not consume it
    /// (see the threat-query helpers below).
    pub fn update(
        &mut self,
        ship: &mut Ship,
        target: &Ship,
        _live_torpedoes: &[Torpedo],
        now_ms: f64,
        rng: &mut impl Rng,
    ) -> AiAction {
        if now_ms - self.last_mode_eval_ms > self.config.reevaluate_interval_ms {
            self.evaluate_mode(ship, target);
            self.last_mode_eval_ms = now_ms;
        }

        ship.is_accelerating = false;
        ship.is_decelerating = false;

        match self.mode {
            BehaviorMode::Pursue => self.pursue(ship, target),
            BehaviorMode::Evade => self.evade(ship, now_ms, rng),
            BehaviorMode::Attack => self.attack(ship, target),
            BehaviorMode::Flank => self.flank(ship, target),
            BehaviorMode::TurnToPlayer => self.turn_to_player(ship, target),
        }

        self.check_fire(ship, target, now_ms, rng)
    }

    /// Cadence-gated transition rule, in priority order:
    /// low shields -> Evade, out of range -> Pursue, otherwise Attack.
    fn evaluate_mode(&mut self, ship: &Ship, target: &Ship) {
        let distance = self.arena.distance(ship.pos, target.pos);
        let shield = ship.shield_fraction();

        let next = if shield < self.config.evade_entry_shield {
            BehaviorMode::Evade
        } else if distance > self.config.optimal_distance {
            BehaviorMode::Pursue
        } else {
            BehaviorMode::Attack
        };

        if next != self.mode {
            log::debug!(
                "mode {:?} -> {:?} (distance {:.1}, shield {:.2})",
                self.mode,
                next,
                distance,
                shield
            );
        }
        self.mode = next;
    }

    /// Close on the target: turn toward it, thrust when out of range,
    /// brake once inside it
    fn pursue(&mut self, ship: &mut Ship, target: &Ship) {
        let bearing = self.arena.bearing(ship.pos, target.pos);
        turn_toward(ship, bearing);

        if self.arena.distance(ship.pos, target.pos) > self.config.optimal_distance {
            ship.is_accelerating = true;
        } else {
            ship.is_decelerating = true;
        }
    }

    /// Run at full thrust along a heading that is re-randomized on a fixed
    /// interval, stepping the position forward at max speed
    fn evade(&mut self, ship: &mut Ship, now_ms: f64, rng: &mut impl Rng) {
        ship.is_accelerating = true;

        if now_ms - self.last_evade_turn_ms > self.config.evade_turn_interval_ms {
            let offset = rng.random_range(-FRAC_PI_2..FRAC_PI_2);
            self.evade_heading = normalize_heading(ship.angle + offset);
            self.last_evade_turn_ms = now_ms;
            log::debug!("new evade heading {:.3}", self.evade_heading);
        }

        turn_toward(ship, self.evade_heading);

        // Burst forward along the new heading. The computation can diverge
        // (non-finite angle upstream); never commit a non-finite position.
        let new_pos = ship.pos + Vec2::from_angle(ship.angle) * ship.max_speed;
        if new_pos.is_finite() {
            ship.pos = new_pos;
            self.last_good_pos = self.arena.wrap(new_pos);
        } else {
            log::error!("evasion step produced non-finite position, reverting");
            ship.pos = self.last_good_pos;
        }
        ship.pos = self.arena.wrap(ship.pos);

        // Tick-level exit, independent of the re-evaluation cadence
        if ship.shield_fraction() > self.config.evade_exit_shield {
            log::debug!("shields recovered, leaving Evade");
            self.mode = BehaviorMode::Pursue;
        }
    }

    /// Hold position and keep the nose on the target for aim stability
    fn attack(&mut self, ship: &mut Ship, target: &Ship) {
        let bearing = self.arena.bearing(ship.pos, target.pos);
        turn_toward(ship, bearing);
        ship.is_decelerating = true;
    }

    /// Steer perpendicular to the target bearing, same thrust rule as Pursue
    fn flank(&mut self, ship: &mut Ship, target: &Ship) {
        let bearing = self.arena.bearing(ship.pos, target.pos);
        turn_toward(ship, bearing + FRAC_PI_2);

        if self.arena.distance(ship.pos, target.pos) > self.config.optimal_distance {
            ship.is_accelerating = true;
        } else {
            ship.is_decelerating = true;
        }
    }

    /// Turn toward the target without touching thrust
    fn turn_to_player(&mut self, ship: &mut Ship, target: &Ship) {
        let bearing = self.arena.bearing(ship.pos, target.pos);
        turn_toward(ship, bearing);
    }

    /// Fire control, evaluated after movement. The torpedo gate wins when
    /// both weapons are ready on the same tick.
    fn check_fire(
        &mut self,
        ship: &mut Ship,
        target: &Ship,
        now_ms: f64,
        rng: &mut impl Rng,
    ) -> AiAction {
        let distance = self.arena.distance(ship.pos, target.pos);

        if now_ms - self.last_torpedo_fire_ms > self.config.torpedo_cooldown_ms
            && distance >= self.config.min_fire_distance
            && distance <= self.config.max_fire_distance
            && rng.random::<f32>() < self.config.firing_probability
        {
            let intercept = self.intercept_point(ship, target);
            let firing_angle = self.arena.bearing(ship.pos, intercept);

            if normalize_angle(firing_angle - ship.angle).abs() < FRAC_PI_6 {
                if let Some(torpedo) = ship.fire_torpedo(firing_angle) {
                    log::debug!("torpedo away, intercept at {:?}", intercept);
                    self.last_torpedo_fire_ms = now_ms;
                    return AiAction::FireTorpedo(torpedo);
                }
            }
        }

        if distance < self.config.optimal_distance {
            if let Some(laser) = ship.fire_laser() {
                return AiAction::FireLaser(laser);
            }
        }

        AiAction::None
    }

    /// Predicted target position such that a torpedo's travel time matches
    /// the target's travel time to that position.
    ///
    /// Fixed-point iteration on time-to-intercept: the prediction is a plain
    /// linear extrapolation (deliberately unwrapped), while the travel-time
    /// measurement uses the toroidal metric.
    pub fn intercept_point(&self, ship: &Ship, target: &Ship) -> Vec2 {
        let mut time = self.arena.distance(ship.pos, target.pos) / self.config.torpedo_speed;

        for _ in 0..MAX_INTERCEPT_ITERATIONS {
            let predicted = target.pos + target.vel * time;
            let new_time = self.arena.distance(ship.pos, predicted) / self.config.torpedo_speed;
            if (new_time - time).abs() < INTERCEPT_CONVERGENCE {
                break;
            }
            time = new_time;
        }

        target.pos + target.vel * time
    }

    /// Nearest incoming torpedo, excluding the ship's own shots.
    /// Reserved for evasive extensions; not consumed by the transition rules.
    pub fn nearest_hostile_torpedo<'a>(
        &self,
        ship: &Ship,
        torpedoes: &'a [Torpedo],
    ) -> Option<(&'a Torpedo, f32)> {
        torpedoes
            .iter()
            .filter(|t| t.owner != ship.id)
            .map(|t| (t, self.arena.distance(t.pos, ship.pos)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Heading perpendicular to a threat's flight path.
    /// Companion to [`Self::nearest_hostile_torpedo`].
    pub fn evasion_angle_from(&self, threat: &Torpedo) -> f32 {
        normalize_heading(threat.vel.y.atan2(threat.vel.x) + FRAC_PI_2)
    }
}

/// Shared turn law: step the heading by at most one rotation-speed increment
/// toward the desired angle, along the shorter way around.
pub fn turn_toward(ship: &mut Ship, desired: f32) {
    let diff = normalize_angle(desired - ship.angle);
    let step = diff.signum() * diff.abs().min(ship.rotation_speed);
    ship.angle = normalize_heading(ship.angle + step);
}
