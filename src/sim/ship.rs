//! Ship entity: kinematics, shields, weapons, explosion lifecycle
//!
//! Movement intent is expressed through the `is_accelerating` /
//! `is_decelerating` flags, set by the player input layer or the tactical
//! controller and consumed by `update`. Weapon methods encapsulate their own
//! ammo/cooldown gating and return `None` when the gate rejects; callers
//! treat absence of a projectile as a normal outcome.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Arena;
use super::projectile::{Laser, ShipId, Torpedo};
use crate::consts::*;
use crate::normalize_heading;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub id: ShipId,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Heading in [0, 2π)
    pub angle: f32,
    pub radius: f32,

    // Per-ship tunables (the hostile ship carries a handicap)
    pub rotation_speed: f32,
    pub acceleration: f32,
    pub deceleration: f32,
    pub max_speed: f32,

    pub is_accelerating: bool,
    pub is_decelerating: bool,

    pub shield_strength: f32,
    pub max_shield_strength: f32,
    pub shield_recharge_rate: f32,
    /// Transient visual-feedback value, 1.0 on hit and decaying per tick
    pub shield_impact: f32,

    pub torpedo_count: u32,
    pub torpedo_reload_ticks: u32,
    pub laser_cooldown_ticks: u32,

    pub is_exploding: bool,
    pub explosion_radius: f32,
    pub explosion_ticks_left: u32,
}

impl Ship {
    pub fn new(id: ShipId, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            angle: 0.0,
            radius: SHIP_RADIUS,
            rotation_speed: SHIP_ROTATION_SPEED,
            acceleration: SHIP_ACCELERATION,
            deceleration: SHIP_DECELERATION,
            max_speed: SHIP_MAX_SPEED,
            is_accelerating: false,
            is_decelerating: false,
            shield_strength: SHIELD_MAX,
            max_shield_strength: SHIELD_MAX,
            shield_recharge_rate: SHIELD_RECHARGE_RATE,
            shield_impact: 0.0,
            torpedo_count: TORPEDO_CAPACITY,
            torpedo_reload_ticks: 0,
            laser_cooldown_ticks: 0,
            is_exploding: false,
            explosion_radius: 0.0,
            explosion_ticks_left: 0,
        }
    }

    /// Fraction of shield remaining, in [0, 1]
    pub fn shield_fraction(&self) -> f32 {
        (self.shield_strength / self.max_shield_strength).max(0.0)
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Advance one tick. Returns true exactly when the explosion countdown
    /// expires: the destruction report that ends the match.
    pub fn update(&mut self, arena: &Arena) -> bool {
        if self.is_exploding {
            self.explosion_radius += EXPLOSION_GROWTH;
            // Report destruction only on the tick the countdown hits zero
            if self.explosion_ticks_left > 0 {
                self.explosion_ticks_left -= 1;
                return self.explosion_ticks_left == 0;
            }
            return false;
        }

        if self.is_accelerating {
            self.accelerate();
        }
        if self.is_decelerating {
            self.decelerate();
        }

        self.pos = arena.wrap(self.pos + self.vel);

        self.shield_strength =
            (self.shield_strength + self.shield_recharge_rate).min(self.max_shield_strength);

        if self.shield_impact > 0.0 {
            self.shield_impact = (self.shield_impact - SHIELD_IMPACT_DECAY).max(0.0);
        }
        if self.torpedo_reload_ticks > 0 {
            self.torpedo_reload_ticks -= 1;
        }
        if self.laser_cooldown_ticks > 0 {
            self.laser_cooldown_ticks -= 1;
        }

        false
    }

    /// Add thrust along the heading, clamping speed to `max_speed`
    fn accelerate(&mut self) {
        self.vel += Vec2::from_angle(self.angle) * self.acceleration;
        let speed = self.vel.length();
        if speed > self.max_speed {
            self.vel *= self.max_speed / speed;
        }
    }

    /// Brake along the current velocity direction, snapping to rest when the
    /// remaining speed drops below one deceleration step
    fn decelerate(&mut self) {
        let speed = self.vel.length();
        if speed > 0.0 {
            self.vel -= self.vel / speed * self.deceleration;
            if self.vel.length() < self.deceleration {
                self.vel = Vec2::ZERO;
            }
        }
    }

    /// Turn by one rotation step in the given direction (-1.0 or 1.0)
    pub fn rotate(&mut self, direction: f32) {
        self.angle = normalize_heading(self.angle + self.rotation_speed * direction);
    }

    /// Fire a torpedo along `angle`. `None` when out of ammo or reloading.
    pub fn fire_torpedo(&mut self, angle: f32) -> Option<Torpedo> {
        if self.torpedo_count == 0 || self.torpedo_reload_ticks > 0 {
            return None;
        }
        self.torpedo_count -= 1;
        self.torpedo_reload_ticks = TORPEDO_RELOAD_TICKS;

        let dir = Vec2::from_angle(angle);
        log::debug!("{:?} fired torpedo ({} left)", self.id, self.torpedo_count);
        Some(Torpedo {
            pos: self.pos + dir * self.radius,
            vel: dir * TORPEDO_SPEED + self.vel * TORPEDO_MOMENTUM_FACTOR,
            life: TORPEDO_LIFETIME_TICKS,
            owner: self.id,
        })
    }

    /// Fire the laser along the current heading. `None` while cooling down.
    pub fn fire_laser(&mut self) -> Option<Laser> {
        if self.laser_cooldown_ticks > 0 {
            return None;
        }
        self.laser_cooldown_ticks = LASER_COOLDOWN_TICKS;
        log::debug!("{:?} fired laser", self.id);
        Some(Laser {
            origin: self.pos,
            angle: self.angle,
            duration: LASER_DURATION_TICKS,
            owner: self.id,
        })
    }

    /// Apply damage. Returns true when this hit starts the explosion.
    pub fn handle_collision(&mut self, damage: f32) -> bool {
        self.shield_strength -= damage;
        self.shield_impact = 1.0;

        if self.shield_strength <= 0.0 {
            self.shield_strength = 0.0;
            self.is_exploding = true;
            self.explosion_radius = 0.0;
            self.explosion_ticks_left = EXPLOSION_DURATION_TICKS;
            log::info!("{:?} shields down, exploding", self.id);
            return true;
        }
        false
    }

    /// Restore the ship for a fresh match
    pub fn reset(&mut self, pos: Vec2) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
        self.angle = 0.0;
        self.is_accelerating = false;
        self.is_decelerating = false;
        self.is_exploding = false;
        self.explosion_radius = 0.0;
        self.explosion_ticks_left = 0;
        self.shield_strength = self.max_shield_strength;
        self.shield_impact = 0.0;
        self.torpedo_count = TORPEDO_CAPACITY;
        self.torpedo_reload_ticks = 0;
        self.laser_cooldown_ticks = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena() -> Arena {
        Arena::new(ARENA_WIDTH, ARENA_HEIGHT)
    }

    fn ship() -> Ship {
        Ship::new(ShipId::Player, Vec2::new(200.0, 300.0))
    }

    #[test]
    fn test_acceleration_clamps_to_max_speed() {
        let mut s = ship();
        s.is_accelerating = true;
        for _ in 0..200 {
            s.update(&arena());
            assert!(s.speed() <= s.max_speed + 1e-4);
        }
        assert!((s.speed() - s.max_speed).abs() < 1e-3);
    }

    #[test]
    fn test_deceleration_snaps_to_zero() {
        let mut s = ship();
        s.vel = Vec2::new(0.3, 0.0);
        s.is_decelerating = true;
        s.update(&arena());
        s.update(&arena());
        assert_eq!(s.vel, Vec2::ZERO);
    }

    #[test]
    fn test_shield_regenerates_to_max() {
        let mut s = ship();
        s.shield_strength = SHIELD_MAX - 0.1;
        s.update(&arena());
        assert_eq!(s.shield_strength, SHIELD_MAX);
    }

    #[test]
    fn test_fire_torpedo_gates() {
        let mut s = ship();
        let t = s.fire_torpedo(0.0).expect("first shot should fire");
        assert_eq!(t.owner, ShipId::Player);
        // Reloading
        assert!(s.fire_torpedo(0.0).is_none());
        // Out of ammo
        s.torpedo_reload_ticks = 0;
        s.torpedo_count = 0;
        assert!(s.fire_torpedo(0.0).is_none());
    }

    #[test]
    fn test_torpedo_inherits_half_ship_velocity() {
        let mut s = ship();
        s.vel = Vec2::new(2.0, 0.0);
        let t = s.fire_torpedo(0.0).unwrap();
        assert!((t.vel.x - (TORPEDO_SPEED + 1.0)).abs() < 1e-5);
        // Spawned at the nose
        assert_eq!(t.pos, s.pos + Vec2::new(s.radius, 0.0));
    }

    #[test]
    fn test_fire_laser_cooldown_gate() {
        let mut s = ship();
        assert!(s.fire_laser().is_some());
        assert!(s.fire_laser().is_none());
        for _ in 0..LASER_COOLDOWN_TICKS {
            s.laser_cooldown_ticks = s.laser_cooldown_ticks.saturating_sub(1);
        }
        assert!(s.fire_laser().is_some());
    }

    #[test]
    fn test_collision_starts_explosion_once() {
        let mut s = ship();
        assert!(!s.handle_collision(599.0));
        assert!(s.shield_strength > 0.0);
        assert!(s.handle_collision(1.0));
        assert!(s.is_exploding);
    }

    #[test]
    fn test_destruction_reported_exactly_once() {
        let mut s = ship();
        s.handle_collision(SHIELD_MAX);
        let mut reports = 0;
        for _ in 0..EXPLOSION_DURATION_TICKS + 10 {
            if s.update(&arena()) {
                reports += 1;
            }
        }
        assert_eq!(reports, 1);
        assert!(s.explosion_radius > 0.0);
    }

    #[test]
    fn test_position_wraps() {
        let mut s = ship();
        s.pos = Vec2::new(799.0, 300.0);
        s.vel = Vec2::new(3.0, 0.0);
        s.update(&arena());
        assert_eq!(s.pos, Vec2::new(2.0, 300.0));
    }

    #[test]
    fn test_reset_restores_combat_state() {
        let mut s = ship();
        s.handle_collision(SHIELD_MAX);
        s.torpedo_count = 0;
        s.reset(Vec2::new(100.0, 100.0));
        assert!(!s.is_exploding);
        assert_eq!(s.shield_strength, SHIELD_MAX);
        assert_eq!(s.torpedo_count, TORPEDO_CAPACITY);
    }
}
