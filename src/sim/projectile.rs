//! Projectile entities: torpedoes and laser beams
//!
//! Both collections are owned by the simulation driver. Entities refer to
//! their firing ship by `ShipId` (never by pointer) for friendly-fire
//! exclusion and laser re-anchoring.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Arena;

/// Identifies one of the two combatants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShipId {
    Player,
    Hostile,
}

impl ShipId {
    /// The opposing combatant
    pub fn other(self) -> Self {
        match self {
            ShipId::Player => ShipId::Hostile,
            ShipId::Hostile => ShipId::Player,
        }
    }
}

/// A free-flying torpedo
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Torpedo {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining lifetime in ticks
    pub life: u32,
    pub owner: ShipId,
}

impl Torpedo {
    /// Age, advance, and wrap. Returns false when the torpedo has expired.
    pub fn advance(&mut self, arena: &Arena) -> bool {
        if self.life == 0 {
            return false;
        }
        self.life -= 1;
        if self.life == 0 {
            return false;
        }
        self.pos = arena.wrap(self.pos + self.vel);
        true
    }
}

/// An instantaneous directed beam, re-anchored to its source ship each tick
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Laser {
    /// Beam origin (source ship position as of the current tick)
    pub origin: Vec2,
    pub angle: f32,
    /// Remaining duration in ticks
    pub duration: u32,
    pub owner: ShipId,
}

impl Laser {
    /// Age the beam. Returns false when it has expired.
    pub fn age(&mut self) -> bool {
        if self.duration == 0 {
            return false;
        }
        self.duration -= 1;
        self.duration > 0
    }

    /// Follow the source ship (beams emanate from the ship, not a fixed point)
    pub fn anchor_to(&mut self, source_pos: Vec2) {
        self.origin = source_pos;
    }
}
