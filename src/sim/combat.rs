//! Combat resolution: projectile/ship collision tests
//!
//! Pure hit predicates; damage application stays with the driver so every
//! mutation of the shared ships happens in one place. Separations are
//! measured toroidally: a projectile crossing the seam still hits the ship
//! it overlaps.

use glam::Vec2;

use crate::consts::*;
use crate::normalize_angle;

use super::geometry::Arena;
use super::projectile::{Laser, Torpedo};
use super::ship::Ship;

/// True when the torpedo overlaps the ship's hit circle.
/// Friendly fire is excluded: a torpedo never hits its owner.
pub fn torpedo_hits_ship(torpedo: &Torpedo, ship: &Ship, arena: &Arena) -> bool {
    if torpedo.owner == ship.id {
        return false;
    }
    arena.distance(torpedo.pos, ship.pos) < ship.radius + TORPEDO_HIT_BUFFER
}

/// True when the laser beam intersects the ship's hull.
///
/// Three-stage test, all in the beam's local (wrap-corrected) frame:
/// the ship must be within beam range, within the angular tolerance of the
/// beam direction, and within hull radius of the closest point on the beam
/// segment.
pub fn laser_hits_ship(laser: &Laser, ship: &Ship, arena: &Arena) -> bool {
    if laser.owner == ship.id {
        return false;
    }

    let to_ship = arena.delta(laser.origin, ship.pos);
    if to_ship.length() > LASER_RANGE {
        return false;
    }

    let bearing = to_ship.y.atan2(to_ship.x);
    if normalize_angle(bearing - laser.angle).abs() >= LASER_ANGLE_TOLERANCE {
        return false;
    }

    let beam_end = Vec2::from_angle(laser.angle) * LASER_RANGE;
    let closest = closest_point_on_segment(Vec2::ZERO, beam_end, to_ship);
    (to_ship - closest).length() <= ship.radius
}

/// Closest point to `p` on the segment from `a` to `b`
fn closest_point_on_segment(a: Vec2, b: Vec2, p: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-6 {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}
