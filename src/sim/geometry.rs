//! Toroidal arena geometry
//!
//! The arena is a rectangle with opposite edges identified: exiting right
//! re-enters left. Every distance and bearing query in the AI goes through
//! these primitives so that an entity near one edge correctly perceives an
//! entity near the opposite edge as nearby. Raw Euclidean math here is a
//! correctness bug, not a style choice.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Toroidal playfield dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Signed shortest displacement from `a` to `b` along one axis of length
    /// `size`, choosing the shorter of the direct or wrap-around path.
    pub fn wrapped_delta(a: f32, b: f32, size: f32) -> f32 {
        let mut d = b - a;
        if d > size / 2.0 {
            d -= size;
        } else if d < -size / 2.0 {
            d += size;
        }
        d
    }

    /// Shortest displacement vector from `from` to `to` under wrap-around
    pub fn delta(&self, from: Vec2, to: Vec2) -> Vec2 {
        Vec2::new(
            Self::wrapped_delta(from.x, to.x, self.width),
            Self::wrapped_delta(from.y, to.y, self.height),
        )
    }

    /// Toroidal distance: Euclidean norm of the per-axis wrapped deltas.
    /// Equals plain Euclidean distance when no wrap is shorter.
    pub fn distance(&self, p1: Vec2, p2: Vec2) -> f32 {
        self.delta(p1, p2).length()
    }

    /// Bearing from `from` to `to` under wrap-around, in (-π, π]
    pub fn bearing(&self, from: Vec2, to: Vec2) -> f32 {
        let d = self.delta(from, to);
        d.y.atan2(d.x)
    }

    /// Reduce a position into [0, width) x [0, height)
    pub fn wrap(&self, p: Vec2) -> Vec2 {
        Vec2::new(wrap_axis(p.x, self.width), wrap_axis(p.y, self.height))
    }
}

/// `rem_euclid` can round up to exactly `size` for tiny negative inputs;
/// the wrapped coordinate must stay strictly below `size`
fn wrap_axis(v: f32, size: f32) -> f32 {
    let w = v.rem_euclid(size);
    if w >= size { 0.0 } else { w }
}
