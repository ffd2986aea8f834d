//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies
//!
//! The driver (`tick`) owns both ships and the projectile collections; the
//! tactical controller only reads the target and steers its own ship,
//! reporting weapon discharges as `AiAction` values for the driver to insert.

pub mod ai;
pub mod combat;
pub mod geometry;
pub mod projectile;
pub mod ship;
pub mod state;
pub mod tick;

pub use ai::{AiAction, AiConfig, BehaviorMode, TacticalController};
pub use combat::{laser_hits_ship, torpedo_hits_ship};
pub use geometry::Arena;
pub use projectile::{Laser, ShipId, Torpedo};
pub use ship::Ship;
pub use state::{GamePhase, GameState};
pub use tick::{TickInput, tick};
