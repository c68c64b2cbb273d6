//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod pool;
pub mod snapshot;
pub mod state;
pub mod targeting;
pub mod tick;

pub use pool::{EntityId, EntityKind, EntityPool};
pub use snapshot::{BulletView, ExplosionView, SceneKind, ShipView, Snapshot, WordView};
pub use state::{Bullet, Explosion, GameEvent, Outcome, PlayState, Ship, Word};
pub use targeting::{KeystrokeResult, TargetingResolver};
pub use tick::{PlayUpdate, TickInput, update_play};
