//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only (owned by `GameState`)
//! - Stable iteration order (by entity ID)
//! - Timed effects are countdowns in state, never host-scheduled callbacks
//! - No rendering or platform dependencies

pub mod actions;
pub mod collision;
pub mod enemy;
pub mod spawner;
pub mod state;
pub mod tick;

pub use actions::apply_action;
pub use collision::{DamageSplit, circle_collision, damage_player};
pub use enemy::{Enemy, EnemyKind, EnemyStats};
pub use spawner::spawn_wave;
pub use state::{
    EntityIds, Facing, GamePhase, GameState, Obstacle, Particle, Player, Projectile,
    ProjectileOwner, ProjectileTier, SupportUnit, Timers,
};
pub use tick::{TickInput, begin_wave, tick};
