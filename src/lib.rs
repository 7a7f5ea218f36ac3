//! Live Brawl - a side-scrolling arcade brawler steered by stream viewers
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawner, tick, gift effects)
//! - `gifts`: Gift catalog, weighted action table and dispatch bridge
//! - `leaderboard`: Per-viewer contribution tally and notification feed
//! - `connector`: Gift producers (live feed mapping, local simulator)
//! - `session`: Host-facing loop joining gift intake and the simulation
//! - `settings`: Data-driven configuration

pub mod connector;
pub mod gifts;
pub mod leaderboard;
pub mod session;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use leaderboard::{Leaderboard, NotificationFeed};
pub use session::Session;
pub use settings::{Settings, SimulatorIntensity};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the host loop will accept (tab switches, stalls)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Width of the visible play area
    pub const VIEW_WIDTH: f32 = 960.0;
    /// Vertical band the player walks in
    pub const PLATFORM_TOP: f32 = 140.0;
    pub const PLATFORM_BOTTOM: f32 = 500.0;
    /// How far outside the view enemies appear
    pub const SPAWN_MARGIN: f32 = 80.0;
    /// Projectiles further than this from the camera are dropped
    pub const DESPAWN_DISTANCE: f32 = 1400.0;

    /// Player defaults
    pub const PLAYER_MAX_HEALTH: f32 = 100.0;
    pub const PLAYER_RADIUS: f32 = 18.0;
    pub const PLAYER_SPEED: f32 = 220.0;
    pub const SHIELD_CAP: f32 = 100.0;
    /// Shield floor granted by a revive
    pub const REVIVE_SHIELD_FLOOR: f32 = 50.0;

    /// Constant health drain (hp/s) - gifts have to outpace it
    pub const HEALTH_DRAIN_PER_SEC: f32 = 1.0;
    pub const CHAOS_DRAIN_MULTIPLIER: f32 = 2.5;
    pub const CHAOS_SPEED_MULTIPLIER: f32 = 1.6;

    /// Enemy reaches the player inside this distance
    pub const CONTACT_DISTANCE: f32 = 40.0;
    /// Time a dead enemy lingers before removal
    pub const ENEMY_DEATH_SECS: f32 = 0.5;

    /// Dash
    pub const DASH_SPEED_MULTIPLIER: f32 = 3.0;
    pub const DASH_SECS: f32 = 0.2;
    pub const DASH_COOLDOWN_SECS: f32 = 1.0;

    /// Transient animation flags
    pub const HURT_SECS: f32 = 0.3;
    pub const SHOOT_ANIM_SECS: f32 = 0.15;

    /// Player fire
    pub const FIRE_COOLDOWN_SECS: f32 = 0.25;
    pub const ULTRA_FIRE_COOLDOWN_SECS: f32 = 0.08;
    pub const PROJECTILE_SPEED: f32 = 640.0;
    pub const PROJECTILE_RADIUS: f32 = 6.0;
    pub const PROJECTILE_TTL_SECS: f32 = 2.0;
    pub const PLAYER_PROJECTILE_DAMAGE: f32 = 10.0;
    /// Enemy fire
    pub const ENEMY_PROJECTILE_SPEED: f32 = 260.0;

    /// Combo / multiplier
    pub const COMBO_WINDOW_SECS: f32 = 3.0;
    pub const COMBO_STEP: u32 = 5;
    pub const MAX_MULTIPLIER: u32 = 5;
    pub const MEGA_COMBO_THRESHOLD: u32 = 10;

    /// Waves
    pub const DEFAULT_MAX_WAVE: u32 = 10;
    pub const WAVE_CLEAR_BONUS: u64 = 500;
    pub const NUKE_KILL_SCORE: u64 = 50;

    /// Support units
    pub const ALLY_FIRE_COOLDOWN_SECS: f32 = 0.5;
    pub const ALLY_OFFSET_Y: f32 = -48.0;

    /// Cosmetic particles
    pub const MAX_PARTICLES: usize = 256;
}
