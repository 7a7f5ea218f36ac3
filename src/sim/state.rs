//! Game state and core simulation types
//!
//! `GameState` is the single mutable root. Every entity lives in one of its
//! collections and is addressed by id; nothing points back at the state.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::enemy::Enemy;
use crate::consts::*;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing simulated yet
    Waiting,
    /// Active gameplay
    Playing,
    /// Player health reached zero
    GameOver,
    /// Final wave cleared; can resume into the next wave
    Victory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn as_vec(&self) -> Vec2 {
        match self {
            Facing::Left => Vec2::NEG_X,
            Facing::Right => Vec2::X,
        }
    }
}

/// The hero
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// x scrolls with the world, y is the platform lane
    pub pos: Vec2,
    pub health: f32,
    pub max_health: f32,
    /// Absorbs damage before health
    pub shield: f32,
    /// 1.0 unless a speed boost is running
    pub speed_multiplier: f32,
    pub facing: Facing,
    pub shooting: bool,
    pub dashing: bool,
    pub hurt: bool,
    pub fire_cooldown: f32,
    pub dash_timer: f32,
    pub dash_cooldown: f32,
    pub hurt_timer: f32,
    pub shoot_timer: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(0.0, (PLATFORM_TOP + PLATFORM_BOTTOM) * 0.5),
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            shield: 0.0,
            speed_multiplier: 1.0,
            facing: Facing::Right,
            shooting: false,
            dashing: false,
            hurt: false,
            fire_cooldown: 0.0,
            dash_timer: 0.0,
            dash_cooldown: 0.0,
            hurt_timer: 0.0,
            shoot_timer: 0.0,
        }
    }
}

impl Player {
    /// Add health without exceeding max
    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount.max(0.0)).min(self.max_health);
    }

    /// Add shield without exceeding the cap
    pub fn add_shield(&mut self, amount: f32) {
        self.shield = (self.shield + amount.max(0.0)).min(SHIELD_CAP);
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }
}

/// Projectile weight class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectileTier {
    #[default]
    Normal,
    Mega,
    Ultra,
}

impl ProjectileTier {
    pub fn damage_multiplier(&self) -> f32 {
        match self {
            ProjectileTier::Normal => 1.0,
            ProjectileTier::Mega => 2.0,
            ProjectileTier::Ultra => 3.0,
        }
    }

    pub fn radius(&self) -> f32 {
        match self {
            ProjectileTier::Normal => PROJECTILE_RADIUS,
            ProjectileTier::Mega => PROJECTILE_RADIUS * 1.5,
            ProjectileTier::Ultra => PROJECTILE_RADIUS * 2.0,
        }
    }
}

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileOwner {
    Player,
    Ally,
    Enemy,
}

impl ProjectileOwner {
    pub fn is_friendly(&self) -> bool {
        !matches!(self, ProjectileOwner::Enemy)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: f32,
    pub tier: ProjectileTier,
    pub owner: ProjectileOwner,
    /// Seconds left before it fizzles
    pub ttl: f32,
}

impl Projectile {
    pub fn radius(&self) -> f32 {
        self.tier.radius()
    }
}

/// A particle for visual effects (not gameplay-affecting)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: u32,
    /// 0-1, decreases over time
    pub life: f32,
    pub size: f32,
}

/// Static scenery block; stops projectiles, ignored by enemy movement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Center
    pub pos: Vec2,
    pub size: Vec2,
}

/// Viewer-summoned ally that follows the player and shoots on its own
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportUnit {
    pub id: u32,
    pub pos: Vec2,
    /// Seconds until it leaves
    pub lifetime: f32,
    pub fire_cooldown: f32,
}

/// Countdowns for timed effects. Zero means inactive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timers {
    pub combo: f32,
    pub ultra_mode: f32,
    pub speed_boost: f32,
    pub freeze: f32,
    pub chaos: f32,
}

impl Timers {
    /// Refresh a timer: overlapping applications keep whichever ends later
    pub fn refresh(timer: &mut f32, duration: f32) {
        *timer = timer.max(duration);
    }
}

/// Entity id allocator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityIds {
    next: u32,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl EntityIds {
    pub fn allocate(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

fn fresh_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Simulation RNG (spawner, gift-triggered spawns)
    #[serde(skip, default = "fresh_rng")]
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Never decreases during play
    pub score: u64,
    /// Current wave (1-based, 0 before the first start)
    pub wave: u32,
    /// Clearing this wave wins the run
    pub max_wave: u32,
    /// World x at the center of the view
    pub camera_x: f32,
    /// Consecutive kills inside the combo window
    pub combo: u32,
    pub best_combo: u32,
    pub kills: u32,
    pub timers: Timers,
    pub frozen: bool,
    pub chaos_mode: bool,
    pub ultra_mode: bool,
    pub player: Player,
    /// Sorted by id for deterministic iteration
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub obstacles: Vec<Obstacle>,
    pub allies: Vec<SupportUnit>,
    pub particles: Vec<Particle>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Whether the enemy list was non-empty at the end of the previous tick
    pub enemies_last_tick: bool,
    pub ids: EntityIds,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Waiting,
            score: 0,
            wave: 0,
            max_wave: DEFAULT_MAX_WAVE,
            camera_x: 0.0,
            combo: 0,
            best_combo: 0,
            kills: 0,
            timers: Timers::default(),
            frozen: false,
            chaos_mode: false,
            ultra_mode: false,
            player: Player::default(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            obstacles: Vec::new(),
            allies: Vec::new(),
            particles: Vec::new(),
            time_ticks: 0,
            enemies_last_tick: false,
            ids: EntityIds::default(),
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        self.ids.allocate()
    }

    /// Back to the title screen with a fresh run, keeping the RNG stream going
    pub fn reset(&mut self) {
        let rng = self.rng.clone();
        let max_wave = self.max_wave;
        *self = Self::new(self.seed);
        self.rng = rng;
        self.max_wave = max_wave;
    }

    /// Score/damage multiplier from the current combo
    pub fn multiplier(&self) -> u32 {
        (1 + self.combo / COMBO_STEP).min(MAX_MULTIPLIER)
    }

    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    /// Enemies that are alive and not in their death transition
    pub fn active_enemy_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_active()).count()
    }

    /// Nearest living enemy to a point
    pub fn nearest_enemy(&self, from: Vec2) -> Option<&Enemy> {
        self.enemies
            .iter()
            .filter(|e| e.is_active())
            .min_by(|a, b| {
                a.pos
                    .distance_squared(from)
                    .partial_cmp(&b.pos.distance_squared(from))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    /// Register a kill: combo, multiplier-scaled score, burst
    pub fn record_kill(&mut self, base_score: u64, pos: Vec2, color: u32) {
        let multiplier = self.multiplier() as u64;
        self.add_score(base_score * multiplier);
        self.kills += 1;
        self.combo += 1;
        self.best_combo = self.best_combo.max(self.combo);
        self.timers.combo = COMBO_WINDOW_SECS;
        self.emit_burst(pos, color, 8);
    }

    /// Spray particles from a point. Hash-based so cosmetics never touch the RNG.
    pub fn emit_burst(&mut self, pos: Vec2, color: u32, count: u32) {
        for i in 0..count {
            if self.particles.len() >= MAX_PARTICLES {
                break;
            }
            let hash = (self.time_ticks as u32)
                .wrapping_mul(2654435761)
                .wrapping_add(i.wrapping_mul(7919))
                .wrapping_add(color.wrapping_mul(104729));
            let rand1 = (hash % 1000) as f32 / 1000.0;
            let rand2 = ((hash >> 10) % 1000) as f32 / 1000.0;

            let angle = std::f32::consts::TAU * (i as f32 + rand1) / count as f32;
            let dir = Vec2::new(angle.cos(), angle.sin());
            self.particles.push(Particle {
                pos,
                vel: dir * (80.0 + rand2 * 120.0),
                color,
                life: 1.0,
                size: 3.0 + rand1 * 3.0,
            });
        }
    }

    /// Ensure collections are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
        self.projectiles.sort_by_key(|p| p.id);
        self.obstacles.sort_by_key(|o| o.id);
        self.allies.sort_by_key(|a| a.id);
    }
}
