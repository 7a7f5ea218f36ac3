//! Enemy roster and per-type stat presets
//!
//! Stats are fixed per type; waves only change composition. Bosses are the
//! one exception and escalate through three phases as their health drops.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::ENEMY_DEATH_SECS;

/// Seconds an enemy spends in its spawn-in state
pub const SPAWN_IN_SECS: f32 = 0.4;

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyKind {
    Basic,
    Fast,
    Tank,
    Drone,
    Mech,
    Ninja,
    Boss,
}

/// Static stats for one enemy variant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub health: f32,
    pub speed: f32,
    pub damage: f32,
    pub radius: f32,
    pub score: u64,
    /// Seconds between shots (ranged variants only)
    pub fire_interval: Option<f32>,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 7] = [
        EnemyKind::Basic,
        EnemyKind::Fast,
        EnemyKind::Tank,
        EnemyKind::Drone,
        EnemyKind::Mech,
        EnemyKind::Ninja,
        EnemyKind::Boss,
    ];

    pub fn stats(&self) -> EnemyStats {
        match self {
            EnemyKind::Basic => EnemyStats {
                health: 30.0,
                speed: 60.0,
                damage: 10.0,
                radius: 18.0,
                score: 100,
                fire_interval: None,
            },
            EnemyKind::Fast => EnemyStats {
                health: 15.0,
                speed: 120.0,
                damage: 6.0,
                radius: 14.0,
                score: 150,
                fire_interval: None,
            },
            EnemyKind::Tank => EnemyStats {
                health: 120.0,
                speed: 30.0,
                damage: 25.0,
                radius: 28.0,
                score: 300,
                fire_interval: None,
            },
            EnemyKind::Drone => EnemyStats {
                health: 20.0,
                speed: 80.0,
                damage: 8.0,
                radius: 14.0,
                score: 200,
                fire_interval: Some(2.0),
            },
            EnemyKind::Mech => EnemyStats {
                health: 80.0,
                speed: 40.0,
                damage: 15.0,
                radius: 26.0,
                score: 350,
                fire_interval: Some(1.5),
            },
            EnemyKind::Ninja => EnemyStats {
                health: 25.0,
                speed: 150.0,
                damage: 12.0,
                radius: 16.0,
                score: 250,
                fire_interval: None,
            },
            EnemyKind::Boss => EnemyStats {
                health: 600.0,
                speed: 35.0,
                damage: 35.0,
                radius: 48.0,
                score: 2000,
                fire_interval: Some(1.2),
            },
        }
    }

    /// Color index handed to the renderer for particles
    pub fn color(&self) -> u32 {
        *self as u32
    }
}

/// Stat multiplier for a boss phase (1..=3)
pub fn boss_phase_factor(phase: u8) -> f32 {
    match phase {
        0 | 1 => 1.0,
        2 => 1.3,
        _ => 1.6,
    }
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub radius: f32,
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
    pub damage: f32,
    /// Counts down while the spawn-in animation plays
    pub spawn_timer: f32,
    pub is_spawning: bool,
    /// Set once health hits zero; removed when `death_timer` runs out
    pub is_dying: bool,
    pub death_timer: f32,
    /// Seconds until this enemy may fire again
    pub attack_cooldown: f32,
    /// Boss phase (1..=3), `None` for everything else
    pub boss_phase: Option<u8>,
}

impl Enemy {
    pub fn new(id: u32, kind: EnemyKind, pos: Vec2) -> Self {
        let stats = kind.stats();
        Self {
            id,
            kind,
            pos,
            radius: stats.radius,
            health: stats.health,
            max_health: stats.health,
            speed: stats.speed,
            damage: stats.damage,
            spawn_timer: SPAWN_IN_SECS,
            is_spawning: true,
            is_dying: false,
            death_timer: 0.0,
            attack_cooldown: stats.fire_interval.unwrap_or(0.0),
            boss_phase: (kind == EnemyKind::Boss).then_some(1),
        }
    }

    /// Alive and not yet in its death transition
    pub fn is_active(&self) -> bool {
        !self.is_dying
    }

    /// Apply damage. Returns true if this hit killed the enemy.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if self.is_dying {
            return false;
        }
        self.health = (self.health - amount.max(0.0)).clamp(0.0, self.max_health);
        if self.health <= 0.0 {
            self.start_dying(ENEMY_DEATH_SECS);
            return true;
        }
        false
    }

    /// Enter the death transition (health forced to zero)
    pub fn start_dying(&mut self, linger: f32) {
        self.health = 0.0;
        if !self.is_dying {
            self.is_dying = true;
            self.death_timer = linger;
        }
    }

    /// Seconds between shots, shortened by boss phase
    pub fn fire_interval(&self) -> Option<f32> {
        let base = self.kind.stats().fire_interval?;
        Some(base / boss_phase_factor(self.boss_phase.unwrap_or(1)))
    }

    /// Escalate boss phase from remaining health. Returns the new phase when it changes.
    pub fn update_boss_phase(&mut self) -> Option<u8> {
        let current = self.boss_phase?;
        if self.is_dying {
            return None;
        }
        let ratio = self.health / self.max_health;
        let target = if ratio <= 1.0 / 3.0 {
            3
        } else if ratio <= 2.0 / 3.0 {
            2
        } else {
            1
        };
        // Phases never step back down
        if target <= current {
            return None;
        }
        let stats = self.kind.stats();
        let factor = boss_phase_factor(target);
        self.boss_phase = Some(target);
        self.speed = stats.speed * factor;
        self.damage = stats.damage * factor;
        Some(target)
    }
}
