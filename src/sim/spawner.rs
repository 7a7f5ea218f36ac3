//! Wave composition and enemy placement
//!
//! Count grows linearly with the wave; the type mix drifts toward tougher
//! variants. Every fifth wave brings exactly one boss. Given the same RNG
//! seed and wave index the output is identical.

use glam::Vec2;
use rand::Rng;

use super::enemy::{Enemy, EnemyKind};
use super::state::{EntityIds, Obstacle};
use crate::consts::*;

/// Enemies in wave 1
pub const BASE_WAVE_SIZE: u32 = 4;
/// Extra enemies per wave after the first
pub const WAVE_SIZE_STEP: u32 = 2;
/// Waves divisible by this carry a boss
pub const BOSS_WAVE_INTERVAL: u32 = 5;

/// Number of regular (non-boss) enemies in a wave
pub fn wave_size(wave: u32) -> u32 {
    BASE_WAVE_SIZE + WAVE_SIZE_STEP * (wave - 1)
}

pub fn is_boss_wave(wave: u32) -> bool {
    wave.is_multiple_of(BOSS_WAVE_INTERVAL)
}

/// Relative chance of each regular variant for a wave
///
/// Basic falls off, Tank/Mech/Ninja ramp in; Drone and Mech are gated
/// behind early waves so the opening stays readable.
pub fn type_weights(wave: u32) -> [(EnemyKind, f32); 6] {
    let t = (wave - 1) as f32;
    let basic = (0.5 - 0.04 * t).max(0.15);
    let fast = 0.25;
    let tank = (0.05 + 0.03 * t).min(0.25);
    let drone = if wave >= 2 { 0.10 } else { 0.0 };
    let mech = if wave >= 4 { (0.02 * t).min(0.15) } else { 0.0 };
    let ninja = if wave >= 3 { (0.05 + 0.01 * t).min(0.15) } else { 0.0 };
    [
        (EnemyKind::Basic, basic),
        (EnemyKind::Fast, fast),
        (EnemyKind::Tank, tank),
        (EnemyKind::Drone, drone),
        (EnemyKind::Mech, mech),
        (EnemyKind::Ninja, ninja),
    ]
}

/// Pick a regular variant for the wave
pub fn roll_kind<R: Rng + ?Sized>(wave: u32, rng: &mut R) -> EnemyKind {
    let weights = type_weights(wave);
    let total: f32 = weights.iter().map(|(_, w)| w).sum();
    let mut roll = rng.random::<f32>() * total;
    for (kind, weight) in weights {
        if roll < weight {
            return kind;
        }
        roll -= weight;
    }
    EnemyKind::Basic
}

/// A position just outside the visible area on a random edge
///
/// `anchor` is the world-space center of the view.
pub fn edge_position<R: Rng + ?Sized>(anchor: Vec2, rng: &mut R) -> Vec2 {
    let half_w = VIEW_WIDTH * 0.5;
    let left = anchor.x - half_w - SPAWN_MARGIN;
    let right = anchor.x + half_w + SPAWN_MARGIN;
    match rng.random_range(0..4u8) {
        0 => Vec2::new(right, rng.random_range(PLATFORM_TOP..PLATFORM_BOTTOM)),
        1 => Vec2::new(left, rng.random_range(PLATFORM_TOP..PLATFORM_BOTTOM)),
        2 => Vec2::new(
            rng.random_range(anchor.x - half_w..anchor.x + half_w),
            PLATFORM_TOP - SPAWN_MARGIN,
        ),
        _ => Vec2::new(
            rng.random_range(anchor.x - half_w..anchor.x + half_w),
            PLATFORM_BOTTOM + SPAWN_MARGIN,
        ),
    }
}

/// A boss entering from the leading (right) edge
pub fn spawn_boss<R: Rng + ?Sized>(anchor: Vec2, rng: &mut R, ids: &mut EntityIds) -> Enemy {
    let pos = Vec2::new(
        anchor.x + VIEW_WIDTH * 0.5 + SPAWN_MARGIN,
        rng.random_range(PLATFORM_TOP..PLATFORM_BOTTOM),
    );
    Enemy::new(ids.allocate(), EnemyKind::Boss, pos)
}

/// Build the enemy list for a wave
///
/// Panics on wave 0: waves are 1-based and a zero index is a caller bug.
pub fn spawn_wave<R: Rng + ?Sized>(
    wave: u32,
    anchor: Vec2,
    rng: &mut R,
    ids: &mut EntityIds,
) -> Vec<Enemy> {
    assert!(wave >= 1, "waves are 1-based, got wave {wave}");

    let count = wave_size(wave);
    let mut enemies = Vec::with_capacity(count as usize + 1);
    for _ in 0..count {
        let kind = roll_kind(wave, rng);
        let pos = edge_position(anchor, rng);
        enemies.push(Enemy::new(ids.allocate(), kind, pos));
    }
    if is_boss_wave(wave) {
        enemies.push(spawn_boss(anchor, rng, ids));
    }

    log::info!(
        "Wave {}: {} enemies{}",
        wave,
        enemies.len(),
        if is_boss_wave(wave) { " (boss)" } else { "" }
    );
    enemies
}

/// Scatter 0-2 obstacles ahead of the player for a new wave
pub fn spawn_obstacles<R: Rng + ?Sized>(
    anchor: Vec2,
    rng: &mut R,
    ids: &mut EntityIds,
) -> Vec<Obstacle> {
    let count = rng.random_range(0..=2u32);
    (0..count)
        .map(|_| Obstacle {
            id: ids.allocate(),
            pos: Vec2::new(
                rng.random_range(anchor.x + 150.0..anchor.x + VIEW_WIDTH * 0.5),
                rng.random_range(PLATFORM_TOP + 30.0..PLATFORM_BOTTOM - 30.0),
            ),
            size: Vec2::new(40.0, 60.0),
        })
        .collect()
}
