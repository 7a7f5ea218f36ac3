//! Gift action effects on the simulation
//!
//! Timed effects never schedule their own reversal. They refresh a countdown
//! in `Timers`, and the tick clears the flag when the countdown runs out.

use glam::Vec2;
use rand::Rng;

use super::enemy::{Enemy, EnemyKind};
use super::spawner;
use super::state::{GamePhase, GameState, SupportUnit, Timers};
use crate::consts::*;
use crate::gifts::catalog::{ActionConfig, ActionKind};

/// Apply an action's effect. Returns false (and changes nothing) outside `Playing`.
pub fn apply_action(state: &mut GameState, action: &ActionConfig) -> bool {
    if state.phase != GamePhase::Playing {
        return false;
    }

    match action.kind {
        ActionKind::Heal => state.player.heal(action.magnitude),
        ActionKind::Shield => state.player.add_shield(action.magnitude),
        ActionKind::SpeedBoost => {
            Timers::refresh(&mut state.timers.speed_boost, action.duration);
            state.player.speed_multiplier = state.player.speed_multiplier.max(action.magnitude);
        }
        ActionKind::FreezeTime => {
            Timers::refresh(&mut state.timers.freeze, action.duration);
            state.frozen = true;
        }
        ActionKind::ChaosMode => {
            Timers::refresh(&mut state.timers.chaos, action.duration);
            state.chaos_mode = true;
        }
        ActionKind::UltraMode => {
            Timers::refresh(&mut state.timers.ultra_mode, action.duration);
            state.ultra_mode = true;
        }
        ActionKind::SpawnEnemies => spawn_enemies(state, action.magnitude.max(0.0) as u32),
        ActionKind::BossSpawn => {
            let anchor = view_anchor(state);
            let boss = spawner::spawn_boss(anchor, &mut state.rng, &mut state.ids);
            state.enemies.push(boss);
        }
        ActionKind::Revive => {
            state.player.health = state.player.max_health;
            state.player.shield = state.player.shield.max(REVIVE_SHIELD_FLOOR);
        }
        ActionKind::Nuke => nuke(state),
        ActionKind::SpawnAlly => spawn_allies(state, action.magnitude.max(1.0) as u32, action.duration),
        ActionKind::BonusPoints => state.add_score(action.magnitude.max(0.0) as u64),
    }

    log::debug!("Applied {} (wave {})", action.kind, state.wave);
    true
}

/// World-space center of the view
pub fn view_anchor(state: &GameState) -> Vec2 {
    Vec2::new(state.camera_x, (PLATFORM_TOP + PLATFORM_BOTTOM) * 0.5)
}

/// Sabotage: a fast/basic split arriving from the edges
fn spawn_enemies(state: &mut GameState, count: u32) {
    let anchor = view_anchor(state);
    for _ in 0..count {
        let kind = if state.rng.random_bool(0.5) {
            EnemyKind::Fast
        } else {
            EnemyKind::Basic
        };
        let pos = spawner::edge_position(anchor, &mut state.rng);
        let id = state.next_entity_id();
        state.enemies.push(Enemy::new(id, kind, pos));
    }
}

/// Wipe every enemy; score is per enemy that was still alive
fn nuke(state: &mut GameState) {
    let cleared: Vec<(Vec2, u32)> = state
        .enemies
        .iter()
        .filter(|e| e.is_active())
        .map(|e| (e.pos, e.kind.color()))
        .collect();
    state.enemies.clear();
    state.add_score(cleared.len() as u64 * NUKE_KILL_SCORE);
    for (pos, color) in cleared {
        state.emit_burst(pos, color, 4);
    }
}

fn spawn_allies(state: &mut GameState, count: u32, lifetime: f32) {
    for _ in 0..count {
        let id = state.next_entity_id();
        let slot = state.allies.len() as f32 + 1.0;
        state.allies.push(SupportUnit {
            id,
            pos: state.player.pos + Vec2::new(-30.0 * slot, ALLY_OFFSET_Y),
            lifetime,
            fire_cooldown: 0.0,
        });
    }
}
