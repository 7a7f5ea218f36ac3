//! Simulation tick
//!
//! One call advances the run by `dt` seconds. Inside `Playing` the order is
//! fixed, because each step reads what the previous one wrote:
//!
//! 1. freeze check
//! 2. health drain
//! 3. movement (player, enemies, allies, projectiles)
//! 4. contact and projectile hits
//! 5. timer decay
//! 6. phase transition check

use glam::Vec2;

use super::actions::view_anchor;
use super::collision::{circle_box_overlap, circle_collision, damage_player, within_contact};
use super::spawner;
use super::state::{
    Facing, GamePhase, GameState, Projectile, ProjectileOwner, ProjectileTier,
};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Desired movement direction (clamped to unit length)
    pub move_dir: Vec2,
    /// Fire at the nearest enemy
    pub fire: bool,
    /// Short burst of speed
    pub dash: bool,
    /// Waiting -> Playing
    pub start: bool,
    /// GameOver/Victory -> Waiting
    pub restart: bool,
    /// Victory -> Playing on the next wave
    pub next_wave: bool,
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    handle_commands(state, input);

    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;

    // 1. Freeze skips all motion and damage; timers still run below.
    let frozen = state.frozen;
    if !frozen {
        // 2. Constant pressure the audience has to heal through
        drain_health(state, dt);

        // 3. Movement
        move_player(state, input, dt);
        if input.fire {
            player_fire(state);
        }
        move_allies(state, dt);
        move_enemies(state, dt);
        enemy_fire(state);
        move_projectiles(state, dt);

        // 4. Contact and hits
        resolve_contacts(state);
        resolve_projectile_hits(state);
        escalate_bosses(state);
    }

    // 5. Timers
    decay_timers(state, dt);
    if !frozen {
        update_particles(state, dt);
    }

    // 6. Phase
    check_phase(state);

    state.normalize_order();
}

/// Phase commands. Anything not on the transition graph is ignored.
fn handle_commands(state: &mut GameState, input: &TickInput) {
    match state.phase {
        GamePhase::Waiting if input.start => start_run(state),
        GamePhase::GameOver | GamePhase::Victory if input.restart => {
            log::info!("Restart (score {})", state.score);
            state.reset();
        }
        GamePhase::Victory if input.next_wave => {
            let next = state.wave + 1;
            begin_wave(state, next);
            state.phase = GamePhase::Playing;
            log::info!("Continuing past victory into wave {}", next);
        }
        _ => {}
    }
}

fn start_run(state: &mut GameState) {
    state.phase = GamePhase::Playing;
    state.camera_x = state.player.pos.x;
    begin_wave(state, 1);
    log::info!("Run started (seed {})", state.seed);
}

/// Spawn a wave's enemies and obstacles
pub fn begin_wave(state: &mut GameState, wave: u32) {
    state.wave = wave;
    let anchor = view_anchor(state);
    let enemies = spawner::spawn_wave(wave, anchor, &mut state.rng, &mut state.ids);
    let obstacles = spawner::spawn_obstacles(anchor, &mut state.rng, &mut state.ids);
    state.enemies.extend(enemies);
    state.obstacles = obstacles;
    state.enemies_last_tick = !state.enemies.is_empty();
}

fn drain_health(state: &mut GameState, dt: f32) {
    let rate = if state.chaos_mode {
        HEALTH_DRAIN_PER_SEC * CHAOS_DRAIN_MULTIPLIER
    } else {
        HEALTH_DRAIN_PER_SEC
    };
    state.player.health = (state.player.health - rate * dt).max(0.0);
}

fn move_player(state: &mut GameState, input: &TickInput, dt: f32) {
    let player = &mut state.player;
    let dir = input.move_dir.clamp_length_max(1.0);

    if input.dash && player.dash_cooldown <= 0.0 && dir != Vec2::ZERO {
        player.dashing = true;
        player.dash_timer = DASH_SECS;
        player.dash_cooldown = DASH_COOLDOWN_SECS;
    }

    let mut speed = PLAYER_SPEED * player.speed_multiplier;
    if player.dashing {
        speed *= DASH_SPEED_MULTIPLIER;
    }
    player.pos += dir * speed * dt;
    player.pos.y = player.pos.y.clamp(PLATFORM_TOP, PLATFORM_BOTTOM);

    if dir.x < 0.0 {
        player.facing = Facing::Left;
    } else if dir.x > 0.0 {
        player.facing = Facing::Right;
    }

    state.camera_x = player.pos.x;
}

fn projectile_tier(state: &GameState) -> ProjectileTier {
    if state.ultra_mode {
        ProjectileTier::Ultra
    } else if state.combo >= MEGA_COMBO_THRESHOLD {
        ProjectileTier::Mega
    } else {
        ProjectileTier::Normal
    }
}

fn player_fire(state: &mut GameState) {
    if state.player.fire_cooldown > 0.0 {
        return;
    }
    let origin = state.player.pos;
    let dir = state
        .nearest_enemy(origin)
        .map(|e| (e.pos - origin).normalize_or_zero())
        .filter(|d| *d != Vec2::ZERO)
        .unwrap_or_else(|| state.player.facing.as_vec());

    let tier = projectile_tier(state);
    let damage = PLAYER_PROJECTILE_DAMAGE * tier.damage_multiplier() * state.multiplier() as f32;
    let id = state.next_entity_id();
    state.projectiles.push(Projectile {
        id,
        pos: origin,
        vel: dir * PROJECTILE_SPEED,
        damage,
        tier,
        owner: ProjectileOwner::Player,
        ttl: PROJECTILE_TTL_SECS,
    });

    let player = &mut state.player;
    player.fire_cooldown = if state.ultra_mode {
        ULTRA_FIRE_COOLDOWN_SECS
    } else {
        FIRE_COOLDOWN_SECS
    };
    player.shooting = true;
    player.shoot_timer = SHOOT_ANIM_SECS;
    if dir.x < 0.0 {
        player.facing = Facing::Left;
    } else if dir.x > 0.0 {
        player.facing = Facing::Right;
    }
}

/// Allies trail the player and take their own shots
fn move_allies(state: &mut GameState, dt: f32) {
    let player_pos = state.player.pos;
    let mut shots = Vec::new();
    for (i, ally) in state.allies.iter_mut().enumerate() {
        let target = player_pos + Vec2::new(-30.0 * (i as f32 + 1.0), ALLY_OFFSET_Y);
        // Ease toward the formation slot
        ally.pos += (target - ally.pos) * (8.0 * dt).min(1.0);
        if ally.fire_cooldown <= 0.0 {
            shots.push(ally.pos);
            ally.fire_cooldown = ALLY_FIRE_COOLDOWN_SECS;
        }
    }

    for origin in shots {
        let Some(target) = state.nearest_enemy(origin).map(|e| e.pos) else {
            continue;
        };
        let dir = (target - origin).normalize_or_zero();
        if dir == Vec2::ZERO {
            continue;
        }
        let id = state.next_entity_id();
        state.projectiles.push(Projectile {
            id,
            pos: origin,
            vel: dir * PROJECTILE_SPEED,
            damage: PLAYER_PROJECTILE_DAMAGE * 0.6,
            tier: ProjectileTier::Normal,
            owner: ProjectileOwner::Ally,
            ttl: PROJECTILE_TTL_SECS,
        });
    }
}

/// Straight line toward the player, no obstacle avoidance
fn move_enemies(state: &mut GameState, dt: f32) {
    let chaos = if state.chaos_mode {
        CHAOS_SPEED_MULTIPLIER
    } else {
        1.0
    };
    let target = state.player.pos;
    for enemy in state.enemies.iter_mut().filter(|e| e.is_active()) {
        let dir = (target - enemy.pos).normalize_or_zero();
        enemy.pos += dir * enemy.speed * chaos * dt;
    }
}

fn enemy_fire(state: &mut GameState) {
    let target = state.player.pos;
    let mut shots = Vec::new();
    for enemy in state.enemies.iter_mut().filter(|e| e.is_active()) {
        let Some(interval) = enemy.fire_interval() else {
            continue;
        };
        // Only shoot once on screen
        if enemy.attack_cooldown > 0.0 || (enemy.pos.x - target.x).abs() > VIEW_WIDTH * 0.5 {
            continue;
        }
        let dir = (target - enemy.pos).normalize_or_zero();
        if dir == Vec2::ZERO {
            continue;
        }
        shots.push((enemy.pos, dir, enemy.damage * 0.5));
        enemy.attack_cooldown = interval;
    }

    for (pos, dir, damage) in shots {
        let id = state.next_entity_id();
        state.projectiles.push(Projectile {
            id,
            pos,
            vel: dir * ENEMY_PROJECTILE_SPEED,
            damage,
            tier: ProjectileTier::Normal,
            owner: ProjectileOwner::Enemy,
            ttl: PROJECTILE_TTL_SECS * 2.0,
        });
    }
}

fn move_projectiles(state: &mut GameState, dt: f32) {
    let camera = view_anchor(state);
    for p in state.projectiles.iter_mut() {
        p.pos += p.vel * dt;
        p.ttl -= dt;
    }

    let obstacles = &state.obstacles;
    state.projectiles.retain(|p| {
        p.ttl > 0.0
            && p.pos.distance(camera) < DESPAWN_DISTANCE
            && !obstacles
                .iter()
                .any(|o| circle_box_overlap(p.pos, p.radius(), o.pos, o.size))
    });
}

/// One-shot contact: the enemy lands its damage and is done
fn resolve_contacts(state: &mut GameState) {
    let player_pos = state.player.pos;
    let mut hits = Vec::new();
    for enemy in state.enemies.iter_mut().filter(|e| e.is_active()) {
        if within_contact(enemy.pos, player_pos) {
            hits.push(enemy.damage);
            enemy.start_dying(ENEMY_DEATH_SECS);
        }
    }
    for damage in hits {
        damage_player(&mut state.player, damage);
    }
}

fn resolve_projectile_hits(state: &mut GameState) {
    let mut spent = Vec::new();
    let mut kills = Vec::new();
    let mut player_damage = Vec::new();

    for p in &state.projectiles {
        if p.owner.is_friendly() {
            let hit = state.enemies.iter_mut().filter(|e| e.is_active()).find(|e| {
                circle_collision(p.pos, p.radius(), e.pos, e.radius)
            });
            if let Some(enemy) = hit {
                spent.push(p.id);
                if enemy.take_damage(p.damage) {
                    kills.push((enemy.kind.stats().score, enemy.pos, enemy.kind.color()));
                }
            }
        } else if circle_collision(p.pos, p.radius(), state.player.pos, PLAYER_RADIUS) {
            spent.push(p.id);
            player_damage.push(p.damage);
        }
    }

    state.projectiles.retain(|p| !spent.contains(&p.id));
    for damage in player_damage {
        damage_player(&mut state.player, damage);
    }
    for (score, pos, color) in kills {
        state.record_kill(score, pos, color);
    }
}

fn escalate_bosses(state: &mut GameState) {
    for enemy in state.enemies.iter_mut() {
        if let Some(phase) = enemy.update_boss_phase() {
            log::info!("Boss {} entered phase {}", enemy.id, phase);
        }
    }
}

/// Count a timer down. Returns true on the tick it runs out.
fn countdown(timer: &mut f32, dt: f32) -> bool {
    if *timer <= 0.0 {
        return false;
    }
    *timer -= dt;
    if *timer <= 0.0 {
        *timer = 0.0;
        return true;
    }
    false
}

fn decay_timers(state: &mut GameState, dt: f32) {
    let timers = &mut state.timers;
    if countdown(&mut timers.combo, dt) {
        state.combo = 0;
    }
    if countdown(&mut timers.speed_boost, dt) {
        state.player.speed_multiplier = 1.0;
    }
    if countdown(&mut timers.freeze, dt) {
        state.frozen = false;
    }
    if countdown(&mut timers.chaos, dt) {
        state.chaos_mode = false;
    }
    if countdown(&mut timers.ultra_mode, dt) {
        state.ultra_mode = false;
    }

    let player = &mut state.player;
    countdown(&mut player.fire_cooldown, dt);
    countdown(&mut player.dash_cooldown, dt);
    if countdown(&mut player.dash_timer, dt) {
        player.dashing = false;
    }
    if countdown(&mut player.hurt_timer, dt) {
        player.hurt = false;
    }
    if countdown(&mut player.shoot_timer, dt) {
        player.shooting = false;
    }

    for enemy in state.enemies.iter_mut() {
        countdown(&mut enemy.attack_cooldown, dt);
        if countdown(&mut enemy.spawn_timer, dt) {
            enemy.is_spawning = false;
        }
        if enemy.is_dying {
            enemy.death_timer -= dt;
        }
    }
    state.enemies.retain(|e| !e.is_dying || e.death_timer > 0.0);

    for ally in state.allies.iter_mut() {
        ally.lifetime -= dt;
        countdown(&mut ally.fire_cooldown, dt);
    }
    state.allies.retain(|a| a.lifetime > 0.0);
}

fn update_particles(state: &mut GameState, dt: f32) {
    for particle in state.particles.iter_mut() {
        particle.pos += particle.vel * dt;
        particle.vel *= 0.96;
        particle.life -= dt * 1.5;
        particle.size *= 0.99;
    }
    state.particles.retain(|p| p.life > 0.0);
}

fn check_phase(state: &mut GameState) {
    if !state.player.is_alive() {
        state.phase = GamePhase::GameOver;
        log::info!("Game over at wave {} (score {})", state.wave, state.score);
        return;
    }

    let has_enemies = !state.enemies.is_empty();
    if !has_enemies && state.enemies_last_tick {
        wave_cleared(state);
    }
    state.enemies_last_tick = !state.enemies.is_empty();
}

fn wave_cleared(state: &mut GameState) {
    let cleared = state.wave;
    state.add_score(WAVE_CLEAR_BONUS * cleared as u64);
    state.projectiles.retain(|p| p.owner.is_friendly());

    if cleared >= state.max_wave {
        state.phase = GamePhase::Victory;
        log::info!("Victory! Wave {} cleared (score {})", cleared, state.score);
    } else {
        log::info!("Wave {} cleared", cleared);
        begin_wave(state, cleared + 1);
    }
}
