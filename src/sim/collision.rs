//! Collision detection and damage resolution
//!
//! Everything in the arena is a circle except obstacles, which are
//! axis-aligned boxes. Enemy motion is never collision-checked; only
//! contact with the player and projectile hits are.

use glam::Vec2;

use super::state::Player;
use crate::consts::{CONTACT_DISTANCE, HURT_SECS};

/// Circle vs circle (touching edges don't count)
pub fn circle_collision(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    let reach = a_radius + b_radius;
    a_pos.distance_squared(b_pos) < reach * reach
}

/// Circle vs axis-aligned box given by center and full size
pub fn circle_box_overlap(center: Vec2, radius: f32, box_center: Vec2, box_size: Vec2) -> bool {
    let half = box_size * 0.5;
    let closest = center.clamp(box_center - half, box_center + half);
    closest.distance_squared(center) < radius * radius
}

/// Whether an enemy is close enough to land its contact hit
#[inline]
pub fn within_contact(enemy_pos: Vec2, player_pos: Vec2) -> bool {
    enemy_pos.distance(player_pos) < CONTACT_DISTANCE
}

/// How an incoming hit was absorbed
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DamageSplit {
    pub shield_loss: f32,
    pub health_loss: f32,
}

impl DamageSplit {
    /// Shield soaks first, the remainder goes to health
    pub fn compute(shield: f32, health: f32, damage: f32) -> Self {
        let damage = damage.max(0.0);
        let shield_loss = damage.min(shield.max(0.0));
        let health_loss = (damage - shield_loss).min(health.max(0.0));
        Self {
            shield_loss,
            health_loss,
        }
    }

    pub fn total(&self) -> f32 {
        self.shield_loss + self.health_loss
    }
}

/// Damage the player, shield first. Sets the hurt flag if anything landed.
pub fn damage_player(player: &mut Player, damage: f32) -> DamageSplit {
    let split = DamageSplit::compute(player.shield, player.health, damage);
    player.shield -= split.shield_loss;
    player.health -= split.health_loss;
    if split.total() > 0.0 {
        player.hurt = true;
        player.hurt_timer = HURT_SECS;
    }
    split
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_circle_collision_hit_and_miss() {
        assert!(circle_collision(Vec2::new(10.0, 0.0), 6.0, Vec2::ZERO, 6.0));
        assert!(!circle_collision(Vec2::new(12.0, 0.0), 6.0, Vec2::ZERO, 6.0));
        assert!(!circle_collision(Vec2::new(20.0, 0.0), 6.0, Vec2::ZERO, 6.0));
    }

    #[test]
    fn test_circle_collision_coincident() {
        assert!(circle_collision(Vec2::ONE, 1.0, Vec2::ONE, 1.0));
    }

    #[test]
    fn test_circle_box_overlap() {
        let box_center = Vec2::new(100.0, 100.0);
        let size = Vec2::new(40.0, 60.0);
        assert!(circle_box_overlap(Vec2::new(100.0, 100.0), 5.0, box_center, size));
        assert!(circle_box_overlap(Vec2::new(123.0, 100.0), 5.0, box_center, size));
        assert!(!circle_box_overlap(Vec2::new(130.0, 100.0), 5.0, box_center, size));
    }

    #[test]
    fn test_contact_threshold() {
        assert!(within_contact(Vec2::new(39.0, 0.0), Vec2::ZERO));
        assert!(!within_contact(Vec2::new(40.0, 0.0), Vec2::ZERO));
    }

    #[test]
    fn test_shield_absorbs_first() {
        let mut player = Player::default();
        player.shield = 10.0;
        let split = damage_player(&mut player, 15.0);
        assert_eq!(player.shield, 0.0);
        assert_eq!(player.health, 95.0);
        assert_eq!(split, DamageSplit { shield_loss: 10.0, health_loss: 5.0 });
        assert!(player.hurt);
    }

    #[test]
    fn test_zero_damage_does_not_hurt() {
        let mut player = Player::default();
        damage_player(&mut player, 0.0);
        assert!(!player.hurt);
    }

    proptest! {
        #[test]
        fn prop_damage_conservation(shield in 0.0f32..200.0, damage in 0.0f32..300.0) {
            let mut player = Player::default();
            player.shield = shield;
            let before = player.health;
            damage_player(&mut player, damage);

            let expected_shield = (shield - damage).max(0.0);
            prop_assert!((player.shield - expected_shield).abs() < 1e-3);
            let expected_loss = (damage - shield).max(0.0).min(before);
            prop_assert!((before - player.health - expected_loss).abs() < 1e-3);
            prop_assert!((before - player.health) + (shield - player.shield) <= damage + 1e-3);
            prop_assert!(player.health >= 0.0);
        }
    }
}
