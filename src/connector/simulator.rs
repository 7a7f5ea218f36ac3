//! Local gift simulator for demos and offline play

use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::gifts::catalog::{self, GiftTier};
use crate::gifts::GiftEvent;
use crate::settings::SimulatorIntensity;

const USERNAMES: [&str; 12] = [
    "pixel_pete", "neon_nina", "combo_king", "lagless", "rosebud", "gg_gary",
    "tiny_titan", "mooncake", "boss_hunter", "speedrun_sam", "lurker42", "hype_train",
];

/// Emits random gifts on a randomized interval
#[derive(Debug, Clone)]
pub struct GiftSimulator {
    intensity: SimulatorIntensity,
    rng: Pcg32,
    until_next: f32,
    clock: f64,
    emitted: u64,
}

impl GiftSimulator {
    pub fn new(intensity: SimulatorIntensity, seed: u64) -> Self {
        let mut sim = Self {
            intensity,
            rng: Pcg32::seed_from_u64(seed),
            until_next: 0.0,
            clock: 0.0,
            emitted: 0,
        };
        sim.until_next = sim.roll_interval();
        sim
    }

    pub fn intensity(&self) -> SimulatorIntensity {
        self.intensity
    }

    /// Takes effect from the next interval
    pub fn set_intensity(&mut self, intensity: SimulatorIntensity) {
        self.intensity = intensity;
    }

    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Advance the clock; returns gifts that came due, oldest first
    pub fn advance(&mut self, dt: f32) -> Vec<GiftEvent> {
        self.clock += dt as f64;
        self.until_next -= dt;

        let mut events = Vec::new();
        while self.until_next <= 0.0 {
            events.push(self.emit());
            self.until_next += self.roll_interval();
        }
        events
    }

    fn roll_interval(&mut self) -> f32 {
        let (min, max) = self.intensity.interval_range();
        self.rng.random_range(min..max)
    }

    fn roll_tier(&mut self) -> GiftTier {
        let weights = self.intensity.tier_weights();
        let table = [
            (GiftTier::Small, weights[0]),
            (GiftTier::Medium, weights[1]),
            (GiftTier::Large, weights[2]),
        ];
        table
            .choose_weighted(&mut self.rng, |(_, w)| *w)
            .map(|(tier, _)| *tier)
            .unwrap_or(GiftTier::Small)
    }

    fn emit(&mut self) -> GiftEvent {
        let tier = self.roll_tier();
        let pool: Vec<_> = catalog::gifts_in_tier(tier).collect();
        let gift = pool
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(catalog::default_gift());
        let username = USERNAMES.choose(&mut self.rng).copied().unwrap_or("viewer");

        self.emitted += 1;
        let id = format!("sim-{}", self.emitted);
        GiftEvent::resolve(id, gift, username, self.clock, &mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(intensity: SimulatorIntensity, secs: u32, seed: u64) -> Vec<GiftEvent> {
        let mut sim = GiftSimulator::new(intensity, seed);
        (0..secs * 10).flat_map(|_| sim.advance(0.1)).collect()
    }

    #[test]
    fn test_emits_within_interval_bounds() {
        let events = run(SimulatorIntensity::Medium, 60, 3);
        // Medium fires every 1.5-3s
        assert!(events.len() >= 19 && events.len() <= 40, "{} events", events.len());
    }

    #[test]
    fn test_high_is_busier_than_low() {
        let low = run(SimulatorIntensity::Low, 120, 9).len();
        let high = run(SimulatorIntensity::High, 120, 9).len();
        assert!(high > low * 2, "low {low}, high {high}");
    }

    #[test]
    fn test_timestamps_non_decreasing_and_ids_unique() {
        let events = run(SimulatorIntensity::High, 30, 5);
        for pair in events.windows(2) {
            assert!(pair[1].timestamp >= pair[0].timestamp);
            assert_ne!(pair[0].id, pair[1].id);
        }
    }

    #[test]
    fn test_deterministic_for_seed() {
        let a = run(SimulatorIntensity::High, 20, 77);
        let b = run(SimulatorIntensity::High, 20, 77);
        assert_eq!(a, b);
    }

    #[test]
    fn test_large_dt_catches_up() {
        let mut sim = GiftSimulator::new(SimulatorIntensity::High, 1);
        // High fires at most every 1.2s
        assert!(sim.advance(12.0).len() >= 10);
    }
}
