//! Gift dispatch bridge
//!
//! Turns a viewer gift into bookkeeping (notification + leaderboard) and a
//! single call into `sim::apply_action`. The action is resolved when the
//! event is built, with the producer's RNG, and never re-rolled.

use rand::Rng;
use serde::Serialize;

use super::catalog::{self, ActionConfig, Gift};
use crate::leaderboard::{Leaderboard, NotificationFeed};
use crate::sim::{GameState, apply_action};

/// One gift from one viewer, with its action already chosen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GiftEvent {
    pub id: String,
    pub gift: Gift,
    pub username: String,
    /// Seconds since the producer started
    pub timestamp: f64,
    pub action: ActionConfig,
}

impl GiftEvent {
    /// Build an event, rolling the action from the gift's tier
    pub fn resolve<R: Rng + ?Sized>(
        id: String,
        gift: &Gift,
        username: &str,
        timestamp: f64,
        rng: &mut R,
    ) -> Self {
        Self {
            id,
            gift: *gift,
            username: username.to_string(),
            timestamp,
            action: catalog::resolve_action(gift.tier, rng),
        }
    }
}

/// Applies gifts to a run and keeps the display-side tallies
#[derive(Debug, Clone, Default, Serialize)]
pub struct GiftDispatcher {
    leaderboard: Leaderboard,
    feed: NotificationFeed,
    /// Gifts seen, whatever the phase
    received: u64,
    /// Gifts whose action actually changed the run
    applied: u64,
}

impl GiftDispatcher {
    pub fn new(notification_limit: usize, notification_secs: f32) -> Self {
        Self {
            leaderboard: Leaderboard::new(),
            feed: NotificationFeed::new(notification_limit, notification_secs),
            received: 0,
            applied: 0,
        }
    }

    /// Record the gift and apply its action
    ///
    /// Bookkeeping always happens; the action only lands while playing.
    /// Returns whether the action was applied.
    pub fn dispatch(&mut self, state: &mut GameState, event: GiftEvent) -> bool {
        self.received += 1;
        self.leaderboard.record(&event.username, event.gift.diamonds);

        let applied = apply_action(state, &event.action);
        if applied {
            self.applied += 1;
            log::debug!(
                "{} sent {} -> {}",
                event.username,
                event.gift.name,
                event.action.kind
            );
        }
        self.feed.push(event);
        applied
    }

    /// Age notifications
    pub fn advance(&mut self, dt: f32) {
        self.feed.advance(dt);
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn notifications(&self) -> &NotificationFeed {
        &self.feed
    }

    pub fn received(&self) -> u64 {
        self.received
    }

    pub fn applied(&self) -> u64 {
        self.applied
    }
}
