//! Viewer leaderboard and on-screen gift notifications
//!
//! Display-only bookkeeping; nothing here feeds back into the simulation.

use std::collections::VecDeque;

use serde::Serialize;

use crate::gifts::GiftEvent;

/// Default number of notifications kept on screen
pub const DEFAULT_NOTIFICATION_LIMIT: usize = 6;
/// Default seconds a notification stays visible
pub const DEFAULT_NOTIFICATION_SECS: f32 = 4.0;

/// One viewer's running contribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Gifter {
    pub username: String,
    /// Cumulative diamonds sent
    pub diamonds: u64,
    pub gift_count: u32,
}

/// Gifters sorted by total diamonds, highest first
#[derive(Debug, Clone, Default, Serialize)]
pub struct Leaderboard {
    pub gifters: Vec<Gifter>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self {
            gifters: Vec::new(),
        }
    }

    /// Add a gift to a viewer's total (creating the entry on first gift)
    /// Returns the viewer's rank afterwards (1-indexed)
    pub fn record(&mut self, username: &str, diamonds: u32) -> usize {
        match self.gifters.iter_mut().find(|g| g.username == username) {
            Some(gifter) => {
                gifter.diamonds += diamonds as u64;
                gifter.gift_count += 1;
            }
            None => self.gifters.push(Gifter {
                username: username.to_string(),
                diamonds: diamonds as u64,
                gift_count: 1,
            }),
        }

        // Stable sort: ties keep whoever got there first
        self.gifters.sort_by(|a, b| b.diamonds.cmp(&a.diamonds));
        self.rank(username).unwrap_or(self.gifters.len())
    }

    /// Rank of a viewer (1-indexed)
    pub fn rank(&self, username: &str) -> Option<usize> {
        self.gifters
            .iter()
            .position(|g| g.username == username)
            .map(|i| i + 1)
    }

    pub fn get(&self, username: &str) -> Option<&Gifter> {
        self.gifters.iter().find(|g| g.username == username)
    }

    pub fn top(&self, n: usize) -> &[Gifter] {
        &self.gifters[..n.min(self.gifters.len())]
    }

    pub fn len(&self) -> usize {
        self.gifters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gifters.is_empty()
    }

    pub fn total_diamonds(&self) -> u64 {
        self.gifters.iter().map(|g| g.diamonds).sum()
    }
}

/// A gift currently shown on screen
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub event: GiftEvent,
    /// Seconds until it disappears
    pub remaining: f32,
}

/// Bounded recency list of recent gifts; oldest evicted first
#[derive(Debug, Clone, Serialize)]
pub struct NotificationFeed {
    entries: VecDeque<Notification>,
    limit: usize,
    display_secs: f32,
}

impl Default for NotificationFeed {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_LIMIT, DEFAULT_NOTIFICATION_SECS)
    }
}

impl NotificationFeed {
    pub fn new(limit: usize, display_secs: f32) -> Self {
        Self {
            entries: VecDeque::with_capacity(limit),
            limit: limit.max(1),
            display_secs,
        }
    }

    pub fn push(&mut self, event: GiftEvent) {
        while self.entries.len() >= self.limit {
            self.entries.pop_front();
        }
        self.entries.push_back(Notification {
            event,
            remaining: self.display_secs,
        });
    }

    /// Age every entry and drop the expired ones
    pub fn advance(&mut self, dt: f32) {
        for entry in self.entries.iter_mut() {
            entry.remaining -= dt;
        }
        self.entries.retain(|n| n.remaining > 0.0);
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gifts::catalog;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn event(n: u32) -> GiftEvent {
        let mut rng = Pcg32::seed_from_u64(n as u64);
        GiftEvent::resolve(
            format!("test-{n}"),
            catalog::default_gift(),
            &format!("viewer{n}"),
            n as f64,
            &mut rng,
        )
    }

    #[test]
    fn test_record_upserts_and_sorts() {
        let mut board = Leaderboard::new();
        assert_eq!(board.record("alice", 5), 1);
        assert_eq!(board.record("bob", 30), 1);
        assert_eq!(board.rank("alice"), Some(2));

        assert_eq!(board.record("alice", 100), 1);
        let alice = board.get("alice").unwrap();
        assert_eq!(alice.diamonds, 105);
        assert_eq!(alice.gift_count, 2);
        assert_eq!(board.len(), 2);
        assert_eq!(board.total_diamonds(), 135);
    }

    #[test]
    fn test_sorted_descending() {
        let mut board = Leaderboard::new();
        for (name, d) in [("a", 3), ("b", 50), ("c", 7), ("a", 60), ("d", 1)] {
            board.record(name, d);
        }
        let totals: Vec<u64> = board.gifters.iter().map(|g| g.diamonds).collect();
        let mut sorted = totals.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(totals, sorted);
        assert_eq!(board.top(2)[0].username, "a");
        assert_eq!(board.top(10).len(), 4);
    }

    #[test]
    fn test_ties_keep_first_arrival() {
        let mut board = Leaderboard::new();
        board.record("first", 10);
        board.record("second", 10);
        assert_eq!(board.rank("first"), Some(1));
    }

    #[test]
    fn test_feed_evicts_oldest() {
        let mut feed = NotificationFeed::new(3, 4.0);
        for n in 0..5 {
            feed.push(event(n));
        }
        assert_eq!(feed.len(), 3);
        let users: Vec<_> = feed.iter().map(|n| n.event.username.as_str()).collect();
        assert_eq!(users, ["viewer2", "viewer3", "viewer4"]);
    }

    #[test]
    fn test_feed_entries_expire() {
        let mut feed = NotificationFeed::new(5, 1.0);
        feed.push(event(1));
        feed.advance(0.6);
        feed.push(event(2));
        feed.advance(0.6);
        assert_eq!(feed.len(), 1);
        assert_eq!(feed.iter().next().unwrap().event.username, "viewer2");
        feed.advance(0.5);
        assert!(feed.is_empty());
    }
}
