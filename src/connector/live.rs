//! Live stream gift feed
//!
//! The host page owns the socket and hands us raw frames. This side maps
//! the platform's gift payloads onto the catalog and keeps the reconnect
//! schedule. A dead feed never touches the simulation.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gifts::GiftEvent;
use crate::gifts::catalog::{self, Gift};

/// First reconnect delay in seconds; doubles per failed attempt
pub const BASE_RECONNECT_DELAY_SECS: f32 = 1.0;
/// Most events one finished streak can expand into
pub const MAX_STREAK_EVENTS: u32 = 10;
/// `giftType` of gifts sent as combo streaks
const STREAKABLE_GIFT_TYPE: u8 = 1;

#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("malformed gift payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("gift payload has no sender")]
    MissingSender,
}

/// One `gift` frame as sent by the live connector bridge
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GiftPayload {
    pub msg_id: Option<String>,
    pub gift_id: Option<u32>,
    pub gift_name: Option<String>,
    pub unique_id: Option<String>,
    pub diamond_count: Option<u32>,
    pub gift_type: u8,
    pub repeat_end: bool,
    pub repeat_count: Option<u32>,
}

impl GiftPayload {
    /// A streak frame that will be followed by more
    pub fn is_streak_in_progress(&self) -> bool {
        self.gift_type == STREAKABLE_GIFT_TYPE && !self.repeat_end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
    /// Waiting out a backoff delay before the next attempt
    Reconnecting,
}

/// Map a payload onto the catalog: provider id, then name, then the default
pub fn map_gift(payload: &GiftPayload) -> &'static Gift {
    if let Some(gift) = payload.gift_id.and_then(catalog::gift_by_provider_id) {
        return gift;
    }
    if let Some(gift) = payload.gift_name.as_deref().and_then(catalog::gift_by_name) {
        return gift;
    }
    log::warn!(
        "Unknown gift (id {:?}, name {:?}), using {}",
        payload.gift_id,
        payload.gift_name,
        catalog::default_gift().name
    );
    catalog::default_gift()
}

/// Delay before reconnect attempt `attempt` (1-based)
pub fn backoff_delay(attempt: u32, max_delay: f32) -> f32 {
    let exp = attempt.saturating_sub(1).min(16) as i32;
    (BASE_RECONNECT_DELAY_SECS * 2f32.powi(exp)).min(max_delay)
}

/// Payload mapping and connection bookkeeping for one live feed
#[derive(Debug, Clone)]
pub struct LiveConnector {
    status: ConnectionStatus,
    attempts: u32,
    retry_in: f32,
    max_delay: f32,
    rng: Pcg32,
    received: u64,
}

impl LiveConnector {
    pub fn new(max_delay: f32, seed: u64) -> Self {
        Self {
            status: ConnectionStatus::Disconnected,
            attempts: 0,
            retry_in: 0.0,
            max_delay: max_delay.max(BASE_RECONNECT_DELAY_SECS),
            rng: Pcg32::seed_from_u64(seed),
            received: 0,
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Host started opening the socket
    pub fn connecting(&mut self) {
        self.status = ConnectionStatus::Connecting;
    }

    pub fn on_open(&mut self) {
        log::info!("Live feed connected");
        self.status = ConnectionStatus::Connected;
        self.attempts = 0;
    }

    /// Socket closed or failed: schedule the next attempt
    pub fn on_close(&mut self) {
        self.attempts += 1;
        self.retry_in = backoff_delay(self.attempts, self.max_delay);
        self.status = ConnectionStatus::Reconnecting;
        log::warn!(
            "Live feed lost, retrying in {:.0}s (attempt {})",
            self.retry_in,
            self.attempts
        );
    }

    /// User asked to stop; no reconnects
    pub fn disconnect(&mut self) {
        self.status = ConnectionStatus::Disconnected;
        self.attempts = 0;
        self.retry_in = 0.0;
    }

    /// Count down the backoff. Returns true when the host should reconnect now.
    pub fn poll(&mut self, dt: f32) -> bool {
        if self.status != ConnectionStatus::Reconnecting {
            return false;
        }
        self.retry_in -= dt;
        if self.retry_in <= 0.0 {
            self.retry_in = 0.0;
            self.status = ConnectionStatus::Connecting;
            return true;
        }
        false
    }

    /// Parse one frame into events
    ///
    /// In-progress streak frames yield nothing; the closing frame yields one
    /// event per repeat, capped at `MAX_STREAK_EVENTS`.
    pub fn on_message(&mut self, raw: &str, now: f64) -> Result<Vec<GiftEvent>, ConnectorError> {
        let payload: GiftPayload = serde_json::from_str(raw)?;
        let username = payload
            .unique_id
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(ConnectorError::MissingSender)?
            .to_string();

        if payload.is_streak_in_progress() {
            return Ok(Vec::new());
        }

        let gift = map_gift(&payload);
        let repeats = payload.repeat_count.unwrap_or(1).clamp(1, MAX_STREAK_EVENTS);
        let base_id = payload
            .msg_id
            .clone()
            .unwrap_or_else(|| format!("live-{}", self.received));
        self.received += 1;

        Ok((0..repeats)
            .map(|n| {
                let id = if repeats == 1 {
                    base_id.clone()
                } else {
                    format!("{base_id}#{n}")
                };
                GiftEvent::resolve(id, gift, &username, now, &mut self.rng)
            })
            .collect())
    }

    /// `on_message`, dropping bad frames with a warning
    pub fn handle_message(&mut self, raw: &str, now: f64) -> Vec<GiftEvent> {
        match self.on_message(raw, now) {
            Ok(events) => events,
            Err(e) => {
                log::warn!("Dropping live frame: {}", e);
                Vec::new()
            }
        }
    }
}
