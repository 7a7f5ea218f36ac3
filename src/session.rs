//! Host-facing game session
//!
//! Joins the gift producers to the simulation. Gifts can arrive at any time
//! and are queued; `update` applies them in arrival order, then advances the
//! simulation in fixed steps. Nothing else writes to the `GameState`.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::connector::{GiftSimulator, LiveConnector};
use crate::consts::*;
use crate::gifts::catalog::{self, ActionConfig, ActionKind, GiftTier};
use crate::gifts::{GiftDispatcher, GiftEvent};
use crate::leaderboard::{Leaderboard, NotificationFeed};
use crate::settings::{Settings, SimulatorIntensity};
use crate::sim::{self, GamePhase, GameState, TickInput};

/// Offsets that split one run seed into independent RNG streams
const GIFT_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;
const SIMULATOR_STREAM: u64 = 0xC2B2_AE3D_27D4_EB4F;
const LIVE_STREAM: u64 = 0x1656_67B1_9E37_79F9;

pub struct Session {
    state: GameState,
    settings: Settings,
    /// Resolves manually triggered gifts; separate from the sim RNG
    gift_rng: Pcg32,
    queue: VecDeque<GiftEvent>,
    dispatcher: GiftDispatcher,
    simulator: Option<GiftSimulator>,
    live: LiveConnector,
    input: TickInput,
    accumulator: f32,
    /// Seconds since the session was created
    clock: f64,
    manual_gifts: u64,
}

impl Session {
    /// `fallback_seed` is used when the settings don't pin one
    pub fn new(settings: Settings, fallback_seed: u64) -> Self {
        let seed = settings.seed_or(fallback_seed);
        let mut state = GameState::new(seed);
        state.max_wave = settings.max_wave;

        let simulator = settings
            .simulator
            .enabled
            .then(|| GiftSimulator::new(settings.simulator.intensity, seed ^ SIMULATOR_STREAM));

        log::info!("Session created (seed {}, max wave {})", seed, settings.max_wave);

        Self {
            state,
            gift_rng: Pcg32::seed_from_u64(seed ^ GIFT_STREAM),
            queue: VecDeque::new(),
            dispatcher: GiftDispatcher::new(settings.notification_limit, settings.notification_secs),
            simulator,
            live: LiveConnector::new(settings.reconnect_max_delay_secs, seed ^ LIVE_STREAM),
            input: TickInput::default(),
            accumulator: 0.0,
            clock: 0.0,
            manual_gifts: 0,
            settings,
        }
    }

    // === Gift intake ===

    /// Queue a gift; it lands on the next `update`
    pub fn on_gift(&mut self, event: GiftEvent) {
        self.queue.push_back(event);
    }

    /// Queue a catalog gift by id, bypassing any network
    ///
    /// Unknown ids fall back to the default gift.
    pub fn trigger_gift(&mut self, gift_id: &str, username: &str) -> GiftEvent {
        let gift = catalog::gift(gift_id).unwrap_or_else(|| {
            log::warn!("Unknown gift `{}`, using {}", gift_id, catalog::default_gift().id);
            catalog::default_gift()
        });
        self.manual_gifts += 1;
        let event = GiftEvent::resolve(
            format!("manual-{}", self.manual_gifts),
            gift,
            username,
            self.clock,
            &mut self.gift_rng,
        );
        self.on_gift(event.clone());
        event
    }

    /// Apply an action by name right away, skipping gift resolution
    ///
    /// Uses the first table entry of that kind. Panics on a name that isn't
    /// an action: callers pass names from `ActionKind::as_str`.
    pub fn apply_named_action(&mut self, name: &str) -> bool {
        let kind: ActionKind = match name.parse() {
            Ok(kind) => kind,
            Err(e) => panic!("{e}"),
        };
        let config = action_for(kind);
        sim::apply_action(&mut self.state, &config)
    }

    /// Frame from the live feed socket
    pub fn on_live_message(&mut self, raw: &str) {
        let now = self.clock;
        for event in self.live.handle_message(raw, now) {
            self.on_gift(event);
        }
    }

    pub fn pending_gifts(&self) -> usize {
        self.queue.len()
    }

    // === Player input ===

    /// Continuous controls for the coming steps (movement, fire, dash)
    pub fn set_input(&mut self, move_dir: glam::Vec2, fire: bool, dash: bool) {
        self.input.move_dir = move_dir;
        self.input.fire = fire;
        self.input.dash = dash;
    }

    pub fn start(&mut self) {
        self.input.start = true;
    }

    pub fn restart(&mut self) {
        self.input.restart = true;
    }

    pub fn next_wave(&mut self) {
        self.input.next_wave = true;
    }

    // === Loop ===

    /// Advance by one host frame
    ///
    /// Non-finite deltas count as a zero-length frame.
    pub fn update(&mut self, frame_dt: f32) {
        let frame_dt = if frame_dt.is_finite() { frame_dt } else { 0.0 };
        let dt = frame_dt.clamp(0.0, MAX_FRAME_DT);
        self.clock += dt as f64;

        if let Some(simulator) = self.simulator.as_mut() {
            self.queue.extend(simulator.advance(dt));
        }

        while let Some(event) = self.queue.pop_front() {
            self.dispatcher.dispatch(&mut self.state, event);
        }
        self.dispatcher.advance(dt);

        self.accumulator += dt;
        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            sim::tick(&mut self.state, &self.input, SIM_DT);
            self.clear_commands();
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        if steps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
    }

    fn clear_commands(&mut self) {
        self.input.start = false;
        self.input.restart = false;
        self.input.next_wave = false;
    }

    /// Run the live feed's reconnect backoff; true when the host should reopen it
    pub fn poll_live(&mut self, dt: f32) -> bool {
        self.live.poll(dt)
    }

    // === Read side ===

    /// Render snapshot
    pub fn snapshot(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.state)
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        self.dispatcher.leaderboard()
    }

    pub fn notifications(&self) -> &NotificationFeed {
        self.dispatcher.notifications()
    }

    pub fn dispatcher(&self) -> &GiftDispatcher {
        &self.dispatcher
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn live(&self) -> &LiveConnector {
        &self.live
    }

    pub fn live_mut(&mut self) -> &mut LiveConnector {
        &mut self.live
    }

    /// Turn the local simulator on at a preset, or off with `None`
    pub fn set_simulator(&mut self, intensity: Option<SimulatorIntensity>) {
        match (intensity, self.simulator.as_mut()) {
            (Some(intensity), Some(simulator)) => simulator.set_intensity(intensity),
            (Some(intensity), None) => {
                let seed = self.state.seed ^ SIMULATOR_STREAM;
                self.simulator = Some(GiftSimulator::new(intensity, seed));
            }
            (None, _) => self.simulator = None,
        }
        self.settings.simulator.enabled = self.simulator.is_some();
        if let Some(intensity) = intensity {
            self.settings.simulator.intensity = intensity;
        }
    }

    pub fn simulator(&self) -> Option<&GiftSimulator> {
        self.simulator.as_ref()
    }
}

/// First table entry for an action kind, searching small to large
fn action_for(kind: ActionKind) -> ActionConfig {
    GiftTier::ALL
        .into_iter()
        .flat_map(|tier| catalog::candidates(tier).iter())
        .find(|config| config.kind == kind)
        .copied()
        .unwrap_or_else(|| panic!("no table entry for action {kind}"))
}
