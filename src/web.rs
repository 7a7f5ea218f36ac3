//! Browser bindings
//!
//! The host page owns the canvas, the animation frame loop and the live feed
//! socket; it drives a `WebGame` and renders from `snapshot_json`.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::session::Session;
use crate::settings::{Settings, SimulatorIntensity};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Live Brawl starting...");
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
pub struct WebGame {
    session: Session,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebGame {
        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        WebGame {
            session: Session::new(settings, seed),
        }
    }

    /// Advance by one animation frame (seconds)
    pub fn update(&mut self, dt: f32) {
        self.session.update(dt);
    }

    pub fn set_input(&mut self, x: f32, y: f32, fire: bool, dash: bool) {
        self.session.set_input(Vec2::new(x, y), fire, dash);
    }

    pub fn start(&mut self) {
        self.session.start();
    }

    pub fn restart(&mut self) {
        self.session.restart();
    }

    pub fn next_wave(&mut self) {
        self.session.next_wave();
    }

    /// Manual gift button; returns the queued event as JSON
    pub fn trigger_gift(&mut self, gift_id: &str, username: &str) -> Result<String, JsValue> {
        let event = self.session.trigger_gift(gift_id, username);
        serde_json::to_string(&event).map_err(to_js)
    }

    // === Live feed socket events ===

    pub fn live_connecting(&mut self) {
        self.session.live_mut().connecting();
    }

    pub fn live_opened(&mut self) {
        self.session.live_mut().on_open();
    }

    pub fn live_closed(&mut self) {
        self.session.live_mut().on_close();
    }

    pub fn live_disconnect(&mut self) {
        self.session.live_mut().disconnect();
    }

    pub fn live_message(&mut self, raw: &str) {
        self.session.on_live_message(raw);
    }

    /// True when the page should reopen the socket
    pub fn poll_live(&mut self, dt: f32) -> bool {
        self.session.poll_live(dt)
    }

    /// "off" or an intensity preset name
    pub fn set_simulator(&mut self, preset: &str) {
        let intensity = SimulatorIntensity::from_str(preset);
        if intensity.is_none() && preset != "off" {
            log::warn!("Unknown simulator preset `{}`, turning it off", preset);
        }
        self.session.set_simulator(intensity);
        if let Err(e) = self.session.settings().save() {
            log::warn!("Settings not saved: {}", e);
        }
    }

    // === Render side ===

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        self.session.snapshot_json().map_err(to_js)
    }

    pub fn leaderboard_json(&self, top: usize) -> Result<String, JsValue> {
        serde_json::to_string(self.session.leaderboard().top(top)).map_err(to_js)
    }

    pub fn notifications_json(&self) -> Result<String, JsValue> {
        let entries: Vec<_> = self.session.notifications().iter().collect();
        serde_json::to_string(&entries).map_err(to_js)
    }
}

impl Default for WebGame {
    fn default() -> Self {
        Self::new()
    }
}
