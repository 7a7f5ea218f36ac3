//! Session settings
//!
//! Persisted in LocalStorage on the web, in `live-brawl.json` natively.
//! Anything unreadable falls back to defaults; settings never block a run.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::DEFAULT_MAX_WAVE;
use crate::leaderboard::{DEFAULT_NOTIFICATION_LIMIT, DEFAULT_NOTIFICATION_SECS};

/// How busy the local gift simulator is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SimulatorIntensity {
    Low,
    #[default]
    Medium,
    High,
}

impl SimulatorIntensity {
    pub fn as_str(&self) -> &'static str {
        match self {
            SimulatorIntensity::Low => "Low",
            SimulatorIntensity::Medium => "Medium",
            SimulatorIntensity::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(SimulatorIntensity::Low),
            "medium" | "med" => Some(SimulatorIntensity::Medium),
            "high" => Some(SimulatorIntensity::High),
            _ => None,
        }
    }

    /// Seconds between simulated gifts (min, max)
    pub fn interval_range(&self) -> (f32, f32) {
        match self {
            SimulatorIntensity::Low => (3.0, 6.0),
            SimulatorIntensity::Medium => (1.5, 3.0),
            SimulatorIntensity::High => (0.4, 1.2),
        }
    }

    /// Relative odds of a small, medium, large gift
    pub fn tier_weights(&self) -> [u32; 3] {
        match self {
            SimulatorIntensity::Low => [85, 13, 2],
            SimulatorIntensity::Medium => [70, 24, 6],
            SimulatorIntensity::High => [55, 33, 12],
        }
    }
}

/// Local simulator toggle and preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorSettings {
    pub enabled: bool,
    pub intensity: SimulatorIntensity,
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            intensity: SimulatorIntensity::Medium,
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings are not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("settings file unreadable: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage unavailable")]
    StorageUnavailable,
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Last scripted wave; clearing it shows victory
    pub max_wave: u32,
    /// Fixed seed for reproducible runs (clock-derived when absent)
    pub seed: Option<u64>,
    pub simulator: SimulatorSettings,

    // === Notifications ===
    /// Gifts kept on screen at once
    pub notification_limit: usize,
    /// Seconds each gift stays on screen
    pub notification_secs: f32,

    // === Live feed ===
    /// Upper bound on reconnect backoff
    pub reconnect_max_delay_secs: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_wave: DEFAULT_MAX_WAVE,
            seed: None,
            simulator: SimulatorSettings::default(),
            notification_limit: DEFAULT_NOTIFICATION_LIMIT,
            notification_secs: DEFAULT_NOTIFICATION_SECS,
            reconnect_max_delay_secs: 30.0,
        }
    }
}

impl Settings {
    /// Parse and sanitize; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Pull out-of-range values back to something playable
    pub fn sanitize(&mut self) {
        self.max_wave = self.max_wave.max(1);
        self.notification_limit = self.notification_limit.max(1);
        if self.notification_secs.is_nan() || self.notification_secs <= 0.0 {
            self.notification_secs = DEFAULT_NOTIFICATION_SECS;
        }
        if self.reconnect_max_delay_secs.is_nan() || self.reconnect_max_delay_secs < 1.0 {
            self.reconnect_max_delay_secs = 1.0;
        }
    }

    /// The seed to run with: the configured one or the given fallback
    pub fn seed_or(&self, fallback: u64) -> u64 {
        self.seed.unwrap_or(fallback)
    }

    /// Load, falling back to defaults on any failure
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring saved settings: {}", e);
                Self::default()
            }
        }
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "live_brawl_settings";

    #[cfg(target_arch = "wasm32")]
    fn storage() -> Result<web_sys::Storage, SettingsError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(SettingsError::StorageUnavailable)
    }

    #[cfg(target_arch = "wasm32")]
    fn try_load() -> Result<Option<Self>, SettingsError> {
        match Self::storage()?.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => Self::from_json(&json).map(Some),
            Ok(None) => Ok(None),
            Err(_) => Err(SettingsError::StorageUnavailable),
        }
    }

    /// Save settings to LocalStorage
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<(), SettingsError> {
        let json = self.to_json()?;
        Self::storage()?
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|_| SettingsError::StorageUnavailable)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Settings file in the working directory
    #[cfg(not(target_arch = "wasm32"))]
    pub const FILE_NAME: &'static str = "live-brawl.json";

    #[cfg(not(target_arch = "wasm32"))]
    fn try_load() -> Result<Option<Self>, SettingsError> {
        Self::load_from(std::path::Path::new(Self::FILE_NAME))
    }

    /// Read a settings file; `Ok(None)` if it does not exist
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Result<Option<Self>, SettingsError> {
        match std::fs::read_to_string(path) {
            Ok(json) => Self::from_json(&json).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) -> Result<(), SettingsError> {
        self.save_to(std::path::Path::new(Self::FILE_NAME))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.max_wave, 10);
        assert_eq!(settings.notification_limit, 6);
        assert!(settings.simulator.enabled);
        assert_eq!(settings.simulator.intensity, SimulatorIntensity::Medium);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{"max_wave": 3, "simulator": {"intensity": "High"}}"#)
            .unwrap();
        assert_eq!(settings.max_wave, 3);
        assert_eq!(settings.simulator.intensity, SimulatorIntensity::High);
        assert!(settings.simulator.enabled);
        assert_eq!(settings.reconnect_max_delay_secs, 30.0);
    }

    #[test]
    fn test_sanitize() {
        let settings = Settings::from_json(
            r#"{"max_wave": 0, "notification_limit": 0, "notification_secs": -2.0}"#,
        )
        .unwrap();
        assert_eq!(settings.max_wave, 1);
        assert_eq!(settings.notification_limit, 1);
        assert_eq!(settings.notification_secs, DEFAULT_NOTIFICATION_SECS);
    }

    #[test]
    fn test_sanitize_nan() {
        let mut settings = Settings {
            notification_secs: f32::NAN,
            reconnect_max_delay_secs: f32::NAN,
            ..Settings::default()
        };
        settings.sanitize();
        assert_eq!(settings.notification_secs, DEFAULT_NOTIFICATION_SECS);
        assert_eq!(settings.reconnect_max_delay_secs, 1.0);

        settings.reconnect_max_delay_secs = 0.5;
        settings.sanitize();
        assert_eq!(settings.reconnect_max_delay_secs, 1.0);
    }

    #[test]
    fn test_bad_json_is_error() {
        assert!(matches!(
            Settings::from_json("{not json"),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_intensity_from_str() {
        assert_eq!(SimulatorIntensity::from_str("LOW"), Some(SimulatorIntensity::Low));
        assert_eq!(SimulatorIntensity::from_str("med"), Some(SimulatorIntensity::Medium));
        assert_eq!(SimulatorIntensity::from_str(" high "), Some(SimulatorIntensity::High));
        assert_eq!(SimulatorIntensity::from_str("extreme"), None);
    }

    #[test]
    fn test_higher_intensity_is_busier() {
        let low = SimulatorIntensity::Low;
        let high = SimulatorIntensity::High;
        assert!(high.interval_range().1 < low.interval_range().0);
        assert!(high.tier_weights()[2] > low.tier_weights()[2]);
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!("live-brawl-test-{}.json", std::process::id()));
        let settings = Settings {
            seed: Some(99),
            max_wave: 4,
            ..Settings::default()
        };
        settings.save_to(&path).unwrap();
        let loaded = Settings::load_from(&path).unwrap().unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_file_is_none() {
        let path = std::env::temp_dir().join("live-brawl-definitely-missing.json");
        assert!(Settings::load_from(&path).unwrap().is_none());
    }
}
