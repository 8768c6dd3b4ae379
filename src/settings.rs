//! Game settings and tunables
//!
//! Persisted as JSON in LocalStorage (wasm) or a file (native). Unknown or
//! missing fields fall back to defaults.

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Timing ===
    /// Global multiplier applied to every frame delta
    pub time_scale: f32,
    /// Multiplier while fast-forward is held (replaces `time_scale`)
    pub fast_forward_scale: f32,
    /// Wall-clock delta is clamped to this before scaling (seconds)
    pub max_frame_dt: f32,
    /// Fade alpha change per reference frame
    pub fade_speed: f32,

    // === Flow ===
    /// Minimum time on the start screen before input starts the game
    pub start_dwell_secs: f32,
    /// Game-over frames before a restart key is accepted
    pub game_over_cooldown_frames: u32,
    /// Wall-clock delay before the game-over UI is revealed
    pub game_over_reveal_delay_secs: f32,
    /// Wall-clock delay of the second death explosion sound
    pub second_explosion_delay_secs: f32,

    // === Audio ===
    pub music_volume: f32,
    pub sfx_volume: f32,

    // === Debug / HUD ===
    /// Start runs invulnerable
    pub god_mode: bool,
    /// Show FPS counter
    pub show_fps: bool,
    /// Fixed RNG seed (None = derived from the clock)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            time_scale: 1.5,
            fast_forward_scale: 10.0,
            max_frame_dt: 0.1,
            fade_speed: 0.01,

            start_dwell_secs: 1.0,
            game_over_cooldown_frames: 60,
            game_over_reveal_delay_secs: 1.0,
            second_explosion_delay_secs: 0.3,

            music_volume: 0.5,
            sfx_volume: 0.4,

            god_mode: false,
            show_fps: true,
            seed: None,
        }
    }
}

impl Settings {
    /// Clamp a raw wall-clock delta and apply the active time scale
    pub fn scale_dt(&self, raw_dt: f32, fast_forward: bool) -> f32 {
        let dt = crate::sanitize_dt(raw_dt).min(self.max_frame_dt);
        if fast_forward {
            dt * self.fast_forward_scale
        } else {
            dt * self.time_scale
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "cosmic_parasite_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            match self.to_json() {
                Ok(json) => {
                    let _ = storage.set_item(Self::STORAGE_KEY, &json);
                    log::info!("Settings saved");
                }
                Err(e) => log::warn!("Could not serialize settings: {e}"),
            }
        }
    }

    /// Load settings from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load from a file if given, otherwise defaults. Errors are logged.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_or_default(path: Option<&std::path::Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match Self::load_from(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({}: {e})", path.display());
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
