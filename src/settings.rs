//! Game settings
//!
//! Read once at start-up from a JSON block embedded in the page:
//! `<script id="game-settings" type="application/json">{ ... }</script>`.
//! Nothing is written back.

use serde::{Deserialize, Serialize};

/// DOM id of the settings JSON element
pub const SETTINGS_ELEMENT_ID: &str = "game-settings";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Mute when the tab is hidden
    pub mute_on_hide: bool,

    // === Visual ===
    /// Render the scrolling starfield
    pub starfield: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 1.0,
            mute_on_hide: true,
            starfield: true,
            show_fps: false,
        }
    }
}

impl Settings {
    /// Parse settings JSON; missing fields take defaults, volumes are clamped
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.clamped())
    }

    /// Parse settings, falling back to defaults on malformed input
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Invalid settings ({}), using defaults", e);
                Self::default()
            }
        }
    }

    fn clamped(mut self) -> Self {
        self.master_volume = clamp_volume(self.master_volume);
        self.sfx_volume = clamp_volume(self.sfx_volume);
        self.music_volume = clamp_volume(self.music_volume);
        self
    }

    /// Effective sound effect volume
    pub fn effective_sfx_volume(&self) -> f32 {
        self.master_volume * self.sfx_volume
    }

    /// Effective music volume
    pub fn effective_music_volume(&self) -> f32 {
        self.master_volume * self.music_volume
    }

    /// Load settings from the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(SETTINGS_ELEMENT_ID))
            .and_then(|el| el.text_content());

        match json {
            Some(json) => {
                log::info!("Loaded settings from page");
                Self::from_json_or_default(&json)
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

fn clamp_volume(vol: f32) -> f32 {
    if vol.is_nan() { 0.0 } else { vol.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "starfield": false }"#).unwrap();
        assert!(!settings.starfield);
        assert_eq!(settings.master_volume, Settings::default().master_volume);
    }

    #[test]
    fn test_volumes_are_clamped() {
        let settings =
            Settings::from_json(r#"{ "master_volume": 3.0, "music_volume": -1.0 }"#).unwrap();
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.music_volume, 0.0);
    }

    #[test]
    fn test_malformed_falls_back() {
        assert_eq!(Settings::from_json_or_default("{ nope"), Settings::default());
    }

    #[test]
    fn test_effective_volume() {
        let settings = Settings {
            master_volume: 0.5,
            sfx_volume: 0.5,
            ..Default::default()
        };
        assert!((settings.effective_sfx_volume() - 0.25).abs() < 1e-6);
    }
}
