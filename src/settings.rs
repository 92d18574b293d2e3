//! Game settings and preferences
//!
//! Read from a JSON file at startup. Missing fields take their defaults, so a
//! settings file only needs the values it changes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assets::SpriteId;
pub use crate::sim::VictoryPolicy;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0:?} is not a playable character")]
    NotACharacter(SpriteId),
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Play the looping theme
    pub music_enabled: bool,
    pub muted: bool,

    // === Loop ===
    /// Frame pacing for the native host
    pub target_fps: u32,
    /// Log frames-per-second once a second
    pub show_fps: bool,

    // === Game ===
    pub on_victory: VictoryPolicy,
    /// Player sprite
    pub character: SpriteId,
    /// Custom level pack (JSON); the built-in levels are used when unset
    pub level_pack: Option<PathBuf>,

    // === Demo ===
    pub autopilot_seed: u64,
    /// Seconds between autopilot presses
    pub autopilot_interval: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Audio
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            music_enabled: true,
            muted: false,

            // Loop
            target_fps: 60,
            show_fps: false,

            // Game
            on_victory: VictoryPolicy::Restart,
            character: SpriteId::Boy,
            level_pack: None,

            // Demo
            autopilot_seed: 0x5EED,
            autopilot_interval: 0.35,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if !self.character.is_character() {
            return Err(SettingsError::NotACharacter(self.character));
        }
        Ok(())
    }

    /// Load settings from a file
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Self::default();
        };

        match Self::load_from(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    /// Effective music flag (respects mute)
    pub fn effective_music(&self) -> bool {
        self.music_enabled && !self.muted
    }

    /// Target frame duration in seconds
    pub fn frame_interval(&self) -> f64 {
        1.0 / self.target_fps.clamp(1, 240) as f64
    }
}
