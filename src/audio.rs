//! Sound cues and the audio mixer
//!
//! The simulation only names cues; this module decides what "playing" means.
//! Replaying a cue that is still sounding restarts it from the beginning
//! rather than queueing a second copy.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    /// Player lost a life
    Die,
    /// Gem collected
    CollectGem,
    /// Last life lost
    GameOver,
    /// Key collected
    ClearLevel,
    /// Star collected
    Star,
    /// Background music (loops)
    Theme,
}

impl SoundCue {
    pub fn file(&self) -> &'static str {
        match self {
            SoundCue::Die => "audio/die.wav",
            SoundCue::CollectGem => "audio/collect_gem.wav",
            SoundCue::GameOver => "audio/gameover.wav",
            SoundCue::ClearLevel => "audio/clear_level.wav",
            SoundCue::Star => "audio/star.wav",
            SoundCue::Theme => "audio/theme.mp3",
        }
    }

    /// Clip length in seconds
    pub fn duration(&self) -> f32 {
        match self {
            SoundCue::Die => 0.6,
            SoundCue::CollectGem => 0.3,
            SoundCue::GameOver => 2.0,
            SoundCue::ClearLevel => 1.2,
            SoundCue::Star => 0.5,
            SoundCue::Theme => 48.0,
        }
    }

    pub fn is_music(&self) -> bool {
        matches!(self, SoundCue::Theme)
    }
}

/// Fire-and-forget cue playback
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);

    /// Called once per frame with the elapsed time
    fn advance(&mut self, _dt: f32) {}
}

/// A cue that is currently sounding
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    pub cue: SoundCue,
    /// Seconds since the cue (re)started
    pub position: f32,
    pub volume: f32,
}

/// Audio manager for the game
#[derive(Debug)]
pub struct AudioManager {
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    voices: Vec<Voice>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
            voices: Vec::new(),
        }
    }

    /// Mixer configured from the player's settings
    pub fn from_settings(settings: &Settings) -> Self {
        let mut audio = Self::new();
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_music_volume(settings.music_volume);
        audio.set_muted(settings.muted);
        audio
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self, cue: SoundCue) -> f32 {
        if self.muted {
            0.0
        } else if cue.is_music() {
            self.master_volume * self.music_volume
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Age all voices and drop those that finished. Music wraps around.
    fn age_voices(&mut self, dt: f32) {
        for voice in &mut self.voices {
            voice.position += dt;
            if voice.cue.is_music() {
                voice.position %= voice.cue.duration();
            }
        }
        self.voices
            .retain(|v| v.cue.is_music() || v.position < v.cue.duration());
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn voice(&self, cue: SoundCue) -> Option<&Voice> {
        self.voices.iter().find(|v| v.cue == cue)
    }

    pub fn stop_all(&mut self) {
        self.voices.clear();
    }
}

impl AudioSink for AudioManager {
    fn play(&mut self, cue: SoundCue) {
        let volume = self.effective_volume(cue);
        if volume <= 0.0 {
            return;
        }

        if let Some(voice) = self.voices.iter_mut().find(|v| v.cue == cue) {
            log::trace!("Restarting {:?}", cue);
            voice.position = 0.0;
            voice.volume = volume;
        } else {
            log::trace!("Playing {:?} ({}) at {:.2}", cue, cue.file(), volume);
            self.voices.push(Voice {
                cue,
                position: 0.0,
                volume,
            });
        }
    }

    fn advance(&mut self, dt: f32) {
        self.age_voices(dt);
    }
}
