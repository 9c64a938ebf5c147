//! Player-facing game settings.
//!
//! Stored fields are merged over [`GameSettings::default`] at the
//! deserialization boundary: a settings file written by an older build that
//! lacks a field still loads, and out-of-range volumes are clamped.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Rookie,
    #[default]
    Investigator,
    Bender,
}

impl Difficulty {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rookie => "rookie",
            Self::Investigator => "investigator",
            Self::Bender => "bender",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "rookie" => Some(Self::Rookie),
            "investigator" => Some(Self::Investigator),
            "bender" | "reality-bender" => Some(Self::Bender),
            _ => None,
        }
    }
}

/// Volume in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Volume(f32);

impl Volume {
    #[must_use]
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    #[must_use]
    pub const fn get(self) -> f32 {
        self.0
    }
}

impl<'de> Deserialize<'de> for Volume {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f32::deserialize(deserializer).map(Self::new)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGameSettings {
    sound_enabled: Option<bool>,
    music_volume: Option<Volume>,
    effects_volume: Option<Volume>,
    auto_save: Option<bool>,
    difficulty: Option<Difficulty>,
    subtitles: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawGameSettings")]
pub struct GameSettings {
    pub sound_enabled: bool,
    pub music_volume: Volume,
    pub effects_volume: Volume,
    pub auto_save: bool,
    pub difficulty: Difficulty,
    pub subtitles: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            music_volume: Volume::new(0.7),
            effects_volume: Volume::new(0.8),
            auto_save: true,
            difficulty: Difficulty::Investigator,
            subtitles: false,
        }
    }
}

impl From<RawGameSettings> for GameSettings {
    fn from(raw: RawGameSettings) -> Self {
        let defaults = Self::default();
        Self {
            sound_enabled: raw.sound_enabled.unwrap_or(defaults.sound_enabled),
            music_volume: raw.music_volume.unwrap_or(defaults.music_volume),
            effects_volume: raw.effects_volume.unwrap_or(defaults.effects_volume),
            auto_save: raw.auto_save.unwrap_or(defaults.auto_save),
            difficulty: raw.difficulty.unwrap_or(defaults.difficulty),
            subtitles: raw.subtitles.unwrap_or(defaults.subtitles),
        }
    }
}
