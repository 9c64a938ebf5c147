//! Consumers of [`GameEffect`]s.
//!
//! A sink is an owned service handed to the session at construction. The
//! session calls it synchronously and never looks at what it did; a sink that
//! drops everything is as valid as one that animates.

use quantum_core::{GameEffect, SoundCue};

pub trait EffectSink {
    fn on_session_start(&mut self) {}

    fn on_session_end(&mut self) {}

    fn emit(&mut self, effect: &GameEffect);

    /// Only called while sound is enabled in the settings.
    fn play(&mut self, cue: SoundCue) {
        let _ = cue;
    }
}

/// Logs every effect at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EffectSink for TracingSink {
    fn on_session_start(&mut self) {
        tracing::debug!("Effect sink attached to new session");
    }

    fn on_session_end(&mut self) {
        tracing::debug!("Effect sink detached from session");
    }

    fn emit(&mut self, effect: &GameEffect) {
        tracing::debug!(effect = %effect.describe(), "Game effect");
    }

    fn play(&mut self, cue: SoundCue) {
        tracing::trace!(cue = cue.as_str(), "Sound cue");
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EffectSink for NullSink {
    fn emit(&mut self, _effect: &GameEffect) {}
}

/// Remembers everything it was given.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub effects: Vec<GameEffect>,
    pub sounds: Vec<SoundCue>,
    pub sessions_started: usize,
    pub sessions_ended: usize,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take_effects(&mut self) -> Vec<GameEffect> {
        std::mem::take(&mut self.effects)
    }
}

impl EffectSink for RecordingSink {
    fn on_session_start(&mut self) {
        self.sessions_started += 1;
    }

    fn on_session_end(&mut self) {
        self.sessions_ended += 1;
    }

    fn emit(&mut self, effect: &GameEffect) {
        self.effects.push(effect.clone());
    }

    fn play(&mut self, cue: SoundCue) {
        self.sounds.push(cue);
    }
}
