//! Session engine for Quantum Detective: persistence, auto-save and the
//! single-writer game session.
//!
//! This crate has no terminal dependencies. Front ends drive it through
//! [`GameSession::apply`] and observe it through an [`EffectSink`].

#![allow(clippy::missing_errors_doc)]

mod autosave;
mod session;
mod sink;
mod storage;

pub use autosave::{AutoSaveScheduler, AutoSaveTrigger, Fingerprint};
pub use session::{GameSession, SessionCommand, SessionEvent};
pub use sink::{EffectSink, NullSink, RecordingSink, TracingSink};
pub use storage::{SaveStore, SaveSummary};

// Re-export from crates for public API
pub use quantum_config::{AppConfig, ConfigError};
pub use quantum_core::{
    Achievement, Approach, BEATS_PER_TIMELINE, BuiltinStory, CaseSummary, Challenge, EVIDENCE_TARGET,
    Emotion, EvidenceAdd, GameEffect, GameState, GameStateController, InterviewApplied,
    InterviewError, InterviewReport, NoConnection, Phase, ProgressView, Question, Reading,
    SoundCue, StoryAdvance, StoryBeat, StoryChoice, StoryRepository, TimelineStatus,
    TimelineSwitch, Turn, WitnessInterview, achievements, combination, interview,
};
pub use quantum_types::{
    AchievementId, Character, CharacterId, CharacterStatus, Difficulty, Evidence, EvidenceId,
    GameSettings, Level, QuantumEnergy, SlotIndex, StoryProgress, Timeline, Volume,
    strip_control, truncate_with_ellipsis, wrap_words,
};
pub use quantum_utils::FileSyncPolicy;
