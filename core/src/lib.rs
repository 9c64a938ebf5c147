//! Game progression logic for Quantum Detective.
//!
//! [`GameStateController`] owns the canonical [`GameState`] and is the only
//! code that mutates it. Everything else here is either static content
//! (achievements, combination rules, story beats) or a pure view derived
//! from the state.

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod achievements;
pub mod combination;
mod controller;
mod effects;
pub mod interview;
mod progress;
mod state;
pub mod story;

pub use achievements::{Achievement, Category, Rarity};
pub use combination::NoConnection;
pub use controller::{
    EvidenceAdd, GameStateController, InterviewApplied, StoryAdvance, TimelineSwitch,
};
pub use effects::{EffectQueue, GameEffect, SoundCue};
pub use interview::{
    Approach, Emotion, InterviewError, InterviewReport, Phase, Question, Reading, Turn,
    WitnessInterview,
};
pub use progress::{
    BEATS_PER_TIMELINE, CaseSummary, EVIDENCE_TARGET, ProgressView, TimelineStatus,
};
pub use state::{FIRST_CHAPTER, GameState, opening_roster};
pub use story::{BuiltinStory, Challenge, StoryBeat, StoryChoice, StoryRepository};
