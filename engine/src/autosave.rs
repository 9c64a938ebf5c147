//! Auto-save scheduling.
//!
//! Two triggers, both saving to the primary slot: a fixed interval of
//! simulated time, and a "significant event" check that fires when the
//! evidence count, chapter, achievement count or current timeline changed
//! since the last save.

use std::time::Duration;

use quantum_core::GameState;
use quantum_types::Timeline;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint {
    evidence: usize,
    chapter: u32,
    achievements: usize,
    timeline: Timeline,
}

impl Fingerprint {
    #[must_use]
    pub fn of(state: &GameState) -> Self {
        Self {
            evidence: state.evidence().len(),
            chapter: state.current_chapter(),
            achievements: state.achievements().len(),
            timeline: state.current_timeline(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoSaveTrigger {
    Interval,
    SignificantEvent,
}

impl AutoSaveTrigger {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Interval => "interval",
            Self::SignificantEvent => "significant_event",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AutoSaveScheduler {
    interval: Duration,
    since_last: Duration,
    baseline: Option<Fingerprint>,
}

impl AutoSaveScheduler {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            since_last: Duration::ZERO,
            baseline: None,
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start tracking a freshly started or loaded game without saving it.
    pub fn reset(&mut self, state: &GameState) {
        self.since_last = Duration::ZERO;
        self.baseline = Some(Fingerprint::of(state));
    }

    /// Forget the current game (back at the menu).
    pub fn clear(&mut self) {
        self.since_last = Duration::ZERO;
        self.baseline = None;
    }

    /// Advance simulated time. Returns a trigger once the interval elapsed.
    pub fn tick(&mut self, elapsed: Duration, enabled: bool) -> Option<AutoSaveTrigger> {
        if !enabled || self.baseline.is_none() {
            return None;
        }
        self.since_last = self.since_last.saturating_add(elapsed);
        (self.since_last >= self.interval).then_some(AutoSaveTrigger::Interval)
    }

    /// Check the state after a command for a significant change.
    #[must_use]
    pub fn observe(&self, state: &GameState, enabled: bool) -> Option<AutoSaveTrigger> {
        let baseline = self.baseline?;
        (enabled && baseline != Fingerprint::of(state)).then_some(AutoSaveTrigger::SignificantEvent)
    }

    /// Record that `state` was written, whichever path wrote it.
    pub fn mark_saved(&mut self, state: &GameState) {
        self.reset(state);
    }
}
