//! Fire-and-forget notifications emitted by state transitions.
//!
//! The controller queues these after a real change; the session drains the
//! queue and hands the effects to whatever presentation is listening. Nothing
//! in the core waits on an effect being shown or heard.

use quantum_types::{AchievementId, EvidenceId, SlotIndex, Timeline};

/// Something the presentation layer may want to react to.
///
/// This is a closed enum: only state transitions construct these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEffect {
    TimelineSwitched {
        to: Timeline,
    },
    EvidenceFound {
        id: EvidenceId,
    },
    AchievementUnlocked {
        id: AchievementId,
        points: u32,
    },
    StoryAdvanced {
        timeline: Timeline,
        progress: u32,
    },
    CombinationDiscovered {
        id: EvidenceId,
    },
    SaveCompleted {
        slot: SlotIndex,
        ok: bool,
    },
}

/// Audio cue associated with an effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Select,
    Success,
    Error,
    Timeline,
    Evidence,
}

impl SoundCue {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Success => "success",
            Self::Error => "error",
            Self::Timeline => "timeline",
            Self::Evidence => "evidence",
        }
    }
}

impl GameEffect {
    #[must_use]
    pub fn sound(&self) -> SoundCue {
        match self {
            Self::TimelineSwitched { .. } => SoundCue::Timeline,
            Self::EvidenceFound { .. } => SoundCue::Evidence,
            Self::AchievementUnlocked { .. } | Self::CombinationDiscovered { .. } => {
                SoundCue::Success
            }
            Self::StoryAdvanced { .. } => SoundCue::Select,
            Self::SaveCompleted { ok: true, .. } => SoundCue::Success,
            Self::SaveCompleted { ok: false, .. } => SoundCue::Error,
        }
    }

    /// One-line description for logs and the terminal.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::TimelineSwitched { to } => format!("Quantum jump to timeline {to}"),
            Self::EvidenceFound { id } => format!("Evidence found: {id}"),
            Self::AchievementUnlocked { id, points } => {
                format!("Achievement unlocked: {id} (+{points})")
            }
            Self::StoryAdvanced { timeline, progress } => {
                format!("Story advanced in {timeline} to {progress}")
            }
            Self::CombinationDiscovered { id } => format!("Connection discovered: {id}"),
            Self::SaveCompleted { slot, ok: true } => format!("Saved to slot {slot}"),
            Self::SaveCompleted { slot, ok: false } => format!("Save to slot {slot} failed"),
        }
    }
}

/// Pending effects, in the order they were raised.
#[derive(Debug, Default)]
pub struct EffectQueue {
    pending: Vec<GameEffect>,
}

impl EffectQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an effect. An effect equal to the one just queued is dropped.
    pub fn push(&mut self, effect: GameEffect) {
        if self.pending.last() != Some(&effect) {
            self.pending.push(effect);
        }
    }

    /// Take all pending effects, clearing the queue.
    pub fn take(&mut self) -> Vec<GameEffect> {
        std::mem::take(&mut self.pending)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn found(id: &str) -> GameEffect {
        GameEffect::EvidenceFound {
            id: EvidenceId::new(id).unwrap(),
        }
    }

    #[test]
    fn push_and_take() {
        let mut queue = EffectQueue::new();
        assert!(queue.is_empty());
        queue.push(GameEffect::TimelineSwitched { to: Timeline::Beta });
        queue.push(found("gala_ticket_beta"));
        assert_eq!(queue.len(), 2);

        let effects = queue.take();
        assert_eq!(effects.len(), 2);
        assert!(queue.is_empty());
    }

    #[test]
    fn consecutive_duplicates_collapse() {
        let mut queue = EffectQueue::new();
        queue.push(found("a"));
        queue.push(found("a"));
        queue.push(found("b"));
        queue.push(found("a"));
        assert_eq!(queue.take(), [found("a"), found("b"), found("a")]);
    }

    #[test]
    fn save_sound_depends_on_outcome() {
        let slot = SlotIndex::PRIMARY;
        assert_eq!(
            GameEffect::SaveCompleted { slot, ok: true }.sound(),
            SoundCue::Success
        );
        assert_eq!(
            GameEffect::SaveCompleted { slot, ok: false }.sound(),
            SoundCue::Error
        );
    }

    #[test]
    fn describe_mentions_points() {
        let effect = GameEffect::AchievementUnlocked {
            id: AchievementId::FirstClue,
            points: 10,
        };
        assert_eq!(effect.describe(), "Achievement unlocked: first_clue (+10)");
    }
}
