//! Read-only views derived from a [`GameState`].

use quantum_types::Timeline;

use crate::GameState;

/// Beats per timeline used as the denominator for story completion.
pub const BEATS_PER_TIMELINE: u32 = 5;
/// Clues needed for a complete case file.
pub const EVIDENCE_TARGET: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineStatus {
    Locked,
    Active,
    InProgress,
    Completed,
}

impl TimelineStatus {
    #[must_use]
    pub fn from_progress(progress: u32) -> Self {
        match progress {
            0 => Self::Locked,
            1..=2 => Self::Active,
            p if p >= BEATS_PER_TIMELINE => Self::Completed,
            _ => Self::InProgress,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Locked => "locked",
            Self::Active => "active",
            Self::InProgress => "in progress",
            Self::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressView {
    pub story_percent: u32,
    pub evidence_percent: u32,
    pub energy_spent_percent: u32,
    pub timelines: [(Timeline, u32, TimelineStatus); 4],
}

impl ProgressView {
    #[must_use]
    pub fn of(state: &GameState) -> Self {
        let total = state.story_progress().total();
        let target = BEATS_PER_TIMELINE * 4;
        let story_percent = (total.saturating_mul(100) / target).min(100);

        let evidence = u32::try_from(state.evidence().len()).unwrap_or(u32::MAX);
        let evidence_target = u32::try_from(EVIDENCE_TARGET).unwrap_or(u32::MAX);
        let evidence_percent = (evidence.saturating_mul(100) / evidence_target).min(100);

        let timelines = Timeline::ALL.map(|t| {
            let p = state.story_progress().get(t);
            (t, p, TimelineStatus::from_progress(p))
        });

        Self {
            story_percent,
            evidence_percent,
            energy_spent_percent: u32::from(state.quantum_energy().spent_percent()),
            timelines,
        }
    }
}

/// Recap shown next to a save slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseSummary {
    pub total_progress: u32,
    pub evidence_count: usize,
    pub achievement_count: usize,
    pub timeline: Timeline,
    pub chapter: u32,
    pub minutes_played: i64,
}

impl CaseSummary {
    /// `now` is epoch milliseconds.
    #[must_use]
    pub fn of(state: &GameState, now: i64) -> Self {
        Self {
            total_progress: state.story_progress().total(),
            evidence_count: state.evidence().len(),
            achievement_count: state.achievements().len(),
            timeline: state.current_timeline(),
            chapter: state.current_chapter(),
            // `startTime` is whatever the save file says.
            minutes_played: now.saturating_sub(state.start_time()).max(0) / 60_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quantum_types::{Evidence, EvidenceId, NonEmptyString, QuantumEnergy, StoryProgress};

    fn clues(n: usize) -> Vec<Evidence> {
        (0..n)
            .map(|i| {
                let id = format!("clue_{i}");
                Evidence::new(
                    EvidenceId::new(id.clone()).unwrap(),
                    NonEmptyString::new(id).unwrap(),
                    "",
                )
            })
            .collect()
    }

    #[test]
    fn status_thresholds() {
        assert_eq!(TimelineStatus::from_progress(0), TimelineStatus::Locked);
        assert_eq!(TimelineStatus::from_progress(2), TimelineStatus::Active);
        assert_eq!(TimelineStatus::from_progress(3), TimelineStatus::InProgress);
        assert_eq!(TimelineStatus::from_progress(4), TimelineStatus::InProgress);
        assert_eq!(TimelineStatus::from_progress(5), TimelineStatus::Completed);
        assert_eq!(TimelineStatus::from_progress(9), TimelineStatus::Completed);
    }

    #[test]
    fn percentages() {
        let state = GameState::new_game(0)
            .with_progress(StoryProgress::new([6, 2, 1, 1]))
            .with_evidence(clues(6))
            .with_energy(QuantumEnergy::new(40));
        let view = ProgressView::of(&state);
        assert_eq!(view.story_percent, 50);
        assert_eq!(view.evidence_percent, 40);
        assert_eq!(view.energy_spent_percent, 60);
        assert_eq!(view.timelines[0].2, TimelineStatus::Completed);
        assert_eq!(view.timelines[1].2, TimelineStatus::Active);
    }

    #[test]
    fn percentages_cap_at_hundred() {
        let state = GameState::new_game(0)
            .with_progress(StoryProgress::new([9, 9, 9, 9]))
            .with_evidence(clues(20));
        let view = ProgressView::of(&state);
        assert_eq!(view.story_percent, 100);
        assert_eq!(view.evidence_percent, 100);
    }

    #[test]
    fn summary_minutes() {
        let state = GameState::new_game(1_000);
        let summary = CaseSummary::of(&state, 1_000 + 5 * 60_000 + 59_000);
        assert_eq!(summary.minutes_played, 5);
        assert_eq!(summary.chapter, 1);
        assert_eq!(CaseSummary::of(&state, 0).minutes_played, 0);
    }
}
