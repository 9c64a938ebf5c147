//! The single authority over a live game.
//!
//! Every mutation returns an outcome value describing what happened. A
//! rejected request leaves both the state and the revision untouched, so
//! callers can compare revisions to decide whether anything needs redrawing
//! or saving.

use std::collections::BTreeSet;

use quantum_types::{AchievementId, CharacterId, Evidence, EvidenceId, NonEmptyString, Timeline};

use crate::achievements::{self, Achievement};
use crate::combination::{self, NoConnection};
use crate::effects::{EffectQueue, GameEffect};
use crate::interview::InterviewReport;
use crate::progress::ProgressView;
use crate::GameState;

// ============================================================================
// Outcomes
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineSwitch {
    Switched { from: Timeline, to: Timeline },
    SameTimeline,
    InsufficientEnergy,
}

impl TimelineSwitch {
    /// Whether the jump happened (drives transition effects).
    #[must_use]
    pub fn did_switch(self) -> bool {
        matches!(self, Self::Switched { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoryAdvance {
    pub timeline: Timeline,
    pub progress: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvidenceAdd {
    Added,
    Duplicate,
}

impl EvidenceAdd {
    #[must_use]
    pub fn is_added(self) -> bool {
        self == Self::Added
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterviewApplied {
    Applied { truths_added: usize },
    UnknownCharacter,
}

// ============================================================================
// Controller
// ============================================================================

#[derive(Debug)]
pub struct GameStateController {
    state: GameState,
    revision: usize,
    effects: EffectQueue,
}

impl GameStateController {
    #[must_use]
    pub fn new(state: GameState) -> Self {
        Self {
            state,
            revision: 0,
            effects: EffectQueue::new(),
        }
    }

    #[must_use]
    pub fn new_game(start_time: i64) -> Self {
        Self::new(GameState::new_game(start_time))
    }

    /// Read-only view of the current state.
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }

    /// Bumped on every real mutation.
    #[inline]
    #[must_use]
    pub fn revision(&self) -> usize {
        self.revision
    }

    pub fn take_effects(&mut self) -> Vec<GameEffect> {
        self.effects.take()
    }

    pub fn switch_timeline(&mut self, target: Timeline) -> TimelineSwitch {
        let from = self.state.current_timeline;
        if target == from {
            return TimelineSwitch::SameTimeline;
        }
        let Some(remaining) = self.state.quantum_energy.spend_switch() else {
            tracing::debug!(
                energy = self.state.quantum_energy.value(),
                target = %target,
                "Timeline switch refused"
            );
            return TimelineSwitch::InsufficientEnergy;
        };

        self.state.quantum_energy = remaining;
        self.state.current_timeline = target;
        self.bump();
        self.effects.push(GameEffect::TimelineSwitched { to: target });
        tracing::info!(%from, to = %target, energy = remaining.value(), "Timeline switched");
        TimelineSwitch::Switched { from, to: target }
    }

    /// Count one beat in the current timeline.
    ///
    /// `choice_id` only picks the narrative branch; the story repository
    /// resolves it, the counter ignores it.
    pub fn advance_story(&mut self, choice_id: &str) -> StoryAdvance {
        let timeline = self.state.current_timeline;
        let progress = self.state.story_progress.increment(timeline);
        self.bump();
        self.effects
            .push(GameEffect::StoryAdvanced { timeline, progress });
        tracing::info!(%timeline, progress, choice = choice_id, "Story advanced");
        StoryAdvance { timeline, progress }
    }

    /// Add a clue unless one with the same id is already filed.
    pub fn add_evidence(&mut self, evidence: Evidence) -> EvidenceAdd {
        if self.state.has_evidence(evidence.id()) {
            return EvidenceAdd::Duplicate;
        }
        let evidence = evidence.tagged_or(self.state.current_timeline);
        let id = evidence.id().clone();
        tracing::info!(evidence = %id, timeline = ?evidence.timeline(), "Evidence added");
        self.state.evidence.push(evidence);
        self.bump();
        self.effects.push(GameEffect::EvidenceFound { id });
        EvidenceAdd::Added
    }

    /// Look up what two clues reveal together. The state is not modified;
    /// filing the result is up to the caller. The discovery effect is raised
    /// only while the result is not yet on file.
    pub fn combine_evidence(
        &mut self,
        first: &EvidenceId,
        second: &EvidenceId,
    ) -> Result<Evidence, NoConnection> {
        let result = combination::combine(first, second)?;
        if !self.state.has_evidence(result.id()) {
            self.effects.push(GameEffect::CombinationDiscovered {
                id: result.id().clone(),
            });
        }
        Ok(result)
    }

    #[must_use]
    pub fn evaluate_achievements(
        &self,
        already_unlocked: &BTreeSet<AchievementId>,
    ) -> Vec<&'static Achievement> {
        achievements::evaluate(&self.state, already_unlocked)
    }

    /// Record every achievement whose condition now holds.
    pub fn unlock_achievements(&mut self) -> Vec<&'static Achievement> {
        let unlocked = achievements::evaluate(&self.state, &self.state.achievements);
        if unlocked.is_empty() {
            return unlocked;
        }
        for achievement in &unlocked {
            self.state.achievements.insert(achievement.id);
            self.effects.push(GameEffect::AchievementUnlocked {
                id: achievement.id,
                points: achievement.points,
            });
            tracing::info!(
                achievement = %achievement.id,
                points = achievement.points,
                "Achievement unlocked"
            );
        }
        self.bump();
        unlocked
    }

    /// Fold a finished interview back into the case.
    pub fn apply_interview(&mut self, report: &InterviewReport) -> InterviewApplied {
        let Some(character) = self
            .state
            .characters
            .iter_mut()
            .find(|c| c.id() == &report.character_id)
        else {
            tracing::warn!(character = %report.character_id, "Interview for unknown character");
            return InterviewApplied::UnknownCharacter;
        };
        character.record_interview(report.suspicion_level, report.final_trust);
        let name = character.name().to_string();
        self.bump();

        let mut truths_added = 0;
        for (question, truth) in &report.truths_revealed {
            let Some(evidence) = testimony(&report.character_id, question, &name, truth) else {
                continue;
            };
            if self.add_evidence(evidence).is_added() {
                truths_added += 1;
            }
        }
        tracing::info!(
            character = %report.character_id,
            suspicion = report.suspicion_level.value(),
            trust = report.final_trust.value(),
            truths_added,
            "Interview applied"
        );
        InterviewApplied::Applied { truths_added }
    }

    /// Returns `false` if the tutorial was already dismissed.
    pub fn dismiss_tutorial(&mut self) -> bool {
        if !self.state.show_tutorial {
            return false;
        }
        self.state.show_tutorial = false;
        self.bump();
        true
    }

    #[must_use]
    pub fn progress(&self) -> ProgressView {
        ProgressView::of(&self.state)
    }

    #[must_use]
    pub fn total_points(&self) -> u32 {
        achievements::total_points(&self.state.achievements)
    }

    #[inline]
    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

fn testimony(
    character: &CharacterId,
    question: &str,
    witness: &str,
    truth: &str,
) -> Option<Evidence> {
    let id = EvidenceId::new(format!("interview_{character}_{question}")).ok()?;
    let name = NonEmptyString::new(format!("Testimony: {witness} on {question}")).ok()?;
    Some(Evidence::new(id, name, truth))
}
