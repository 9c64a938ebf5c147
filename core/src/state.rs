//! The canonical game-state object.
//!
//! Fields are readable by anyone but only writable from inside this crate;
//! [`crate::GameStateController`] is the single place that mutates a live
//! game. The `with_*` constructors exist for building a state at load or
//! fixture time, before a controller takes ownership.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Deserializer, Serialize};

use quantum_types::{
    AchievementId, Character, CharacterId, CharacterStatus, Evidence, EvidenceId, Level,
    NonEmptyString, QuantumEnergy, StoryProgress, Timeline,
};

pub const FIRST_CHAPTER: u32 = 1;

const fn first_chapter() -> u32 {
    FIRST_CHAPTER
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    #[serde(default)]
    pub(crate) current_timeline: Timeline,
    #[serde(default)]
    pub(crate) quantum_energy: QuantumEnergy,
    #[serde(default, deserialize_with = "deserialize_unique_evidence")]
    pub(crate) evidence: Vec<Evidence>,
    #[serde(default)]
    pub(crate) characters: Vec<Character>,
    #[serde(default)]
    pub(crate) story_progress: StoryProgress,
    #[serde(default = "first_chapter")]
    pub(crate) current_chapter: u32,
    #[serde(default, deserialize_with = "deserialize_known_achievements")]
    pub(crate) achievements: BTreeSet<AchievementId>,
    #[serde(default)]
    pub(crate) show_tutorial: bool,
    /// Epoch milliseconds when the case was opened.
    #[serde(default)]
    pub(crate) start_time: i64,
}

impl GameState {
    /// Fresh case: full energy, timeline alpha, nothing collected, tutorial
    /// pending, opening witnesses on the roster.
    #[must_use]
    pub fn new_game(start_time: i64) -> Self {
        Self {
            current_timeline: Timeline::Alpha,
            quantum_energy: QuantumEnergy::full(),
            evidence: Vec::new(),
            characters: opening_roster(),
            story_progress: StoryProgress::default(),
            current_chapter: FIRST_CHAPTER,
            achievements: BTreeSet::new(),
            show_tutorial: true,
            start_time,
        }
    }

    #[must_use]
    pub fn with_timeline(mut self, timeline: Timeline) -> Self {
        self.current_timeline = timeline;
        self
    }

    #[must_use]
    pub fn with_energy(mut self, energy: QuantumEnergy) -> Self {
        self.quantum_energy = energy;
        self
    }

    #[must_use]
    pub fn with_progress(mut self, progress: StoryProgress) -> Self {
        self.story_progress = progress;
        self
    }

    /// Replace the case file. Later duplicates of an id are dropped.
    #[must_use]
    pub fn with_evidence(mut self, evidence: impl IntoIterator<Item = Evidence>) -> Self {
        self.evidence = dedup_by_id(evidence);
        self
    }

    #[must_use]
    pub fn with_characters(mut self, characters: Vec<Character>) -> Self {
        self.characters = characters;
        self
    }

    #[must_use]
    pub fn with_achievements(mut self, ids: impl IntoIterator<Item = AchievementId>) -> Self {
        self.achievements = ids.into_iter().collect();
        self
    }

    #[must_use]
    pub fn current_timeline(&self) -> Timeline {
        self.current_timeline
    }

    #[must_use]
    pub fn quantum_energy(&self) -> QuantumEnergy {
        self.quantum_energy
    }

    #[must_use]
    pub fn evidence(&self) -> &[Evidence] {
        &self.evidence
    }

    #[must_use]
    pub fn find_evidence(&self, id: &EvidenceId) -> Option<&Evidence> {
        self.evidence.iter().find(|e| e.id() == id)
    }

    #[must_use]
    pub fn has_evidence(&self, id: &EvidenceId) -> bool {
        self.find_evidence(id).is_some()
    }

    #[must_use]
    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    #[must_use]
    pub fn find_character(&self, id: &CharacterId) -> Option<&Character> {
        self.characters.iter().find(|c| c.id() == id)
    }

    #[must_use]
    pub fn story_progress(&self) -> &StoryProgress {
        &self.story_progress
    }

    /// Counter for the timeline the player is standing in.
    #[must_use]
    pub fn current_progress(&self) -> u32 {
        self.story_progress.get(self.current_timeline)
    }

    #[must_use]
    pub fn current_chapter(&self) -> u32 {
        self.current_chapter
    }

    #[must_use]
    pub fn achievements(&self) -> &BTreeSet<AchievementId> {
        &self.achievements
    }

    #[must_use]
    pub fn show_tutorial(&self) -> bool {
        self.show_tutorial
    }

    #[must_use]
    pub fn start_time(&self) -> i64 {
        self.start_time
    }
}

fn dedup_by_id(evidence: impl IntoIterator<Item = Evidence>) -> Vec<Evidence> {
    let mut seen = HashSet::new();
    evidence
        .into_iter()
        .filter(|e| seen.insert(e.id().clone()))
        .collect()
}

fn deserialize_unique_evidence<'de, D>(deserializer: D) -> Result<Vec<Evidence>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<Evidence>::deserialize(deserializer).map(dedup_by_id)
}

// Unknown ids (e.g. from a newer build) are skipped instead of failing the load.
fn deserialize_known_achievements<'de, D>(
    deserializer: D,
) -> Result<BTreeSet<AchievementId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    Ok(raw.iter().filter_map(|s| AchievementId::parse(s)).collect())
}

fn character(id: &str, name: &str, role: &str) -> Character {
    Character::new(
        CharacterId::new(id).expect("roster id must be valid"),
        NonEmptyString::new(name).expect("roster name must be non-empty"),
        role,
    )
}

/// Witnesses available when a case opens.
#[must_use]
pub fn opening_roster() -> Vec<Character> {
    vec![
        character("witness1", "Dr. Sarah Chen", "Quantum Physicist")
            .with_levels(Level::new(25), Level::new(75))
            .with_status(CharacterStatus::Available)
            .with_background(
                "Lead researcher on the quantum entanglement project",
                &["Analytical", "Cautious", "Detail-oriented"],
            ),
        character("witness2", "Marcus Webb", "Security Guard")
            .with_levels(Level::new(60), Level::new(40))
            .with_status(CharacterStatus::Suspicious)
            .with_background(
                "Night shift security, first on scene",
                &["Nervous", "Secretive", "Observant"],
            ),
    ]
}
