//! Static achievement catalog and unlock evaluation.
//!
//! Predicates are pure functions of [`GameState`]. Evaluation never looks at
//! what the state already recorded; callers pass the set they consider
//! unlocked, which keeps [`evaluate`] idempotent: feeding its result back in
//! yields nothing new.

use std::collections::BTreeSet;

use quantum_types::{AchievementId, Timeline};

use crate::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Investigation,
    Story,
    Quantum,
    Speed,
    Completion,
}

pub struct Achievement {
    pub id: AchievementId,
    pub title: &'static str,
    pub description: &'static str,
    pub rarity: Rarity,
    pub category: Category,
    pub points: u32,
    predicate: fn(&GameState) -> bool,
}

impl Achievement {
    #[must_use]
    pub fn is_met(&self, state: &GameState) -> bool {
        (self.predicate)(state)
    }
}

impl std::fmt::Debug for Achievement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Achievement")
            .field("id", &self.id)
            .field("points", &self.points)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Achievement {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Achievement {}

pub static CATALOG: [Achievement; 6] = [
    Achievement {
        id: AchievementId::FirstClue,
        title: "First Discovery",
        description: "Find your first piece of evidence",
        rarity: Rarity::Common,
        category: Category::Investigation,
        points: 10,
        predicate: |s| !s.evidence().is_empty(),
    },
    Achievement {
        id: AchievementId::TimelineJumper,
        title: "Quantum Leap",
        description: "Switch timelines for the first time",
        rarity: Rarity::Common,
        category: Category::Quantum,
        points: 15,
        predicate: |s| {
            s.current_timeline() != Timeline::Alpha || s.story_progress().iter().any(|(_, p)| p > 0)
        },
    },
    Achievement {
        id: AchievementId::FastThinker,
        title: "Lightning Detective",
        description: "Make your first breakthrough in a timeline",
        rarity: Rarity::Rare,
        category: Category::Speed,
        points: 25,
        predicate: |s| s.current_progress() >= 1,
    },
    Achievement {
        id: AchievementId::EvidenceCollector,
        title: "Master Investigator",
        description: "Collect 10 pieces of evidence",
        rarity: Rarity::Rare,
        category: Category::Investigation,
        points: 30,
        predicate: |s| s.evidence().len() >= 10,
    },
    Achievement {
        id: AchievementId::QuantumMaster,
        title: "Reality Bender",
        description: "Make progress in all four timelines",
        rarity: Rarity::Epic,
        category: Category::Quantum,
        points: 50,
        predicate: |s| s.story_progress().visited() >= 4,
    },
    Achievement {
        id: AchievementId::PerfectCase,
        title: "Quantum Detective",
        description: "Solve the case with 100% evidence collection",
        rarity: Rarity::Legendary,
        category: Category::Completion,
        points: 100,
        predicate: |s| {
            s.evidence().len() >= 15 && s.story_progress().iter().all(|(_, p)| p >= 5)
        },
    },
];

#[must_use]
pub fn lookup(id: AchievementId) -> &'static Achievement {
    CATALOG
        .iter()
        .find(|a| a.id == id)
        .expect("every AchievementId has a catalog entry")
}

/// Catalog entries whose predicate holds for `state` and that are not in
/// `already_unlocked`, in catalog order.
#[must_use]
pub fn evaluate(
    state: &GameState,
    already_unlocked: &BTreeSet<AchievementId>,
) -> Vec<&'static Achievement> {
    CATALOG
        .iter()
        .filter(|a| !already_unlocked.contains(&a.id))
        .filter(|a| a.is_met(state))
        .collect()
}

#[must_use]
pub fn total_points(unlocked: &BTreeSet<AchievementId>) -> u32 {
    unlocked.iter().map(|id| lookup(*id).points).sum()
}
