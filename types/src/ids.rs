use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("{kind} id must not be empty")]
    Empty { kind: &'static str },
    #[error("{kind} id must not contain whitespace (got {value:?})")]
    Whitespace { kind: &'static str, value: String },
}

fn validate_id(kind: &'static str, value: &str) -> Result<(), IdError> {
    if value.is_empty() {
        return Err(IdError::Empty { kind });
    }
    if value.chars().any(char::is_whitespace) {
        return Err(IdError::Whitespace {
            kind,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Identifier of a piece of evidence, e.g. `lipstick_cup_alpha`.
///
/// Invariant: non-empty and free of whitespace, so ids can be typed at a
/// prompt and used as JSON keys without escaping surprises.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EvidenceId(String);

impl EvidenceId {
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();
        validate_id("evidence", &value)?;
        Ok(Self(value))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EvidenceId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for EvidenceId {
    type Error = IdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EvidenceId> for String {
    fn from(value: EvidenceId) -> Self {
        value.0
    }
}

impl fmt::Display for EvidenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CharacterId(String);

impl CharacterId {
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();
        validate_id("character", &value)?;
        Ok(Self(value))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CharacterId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CharacterId> for String {
    fn from(value: CharacterId) -> Self {
        value.0
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("save slot must be between 0 and {max} (got {got})", max = SlotIndex::COUNT - 1)]
pub struct SlotIndexError {
    pub got: usize,
}

/// Index of a save slot. Only `0..SlotIndex::COUNT` is representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SlotIndex(u8);

impl SlotIndex {
    pub const COUNT: usize = 3;

    /// The slot used by auto-save and return-to-menu.
    pub const PRIMARY: SlotIndex = SlotIndex(0);

    pub fn new(index: usize) -> Result<Self, SlotIndexError> {
        if index < Self::COUNT {
            Ok(Self(index as u8))
        } else {
            Err(SlotIndexError { got: index })
        }
    }

    #[must_use]
    pub const fn get(self) -> usize {
        self.0 as usize
    }

    pub fn all() -> impl Iterator<Item = SlotIndex> {
        (0..Self::COUNT as u8).map(SlotIndex)
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Closed set of achievement identifiers.
///
/// Serialized as the snake_case strings stored in save files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    FirstClue,
    TimelineJumper,
    FastThinker,
    EvidenceCollector,
    QuantumMaster,
    PerfectCase,
}

impl AchievementId {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstClue => "first_clue",
            Self::TimelineJumper => "timeline_jumper",
            Self::FastThinker => "fast_thinker",
            Self::EvidenceCollector => "evidence_collector",
            Self::QuantumMaster => "quantum_master",
            Self::PerfectCase => "perfect_case",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|id| id.as_str() == s.trim())
    }

    #[must_use]
    pub const fn all() -> &'static [AchievementId] {
        &[
            Self::FirstClue,
            Self::TimelineJumper,
            Self::FastThinker,
            Self::EvidenceCollector,
            Self::QuantumMaster,
            Self::PerfectCase,
        ]
    }
}

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
