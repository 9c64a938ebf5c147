use serde::{Deserialize, Serialize};

use crate::{CharacterId, Level, NonEmptyString, Timeline};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterStatus {
    #[default]
    Available,
    Busy,
    Suspicious,
    Cooperative,
}

impl CharacterStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Busy => "busy",
            Self::Suspicious => "suspicious",
            Self::Cooperative => "cooperative",
        }
    }

    /// Status implied by the levels an interview left behind.
    #[must_use]
    pub fn from_levels(suspicion: Level, trust: Level) -> Self {
        if suspicion.value() >= 60 {
            Self::Suspicious
        } else if trust.value() > 60 {
            Self::Cooperative
        } else {
            Self::Available
        }
    }
}

/// A person of interest in the case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    id: CharacterId,
    name: NonEmptyString,
    #[serde(default)]
    role: String,
    #[serde(default)]
    suspicion_level: Level,
    #[serde(default)]
    trust_level: Level,
    #[serde(default)]
    timeline: Timeline,
    #[serde(default)]
    status: CharacterStatus,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    background: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    traits: Vec<String>,
}

impl Character {
    #[must_use]
    pub fn new(id: CharacterId, name: NonEmptyString, role: impl Into<String>) -> Self {
        Self {
            id,
            name,
            role: role.into(),
            suspicion_level: Level::default(),
            trust_level: Level::new(50),
            timeline: Timeline::Alpha,
            status: CharacterStatus::Available,
            background: String::new(),
            traits: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_levels(mut self, suspicion: Level, trust: Level) -> Self {
        self.suspicion_level = suspicion;
        self.trust_level = trust;
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: CharacterStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_timeline(mut self, timeline: Timeline) -> Self {
        self.timeline = timeline;
        self
    }

    #[must_use]
    pub fn with_background(mut self, background: impl Into<String>, traits: &[&str]) -> Self {
        self.background = background.into();
        self.traits = traits.iter().map(|t| (*t).to_string()).collect();
        self
    }

    #[must_use]
    pub fn id(&self) -> &CharacterId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    #[must_use]
    pub fn role(&self) -> &str {
        &self.role
    }

    #[must_use]
    pub fn suspicion_level(&self) -> Level {
        self.suspicion_level
    }

    #[must_use]
    pub fn trust_level(&self) -> Level {
        self.trust_level
    }

    #[must_use]
    pub fn timeline(&self) -> Timeline {
        self.timeline
    }

    #[must_use]
    pub fn status(&self) -> CharacterStatus {
        self.status
    }

    #[must_use]
    pub fn background(&self) -> &str {
        &self.background
    }

    #[must_use]
    pub fn traits(&self) -> &[String] {
        &self.traits
    }

    /// Record the outcome of an interview.
    pub fn record_interview(&mut self, suspicion: Level, trust: Level) {
        self.suspicion_level = suspicion;
        self.trust_level = trust;
        self.status = CharacterStatus::from_levels(suspicion, trust);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn witness() -> Character {
        Character::new(
            CharacterId::new("witness2").unwrap(),
            NonEmptyString::new("Marcus Webb").unwrap(),
            "Security Guard",
        )
    }

    #[test]
    fn record_interview_derives_status() {
        let mut c = witness();
        c.record_interview(Level::new(80), Level::new(20));
        assert_eq!(c.status(), CharacterStatus::Suspicious);

        c.record_interview(Level::new(10), Level::new(75));
        assert_eq!(c.status(), CharacterStatus::Cooperative);

        c.record_interview(Level::new(30), Level::new(50));
        assert_eq!(c.status(), CharacterStatus::Available);
    }

    #[test]
    fn deserializes_original_layout() {
        let json = serde_json::json!({
            "id": "witness1",
            "name": "Dr. Sarah Chen",
            "role": "Quantum Physicist",
            "suspicionLevel": 25,
            "trustLevel": 75,
            "timeline": "alpha",
            "status": "available",
            "traits": ["Analytical"]
        });
        let c: Character = serde_json::from_value(json).unwrap();
        assert_eq!(c.trust_level().value(), 75);
        assert_eq!(c.traits(), ["Analytical"]);
    }
}
