//! Witness interview state machine.
//!
//! ```text
//! Intro --begin()--> Questioning --last answer--> Conclusion
//! ```
//!
//! Each approach shifts the witness' stress and trust by a fixed amount.
//! Whether a truth was revealed or a lie detected is read off those two
//! counters after every turn. That is a heuristic over how the detective
//! behaves, not a comparison with what the witness actually knows, and it is
//! meant to stay that way.

use quantum_types::{Character, CharacterId, Level};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Approach {
    Neutral,
    Aggressive,
    Sympathetic,
    Probing,
}

impl Approach {
    pub const ALL: [Approach; 4] = [
        Approach::Neutral,
        Approach::Aggressive,
        Approach::Sympathetic,
        Approach::Probing,
    ];

    #[must_use]
    pub const fn stress_delta(self) -> i32 {
        match self {
            Self::Neutral => 2,
            Self::Aggressive => 15,
            Self::Sympathetic => -5,
            Self::Probing => 8,
        }
    }

    #[must_use]
    pub const fn trust_delta(self) -> i32 {
        match self {
            Self::Sympathetic => 5,
            Self::Aggressive => -10,
            Self::Neutral | Self::Probing => 0,
        }
    }

    #[must_use]
    pub const fn line(self) -> &'static str {
        match self {
            Self::Neutral => "Can you tell me more about that?",
            Self::Aggressive => "I think you're lying to me.",
            Self::Sympathetic => "I understand this must be difficult.",
            Self::Probing => "Are you absolutely certain about that?",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Aggressive => "aggressive",
            Self::Sympathetic => "sympathetic",
            Self::Probing => "probing",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "neutral" | "n" | "1" => Some(Self::Neutral),
            "aggressive" | "a" | "2" => Some(Self::Aggressive),
            "sympathetic" | "s" | "3" => Some(Self::Sympathetic),
            "probing" | "p" | "4" => Some(Self::Probing),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emotion {
    Calm,
    Nervous,
    Defensive,
    Cooperative,
    Suspicious,
}

impl Emotion {
    #[must_use]
    pub fn from_levels(stress: Level, trust: Level) -> Self {
        let (stress, trust) = (stress.value(), trust.value());
        if stress > 70 {
            Self::Defensive
        } else if stress > 40 {
            Self::Nervous
        } else if trust > 60 {
            Self::Cooperative
        } else if trust < 30 {
            Self::Suspicious
        } else {
            Self::Calm
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Calm => "calm",
            Self::Nervous => "nervous",
            Self::Defensive => "defensive",
            Self::Cooperative => "cooperative",
            Self::Suspicious => "suspicious",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Intro,
    Questioning,
    Conclusion,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Question {
    pub id: &'static str,
    pub text: &'static str,
}

pub static QUESTIONS: [Question; 3] = [
    Question {
        id: "whereabouts",
        text: "Where were you at the time of the incident?",
    },
    Question {
        id: "knowledge",
        text: "What do you know about the victim?",
    },
    Question {
        id: "motive",
        text: "Did you have any reason to wish harm to the victim?",
    },
];

const MICRO_EXPRESSIONS: [&str; 4] = [
    "eye twitch",
    "lip compression",
    "nostril flare",
    "hand fidgeting",
];
const MICRO_EXPRESSION_STRESS: u8 = 60;
const MICRO_EXPRESSION_KEEP: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterviewError {
    #[error("the interview has not started yet")]
    NotStarted,
    #[error("the interview is already underway")]
    AlreadyStarted,
    #[error("the interview is over")]
    Concluded,
    #[error("the interview is still in progress")]
    InProgress,
}

/// Result of one answered question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reading {
    TruthRevealed(String),
    LieDetected(String),
    Inconclusive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub question: &'static str,
    pub approach: Approach,
    pub emotion: Emotion,
    pub reading: Reading,
}

/// What the interview established, handed back to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewReport {
    pub character_id: CharacterId,
    pub truths_revealed: Vec<(String, String)>,
    pub lies_detected: Vec<String>,
    pub final_trust: Level,
    pub final_stress: Level,
    pub suspicion_level: Level,
}

#[derive(Debug, Clone)]
pub struct WitnessInterview {
    character_id: CharacterId,
    name: String,
    phase: Phase,
    question: usize,
    stress: Level,
    trust: Level,
    emotion: Emotion,
    truths: Vec<(String, String)>,
    lies: Vec<String>,
    micro_expressions: Vec<&'static str>,
    turns: usize,
}

impl WitnessInterview {
    /// Open an interview. Stress starts from the witness' current suspicion.
    #[must_use]
    pub fn new(witness: &Character) -> Self {
        let stress = witness.suspicion_level();
        let trust = witness.trust_level();
        Self {
            character_id: witness.id().clone(),
            name: witness.name().to_string(),
            phase: Phase::Intro,
            question: 0,
            stress,
            trust,
            emotion: Emotion::from_levels(stress, trust),
            truths: Vec::new(),
            lies: Vec::new(),
            micro_expressions: Vec::new(),
            turns: 0,
        }
    }

    pub fn begin(&mut self) -> Result<&'static Question, InterviewError> {
        match self.phase {
            Phase::Intro => {
                self.phase = Phase::Questioning;
                Ok(&QUESTIONS[self.question])
            }
            Phase::Questioning => Err(InterviewError::AlreadyStarted),
            Phase::Conclusion => Err(InterviewError::Concluded),
        }
    }

    /// Answer the current question with `approach`.
    pub fn ask(&mut self, approach: Approach) -> Result<Turn, InterviewError> {
        match self.phase {
            Phase::Intro => return Err(InterviewError::NotStarted),
            Phase::Conclusion => return Err(InterviewError::Concluded),
            Phase::Questioning => {}
        }

        let question = &QUESTIONS[self.question];
        self.stress = self.stress.shifted(approach.stress_delta());
        self.trust = self.trust.shifted(approach.trust_delta());
        self.emotion = Emotion::from_levels(self.stress, self.trust);
        self.turns += 1;

        let reading = if self.trust.value() > 60 && self.stress.value() < 40 {
            let truth = format!("Revealed truth about {}", question.id);
            self.truths.push((question.id.to_string(), truth.clone()));
            Reading::TruthRevealed(truth)
        } else if self.stress.value() > 70 {
            let lie = format!("Detected lie about {}", question.id);
            self.lies.push(lie.clone());
            Reading::LieDetected(lie)
        } else {
            Reading::Inconclusive
        };

        if self.stress.value() > MICRO_EXPRESSION_STRESS {
            let tell = MICRO_EXPRESSIONS[(self.turns + self.question) % MICRO_EXPRESSIONS.len()];
            self.micro_expressions.push(tell);
            if self.micro_expressions.len() > MICRO_EXPRESSION_KEEP {
                self.micro_expressions.remove(0);
            }
        }

        tracing::debug!(
            witness = %self.character_id,
            question = question.id,
            approach = approach.as_str(),
            stress = self.stress.value(),
            trust = self.trust.value(),
            "Interview turn"
        );

        if self.question + 1 < QUESTIONS.len() {
            self.question += 1;
        } else {
            self.phase = Phase::Conclusion;
        }

        Ok(Turn {
            question: question.id,
            approach,
            emotion: self.emotion,
            reading,
        })
    }

    /// Close a concluded interview and summarize it.
    pub fn finish(&self) -> Result<InterviewReport, InterviewError> {
        match self.phase {
            Phase::Intro => Err(InterviewError::NotStarted),
            Phase::Questioning => Err(InterviewError::InProgress),
            Phase::Conclusion => {
                let lies = i32::try_from(self.lies.len()).unwrap_or(i32::MAX);
                let suspicion = 100 - i32::from(self.trust.value()) + lies.saturating_mul(20);
                Ok(InterviewReport {
                    character_id: self.character_id.clone(),
                    truths_revealed: self.truths.clone(),
                    lies_detected: self.lies.clone(),
                    final_trust: self.trust,
                    final_stress: self.stress,
                    suspicion_level: Level::new(suspicion),
                })
            }
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The question waiting for an answer, if questioning is underway.
    #[must_use]
    pub fn current_question(&self) -> Option<&'static Question> {
        (self.phase == Phase::Questioning).then(|| &QUESTIONS[self.question])
    }

    #[must_use]
    pub fn question_number(&self) -> usize {
        self.question + 1
    }

    #[must_use]
    pub fn witness_name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn character_id(&self) -> &CharacterId {
        &self.character_id
    }

    #[must_use]
    pub fn stress(&self) -> Level {
        self.stress
    }

    #[must_use]
    pub fn trust(&self) -> Level {
        self.trust
    }

    #[must_use]
    pub fn emotion(&self) -> Emotion {
        self.emotion
    }

    #[must_use]
    pub fn truths(&self) -> impl Iterator<Item = &str> {
        self.truths.iter().map(|(_, t)| t.as_str())
    }

    #[must_use]
    pub fn lies(&self) -> &[String] {
        &self.lies
    }

    #[must_use]
    pub fn micro_expressions(&self) -> &[&'static str] {
        &self.micro_expressions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quantum_types::NonEmptyString;

    fn witness(suspicion: i32, trust: i32) -> Character {
        Character::new(
            CharacterId::new("witness1").unwrap(),
            NonEmptyString::new("Dr. Sarah Chen").unwrap(),
            "Quantum Physicist",
        )
        .with_levels(Level::new(suspicion), Level::new(trust))
    }

    #[test]
    fn cannot_ask_before_begin_or_after_conclusion() {
        let mut interview = WitnessInterview::new(&witness(25, 75));
        assert_eq!(
            interview.ask(Approach::Neutral),
            Err(InterviewError::NotStarted)
        );
        interview.begin().unwrap();
        assert_eq!(interview.begin().err(), Some(InterviewError::AlreadyStarted));
        for _ in 0..QUESTIONS.len() {
            interview.ask(Approach::Neutral).unwrap();
        }
        assert_eq!(interview.phase(), Phase::Conclusion);
        assert_eq!(
            interview.ask(Approach::Neutral),
            Err(InterviewError::Concluded)
        );
        assert_eq!(interview.begin().err(), Some(InterviewError::Concluded));
    }

    #[test]
    fn sympathetic_with_trusting_witness_reveals_truths() {
        let mut interview = WitnessInterview::new(&witness(25, 75));
        interview.begin().unwrap();
        let turn = interview.ask(Approach::Sympathetic).unwrap();
        assert_eq!(
            turn.reading,
            Reading::TruthRevealed("Revealed truth about whereabouts".to_string())
        );
        assert_eq!(turn.emotion, Emotion::Cooperative);
        assert_eq!(interview.stress().value(), 20);
        assert_eq!(interview.trust().value(), 80);
    }

    #[test]
    fn aggressive_pressure_detects_lies() {
        let mut interview = WitnessInterview::new(&witness(60, 40));
        interview.begin().unwrap();
        let turn = interview.ask(Approach::Aggressive).unwrap();
        // 60 + 15 = 75 stress, 40 - 10 = 30 trust.
        assert_eq!(
            turn.reading,
            Reading::LieDetected("Detected lie about whereabouts".to_string())
        );
        assert_eq!(turn.emotion, Emotion::Defensive);
        assert_eq!(interview.micro_expressions().len(), 1);
    }

    #[test]
    fn middle_ground_is_inconclusive() {
        let mut interview = WitnessInterview::new(&witness(45, 50));
        interview.begin().unwrap();
        let turn = interview.ask(Approach::Neutral).unwrap();
        assert_eq!(turn.reading, Reading::Inconclusive);
        assert_eq!(turn.emotion, Emotion::Nervous);
    }

    #[test]
    fn levels_stay_clamped() {
        let mut interview = WitnessInterview::new(&witness(95, 5));
        interview.begin().unwrap();
        for _ in 0..QUESTIONS.len() {
            interview.ask(Approach::Aggressive).unwrap();
        }
        assert_eq!(interview.stress().value(), 100);
        assert_eq!(interview.trust().value(), 0);
        assert_eq!(interview.micro_expressions().len(), 3);
    }

    #[test]
    fn finish_reports_suspicion() {
        let mut interview = WitnessInterview::new(&witness(60, 40));
        assert_eq!(interview.finish().err(), Some(InterviewError::NotStarted));
        interview.begin().unwrap();
        interview.ask(Approach::Aggressive).unwrap();
        assert_eq!(interview.finish().err(), Some(InterviewError::InProgress));
        interview.ask(Approach::Aggressive).unwrap();
        interview.ask(Approach::Aggressive).unwrap();

        let report = interview.finish().unwrap();
        assert_eq!(report.lies_detected.len(), 3);
        assert!(report.truths_revealed.is_empty());
        assert_eq!(report.final_trust.value(), 10);
        // 100 - 10 + 3 * 20 = 150, clamped.
        assert_eq!(report.suspicion_level.value(), 100);
    }

    #[test]
    fn approach_parse() {
        assert_eq!(Approach::parse("S"), Some(Approach::Sympathetic));
        assert_eq!(Approach::parse("4"), Some(Approach::Probing));
        assert_eq!(Approach::parse("flatter"), None);
    }
}
