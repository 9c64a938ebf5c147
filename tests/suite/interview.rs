//! Witness interviews from opening to the case file.

use quantum_engine::{
    Approach, CharacterId, CharacterStatus, Emotion, InterviewApplied, InterviewReport, Level,
    Phase, Reading, SessionCommand, SessionEvent,
};
use tempfile::tempdir;

use crate::common::{Session, id, playing};

fn witness(raw: &str) -> CharacterId {
    CharacterId::new(raw).unwrap()
}

fn interview(s: &mut Session, character: &str, approach: Approach) -> Vec<Reading> {
    assert!(matches!(
        s.apply(SessionCommand::OpenInterview {
            character: witness(character)
        }),
        SessionEvent::InterviewOpened { .. }
    ));
    assert!(matches!(
        s.apply(SessionCommand::BeginQuestioning),
        SessionEvent::InterviewQuestion { number: 1, .. }
    ));
    let mut readings = Vec::new();
    loop {
        let SessionEvent::InterviewTurn { turn, next } = s.apply(SessionCommand::Ask { approach })
        else {
            panic!("expected an answered question");
        };
        readings.push(turn.reading);
        if next.is_none() {
            break;
        }
    }
    readings
}

#[test]
fn sympathetic_questioning_earns_testimony() {
    let dir = tempdir().unwrap();
    let mut s = playing(&dir);

    let readings = interview(&mut s, "witness1", Approach::Sympathetic);
    assert_eq!(readings.len(), 3);
    assert!(
        readings
            .iter()
            .all(|r| matches!(r, Reading::TruthRevealed(_)))
    );
    assert_eq!(
        s.interview().map(|i| i.phase()),
        Some(Phase::Conclusion)
    );
    assert_eq!(
        s.apply(SessionCommand::CloseInterview),
        SessionEvent::InterviewClosed {
            applied: Some(InterviewApplied::Applied { truths_added: 3 })
        }
    );

    let game = s.game().unwrap().snapshot();
    for question in ["whereabouts", "knowledge", "motive"] {
        let clue = game
            .find_evidence(&id(&format!("interview_witness1_{question}")))
            .unwrap();
        assert_eq!(
            clue.name(),
            format!("Testimony: Dr. Sarah Chen on {question}")
        );
    }
    let sarah = game.find_character(&witness("witness1")).unwrap();
    assert_eq!(sarah.trust_level().value(), 90);
    assert_eq!(sarah.suspicion_level().value(), 10);
    assert_eq!(sarah.status(), CharacterStatus::Cooperative);

    // The same truths a second time add nothing new.
    interview(&mut s, "witness1", Approach::Sympathetic);
    assert_eq!(
        s.apply(SessionCommand::CloseInterview),
        SessionEvent::InterviewClosed {
            applied: Some(InterviewApplied::Applied { truths_added: 0 })
        }
    );
    assert_eq!(s.game().unwrap().snapshot().evidence().len(), 3);
}

#[test]
fn pressure_exposes_lies_and_raises_suspicion() {
    let dir = tempdir().unwrap();
    let mut s = playing(&dir);

    let readings = interview(&mut s, "witness2", Approach::Aggressive);
    assert!(
        readings
            .iter()
            .all(|r| matches!(r, Reading::LieDetected(_)))
    );
    let open = s.interview().unwrap();
    assert_eq!(open.emotion(), Emotion::Defensive);
    assert_eq!(open.stress().value(), 100);
    assert_eq!(open.lies().len(), 3);
    assert_eq!(open.micro_expressions().len(), 3);

    assert_eq!(
        s.apply(SessionCommand::CloseInterview),
        SessionEvent::InterviewClosed {
            applied: Some(InterviewApplied::Applied { truths_added: 0 })
        }
    );
    let game = s.game().unwrap().snapshot();
    assert!(game.evidence().is_empty());
    let marcus = game.find_character(&witness("witness2")).unwrap();
    assert_eq!(marcus.suspicion_level().value(), 100);
    assert_eq!(marcus.status(), CharacterStatus::Suspicious);
}

#[test]
fn questioning_out_of_order_is_rejected() {
    let dir = tempdir().unwrap();
    let mut s = playing(&dir);
    assert_eq!(
        s.apply(SessionCommand::BeginQuestioning),
        SessionEvent::NoInterview
    );
    interview(&mut s, "witness1", Approach::Neutral);
    assert!(matches!(
        s.apply(SessionCommand::Ask {
            approach: Approach::Neutral
        }),
        SessionEvent::InterviewRejected(_)
    ));
    assert!(matches!(
        s.apply(SessionCommand::BeginQuestioning),
        SessionEvent::InterviewRejected(_)
    ));
}

#[test]
fn report_for_a_stranger_changes_nothing() {
    let dir = tempdir().unwrap();
    let mut s = playing(&dir);
    let before = s.game().unwrap().snapshot().clone();

    let report = InterviewReport {
        character_id: witness("stranger"),
        truths_revealed: vec![("motive".to_string(), "It was me".to_string())],
        lies_detected: Vec::new(),
        final_trust: Level::new(80),
        final_stress: Level::new(10),
        suspicion_level: Level::new(20),
    };
    assert_eq!(
        s.apply(SessionCommand::ApplyInterview { report }),
        SessionEvent::InterviewApplied(InterviewApplied::UnknownCharacter)
    );
    assert_eq!(s.game().unwrap().snapshot(), &before);
}
