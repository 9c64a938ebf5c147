//! Playing a case end to end through `GameSession`.

use std::collections::BTreeSet;

use quantum_engine::{
    AchievementId, Evidence, EvidenceAdd, EvidenceId, GameEffect, GameState, GameStateController,
    QuantumEnergy, SessionCommand, SessionEvent, StoryProgress, Timeline, TimelineSwitch,
};
use quantum_types::NonEmptyString;
use tempfile::tempdir;

use crate::common::{choose, id, playing};

fn switch(target: Timeline) -> SessionCommand {
    SessionCommand::SwitchTimeline { target }
}

fn solve(answer: &str) -> SessionCommand {
    SessionCommand::SolveChallenge {
        answer: answer.to_string(),
    }
}

fn clue(n: usize) -> Evidence {
    Evidence::new(
        EvidenceId::new(format!("clue_{n}")).unwrap(),
        NonEmptyString::new(format!("Clue {n}")).unwrap(),
        "",
    )
}

#[test]
fn cross_timeline_investigation() {
    let dir = tempdir().unwrap();
    let mut s = playing(&dir);

    let SessionEvent::Chose { evidence, .. } = choose(&mut s, "examine_body") else {
        panic!("expected a choice");
    };
    assert_eq!(evidence, Some((id("suicide_note_alpha"), EvidenceAdd::Added)));

    // Scene two carries the hacking challenge and the coffee cup.
    assert_eq!(s.apply(solve("nonsense")), SessionEvent::ChallengeFailed);
    let SessionEvent::ChallengeSolved { reward, add } = s.apply(solve(" quantum ")) else {
        panic!("expected the challenge to be solved");
    };
    assert_eq!(reward.id().as_str(), "adventure_alpha_1");
    assert_eq!(add, EvidenceAdd::Added);
    assert_eq!(
        s.apply(SessionCommand::CollectEvidence),
        SessionEvent::EvidenceCollected {
            id: id("lipstick_cup_alpha"),
            add: EvidenceAdd::Added,
        }
    );
    let SessionEvent::Chose { evidence, .. } = choose(&mut s, "2") else {
        panic!("expected a choice");
    };
    assert_eq!(evidence, Some((id("lipstick_cup_alpha"), EvidenceAdd::Duplicate)));

    assert_eq!(
        s.apply(switch(Timeline::Beta)),
        SessionEvent::Switched(TimelineSwitch::Switched {
            from: Timeline::Alpha,
            to: Timeline::Beta,
        })
    );
    choose(&mut s, "1");

    let combine = || SessionCommand::Combine {
        first: id("lipstick_cup_alpha"),
        second: id("family_photo_beta"),
    };
    let SessionEvent::Combined { result, add } = s.apply(combine()) else {
        panic!("expected a connection");
    };
    assert_eq!(result.id().as_str(), "cross_timeline_connection");
    assert_eq!(add, EvidenceAdd::Added);
    assert!(matches!(
        s.apply(combine()),
        SessionEvent::Combined {
            add: EvidenceAdd::Duplicate,
            ..
        }
    ));
    assert!(matches!(
        s.apply(SessionCommand::Combine {
            first: id("suicide_note_alpha"),
            second: id("family_photo_beta"),
        }),
        SessionEvent::NoConnection(_)
    ));

    let game = s.game().unwrap().snapshot();
    assert_eq!(game.current_timeline(), Timeline::Beta);
    assert_eq!(game.quantum_energy().value(), 80);
    assert_eq!(game.story_progress().values(), [2, 1, 0, 0]);
    assert_eq!(game.evidence().len(), 5);
    let photo = game.find_evidence(&id("family_photo_beta")).unwrap();
    assert_eq!(photo.timeline(), Some(Timeline::Beta));
    assert_eq!(
        game.achievements(),
        &BTreeSet::from([
            AchievementId::FirstClue,
            AchievementId::TimelineJumper,
            AchievementId::FastThinker,
        ])
    );

    let effects = &s.sink().effects;
    assert!(effects.contains(&GameEffect::TimelineSwitched { to: Timeline::Beta }));
    let discovered = GameEffect::CombinationDiscovered {
        id: id("cross_timeline_connection"),
    };
    assert_eq!(effects.iter().filter(|e| **e == discovered).count(), 1);
    assert!(!s.sink().sounds.is_empty());
}

#[test]
fn energy_runs_dry_after_five_jumps() {
    let dir = tempdir().unwrap();
    let mut s = playing(&dir);

    assert_eq!(
        s.apply(switch(Timeline::Alpha)),
        SessionEvent::Switched(TimelineSwitch::SameTimeline)
    );
    for target in [
        Timeline::Beta,
        Timeline::Gamma,
        Timeline::Delta,
        Timeline::Alpha,
        Timeline::Beta,
    ] {
        assert!(matches!(
            s.apply(switch(target)),
            SessionEvent::Switched(TimelineSwitch::Switched { .. })
        ));
    }
    assert_eq!(
        s.apply(switch(Timeline::Gamma)),
        SessionEvent::Switched(TimelineSwitch::InsufficientEnergy)
    );

    let game = s.game().unwrap().snapshot();
    assert_eq!(game.quantum_energy().value(), 0);
    assert_eq!(game.current_timeline(), Timeline::Beta);
}

#[test]
fn every_reality_visited_unlocks_reality_bender() {
    let dir = tempdir().unwrap();
    let mut s = playing(&dir);
    choose(&mut s, "1");
    for target in [Timeline::Beta, Timeline::Gamma] {
        s.apply(switch(target));
        choose(&mut s, "1");
    }
    let bender = |s: &crate::common::Session| {
        s.game()
            .unwrap()
            .snapshot()
            .achievements()
            .contains(&AchievementId::QuantumMaster)
    };
    assert!(!bender(&s));

    s.apply(switch(Timeline::Delta));
    choose(&mut s, "1");
    assert!(bender(&s));
    assert!(s.sink().effects.contains(&GameEffect::AchievementUnlocked {
        id: AchievementId::QuantumMaster,
        points: 50,
    }));
}

#[test]
fn tenth_clue_unlocks_master_investigator() {
    let dir = tempdir().unwrap();
    let mut s = playing(&dir);

    for scene in 0..6 {
        match scene {
            1 => assert!(matches!(s.apply(solve("QUANTUM")), SessionEvent::ChallengeSolved { .. })),
            4 => assert!(matches!(s.apply(solve("b")), SessionEvent::ChallengeSolved { .. })),
            _ => assert_eq!(s.apply(solve("anything")), SessionEvent::NoChallenge),
        }
        assert!(matches!(choose(&mut s, "1"), SessionEvent::Chose { .. }));
    }
    assert_eq!(
        choose(&mut s, "1"),
        SessionEvent::TimelineExhausted {
            timeline: Timeline::Alpha
        }
    );
    assert_eq!(s.game().unwrap().snapshot().evidence().len(), 8);

    s.apply(switch(Timeline::Beta));
    choose(&mut s, "1");
    let collector = |s: &crate::common::Session| {
        s.game()
            .unwrap()
            .snapshot()
            .achievements()
            .contains(&AchievementId::EvidenceCollector)
    };
    assert!(!collector(&s));

    assert!(matches!(
        s.apply(solve("Twin Sister")),
        SessionEvent::ChallengeSolved { .. }
    ));
    assert_eq!(s.game().unwrap().snapshot().evidence().len(), 10);
    assert!(collector(&s));
}

#[test]
fn achievement_evaluation_is_idempotent() {
    let state = GameState::new_game(0)
        .with_progress(StoryProgress::new([5, 5, 5, 5]))
        .with_evidence((0..15).map(clue));
    let mut game = GameStateController::new(state);

    let first = game.evaluate_achievements(&BTreeSet::new());
    assert_eq!(first, game.evaluate_achievements(&BTreeSet::new()));
    assert!(first.iter().any(|a| a.id == AchievementId::PerfectCase));

    let unlocked = game.unlock_achievements();
    assert_eq!(unlocked.len(), 6);
    assert!(game.unlock_achievements().is_empty());
    assert!(
        game.evaluate_achievements(game.snapshot().achievements())
            .is_empty()
    );
}

#[test]
fn low_energy_switch_leaves_state_untouched() {
    let state = GameState::new_game(0).with_energy(QuantumEnergy::new(15));
    let mut game = GameStateController::new(state.clone());

    assert_eq!(
        game.switch_timeline(Timeline::Beta),
        TimelineSwitch::InsufficientEnergy
    );
    assert_eq!(game.snapshot(), &state);
    assert_eq!(game.revision(), 0);
    assert!(game.take_effects().is_empty());
}
