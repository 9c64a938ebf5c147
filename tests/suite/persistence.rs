//! Save slots, settings and auto-save as seen across separate sessions.

use std::fs;
use std::time::Duration;

use quantum_engine::{
    AchievementId, Difficulty, GameEffect, GameSettings, SessionCommand, SessionEvent, SlotIndex,
    SoundCue, Timeline, Volume,
};
use tempfile::tempdir;

use crate::common::{choose, id, playing, session, store};

fn slot(n: usize) -> SlotIndex {
    SlotIndex::new(n).unwrap()
}

#[test]
fn saved_case_loads_in_a_new_session() {
    let dir = tempdir().unwrap();
    let saved = {
        let mut s = playing(&dir);
        choose(&mut s, "1");
        s.apply(SessionCommand::SwitchTimeline {
            target: Timeline::Delta,
        });
        choose(&mut s, "2");
        assert_eq!(
            s.apply(SessionCommand::Save { slot: slot(2) }),
            SessionEvent::Saved {
                slot: slot(2),
                ok: true
            }
        );
        s.game().unwrap().snapshot().clone()
    };

    let mut s = session(&dir);
    assert_eq!(
        s.apply(SessionCommand::Load { slot: slot(2) }),
        SessionEvent::Loaded { slot: slot(2) }
    );
    let loaded = s.game().unwrap().snapshot();
    assert_eq!(loaded, &saved);
    assert_eq!(loaded.current_timeline(), Timeline::Delta);
    assert_eq!(loaded.quantum_energy().value(), 80);

    let summaries = store(&dir).slot_summaries();
    let summary = summaries[2].as_ref().unwrap();
    assert_eq!(summary.case.evidence_count, 2);
    assert_eq!(summary.version.as_deref(), Some("1.0.0"));
    assert!(summaries[1].is_none());
}

#[test]
fn loading_an_empty_or_corrupt_slot_fails_softly() {
    let dir = tempdir().unwrap();
    let mut s = session(&dir);
    assert_eq!(
        s.apply(SessionCommand::Load { slot: slot(1) }),
        SessionEvent::LoadFailed { slot: slot(1) }
    );

    fs::write(store(&dir).slot_path(slot(1)), "{ not json").unwrap();
    assert_eq!(
        s.apply(SessionCommand::Load { slot: slot(1) }),
        SessionEvent::LoadFailed { slot: slot(1) }
    );
    assert!(!s.is_playing());
    assert_eq!(s.sink().sounds, [SoundCue::Error, SoundCue::Error]);
    assert!(store(&dir).slot_summaries()[1].is_none());
}

#[test]
fn hand_edited_save_is_normalized_on_load() {
    let dir = tempdir().unwrap();
    let json = serde_json::json!({
        "currentTimeline": "gamma",
        "quantumEnergy": 250,
        "evidence": [
            { "id": "family_photo_beta", "name": "Family Photo" },
            { "id": "family_photo_beta", "name": "Family Photo (copy)" },
            { "id": "gala_ticket_beta", "name": "Charity Gala Ticket", "timeline": "beta" }
        ],
        "characters": [
            { "id": "witness1", "name": "Dr. Sarah Chen", "trustLevel": 75.4 }
        ],
        "storyProgress": { "alpha": 5, "gamma": 1 },
        "achievements": ["first_clue", "speed_runner"],
        "timestamp": 1_700_000_000_000_i64
    });
    fs::write(
        store(&dir).slot_path(SlotIndex::PRIMARY),
        serde_json::to_vec(&json).unwrap(),
    )
    .unwrap();

    let mut s = session(&dir);
    assert_eq!(
        s.apply(SessionCommand::Load {
            slot: SlotIndex::PRIMARY
        }),
        SessionEvent::Loaded {
            slot: SlotIndex::PRIMARY
        }
    );
    let game = s.game().unwrap().snapshot();
    assert_eq!(game.current_timeline(), Timeline::Gamma);
    assert_eq!(game.quantum_energy().value(), 100);
    assert_eq!(game.evidence().len(), 2);
    assert_eq!(
        game.find_evidence(&id("family_photo_beta")).unwrap().name(),
        "Family Photo"
    );
    assert_eq!(game.story_progress().values(), [5, 0, 1, 0]);
    assert_eq!(game.current_chapter(), 1);
    assert!(game.achievements().contains(&AchievementId::FirstClue));
    let witness = game
        .find_character(&quantum_engine::CharacterId::new("witness1").unwrap())
        .unwrap();
    assert_eq!(witness.trust_level().value(), 75);
}

#[test]
fn settings_survive_a_restart() {
    let dir = tempdir().unwrap();
    let custom = GameSettings {
        sound_enabled: false,
        music_volume: Volume::new(0.25),
        difficulty: Difficulty::Bender,
        ..GameSettings::default()
    };
    {
        let mut s = session(&dir);
        assert_eq!(
            s.apply(SessionCommand::UpdateSettings { settings: custom }),
            SessionEvent::SettingsUpdated { saved: true }
        );
    }
    assert_eq!(session(&dir).settings(), &custom);

    // Sound off: the failed load stays silent.
    let mut s = session(&dir);
    s.apply(SessionCommand::Load { slot: slot(2) });
    assert!(s.sink().sounds.is_empty());
}

#[test]
fn partial_settings_file_merges_over_defaults() {
    let dir = tempdir().unwrap();
    fs::write(
        store(&dir).settings_path(),
        r#"{ "autoSave": false, "subtitles": true }"#,
    )
    .unwrap();
    let settings = *session(&dir).settings();
    assert!(!settings.auto_save);
    assert!(settings.subtitles);
    assert!(settings.sound_enabled);
    assert_eq!(settings.difficulty, Difficulty::Investigator);
}

#[test]
fn significant_events_and_interval_both_autosave() {
    let dir = tempdir().unwrap();
    let mut s = playing(&dir);
    let primary = store(&dir).slot_path(SlotIndex::PRIMARY);
    assert!(!primary.exists());

    // Filing a clue changes the evidence count.
    choose(&mut s, "1");
    assert!(primary.exists());
    assert!(s.sink().effects.contains(&GameEffect::SaveCompleted {
        slot: SlotIndex::PRIMARY,
        ok: true
    }));

    assert_eq!(
        s.apply(SessionCommand::Tick {
            elapsed: Duration::from_secs(60)
        }),
        SessionEvent::Ticked { autosaved: None }
    );
    assert_eq!(
        s.apply(SessionCommand::Tick {
            elapsed: Duration::from_secs(60)
        }),
        SessionEvent::Ticked {
            autosaved: Some(true)
        }
    );
}

#[test]
fn autosave_disabled_writes_nothing() {
    let dir = tempdir().unwrap();
    let mut s = session(&dir);
    s.apply(SessionCommand::UpdateSettings {
        settings: GameSettings {
            auto_save: false,
            ..GameSettings::default()
        },
    });
    s.apply(SessionCommand::NewGame);
    choose(&mut s, "1");
    assert_eq!(
        s.apply(SessionCommand::Tick {
            elapsed: Duration::from_secs(3600)
        }),
        SessionEvent::Ticked { autosaved: None }
    );
    assert!(!store(&dir).has_any_save());
}

#[test]
fn deleting_a_slot() {
    let dir = tempdir().unwrap();
    let mut s = playing(&dir);
    s.apply(SessionCommand::Save { slot: slot(1) });
    assert_eq!(
        s.apply(SessionCommand::DeleteSave { slot: slot(1) }),
        SessionEvent::SaveDeleted {
            slot: slot(1),
            removed: true
        }
    );
    assert_eq!(
        s.apply(SessionCommand::DeleteSave { slot: slot(1) }),
        SessionEvent::SaveDeleted {
            slot: slot(1),
            removed: false
        }
    );
}
