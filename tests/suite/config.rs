//! A config file steering where and how often the game saves.

use std::fs;
use std::time::Duration;

use quantum_config::AppConfig;
use quantum_engine::{GameSession, NullSink, SessionCommand, SessionEvent, SlotIndex};
use tempfile::tempdir;

#[test]
fn session_follows_config_file() {
    let home = tempdir().unwrap();
    let path = home.path().join("config.toml");
    fs::write(
        &path,
        "[app]\ndata_dir = \"saves\"\ndefault_slot = 2\n\n[autosave]\ninterval_secs = 30\n",
    )
    .unwrap();

    let config = AppConfig::load_from(&path, home.path()).unwrap();
    assert_eq!(config.data_dir, home.path().join("saves"));
    assert_eq!(config.default_slot, SlotIndex::new(2).unwrap());
    assert_eq!(config.autosave_interval, Duration::from_secs(30));

    let mut session = GameSession::from_config(&config, NullSink);
    session.apply(SessionCommand::NewGame);
    assert_eq!(
        session.apply(SessionCommand::Tick {
            elapsed: Duration::from_secs(30)
        }),
        SessionEvent::Ticked {
            autosaved: Some(true)
        }
    );
    assert!(
        session
            .store()
            .slot_path(SlotIndex::PRIMARY)
            .starts_with(home.path().join("saves"))
    );
    assert!(session.store().has_any_save());
}

#[test]
fn broken_config_reports_its_path() {
    let home = tempdir().unwrap();
    let path = home.path().join("config.toml");
    fs::write(&path, "[autosave\ninterval_secs = 30").unwrap();

    let err = AppConfig::load_from(&path, home.path()).unwrap_err();
    assert_eq!(err.path(), path.as_path());
    assert!(err.to_string().starts_with("failed to parse config at "));
}
