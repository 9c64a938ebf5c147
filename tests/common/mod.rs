//! Shared fixtures for the integration suite.

use std::time::Duration;

use quantum_engine::{
    EvidenceId, FileSyncPolicy, GameSession, RecordingSink, SaveStore, SessionCommand,
    SessionEvent,
};
use tempfile::TempDir;

/// 2023-11-14T22:13:20Z.
pub const FIXED_NOW: i64 = 1_700_000_000_000;

pub fn fixed_clock() -> i64 {
    FIXED_NOW
}

pub fn store(dir: &TempDir) -> SaveStore {
    SaveStore::new(dir.path()).with_sync(FileSyncPolicy::SkipSync)
}

/// Session at the main menu, saving into `dir`.
pub fn session(dir: &TempDir) -> GameSession<RecordingSink> {
    GameSession::new(store(dir), Duration::from_secs(120), RecordingSink::new())
        .with_clock(fixed_clock)
}

/// Session with a fresh case open.
pub fn playing(dir: &TempDir) -> GameSession<RecordingSink> {
    let mut session = session(dir);
    assert_eq!(session.apply(SessionCommand::NewGame), SessionEvent::GameStarted);
    session
}

pub fn choose(session: &mut GameSession<RecordingSink>, choice: &str) -> SessionEvent {
    session.apply(SessionCommand::Choose {
        choice: choice.to_string(),
    })
}

pub fn id(raw: &str) -> EvidenceId {
    EvidenceId::new(raw).expect("fixture ids are non-empty")
}

pub type Session = GameSession<RecordingSink>;
