//! Save slots and settings on disk.
//!
//! Layout under the data directory:
//!
//! ```text
//! quantum-detective-save-slot-0.json   GameState fields + timestamp + version
//! quantum-detective-save-slot-1.json
//! quantum-detective-save-slot-2.json
//! quantum-detective-settings.json      flat GameSettings
//! ```
//!
//! Persistence is best effort. Failures are logged and reported as `false` or
//! `None`; the game keeps running either way.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use quantum_core::{CaseSummary, GameState};
use quantum_types::{GameSettings, SlotIndex};
use quantum_utils::{FileSyncPolicy, atomic_write_with_sync, read_if_exists, remove_if_exists};

const SLOT_PREFIX: &str = "quantum-detective-save-slot-";
const SETTINGS_FILE: &str = "quantum-detective-settings.json";

#[derive(Serialize)]
struct SaveFileRef<'a> {
    #[serde(flatten)]
    state: &'a GameState,
    timestamp: i64,
    version: &'a str,
}

#[derive(Deserialize)]
struct SaveFile {
    #[serde(flatten)]
    state: GameState,
    #[serde(default)]
    timestamp: i64,
    #[serde(default)]
    version: Option<String>,
}

/// What the slot list shows without loading a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveSummary {
    pub slot: SlotIndex,
    /// Epoch milliseconds of the save.
    pub timestamp: i64,
    pub version: Option<String>,
    pub case: CaseSummary,
}

impl SaveSummary {
    #[must_use]
    pub fn saved_at(&self) -> Option<DateTime<Local>> {
        DateTime::<Utc>::from_timestamp_millis(self.timestamp).map(|t| t.with_timezone(&Local))
    }
}

#[derive(Debug, Clone)]
pub struct SaveStore {
    dir: PathBuf,
    sync: FileSyncPolicy,
}

impl SaveStore {
    pub const VERSION: &'static str = "1.0.0";

    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            sync: FileSyncPolicy::SyncAll,
        }
    }

    #[must_use]
    pub fn with_sync(mut self, sync: FileSyncPolicy) -> Self {
        self.sync = sync;
        self
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn slot_path(&self, slot: SlotIndex) -> PathBuf {
        self.dir.join(format!("{SLOT_PREFIX}{slot}.json"))
    }

    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.dir.join(SETTINGS_FILE)
    }

    /// Save stamped with the current wall-clock time.
    pub fn save_game(&self, state: &GameState, slot: SlotIndex) -> bool {
        self.save_game_at(state, slot, Utc::now().timestamp_millis())
    }

    pub fn save_game_at(&self, state: &GameState, slot: SlotIndex, timestamp: i64) -> bool {
        let path = self.slot_path(slot);
        let file = SaveFileRef {
            state,
            timestamp,
            version: Self::VERSION,
        };
        let bytes = match serde_json::to_vec_pretty(&file) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(%slot, "Failed to serialize game state: {e}");
                return false;
            }
        };
        match atomic_write_with_sync(&path, &bytes, self.sync) {
            Ok(()) => {
                tracing::info!(%slot, path = %path.display(), "Game saved");
                true
            }
            Err(e) => {
                tracing::warn!(%slot, path = %path.display(), "Failed to save game: {e}");
                false
            }
        }
    }

    /// Missing and unreadable slots both load as `None`.
    #[must_use]
    pub fn load_game(&self, slot: SlotIndex) -> Option<GameState> {
        self.read_slot(slot).map(|file| file.state)
    }

    /// Returns `false` if the slot was already empty or could not be removed.
    pub fn delete_game(&self, slot: SlotIndex) -> bool {
        let path = self.slot_path(slot);
        match remove_if_exists(&path) {
            Ok(removed) => {
                if removed {
                    tracing::info!(%slot, "Save deleted");
                }
                removed
            }
            Err(e) => {
                tracing::warn!(%slot, path = %path.display(), "Failed to delete save: {e}");
                false
            }
        }
    }

    #[must_use]
    pub fn slot_summaries(&self) -> [Option<SaveSummary>; SlotIndex::COUNT] {
        let mut summaries = [None, None, None];
        for slot in SlotIndex::all() {
            summaries[slot.get()] = self.read_slot(slot).map(|file| SaveSummary {
                slot,
                timestamp: file.timestamp,
                case: CaseSummary::of(&file.state, file.timestamp),
                version: file.version,
            });
        }
        summaries
    }

    #[must_use]
    pub fn has_any_save(&self) -> bool {
        self.slot_summaries().iter().any(Option::is_some)
    }

    /// Stored settings merged over the defaults. A missing or corrupt file
    /// yields the defaults.
    #[must_use]
    pub fn load_settings(&self) -> GameSettings {
        let path = self.settings_path();
        let text = match read_if_exists(&path) {
            Ok(Some(text)) => text,
            Ok(None) => return GameSettings::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), "Failed to read settings: {e}");
                return GameSettings::default();
            }
        };
        serde_json::from_str(&text).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), "Failed to parse settings: {e}");
            GameSettings::default()
        })
    }

    pub fn save_settings(&self, settings: &GameSettings) -> bool {
        let path = self.settings_path();
        let bytes = match serde_json::to_vec_pretty(settings) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Failed to serialize settings: {e}");
                return false;
            }
        };
        match atomic_write_with_sync(&path, &bytes, self.sync) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(path = %path.display(), "Failed to save settings: {e}");
                false
            }
        }
    }

    fn read_slot(&self, slot: SlotIndex) -> Option<SaveFile> {
        let path = self.slot_path(slot);
        let text = match read_if_exists(&path) {
            Ok(text) => text?,
            Err(e) => {
                tracing::warn!(%slot, path = %path.display(), "Failed to read save: {e}");
                return None;
            }
        };
        match serde_json::from_str::<SaveFile>(&text) {
            Ok(file) => Some(file),
            Err(e) => {
                tracing::warn!(%slot, path = %path.display(), "Failed to parse save: {e}");
                None
            }
        }
    }
}
