//! Application configuration for Quantum Detective.
//!
//! The config file lives at `~/.quantum-detective/config.toml` (or under
//! `$QUANTUM_DETECTIVE_HOME` when set). Every key is optional:
//!
//! ```toml
//! [app]
//! data_dir = "${HOME}/games/quantum"
//! default_slot = 1
//!
//! [autosave]
//! interval_secs = 90
//! ```

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use quantum_types::SlotIndex;
use serde::Deserialize;
use thiserror::Error;

pub const HOME_ENV: &str = "QUANTUM_DETECTIVE_HOME";
pub const DEFAULT_AUTOSAVE_SECS: u64 = 120;
const MIN_AUTOSAVE_SECS: u64 = 10;

// ============================================================================
// Raw file layout
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct QuantumConfig {
    pub app: Option<RawAppSection>,
    pub autosave: Option<RawAutosaveSection>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawAppSection {
    pub data_dir: Option<String>,
    pub default_slot: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawAutosaveSection {
    pub interval_secs: Option<u64>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

// ============================================================================
// Resolved configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Save slots, settings and logs live here.
    pub data_dir: PathBuf,
    pub autosave_interval: Duration,
    /// Slot used by `save`/`load` when none is given.
    pub default_slot: SlotIndex,
}

impl AppConfig {
    /// Defaults rooted at `base_dir`.
    #[must_use]
    pub fn defaults_in(base_dir: &Path) -> Self {
        Self {
            data_dir: base_dir.to_path_buf(),
            autosave_interval: Duration::from_secs(DEFAULT_AUTOSAVE_SECS),
            default_slot: SlotIndex::PRIMARY,
        }
    }

    /// Load from the standard location. A missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let Some(base) = config_dir() else {
            tracing::warn!("No home directory; using working directory for game data");
            return Ok(Self::defaults_in(Path::new(".")));
        };
        Self::load_from(&base.join("config.toml"), &base)
    }

    pub fn load_from(path: &Path, base_dir: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::defaults_in(base_dir));
        }
        let content = fs::read_to_string(path).map_err(|source| {
            tracing::warn!(path = %path.display(), "Failed to read config: {source}");
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let raw: QuantumConfig = toml::from_str(&content).map_err(|source| {
            tracing::warn!(path = %path.display(), "Failed to parse config: {source}");
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Ok(Self::resolve(raw, base_dir))
    }

    /// Apply a parsed file over the defaults. Out-of-range values are logged
    /// and replaced by their defaults.
    #[must_use]
    pub fn resolve(raw: QuantumConfig, base_dir: &Path) -> Self {
        let mut config = Self::defaults_in(base_dir);
        let app = raw.app.unwrap_or_default();

        if let Some(dir) = app.data_dir {
            let expanded = expand_env_vars(&dir);
            let path = PathBuf::from(expanded.trim());
            config.data_dir = if path.is_absolute() {
                path
            } else {
                base_dir.join(path)
            };
        }

        if let Some(slot) = app.default_slot {
            match SlotIndex::new(slot) {
                Ok(slot) => config.default_slot = slot,
                Err(e) => tracing::warn!("Ignoring app.default_slot: {e}"),
            }
        }

        if let Some(secs) = raw.autosave.and_then(|a| a.interval_secs) {
            if secs < MIN_AUTOSAVE_SECS {
                tracing::warn!(
                    secs,
                    min = MIN_AUTOSAVE_SECS,
                    "Ignoring autosave.interval_secs below minimum"
                );
            } else {
                config.autosave_interval = Duration::from_secs(secs);
            }
        }

        config
    }

    #[must_use]
    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

/// Replace `${VAR}` with the variable's value. Unset variables become empty;
/// an unclosed `${` is kept as written.
#[must_use]
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                if name.is_empty() {
                    out.push_str("${}");
                } else {
                    out.push_str(&env::var(name).unwrap_or_default());
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Directory holding `config.toml` and, by default, all game data.
#[must_use]
pub fn config_dir() -> Option<PathBuf> {
    resolve_config_dir(env::var_os(HOME_ENV), dirs::home_dir())
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

fn resolve_config_dir(override_dir: Option<OsString>, home: Option<PathBuf>) -> Option<PathBuf> {
    match override_dir {
        Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => home.map(|home| home.join(".quantum-detective")),
    }
}
