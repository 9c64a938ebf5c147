//! Quantum Detective - terminal front end.
//!
//! ```text
//! stdin line -> Command::parse -> Repl -> GameSession::apply -> SessionEvent
//!                                              |
//!                                              v
//!                               render::* text + ConsoleSink effect lines
//! ```
//!
//! Wall-clock time between lines is fed to the session as `Tick`s so the
//! interval auto-save keeps running while the player reads.

mod command;
mod render;
mod repl;

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
    sync::Mutex,
    time::Instant,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use quantum_config::config_dir;
use quantum_engine::{AppConfig, GameSession};

use crate::repl::{ConsoleSink, Repl};

const LOG_FILE: &str = "quantum-detective.log";

fn init_tracing(config: &AppConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::try_new("warn").expect("warn filter is valid"));

    let (log_file, init_warnings) = open_log_file(&log_file_candidates(config));

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // No log file: stay silent rather than interleave logs with the game text.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file(candidates: &[PathBuf]) -> (Option<(PathBuf, fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in candidates {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new().create(true).append(true).open(candidate) {
            Ok(file) => return (Some((candidate.clone(), file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates(config: &AppConfig) -> Vec<PathBuf> {
    vec![
        // Primary: <data dir>/logs/quantum-detective.log
        config.log_dir().join(LOG_FILE),
        // Fallback: ./.quantum-detective/logs/quantum-detective.log
        Path::new(".quantum-detective").join("logs").join(LOG_FILE),
    ]
}

fn load_config() -> (AppConfig, Option<String>) {
    match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => {
            let base = config_dir().unwrap_or_else(|| PathBuf::from("."));
            let note = format!("{e}. Continuing with default settings.");
            (AppConfig::defaults_in(&base), Some(note))
        }
    }
}

fn main() -> Result<()> {
    let (config, config_warning) = load_config();
    init_tracing(&config);
    if let Some(warning) = &config_warning {
        tracing::warn!("{warning}");
        eprintln!("{warning}");
    }
    tracing::info!(
        data_dir = %config.data_dir.display(),
        autosave_secs = config.autosave_interval.as_secs(),
        default_slot = %config.default_slot,
        "Starting Quantum Detective"
    );

    let session = GameSession::from_config(&config, ConsoleSink::default());
    let mut repl = Repl::new(session, config.default_slot);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    writeln!(stdout, "{}", repl.greeting())?;

    let mut last_input = Instant::now();
    let mut line = String::new();
    loop {
        write!(stdout, "{}", repl.prompt())?;
        stdout.flush()?;

        line.clear();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .context("failed to read from stdin")?;

        let now = Instant::now();
        if let Some(note) = repl.tick(now.duration_since(last_input)) {
            writeln!(stdout, "{note}")?;
        }
        last_input = now;

        if read == 0 {
            if let Some(farewell) = repl.shutdown() {
                writeln!(stdout, "\n{farewell}")?;
            }
            break;
        }

        let reply = repl.handle_line(&line);
        if !reply.text.is_empty() {
            writeln!(stdout, "{}", reply.text)?;
        }
        if reply.quit {
            break;
        }
    }

    tracing::info!("Goodbye");
    Ok(())
}
