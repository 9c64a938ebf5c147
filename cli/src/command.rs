//! Typed commands for the terminal front end.

use quantum_engine::{
    CharacterId, Difficulty, EvidenceId, GameSettings, SlotIndex, Timeline, Volume,
};
use thiserror::Error;

#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub usage: &'static str,
    pub description: &'static str,
}

const COMMAND_SPECS: &[CommandSpec] = &[
    CommandSpec {
        usage: "new",
        description: "Open a new case",
    },
    CommandSpec {
        usage: "load [slot]",
        description: "Resume a saved case",
    },
    CommandSpec {
        usage: "save [slot]",
        description: "Save the case",
    },
    CommandSpec {
        usage: "slots",
        description: "List save slots",
    },
    CommandSpec {
        usage: "delete <slot>",
        description: "Delete a save slot",
    },
    CommandSpec {
        usage: "menu",
        description: "Save and return to the main menu",
    },
    CommandSpec {
        usage: "status",
        description: "Show energy, timelines and progress",
    },
    CommandSpec {
        usage: "story",
        description: "Show the current scene",
    },
    CommandSpec {
        usage: "choose <id|n>",
        description: "Pick a choice in the current scene",
    },
    CommandSpec {
        usage: "collect",
        description: "Collect the clue in the current scene",
    },
    CommandSpec {
        usage: "switch <timeline>",
        description: "Jump to another timeline (20 energy)",
    },
    CommandSpec {
        usage: "evidence",
        description: "List the case file",
    },
    CommandSpec {
        usage: "combine <a> <b>",
        description: "Look for a connection between two clues",
    },
    CommandSpec {
        usage: "solve <answer>",
        description: "Answer the current scene's challenge",
    },
    CommandSpec {
        usage: "interview <character>",
        description: "Question a witness",
    },
    CommandSpec {
        usage: "achievements",
        description: "Show achievements",
    },
    CommandSpec {
        usage: "settings",
        description: "Show settings",
    },
    CommandSpec {
        usage: "set <key> <value>",
        description: "Change a setting",
    },
    CommandSpec {
        usage: "tutorial",
        description: "Dismiss the tutorial hint",
    },
    CommandSpec {
        usage: "help",
        description: "Show this list",
    },
    CommandSpec {
        usage: "quit",
        description: "Save and exit",
    },
];

#[must_use]
pub fn command_specs() -> &'static [CommandSpec] {
    COMMAND_SPECS
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    #[error("`{command}` needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[error("`{0}` takes no further arguments")]
    TooManyArguments(&'static str),
    #[error("`{0}` is not a save slot (0-2)")]
    InvalidSlot(String),
    #[error("`{0}` is not a timeline (alpha, beta, gamma, delta)")]
    InvalidTimeline(String),
    #[error("`{0}` is not a valid id")]
    InvalidId(String),
    #[error("unknown setting `{0}` (one of: sound, music, effects, autosave, difficulty, subtitles)")]
    UnknownSetting(String),
    #[error("`{value}` is not a valid value for `{key}`")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettingChange {
    Sound(bool),
    Music(Volume),
    Effects(Volume),
    AutoSave(bool),
    Difficulty(Difficulty),
    Subtitles(bool),
}

impl SettingChange {
    #[must_use]
    pub fn apply(self, mut settings: GameSettings) -> GameSettings {
        match self {
            Self::Sound(on) => settings.sound_enabled = on,
            Self::Music(volume) => settings.music_volume = volume,
            Self::Effects(volume) => settings.effects_volume = volume,
            Self::AutoSave(on) => settings.auto_save = on,
            Self::Difficulty(difficulty) => settings.difficulty = difficulty,
            Self::Subtitles(on) => settings.subtitles = on,
        }
        settings
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    New,
    Load(Option<SlotIndex>),
    Save(Option<SlotIndex>),
    Slots,
    Delete(SlotIndex),
    Menu,
    Status,
    Story,
    Choose(String),
    Collect,
    Switch(Timeline),
    Evidence,
    Combine(EvidenceId, EvidenceId),
    Solve(String),
    Interview(CharacterId),
    Achievements,
    Settings,
    Set(SettingChange),
    Tutorial,
    Help,
    Quit,
    Empty,
}

impl Command {
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let raw = raw.trim();
        let (head, rest) = raw
            .split_once(char::is_whitespace)
            .map_or((raw, ""), |(head, rest)| (head, rest.trim()));
        let args: Vec<&str> = rest.split_whitespace().collect();

        let command = match head.to_ascii_lowercase().as_str() {
            "" => Command::Empty,
            "new" => no_args("new", &args, Command::New)?,
            "load" => Command::Load(optional_slot("load", &args)?),
            "save" => Command::Save(optional_slot("save", &args)?),
            "slots" => no_args("slots", &args, Command::Slots)?,
            "delete" => match args.as_slice() {
                [slot] => Command::Delete(parse_slot(slot)?),
                [] => return Err(missing("delete", "a slot")),
                _ => return Err(ParseError::TooManyArguments("delete")),
            },
            "menu" => no_args("menu", &args, Command::Menu)?,
            "status" => no_args("status", &args, Command::Status)?,
            "story" | "look" => no_args("story", &args, Command::Story)?,
            "choose" | "c" => match args.as_slice() {
                [choice] => Command::Choose((*choice).to_string()),
                [] => return Err(missing("choose", "a choice id or number")),
                _ => return Err(ParseError::TooManyArguments("choose")),
            },
            "collect" => no_args("collect", &args, Command::Collect)?,
            "switch" => match args.as_slice() {
                [name] => Command::Switch(
                    Timeline::parse(name)
                        .ok_or_else(|| ParseError::InvalidTimeline((*name).to_string()))?,
                ),
                [] => return Err(missing("switch", "a timeline")),
                _ => return Err(ParseError::TooManyArguments("switch")),
            },
            "evidence" | "ev" => no_args("evidence", &args, Command::Evidence)?,
            "combine" => match args.as_slice() {
                [first, second] => Command::Combine(evidence_id(first)?, evidence_id(second)?),
                [] | [_] => return Err(missing("combine", "two evidence ids")),
                _ => return Err(ParseError::TooManyArguments("combine")),
            },
            "solve" => {
                if rest.is_empty() {
                    return Err(missing("solve", "an answer"));
                }
                Command::Solve(rest.to_string())
            }
            "interview" => match args.as_slice() {
                [id] => Command::Interview(
                    CharacterId::new(*id).map_err(|_| ParseError::InvalidId((*id).to_string()))?,
                ),
                [] => return Err(missing("interview", "a character id")),
                _ => return Err(ParseError::TooManyArguments("interview")),
            },
            "achievements" => no_args("achievements", &args, Command::Achievements)?,
            "settings" => no_args("settings", &args, Command::Settings)?,
            "set" => match args.as_slice() {
                [key, value] => Command::Set(parse_setting(key, value)?),
                [] | [_] => return Err(missing("set", "a key and a value")),
                _ => return Err(ParseError::TooManyArguments("set")),
            },
            "tutorial" => no_args("tutorial", &args, Command::Tutorial)?,
            "help" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            other => return Err(ParseError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

fn missing(command: &'static str, argument: &'static str) -> ParseError {
    ParseError::MissingArgument { command, argument }
}

fn no_args(name: &'static str, args: &[&str], command: Command) -> Result<Command, ParseError> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(ParseError::TooManyArguments(name))
    }
}

fn optional_slot(name: &'static str, args: &[&str]) -> Result<Option<SlotIndex>, ParseError> {
    match args {
        [] => Ok(None),
        [slot] => parse_slot(slot).map(Some),
        _ => Err(ParseError::TooManyArguments(name)),
    }
}

fn parse_slot(raw: &str) -> Result<SlotIndex, ParseError> {
    raw.parse::<usize>()
        .ok()
        .and_then(|i| SlotIndex::new(i).ok())
        .ok_or_else(|| ParseError::InvalidSlot(raw.to_string()))
}

fn evidence_id(raw: &str) -> Result<EvidenceId, ParseError> {
    EvidenceId::new(raw).map_err(|_| ParseError::InvalidId(raw.to_string()))
}

fn parse_setting(key: &str, value: &str) -> Result<SettingChange, ParseError> {
    let key = match key.to_ascii_lowercase().as_str() {
        "sound" => "sound",
        "music" => "music",
        "effects" => "effects",
        "autosave" | "auto_save" => "autosave",
        "difficulty" => "difficulty",
        "subtitles" => "subtitles",
        _ => return Err(ParseError::UnknownSetting(key.to_string())),
    };
    let invalid = || ParseError::InvalidValue {
        key,
        value: value.to_string(),
    };
    let change = match key {
        "sound" => SettingChange::Sound(parse_bool(value).ok_or_else(invalid)?),
        "music" => SettingChange::Music(parse_volume(value).ok_or_else(invalid)?),
        "effects" => SettingChange::Effects(parse_volume(value).ok_or_else(invalid)?),
        "autosave" => SettingChange::AutoSave(parse_bool(value).ok_or_else(invalid)?),
        "difficulty" => SettingChange::Difficulty(Difficulty::parse(value).ok_or_else(invalid)?),
        _ => SettingChange::Subtitles(parse_bool(value).ok_or_else(invalid)?),
    };
    Ok(change)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// `0.0..=1.0`, or a percentage when written with `%`.
fn parse_volume(raw: &str) -> Option<Volume> {
    let (number, scale) = match raw.strip_suffix('%') {
        Some(percent) => (percent, 100.0),
        None => (raw, 1.0),
    };
    let value: f32 = number.parse().ok()?;
    if !value.is_finite() || value < 0.0 || value > scale {
        return None;
    }
    Some(Volume::new(value / scale))
}
