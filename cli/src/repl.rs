//! Line-oriented driver: text in, [`SessionCommand`]s to the session, text out.

use std::time::Duration;

use quantum_engine::{
    Approach, EffectSink, EvidenceAdd, GameEffect, GameSession, GameState, InterviewApplied,
    InterviewError, SessionCommand, SessionEvent, SlotIndex, SoundCue, TimelineSwitch,
    TracingSink, WitnessInterview, interview::QUESTIONS,
};

use crate::command::Command;
use crate::render;

/// Collects effect lines until the driver prints them. Everything is also
/// passed on to the log.
#[derive(Debug, Default)]
pub struct ConsoleSink {
    lines: Vec<String>,
    log: TracingSink,
}

impl ConsoleSink {
    pub fn drain(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }
}

impl EffectSink for ConsoleSink {
    fn on_session_start(&mut self) {
        self.log.on_session_start();
    }

    fn on_session_end(&mut self) {
        tracing::debug!(pending = self.lines.len(), "Console session ended");
        self.log.on_session_end();
    }

    fn emit(&mut self, effect: &GameEffect) {
        self.log.emit(effect);
        self.lines.push(render::effect(effect));
    }

    fn play(&mut self, cue: SoundCue) {
        self.log.play(cue);
        self.lines.push(render::sound(cue));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Lines are answers to the open interview.
    Interview,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub quit: bool,
}

pub struct Repl {
    session: GameSession<ConsoleSink>,
    default_slot: SlotIndex,
    mode: InputMode,
}

const NO_CASE: &str = "No case is open. Use `new` or `load [slot]`.";

impl Repl {
    pub fn new(session: GameSession<ConsoleSink>, default_slot: SlotIndex) -> Self {
        Self {
            session,
            default_slot,
            mode: InputMode::Normal,
        }
    }

    #[must_use]
    pub fn mode(&self) -> InputMode {
        self.mode
    }

    #[cfg(test)]
    fn session(&self) -> &GameSession<ConsoleSink> {
        &self.session
    }

    #[must_use]
    pub fn prompt(&self) -> &'static str {
        match self.mode() {
            InputMode::Normal if self.session.is_playing() => "case> ",
            InputMode::Normal => "menu> ",
            InputMode::Interview => "interview> ",
        }
    }

    #[must_use]
    pub fn greeting(&self) -> String {
        let mut lines = vec![render::banner()];
        if self.session.store().has_any_save() {
            lines.push(render::slots(&self.session.store().slot_summaries()));
        }
        lines.join("\n")
    }

    /// Advance simulated time. Returns text only when something happened.
    pub fn tick(&mut self, elapsed: Duration) -> Option<String> {
        if !self.session.is_playing() {
            return None;
        }
        let event = self.session.apply(SessionCommand::Tick { elapsed });
        let mut lines = Vec::new();
        if let SessionEvent::Ticked {
            autosaved: Some(false),
        } = event
        {
            lines.push("Auto-save failed.".to_string());
        }
        lines.extend(self.session.sink_mut().drain());
        (!lines.is_empty()).then(|| lines.join("\n"))
    }

    pub fn handle_line(&mut self, line: &str) -> Reply {
        let mut reply = match self.mode {
            InputMode::Interview => self.handle_interview_line(line),
            InputMode::Normal => match Command::parse(line) {
                Ok(command) => self.execute(command),
                Err(e) => {
                    tracing::debug!(input = line.trim(), "Rejected input: {e}");
                    text(e.to_string())
                }
            },
        };
        let effects = self.session.sink_mut().drain();
        if !effects.is_empty() {
            if !reply.text.is_empty() {
                reply.text.push('\n');
            }
            reply.text.push_str(&effects.join("\n"));
        }
        reply
    }

    /// Leave the game cleanly when input ends.
    pub fn shutdown(&mut self) -> Option<String> {
        if !self.session.is_playing() {
            return None;
        }
        Some(self.execute(Command::Quit).text)
    }

    fn execute(&mut self, command: Command) -> Reply {
        match command {
            Command::Empty => Reply::default(),
            Command::Help => text(render::help()),
            Command::Quit => {
                let mut reply = if self.session.is_playing() {
                    self.apply(SessionCommand::ReturnToMenu)
                } else {
                    Reply::default()
                };
                reply.quit = true;
                reply
            }
            Command::New => self.apply(SessionCommand::NewGame),
            Command::Load(slot) => self.apply(SessionCommand::Load {
                slot: slot.unwrap_or(self.default_slot),
            }),
            Command::Save(slot) => self.apply(SessionCommand::Save {
                slot: slot.unwrap_or(self.default_slot),
            }),
            Command::Slots => text(render::slots(&self.session.store().slot_summaries())),
            Command::Delete(slot) => self.apply(SessionCommand::DeleteSave { slot }),
            Command::Menu => self.apply(SessionCommand::ReturnToMenu),
            Command::Status => self.with_state(render::status),
            Command::Story => self.story(),
            Command::Choose(choice) => self.apply(SessionCommand::Choose { choice }),
            Command::Collect => self.apply(SessionCommand::CollectEvidence),
            Command::Switch(target) => self.apply(SessionCommand::SwitchTimeline { target }),
            Command::Evidence => self.with_state(render::evidence),
            Command::Combine(first, second) => {
                self.apply(SessionCommand::Combine { first, second })
            }
            Command::Solve(answer) => self.apply(SessionCommand::SolveChallenge { answer }),
            Command::Interview(character) => {
                self.apply(SessionCommand::OpenInterview { character })
            }
            Command::Achievements => self.with_state(render::achievements),
            Command::Settings => text(render::settings(self.session.settings())),
            Command::Set(change) => {
                let settings = change.apply(*self.session.settings());
                self.apply(SessionCommand::UpdateSettings { settings })
            }
            Command::Tutorial => self.apply(SessionCommand::DismissTutorial),
        }
    }

    fn handle_interview_line(&mut self, line: &str) -> Reply {
        let input = line.trim();
        if matches!(input.to_ascii_lowercase().as_str(), "leave" | "quit" | "q") {
            return self.apply(SessionCommand::CloseInterview);
        }
        match Approach::parse(input) {
            Some(approach) => self.apply(SessionCommand::Ask { approach }),
            None => text(format!(
                "Pick an approach (neutral, aggressive, sympathetic, probing or 1-4), or `leave`. Got `{input}`."
            )),
        }
    }

    fn with_state(&self, view: fn(&GameState) -> String) -> Reply {
        match self.session.game() {
            Some(game) => text(view(game.snapshot())),
            None => text(NO_CASE),
        }
    }

    fn story(&self) -> Reply {
        let Some(game) = self.session.game() else {
            return text(NO_CASE);
        };
        let state = game.snapshot();
        text(render::beat(
            state.current_timeline(),
            state.current_progress(),
            self.session.current_beat().as_ref(),
        ))
    }

    fn apply(&mut self, command: SessionCommand) -> Reply {
        let event = self.session.apply(command);
        self.describe(event)
    }

    fn describe(&mut self, event: SessionEvent) -> Reply {
        let body = match event {
            SessionEvent::GameStarted => {
                let mut lines = vec!["A new case opens.".to_string()];
                lines.push(self.story().text);
                lines.push(render::tutorial_hint());
                lines.join("\n")
            }
            SessionEvent::Loaded { slot } => {
                let mut lines = vec![format!("Case loaded from slot {slot}.")];
                lines.extend(self.session.game().map(|g| render::status(g.snapshot())));
                lines.push(self.story().text);
                lines.join("\n")
            }
            SessionEvent::LoadFailed { slot } => format!("Slot {slot} holds no readable case."),
            // The save effect reports the outcome.
            SessionEvent::Saved { .. } => String::new(),
            SessionEvent::ReturnedToMenu { saved } => {
                self.mode = InputMode::Normal;
                if saved {
                    "Back at the menu.".to_string()
                } else {
                    "Back at the menu. The case could not be saved.".to_string()
                }
            }
            SessionEvent::Switched(TimelineSwitch::Switched { from, to }) => {
                format!("Reality shifts from {from} to {to}.\n{}", self.story().text)
            }
            SessionEvent::Switched(TimelineSwitch::SameTimeline) => {
                "You are already in that timeline.".to_string()
            }
            SessionEvent::Switched(TimelineSwitch::InsufficientEnergy) => {
                "Not enough quantum energy to jump (20 needed).".to_string()
            }
            SessionEvent::Chose {
                choice, evidence, ..
            } => {
                let mut lines = vec![format!("You decide to {}.", choice.text.to_lowercase())];
                if let Some((id, EvidenceAdd::Duplicate)) = evidence {
                    lines.push(format!("{id} is already in the case file."));
                }
                lines.push(self.story().text);
                lines.join("\n")
            }
            SessionEvent::UnknownChoice { choice } => {
                format!("`{choice}` is not one of the choices here. Use `story` to see them.")
            }
            SessionEvent::TimelineExhausted { timeline } => render::beat(timeline, 0, None),
            SessionEvent::EvidenceCollected {
                id,
                add: EvidenceAdd::Duplicate,
            } => format!("{id} is already in the case file."),
            SessionEvent::EvidenceCollected { .. } => String::new(),
            SessionEvent::NothingToCollect => "There is nothing to collect here.".to_string(),
            SessionEvent::Combined { result, .. } => {
                format!("{}: {}", result.name(), result.description())
            }
            SessionEvent::NoConnection(_) => "These clues don't connect.".to_string(),
            SessionEvent::MissingEvidence { id } => format!("{id} is not in the case file."),
            SessionEvent::ChallengeSolved { reward, .. } => {
                format!("Solved. {} added to the case file.", reward.name())
            }
            SessionEvent::ChallengeFailed => "That is not the answer.".to_string(),
            SessionEvent::NoChallenge => "There is no challenge in this scene.".to_string(),
            SessionEvent::InterviewOpened { .. } => self.begin_interview(),
            SessionEvent::InterviewQuestion { number, question } => {
                render::interview_question(number, QUESTIONS.len(), question)
            }
            SessionEvent::InterviewTurn { turn, next } => {
                let mut lines = Vec::new();
                if let Some(interview) = self.session.interview() {
                    lines.push(render::interview_turn(&turn, interview));
                }
                match next {
                    Some(question) => {
                        let number = self
                            .session
                            .interview()
                            .map_or(1, WitnessInterview::question_number);
                        lines.push(render::interview_question(
                            number,
                            QUESTIONS.len(),
                            question,
                        ));
                    }
                    None => lines.push(self.apply(SessionCommand::CloseInterview).text),
                }
                lines.join("\n")
            }
            SessionEvent::InterviewClosed { applied } => {
                self.mode = InputMode::Normal;
                applied.map_or_else(
                    || "You end the interview early.".to_string(),
                    interview_outcome,
                )
            }
            SessionEvent::InterviewApplied(applied) => interview_outcome(applied),
            SessionEvent::InterviewRejected(InterviewError::Concluded) => {
                self.mode = InputMode::Normal;
                "That interview is over.".to_string()
            }
            SessionEvent::InterviewRejected(e) => e.to_string(),
            SessionEvent::NoInterview => {
                self.mode = InputMode::Normal;
                "No interview is open.".to_string()
            }
            SessionEvent::UnknownCharacter { character } => {
                let known: Vec<String> = self
                    .session
                    .game()
                    .map(|g| {
                        g.snapshot()
                            .characters()
                            .iter()
                            .map(|c| format!("{} ({})", c.id(), c.name()))
                            .collect()
                    })
                    .unwrap_or_default();
                format!("No witness `{character}`. Known: {}", known.join(", "))
            }
            SessionEvent::TutorialDismissed { changed: true } => "Tutorial hidden.".to_string(),
            SessionEvent::TutorialDismissed { changed: false } => {
                "The tutorial is already hidden.".to_string()
            }
            SessionEvent::SettingsUpdated { saved } => {
                let mut out = render::settings(self.session.settings());
                if !saved {
                    out.push_str("\n(settings could not be saved)");
                }
                out
            }
            SessionEvent::SaveDeleted { slot, removed: true } => format!("Slot {slot} deleted."),
            SessionEvent::SaveDeleted {
                slot,
                removed: false,
            } => format!("Slot {slot} is already empty."),
            SessionEvent::Ticked { .. } => String::new(),
            SessionEvent::NoActiveGame => NO_CASE.to_string(),
        };
        text(body)
    }

    fn begin_interview(&mut self) -> String {
        let opened = self
            .session
            .interview()
            .map(render::interview_opened)
            .unwrap_or_default();
        let first = self.apply(SessionCommand::BeginQuestioning).text;
        self.mode = InputMode::Interview;
        [opened, first].join("\n")
    }
}

fn interview_outcome(applied: InterviewApplied) -> String {
    match applied {
        InterviewApplied::Applied { truths_added } => {
            format!("Interview concluded. {truths_added} new testimony added to the case file.")
        }
        InterviewApplied::UnknownCharacter => {
            "The witness is no longer part of this case.".to_string()
        }
    }
}

fn text(body: impl Into<String>) -> Reply {
    Reply {
        text: body.into(),
        quit: false,
    }
}
