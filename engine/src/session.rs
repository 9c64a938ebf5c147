//! The game session: the one place that writes game state.
//!
//! Front ends translate input into [`SessionCommand`]s and render the
//! [`SessionEvent`] each one produces. The session owns the controller (while
//! a game is running), the save store, settings, the auto-save scheduler, the
//! open interview and the effect sink. Nothing else holds a mutable handle to
//! any of them.

use std::time::Duration;

use chrono::Utc;

use quantum_config::AppConfig;
use quantum_core::{
    Approach, BuiltinStory, EffectQueue, EvidenceAdd, GameEffect, GameStateController,
    InterviewApplied, InterviewError, InterviewReport, NoConnection, Question, SoundCue,
    StoryAdvance, StoryBeat, StoryChoice, StoryRepository, TimelineSwitch, Turn,
    WitnessInterview,
};
use quantum_types::{CharacterId, Evidence, EvidenceId, GameSettings, SlotIndex, Timeline};

use crate::autosave::{AutoSaveScheduler, AutoSaveTrigger};
use crate::sink::EffectSink;
use crate::storage::SaveStore;

// ============================================================================
// Commands and events
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    NewGame,
    Load { slot: SlotIndex },
    Save { slot: SlotIndex },
    /// Save to the primary slot, then leave the game.
    ReturnToMenu,
    SwitchTimeline { target: Timeline },
    /// Pick a choice of the current beat by id or 1-based position.
    Choose { choice: String },
    /// File the current beat's clue without advancing.
    CollectEvidence,
    Combine { first: EvidenceId, second: EvidenceId },
    SolveChallenge { answer: String },
    OpenInterview { character: CharacterId },
    BeginQuestioning,
    Ask { approach: Approach },
    /// Apply a concluded interview, or abandon one still running.
    CloseInterview,
    ApplyInterview { report: InterviewReport },
    DismissTutorial,
    UpdateSettings { settings: GameSettings },
    DeleteSave { slot: SlotIndex },
    Tick { elapsed: Duration },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    GameStarted,
    Loaded {
        slot: SlotIndex,
    },
    LoadFailed {
        slot: SlotIndex,
    },
    Saved {
        slot: SlotIndex,
        ok: bool,
    },
    ReturnedToMenu {
        saved: bool,
    },
    Switched(TimelineSwitch),
    Chose {
        choice: &'static StoryChoice,
        advance: StoryAdvance,
        evidence: Option<(EvidenceId, EvidenceAdd)>,
    },
    UnknownChoice {
        choice: String,
    },
    /// The current timeline has no beat at its progress.
    TimelineExhausted {
        timeline: Timeline,
    },
    EvidenceCollected {
        id: EvidenceId,
        add: EvidenceAdd,
    },
    NothingToCollect,
    Combined {
        result: Evidence,
        add: EvidenceAdd,
    },
    NoConnection(NoConnection),
    /// A clue named in a combination is not in the case file.
    MissingEvidence {
        id: EvidenceId,
    },
    ChallengeSolved {
        reward: Evidence,
        add: EvidenceAdd,
    },
    ChallengeFailed,
    NoChallenge,
    InterviewOpened {
        character: CharacterId,
    },
    InterviewQuestion {
        number: usize,
        question: &'static Question,
    },
    InterviewTurn {
        turn: Turn,
        next: Option<&'static Question>,
    },
    InterviewClosed {
        applied: Option<InterviewApplied>,
    },
    InterviewRejected(InterviewError),
    InterviewApplied(InterviewApplied),
    NoInterview,
    UnknownCharacter {
        character: CharacterId,
    },
    TutorialDismissed {
        changed: bool,
    },
    SettingsUpdated {
        saved: bool,
    },
    SaveDeleted {
        slot: SlotIndex,
        removed: bool,
    },
    Ticked {
        autosaved: Option<bool>,
    },
    /// The command needs a running game and the session is at the menu.
    NoActiveGame,
}

// ============================================================================
// GameSession
// ============================================================================

pub struct GameSession<S: EffectSink> {
    game: Option<GameStateController>,
    store: SaveStore,
    settings: GameSettings,
    scheduler: AutoSaveScheduler,
    interview: Option<WitnessInterview>,
    story: Box<dyn StoryRepository>,
    effects: EffectQueue,
    sink: S,
    clock: fn() -> i64,
}

fn wall_clock_ms() -> i64 {
    Utc::now().timestamp_millis()
}

impl<S: EffectSink> GameSession<S> {
    /// Start at the menu with settings read from `store`.
    pub fn new(store: SaveStore, autosave_interval: Duration, sink: S) -> Self {
        let settings = store.load_settings();
        tracing::info!(
            dir = %store.dir().display(),
            autosave = settings.auto_save,
            "Session ready"
        );
        Self {
            game: None,
            store,
            settings,
            scheduler: AutoSaveScheduler::new(autosave_interval),
            interview: None,
            story: Box::new(BuiltinStory),
            effects: EffectQueue::new(),
            sink,
            clock: wall_clock_ms,
        }
    }

    pub fn from_config(config: &AppConfig, sink: S) -> Self {
        Self::new(
            SaveStore::new(&config.data_dir),
            config.autosave_interval,
            sink,
        )
    }

    #[must_use]
    pub fn with_story(mut self, story: impl StoryRepository + 'static) -> Self {
        self.story = Box::new(story);
        self
    }

    /// Replace the wall clock (epoch milliseconds) used to stamp new games.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    // ===== Read access =====

    #[must_use]
    pub fn game(&self) -> Option<&GameStateController> {
        self.game.as_ref()
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.game.is_some()
    }

    #[must_use]
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    #[must_use]
    pub fn store(&self) -> &SaveStore {
        &self.store
    }

    #[must_use]
    pub fn interview(&self) -> Option<&WitnessInterview> {
        self.interview.as_ref()
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    #[must_use]
    pub fn now(&self) -> i64 {
        (self.clock)()
    }

    /// The beat at the current timeline's progress.
    #[must_use]
    pub fn current_beat(&self) -> Option<StoryBeat> {
        let state = self.game.as_ref()?.snapshot();
        self.story
            .lookup(state.current_timeline(), state.current_progress())
    }

    // ===== Commands =====

    pub fn apply(&mut self, command: SessionCommand) -> SessionEvent {
        tracing::debug!(?command, "Session command");
        let event = match command {
            SessionCommand::NewGame => self.new_game(),
            SessionCommand::Load { slot } => self.load(slot),
            SessionCommand::Save { slot } => match self.write_slot(slot) {
                Some(ok) => SessionEvent::Saved { slot, ok },
                None => SessionEvent::NoActiveGame,
            },
            SessionCommand::ReturnToMenu => self.return_to_menu(),
            SessionCommand::UpdateSettings { settings } => self.update_settings(settings),
            SessionCommand::DeleteSave { slot } => SessionEvent::SaveDeleted {
                slot,
                removed: self.store.delete_game(slot),
            },
            SessionCommand::SwitchTimeline { target } => {
                self.with_game(|game| SessionEvent::Switched(game.switch_timeline(target)))
            }
            SessionCommand::Choose { choice } => self.choose(&choice),
            SessionCommand::CollectEvidence => self.collect_evidence(),
            SessionCommand::Combine { first, second } => self.combine(&first, &second),
            SessionCommand::SolveChallenge { answer } => self.solve_challenge(&answer),
            SessionCommand::OpenInterview { character } => self.open_interview(character),
            SessionCommand::BeginQuestioning => self.begin_questioning(),
            SessionCommand::Ask { approach } => self.ask(approach),
            SessionCommand::CloseInterview => self.close_interview(),
            SessionCommand::ApplyInterview { report } => self.with_game(|game| {
                SessionEvent::InterviewApplied(game.apply_interview(&report))
            }),
            SessionCommand::DismissTutorial => {
                self.with_game(|game| SessionEvent::TutorialDismissed {
                    changed: game.dismiss_tutorial(),
                })
            }
            SessionCommand::Tick { elapsed } => self.tick(elapsed),
        };
        self.after_command();
        event
    }

    fn with_game(
        &mut self,
        f: impl FnOnce(&mut GameStateController) -> SessionEvent,
    ) -> SessionEvent {
        self.game.as_mut().map_or(SessionEvent::NoActiveGame, f)
    }

    fn start(&mut self, game: GameStateController) {
        if self.game.is_some() {
            self.sink.on_session_end();
        }
        self.scheduler.reset(game.snapshot());
        self.interview = None;
        self.game = Some(game);
        self.sink.on_session_start();
    }

    fn new_game(&mut self) -> SessionEvent {
        let game = GameStateController::new_game(self.now());
        tracing::info!("New game started");
        self.start(game);
        SessionEvent::GameStarted
    }

    fn load(&mut self, slot: SlotIndex) -> SessionEvent {
        if let Some(state) = self.store.load_game(slot) {
            tracing::info!(%slot, "Game loaded");
            self.start(GameStateController::new(state));
            SessionEvent::Loaded { slot }
        } else {
            self.play(SoundCue::Error);
            SessionEvent::LoadFailed { slot }
        }
    }

    fn return_to_menu(&mut self) -> SessionEvent {
        // Effects raised by the last command land before the save notice.
        self.collect_game_effects();
        let Some(saved) = self.write_slot(SlotIndex::PRIMARY) else {
            return SessionEvent::NoActiveGame;
        };
        self.flush_effects();
        self.game = None;
        self.interview = None;
        self.scheduler.clear();
        self.sink.on_session_end();
        tracing::info!(saved, "Returned to menu");
        SessionEvent::ReturnedToMenu { saved }
    }

    fn update_settings(&mut self, settings: GameSettings) -> SessionEvent {
        self.settings = settings;
        let saved = self.store.save_settings(&self.settings);
        tracing::info!(
            sound = settings.sound_enabled,
            autosave = settings.auto_save,
            difficulty = settings.difficulty.as_str(),
            saved,
            "Settings updated"
        );
        SessionEvent::SettingsUpdated { saved }
    }

    fn choose(&mut self, input: &str) -> SessionEvent {
        let Some(timeline) = self.game.as_ref().map(|g| g.snapshot().current_timeline()) else {
            return SessionEvent::NoActiveGame;
        };
        let Some(beat) = self.current_beat() else {
            return SessionEvent::TimelineExhausted { timeline };
        };
        let Some(choice) = beat.resolve_choice(input) else {
            return SessionEvent::UnknownChoice {
                choice: input.to_string(),
            };
        };
        self.with_game(|game| {
            let evidence = beat.evidence().map(|clue| {
                let id = clue.id().clone();
                (id, game.add_evidence(clue))
            });
            SessionEvent::Chose {
                choice,
                advance: game.advance_story(choice.id),
                evidence,
            }
        })
    }

    fn collect_evidence(&mut self) -> SessionEvent {
        if self.game.is_none() {
            return SessionEvent::NoActiveGame;
        }
        let Some(clue) = self.current_beat().and_then(|beat| beat.evidence()) else {
            return SessionEvent::NothingToCollect;
        };
        self.with_game(|game| {
            let id = clue.id().clone();
            SessionEvent::EvidenceCollected {
                add: game.add_evidence(clue),
                id,
            }
        })
    }

    fn combine(&mut self, first: &EvidenceId, second: &EvidenceId) -> SessionEvent {
        self.with_game(|game| {
            if let Some(missing) = [first, second]
                .into_iter()
                .find(|id| !game.snapshot().has_evidence(id))
            {
                return SessionEvent::MissingEvidence {
                    id: missing.clone(),
                };
            }
            match game.combine_evidence(first, second) {
                Ok(result) => {
                    let add = game.add_evidence(result.clone());
                    SessionEvent::Combined { result, add }
                }
                Err(none) => SessionEvent::NoConnection(none),
            }
        })
    }

    fn solve_challenge(&mut self, answer: &str) -> SessionEvent {
        let Some(state) = self.game.as_ref().map(GameStateController::snapshot) else {
            return SessionEvent::NoActiveGame;
        };
        let timeline = state.current_timeline();
        let progress = state.current_progress();
        let Some(challenge) = self
            .story
            .lookup(timeline, progress)
            .and_then(|beat| beat.challenge)
        else {
            return SessionEvent::NoChallenge;
        };
        if !challenge.check(answer) {
            tracing::debug!(task = challenge.task, "Challenge answer rejected");
            self.play(SoundCue::Error);
            return SessionEvent::ChallengeFailed;
        }
        let reward = challenge.reward_evidence(timeline, progress);
        self.with_game(|game| {
            let add = game.add_evidence(reward.clone());
            SessionEvent::ChallengeSolved { reward, add }
        })
    }

    fn open_interview(&mut self, character: CharacterId) -> SessionEvent {
        let Some(game) = self.game.as_ref() else {
            return SessionEvent::NoActiveGame;
        };
        let Some(witness) = game.snapshot().find_character(&character) else {
            return SessionEvent::UnknownCharacter { character };
        };
        if let Some(previous) = &self.interview {
            tracing::debug!(witness = %previous.character_id(), "Unfinished interview replaced");
        }
        self.interview = Some(WitnessInterview::new(witness));
        SessionEvent::InterviewOpened { character }
    }

    fn begin_questioning(&mut self) -> SessionEvent {
        if self.game.is_none() {
            return SessionEvent::NoActiveGame;
        }
        let Some(interview) = self.interview.as_mut() else {
            return SessionEvent::NoInterview;
        };
        match interview.begin() {
            Ok(question) => SessionEvent::InterviewQuestion {
                number: interview.question_number(),
                question,
            },
            Err(e) => SessionEvent::InterviewRejected(e),
        }
    }

    fn ask(&mut self, approach: Approach) -> SessionEvent {
        if self.game.is_none() {
            return SessionEvent::NoActiveGame;
        }
        let Some(interview) = self.interview.as_mut() else {
            return SessionEvent::NoInterview;
        };
        match interview.ask(approach) {
            Ok(turn) => SessionEvent::InterviewTurn {
                turn,
                next: interview.current_question(),
            },
            Err(e) => SessionEvent::InterviewRejected(e),
        }
    }

    fn close_interview(&mut self) -> SessionEvent {
        if self.game.is_none() {
            return SessionEvent::NoActiveGame;
        }
        let Some(interview) = self.interview.take() else {
            return SessionEvent::NoInterview;
        };
        match interview.finish() {
            Ok(report) => self.with_game(|game| SessionEvent::InterviewClosed {
                applied: Some(game.apply_interview(&report)),
            }),
            Err(e) => {
                tracing::debug!(witness = %interview.character_id(), "Interview abandoned: {e}");
                SessionEvent::InterviewClosed { applied: None }
            }
        }
    }

    fn tick(&mut self, elapsed: Duration) -> SessionEvent {
        if self.game.is_none() {
            return SessionEvent::NoActiveGame;
        }
        let autosaved = self
            .scheduler
            .tick(elapsed, self.settings.auto_save)
            .map(|trigger| self.autosave(trigger));
        SessionEvent::Ticked { autosaved }
    }

    // ===== Bookkeeping =====

    /// `None` when there is no game to write.
    fn write_slot(&mut self, slot: SlotIndex) -> Option<bool> {
        let game = self.game.as_ref()?;
        let ok = self.store.save_game(game.snapshot(), slot);
        if ok {
            self.scheduler.mark_saved(game.snapshot());
        }
        self.effects.push(GameEffect::SaveCompleted { slot, ok });
        Some(ok)
    }

    fn autosave(&mut self, trigger: AutoSaveTrigger) -> bool {
        self.collect_game_effects();
        let ok = self.write_slot(SlotIndex::PRIMARY).unwrap_or(false);
        if ok {
            tracing::debug!(trigger = trigger.as_str(), "Auto-saved");
        } else {
            tracing::warn!(trigger = trigger.as_str(), "Auto-save failed");
        }
        ok
    }

    fn after_command(&mut self) {
        let trigger = self.game.as_mut().and_then(|game| {
            game.unlock_achievements();
            self.scheduler
                .observe(game.snapshot(), self.settings.auto_save)
        });
        if let Some(trigger) = trigger {
            self.autosave(trigger);
        }
        self.collect_game_effects();
        self.flush_effects();
    }

    fn collect_game_effects(&mut self) {
        if let Some(game) = self.game.as_mut() {
            for effect in game.take_effects() {
                self.effects.push(effect);
            }
        }
    }

    fn flush_effects(&mut self) {
        for effect in self.effects.take() {
            self.sink.emit(&effect);
            self.play(effect.sound());
        }
    }

    fn play(&mut self, cue: SoundCue) {
        if self.settings.sound_enabled {
            self.sink.play(cue);
        }
    }
}

impl<S: EffectSink> Drop for GameSession<S> {
    fn drop(&mut self) {
        if self.game.is_some() {
            self.sink.on_session_end();
        }
    }
}
