//! Plain-text rendering. Every function here is pure: state in, text out.

use quantum_engine::{
    Approach, BEATS_PER_TIMELINE, Evidence, GameEffect, GameSettings, GameState, ProgressView,
    QuantumEnergy, Question, Reading, SaveSummary, SlotIndex, SoundCue, StoryBeat, Timeline,
    Turn, Volume, WitnessInterview, strip_control, truncate_with_ellipsis, wrap_words,
};
use quantum_engine::achievements::{CATALOG, total_points};

use crate::command::command_specs;

const WIDTH: usize = 72;
const ENERGY_CELLS: u8 = 10;

#[must_use]
pub fn banner() -> String {
    [
        "QUANTUM DETECTIVE",
        "One murder. Four realities. Type `help` for commands.",
    ]
    .join("\n")
}

#[must_use]
pub fn help() -> String {
    let width = command_specs()
        .iter()
        .map(|spec| spec.usage.len())
        .max()
        .unwrap_or(0);
    command_specs()
        .iter()
        .map(|spec| format!("  {:<width$}  {}", spec.usage, spec.description))
        .collect::<Vec<_>>()
        .join("\n")
}

#[must_use]
pub fn tutorial_hint() -> String {
    [
        "Tip: read the scene with `story`, pick with `choose <n>`, and jump realities",
        "with `switch <timeline>`. Each jump costs 20 quantum energy. `tutorial` hides this.",
    ]
    .join("\n")
}

#[must_use]
pub fn status(state: &GameState) -> String {
    let view = ProgressView::of(state);
    let energy = state.quantum_energy().value();
    let filled = usize::from(energy / ENERGY_CELLS);
    let empty = usize::from(ENERGY_CELLS) - filled;

    let mut lines = vec![
        format!(
            "Timeline: {} (chapter {})",
            state.current_timeline().as_str().to_uppercase(),
            state.current_chapter()
        ),
        format!(
            "Energy:   [{}{}] {energy}/{}",
            "#".repeat(filled),
            ".".repeat(empty),
            QuantumEnergy::MAX
        ),
        format!(
            "Story {}% | Evidence {}% | Energy spent {}%",
            view.story_percent, view.evidence_percent, view.energy_spent_percent
        ),
    ];
    for (timeline, progress, status) in view.timelines {
        let marker = if timeline == state.current_timeline() {
            '>'
        } else {
            ' '
        };
        lines.push(format!(
            "{marker} {:<6} {progress}/{BEATS_PER_TIMELINE} {}",
            timeline.as_str(),
            status.as_str()
        ));
    }
    lines.join("\n")
}

/// The scene at `(timeline, progress)`, or a note that the timeline has run
/// out of content.
#[must_use]
pub fn beat(timeline: Timeline, progress: u32, beat: Option<&StoryBeat>) -> String {
    let Some(beat) = beat else {
        return format!(
            "Timeline {timeline} has no further leads. Try `switch <timeline>` to continue elsewhere."
        );
    };
    let mut lines = vec![format!("== {} ({timeline}, scene {}) ==", beat.title, progress + 1)];
    lines.extend(wrap_words(beat.body, WIDTH));
    if let Some(clue) = beat.evidence() {
        lines.push(format!("Clue in sight: {} (`collect`)", clue.name()));
    }
    if let Some(challenge) = beat.challenge {
        lines.push(format!("{}: {}", challenge.task, challenge.description));
        lines.push(format!("  {}", challenge.puzzle));
        lines.push("  Answer with `solve <answer>`.".to_string());
    }
    for (i, choice) in beat.choices.iter().enumerate() {
        lines.push(format!("  {}. {} [{}]", i + 1, choice.text, choice.id));
    }
    lines.join("\n")
}

#[must_use]
pub fn evidence(state: &GameState) -> String {
    let clues = state.evidence();
    if clues.is_empty() {
        return "The case file is empty.".to_string();
    }
    let mut lines = vec![format!("Case file ({} clues):", clues.len())];
    lines.extend(clues.iter().map(evidence_line));
    lines.join("\n")
}

fn evidence_line(clue: &Evidence) -> String {
    let tag = clue
        .timeline()
        .map(|t| format!(" [{t}]"))
        .unwrap_or_default();
    // Saves are hand-editable; keep terminal escapes out of the listing.
    let mut line = format!("- {} ({}){tag}", strip_control(clue.name()), clue.id());
    if !clue.description().is_empty() {
        line.push_str("\n    ");
        line.push_str(&truncate_with_ellipsis(
            &strip_control(clue.description()),
            WIDTH - 4,
        ));
    }
    line
}

#[must_use]
pub fn achievements(state: &GameState) -> String {
    let unlocked = state.achievements();
    let mut lines = vec![format!(
        "Achievements ({}/{}, {} points):",
        unlocked.len(),
        CATALOG.len(),
        total_points(unlocked)
    )];
    for entry in &CATALOG {
        let mark = if unlocked.contains(&entry.id) { 'x' } else { ' ' };
        lines.push(format!(
            "[{mark}] {} ({}, {} pts): {}",
            entry.title,
            entry.rarity.as_str(),
            entry.points,
            entry.description
        ));
    }
    lines.join("\n")
}

#[must_use]
pub fn settings(settings: &GameSettings) -> String {
    let rows = [
        ("sound", on_off(settings.sound_enabled)),
        ("music", percent(settings.music_volume)),
        ("effects", percent(settings.effects_volume)),
        ("autosave", on_off(settings.auto_save)),
        ("difficulty", settings.difficulty.as_str().to_string()),
        ("subtitles", on_off(settings.subtitles)),
    ];
    rows.iter()
        .map(|(key, value)| format!("{key:<10}  {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn on_off(value: bool) -> String {
    let text = if value { "on" } else { "off" };
    text.to_string()
}

fn percent(volume: Volume) -> String {
    format!("{:.0}%", volume.get() * 100.0)
}

#[must_use]
pub fn slots(summaries: &[Option<SaveSummary>]) -> String {
    summaries
        .iter()
        .zip(SlotIndex::all())
        .map(|(summary, slot)| match summary {
            None => format!("Slot {slot}: empty"),
            Some(summary) => {
                let case = &summary.case;
                let saved = summary
                    .saved_at()
                    .map(|at| format!(" | saved {}", at.format("%Y-%m-%d %H:%M")))
                    .unwrap_or_default();
                format!(
                    "Slot {slot}: {} ch.{} | {} clues | {} achievements | {} min{saved}",
                    case.timeline,
                    case.chapter,
                    case.evidence_count,
                    case.achievement_count,
                    case.minutes_played
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[must_use]
pub fn effect(effect: &GameEffect) -> String {
    format!("* {}", effect.describe())
}

#[must_use]
pub fn sound(cue: SoundCue) -> String {
    format!("~ {} ~", cue.as_str())
}

// ===== Interview =====

#[must_use]
pub fn interview_opened(interview: &WitnessInterview) -> String {
    [
        format!(
            "Interviewing {} (appears {}).",
            interview.witness_name(),
            interview.emotion().as_str()
        ),
        approaches(),
    ]
    .join("\n")
}

fn approaches() -> String {
    let options: Vec<String> = Approach::ALL
        .iter()
        .enumerate()
        .map(|(i, approach)| format!("{}) {}", i + 1, approach.as_str()))
        .collect();
    format!("Approach: {}   `leave` ends the interview.", options.join("  "))
}

#[must_use]
pub fn interview_question(number: usize, total: usize, question: &Question) -> String {
    format!("Q{number}/{total}: {}", question.text)
}

#[must_use]
pub fn interview_turn(turn: &Turn, interview: &WitnessInterview) -> String {
    let mut lines = vec![
        format!("You: {}", turn.approach.line()),
        format!(
            "{} seems {} (stress {}, trust {}).",
            interview.witness_name(),
            turn.emotion.as_str(),
            interview.stress().value(),
            interview.trust().value()
        ),
    ];
    match &turn.reading {
        Reading::TruthRevealed(truth) => lines.push(format!("Truth: {truth}")),
        Reading::LieDetected(lie) => lines.push(format!("Lie: {lie}")),
        Reading::Inconclusive => {}
    }
    if let Some(tell) = interview.micro_expressions().last() {
        lines.push(format!("You notice: {tell}"));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use quantum_engine::{Difficulty, GameStateController, StoryProgress};

    #[test]
    fn fresh_status() {
        let state = GameState::new_game(0);
        insta::assert_snapshot!(status(&state), @r"
        Timeline: ALPHA (chapter 1)
        Energy:   [##########] 100/100
        Story 0% | Evidence 0% | Energy spent 0%
        > alpha  0/5 locked
          beta   0/5 locked
          gamma  0/5 locked
          delta  0/5 locked
        ");
    }

    #[test]
    fn status_after_a_jump() {
        let mut game = GameStateController::new_game(0);
        game.advance_story("examine_body");
        game.switch_timeline(Timeline::Delta);
        let state = game
            .into_state()
            .with_progress(StoryProgress::new([5, 0, 0, 3]));
        insta::assert_snapshot!(status(&state), @r"
        Timeline: DELTA (chapter 1)
        Energy:   [########..] 80/100
        Story 40% | Evidence 0% | Energy spent 20%
          alpha  5/5 completed
          beta   0/5 locked
          gamma  0/5 locked
        > delta  3/5 in progress
        ");
    }

    #[test]
    fn settings_table() {
        let custom = GameSettings {
            sound_enabled: false,
            difficulty: Difficulty::Bender,
            ..GameSettings::default()
        };
        insta::assert_snapshot!(settings(&custom), @r"
        sound       off
        music       70%
        effects     80%
        autosave    on
        difficulty  bender
        subtitles   off
        ");
    }

    #[test]
    fn empty_case_file_and_slots() {
        let state = GameState::new_game(0);
        assert_eq!(evidence(&state), "The case file is empty.");
        insta::assert_snapshot!(slots(&[None, None, None]), @r"
        Slot 0: empty
        Slot 1: empty
        Slot 2: empty
        ");
    }

    #[test]
    fn case_file_lists_tagged_clues() {
        let mut game = GameStateController::new_game(0);
        game.add_evidence(Evidence::from_static(
            "suicide_note_alpha",
            "Suicide Note",
            "A typed note claiming responsibility",
        ));
        insta::assert_snapshot!(evidence(game.snapshot()), @r"
        Case file (1 clues):
        - Suicide Note (suicide_note_alpha) [alpha]
            A typed note claiming responsibility
        ");
    }

    #[test]
    fn achievements_mark_unlocked_entries() {
        let mut game = GameStateController::new_game(0);
        game.add_evidence(Evidence::from_static("a", "A", ""));
        game.unlock_achievements();
        let text = achievements(game.snapshot());
        assert!(text.starts_with("Achievements (1/6, 10 points):"));
        assert!(text.contains("[x] First Discovery (common, 10 pts)"));
        assert!(text.contains("[ ] Quantum Detective (legendary, 100 pts)"));
    }

    #[test]
    fn beat_lists_numbered_choices() {
        let story = quantum_engine::BuiltinStory;
        let scene = quantum_engine::StoryRepository::lookup(&story, Timeline::Alpha, 1);
        let text = beat(Timeline::Alpha, 1, scene.as_ref());
        assert!(text.starts_with("== The Executive Suite (alpha, scene 2) =="));
        assert!(text.contains("Clue in sight: Coffee Cup (`collect`)"));
        assert!(text.contains("HACKING CHALLENGE: Decode the encrypted financial records"));
        assert!(text.contains("  1. Investigate the computer [analyze_computer]"));
        assert!(text.lines().all(|line| line.chars().count() <= 90));

        let none = beat(Timeline::Gamma, 2, None);
        assert!(none.starts_with("Timeline gamma has no further leads."));
    }

    #[test]
    fn help_lists_every_command() {
        let text = help();
        for spec in command_specs() {
            assert!(text.contains(spec.usage), "{}", spec.usage);
        }
    }
}
