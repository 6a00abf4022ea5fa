//! Integration tests for chordsmith
//!
//! Full quiz sessions and progression playback through the public API.

use chordsmith::quiz::{Progress, QuizKind, Session, SessionState, Submission};
use chordsmith::{
    compose_chord, compose_chord_str, format_progression, progression_from_str, ChordError,
    DifficultyTable, Level, Note, OctaveShift, ProgressionPlayer, Quality,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn note(text: &str) -> Note {
    text.parse().unwrap()
}

/// Answer every question correctly using the engine's own feedback
fn play_perfect_session(session: &mut Session) -> Progress {
    let mut progress = session.next_question();
    while let Progress::Question(_) = progress {
        match session.kind() {
            QuizKind::Identification => {
                let answer = session.reveal().unwrap();
                session.select_choice(&answer);
            }
            QuizKind::MissingNote => {
                let shown = session.replay();
                let complete = session.show_correct_feedback().sound;
                let missing = complete.into_iter().find(|n| !shown.contains(n)).unwrap();
                session.toggle_note(missing);
            }
            QuizKind::Construction => {
                for target in session.hint().unwrap().sound {
                    session.toggle_note(target.to_flat());
                }
            }
        }
        let result = session.submit();
        assert!(result.result().unwrap().correct, "{:?}", result);
        progress = session.next_question();
    }
    progress
}

#[test]
fn test_perfect_sessions_in_every_mode() {
    for kind in QuizKind::ALL {
        for level in Level::ALL {
            let mut session = Session::seeded(kind, level, 2024);
            let expected = session.profile().clone();
            match play_perfect_session(&mut session) {
                Progress::Complete(summary) => {
                    assert_eq!(summary.total, expected.questions_per_session);
                    assert_eq!(summary.correct, expected.questions_per_session);
                    assert_eq!(
                        summary.score,
                        expected.points_per_correct * expected.questions_per_session as u32
                    );
                    assert_eq!(summary.percentage, 100.0);
                }
                other => panic!("{} {}: {:?}", kind, level, other),
            }
            assert_eq!(session.state(), SessionState::Complete);
        }
    }
}

#[test]
fn test_yaml_table_drives_session() {
    let table = DifficultyTable::from_yaml(
        r#"
easy:
  root-notes: ["F#", "Bb"]
  qualities: [diminished]
  questions-per-session: 2
  answer-choices: 2
  points-per-correct: 7
"#,
    )
    .unwrap();
    let profile = table.profile(Level::Easy).clone();
    let mut session = Session::with_rng(
        QuizKind::Identification,
        profile,
        StdRng::seed_from_u64(4),
    );

    let question = match session.next_question() {
        Progress::Question(q) => q,
        other => panic!("{:?}", other),
    };
    let mut choices = question.choices.clone();
    choices.sort();
    assert_eq!(choices, ["Bb diminished", "Gb diminished"]);

    match play_perfect_session(&mut session) {
        // The first question was left unanswered
        Progress::Complete(summary) => {
            assert_eq!(summary.correct, 1);
            assert_eq!(summary.score, 7);
            assert_eq!(summary.report(), "Score: 7 points\nCorrect: 1/2 (50.0%)");
        }
        other => panic!("{:?}", other),
    }
}

#[test]
fn test_zero_question_table_aborts() {
    let table = DifficultyTable::from_yaml(
        "medium:\n  root-notes: [C, D]\n  qualities: [major]\n  questions-per-session: 0\n  answer-choices: 2\n  points-per-correct: 15\n",
    )
    .unwrap();
    let mut session = Session::with_rng(
        QuizKind::MissingNote,
        table.profile(Level::Medium).clone(),
        StdRng::seed_from_u64(1),
    );
    match session.start() {
        Progress::Aborted { notice, summary } => {
            assert_eq!(notice, "No questions were configured for this session.");
            assert_eq!(summary.percentage, 0.0);
        }
        other => panic!("{:?}", other),
    }
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(session.submit(), Submission::NothingToSubmit);
}

#[test]
fn test_bad_yaml_is_a_config_error() {
    let err = DifficultyTable::from_yaml("easy: [1, 2").unwrap_err();
    assert!(matches!(err, ChordError::ConfigError(_)));
}

#[test]
fn test_compose_examples() {
    let c = compose_chord(&note("C4"), Quality::Major);
    assert_eq!(c.name, "C E G");
    assert_eq!(c.notes, [note("C4"), note("E4"), note("G4")]);

    let dim = compose_chord(&note("C4"), Quality::Diminished);
    assert_eq!(dim.name, "C Eb Gb");
    assert_eq!(dim.notes, [note("C4"), note("D#4"), note("F#4")]);

    let top = compose_chord(&note("A5"), Quality::Minor);
    assert_eq!(top.notes, [note("A5"), note("C6"), note("E6")]);

    // Unreadable root falls back to C4
    assert_eq!(compose_chord_str("X9", Quality::Major), c);
}

#[test]
fn test_progression_playback() {
    let chords = progression_from_str("C4", "I-V-vi-IV").unwrap();
    assert_eq!(
        format_progression(&chords),
        "C major → G major → A minor → F major"
    );

    let mut player = ProgressionPlayer::new(chords);
    player.start(false);
    let first = player.next_chord(OctaveShift::new(-1)).unwrap();
    assert_eq!(first.status, "Playing: C3 major (1/4)");
    assert_eq!(first.notes, vec![note("C3"), note("E3"), note("G3")]);

    let mut count = 1;
    while player.next_chord(OctaveShift::default()).is_some() {
        count += 1;
    }
    assert_eq!(count, 4);
    assert!(!player.is_playing());
}

#[test]
fn test_progression_preset_and_errors() {
    let chords = progression_from_str("D4", "ii-V-I-vi").unwrap();
    let roots: Vec<String> = chords.iter().map(|c| c.root.to_string()).collect();
    assert_eq!(roots, ["E4", "A4", "D4", "B4"]);

    assert_eq!(
        progression_from_str("D4", "I-IX"),
        Err(ChordError::InvalidDegree("IX".to_string()))
    );
    assert!(matches!(
        progression_from_str("H4", "I"),
        Err(ChordError::InvalidNote(_))
    ));
}
