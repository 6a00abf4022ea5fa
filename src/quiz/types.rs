//! Quiz data type definitions
//!
//! Everything the host UI renders or sends back: question descriptors,
//! learner input, answer results, highlight states and audio cues.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChordError;
use crate::note::{Note, PitchClass};

/// Which quiz is being played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuizKind {
    /// Name the highlighted chord from multiple choices
    Identification,
    /// Click the chord tone that was left out
    MissingNote,
    /// Click every note of a named chord
    Construction,
}

impl QuizKind {
    pub const ALL: [QuizKind; 3] = [
        QuizKind::Identification,
        QuizKind::MissingNote,
        QuizKind::Construction,
    ];

    pub fn title(self) -> &'static str {
        match self {
            QuizKind::Identification => "Chord Identification",
            QuizKind::MissingNote => "Missing Note",
            QuizKind::Construction => "Chord Construction",
        }
    }
}

impl fmt::Display for QuizKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for QuizKind {
    type Err = ChordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "identification" | "identify" => Ok(QuizKind::Identification),
            "missing-note" | "missing" => Ok(QuizKind::MissingNote),
            "construction" | "build" => Ok(QuizKind::Construction),
            _ => Err(ChordError::InvalidMode(s.to_string())),
        }
    }
}

/// Semantic colour of a piano key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Highlight {
    /// Back to the key's normal look
    Neutral,
    /// Part of the question
    Prompt,
    /// Picked by the learner
    Selected,
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HighlightedNote {
    pub note: Note,
    pub state: Highlight,
}

pub(crate) fn highlight(notes: &[Note], state: Highlight) -> Vec<HighlightedNote> {
    notes
        .iter()
        .map(|&note| HighlightedNote { note, state })
        .collect()
}

/// What the host needs to present a question
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDescriptor {
    pub kind: QuizKind,
    pub prompt: String,
    /// Multiple-choice answers (identification only), in display order
    pub choices: Vec<String>,
    /// Keys to colour before the learner answers
    pub highlights: Vec<HighlightedNote>,
    /// Notes to sound together when the question appears
    pub sound: Vec<Note>,
}

/// Learner input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A multiple-choice answer was picked
    Choice(String),
    /// A piano key was clicked; clicking again toggles it off
    Note(Note),
}

/// Key colours and notes to sound for a feedback step
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Feedback {
    pub highlights: Vec<HighlightedNote>,
    pub sound: Vec<Note>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hint {
    pub text: String,
    pub highlights: Vec<HighlightedNote>,
    pub sound: Vec<Note>,
}

/// Outcome of a scored answer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResult {
    pub correct: bool,
    pub score_delta: u32,
    pub user_answer: String,
    pub correct_answer: String,
    /// Immediate feedback. After an incorrect answer the host follows up
    /// with the correct-answer feedback once its delay has passed.
    pub feedback: Feedback,
}

impl AnswerResult {
    pub fn cue(&self) -> Cue {
        if self.correct {
            Cue::Success
        } else {
            Cue::Error
        }
    }

    /// "Correct! (+10 points)" or "Wrong. Correct answer: C major"
    pub fn message(&self) -> String {
        if self.correct {
            format!("Correct! (+{} points)", self.score_delta)
        } else {
            format!("Wrong. Correct answer: {}", self.correct_answer)
        }
    }
}

/// Result of asking the engine to score the current answer
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Scored(AnswerResult),
    /// No answer given yet, no active question, or already scored
    NothingToSubmit,
}

impl Submission {
    pub fn result(&self) -> Option<&AnswerResult> {
        match self {
            Submission::Scored(result) => Some(result),
            Submission::NothingToSubmit => None,
        }
    }
}

/// Short arpeggio played after an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Cue {
    Success,
    Error,
}

impl Cue {
    /// Notes in playing order
    pub fn notes(self) -> Vec<Note> {
        match self {
            Cue::Success => vec![
                Note::new(PitchClass::C, 4),
                Note::new(PitchClass::E, 4),
                Note::new(PitchClass::G, 4),
                Note::new(PitchClass::C, 5),
            ],
            Cue::Error => vec![
                Note::new(PitchClass::F, 4),
                Note::new(PitchClass::D, 4),
                Note::new(PitchClass::ASharp, 3).to_flat(),
            ],
        }
    }
}
