//! The three quiz modes.
//!
//! Each mode owns the state of its current question and nothing else;
//! scores and counters live in the session. Starting a question or calling
//! `clear` drops whatever the previous question left behind.

use log::debug;
use rand::Rng;

use super::types::{
    highlight, AnswerResult, Feedback, Highlight, HighlightedNote, Hint, Input,
    QuestionDescriptor, QuizKind, Submission,
};
use crate::chord::ChordSpec;
use crate::difficulty::DifficultyProfile;
use crate::note::Note;

/// Contract shared by every quiz mode
pub trait QuestionMode {
    fn kind(&self) -> QuizKind;

    /// Generate a fresh question, discarding the previous one
    fn start_question<R: Rng + ?Sized>(
        &mut self,
        profile: &DifficultyProfile,
        rng: &mut R,
    ) -> QuestionDescriptor;

    /// Record learner input. Returns the key colour changes it causes.
    fn handle_input(&mut self, input: Input) -> Vec<HighlightedNote>;

    /// Score the recorded answer. Each question is scored at most once.
    fn submit(&mut self, points_per_correct: u32) -> Submission;

    /// Notes to sound again; never regenerates the question
    fn replay(&self) -> Vec<Note>;

    fn hint(&self) -> Option<Hint>;

    /// The answer in words
    fn reveal(&self) -> Option<String>;

    /// Key colours and notes showing the right answer
    fn correct_feedback(&self) -> Feedback;

    fn clear(&mut self);
}

/// Are `submitted` and `target` the same chord tones? Spelling does not
/// matter, octaves do.
pub fn same_chord_tones(submitted: &[Note], target: &[Note]) -> bool {
    submitted.len() == target.len()
        && target
            .iter()
            .all(|t| submitted.iter().any(|s| s.is_enharmonic(t)))
}

fn sorted_display_names(notes: &[Note], spec: &ChordSpec) -> String {
    let mut names: Vec<String> = notes.iter().map(|n| n.display_name(spec.quality)).collect();
    names.sort();
    names.join(" ")
}

fn score(correct: bool, points_per_correct: u32) -> u32 {
    if correct {
        points_per_correct
    } else {
        0
    }
}

#[derive(Debug, Clone)]
struct IdentificationQuestion {
    spec: ChordSpec,
    notes: [Note; 3],
    selected: Option<String>,
    answered: bool,
}

/// Name the highlighted chord
#[derive(Debug, Clone, Default)]
pub struct Identification {
    question: Option<IdentificationQuestion>,
}

impl QuestionMode for Identification {
    fn kind(&self) -> QuizKind {
        QuizKind::Identification
    }

    fn start_question<R: Rng + ?Sized>(
        &mut self,
        profile: &DifficultyProfile,
        rng: &mut R,
    ) -> QuestionDescriptor {
        let spec = profile.random_chord(rng);
        let notes = spec.chord().notes();
        let choices = profile.answer_choices(&spec, rng);
        debug!("Identification question: {}", spec);

        self.question = Some(IdentificationQuestion {
            spec,
            notes,
            selected: None,
            answered: false,
        });

        QuestionDescriptor {
            kind: self.kind(),
            prompt: "What chord is highlighted on the piano?".to_string(),
            choices,
            highlights: highlight(&notes, Highlight::Prompt),
            sound: notes.to_vec(),
        }
    }

    fn handle_input(&mut self, input: Input) -> Vec<HighlightedNote> {
        if let (Some(q), Input::Choice(choice)) = (self.question.as_mut(), input) {
            if !q.answered {
                q.selected = Some(choice);
            }
        }
        Vec::new()
    }

    fn submit(&mut self, points_per_correct: u32) -> Submission {
        let Some(q) = self.question.as_mut() else {
            return Submission::NothingToSubmit;
        };
        if q.answered {
            return Submission::NothingToSubmit;
        }
        let Some(selected) = q.selected.clone() else {
            return Submission::NothingToSubmit;
        };
        q.answered = true;

        // Choices are generated as exact labels, so plain equality is safe
        let correct_answer = q.spec.label();
        let correct = selected == correct_answer;
        let state = if correct {
            Highlight::Correct
        } else {
            Highlight::Incorrect
        };

        Submission::Scored(AnswerResult {
            correct,
            score_delta: score(correct, points_per_correct),
            user_answer: selected,
            correct_answer,
            feedback: Feedback {
                highlights: highlight(&q.notes, state),
                sound: Vec::new(),
            },
        })
    }

    fn replay(&self) -> Vec<Note> {
        self.question
            .as_ref()
            .map(|q| q.notes.to_vec())
            .unwrap_or_default()
    }

    fn hint(&self) -> Option<Hint> {
        let q = self.question.as_ref()?;
        Some(Hint {
            text: format!("The answer is {}", q.spec.label()),
            highlights: highlight(&q.notes, Highlight::Correct),
            sound: Vec::new(),
        })
    }

    fn reveal(&self) -> Option<String> {
        self.question.as_ref().map(|q| q.spec.label())
    }

    fn correct_feedback(&self) -> Feedback {
        match &self.question {
            Some(q) => Feedback {
                highlights: highlight(&q.notes, Highlight::Correct),
                sound: Vec::new(),
            },
            None => Feedback::default(),
        }
    }

    fn clear(&mut self) {
        self.question = None;
    }
}

#[derive(Debug, Clone)]
struct MissingNoteQuestion {
    spec: ChordSpec,
    complete: [Note; 3],
    shown: Vec<Note>,
    missing: Note,
    selected: Option<Note>,
    answered: bool,
}

/// Find the chord tone that was left out
#[derive(Debug, Clone, Default)]
pub struct MissingNote {
    question: Option<MissingNoteQuestion>,
}

impl QuestionMode for MissingNote {
    fn kind(&self) -> QuizKind {
        QuizKind::MissingNote
    }

    fn start_question<R: Rng + ?Sized>(
        &mut self,
        profile: &DifficultyProfile,
        rng: &mut R,
    ) -> QuestionDescriptor {
        let spec = profile.random_chord(rng);
        let complete = spec.chord().notes();
        let missing_index = rng.gen_range(0..complete.len());
        let missing = complete[missing_index];
        let shown: Vec<Note> = complete
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != missing_index)
            .map(|(_, &n)| n)
            .collect();
        debug!("Missing-note question: {} without {}", spec, missing);

        let descriptor = QuestionDescriptor {
            kind: self.kind(),
            prompt: format!(
                "Complete the {} chord by clicking the missing note",
                spec.label()
            ),
            choices: Vec::new(),
            highlights: highlight(&shown, Highlight::Prompt),
            sound: shown.clone(),
        };

        self.question = Some(MissingNoteQuestion {
            spec,
            complete,
            shown,
            missing,
            selected: None,
            answered: false,
        });
        descriptor
    }

    /// One pick at a time: a new key replaces the previous pick, clicking
    /// the picked key again clears it. Keys already shown are ignored.
    fn handle_input(&mut self, input: Input) -> Vec<HighlightedNote> {
        let (Some(q), Input::Note(note)) = (self.question.as_mut(), input) else {
            return Vec::new();
        };
        if q.answered || q.shown.iter().any(|n| n.is_enharmonic(&note)) {
            return Vec::new();
        }

        match q.selected {
            Some(previous) if previous.is_enharmonic(&note) => {
                q.selected = None;
                highlight(&[previous], Highlight::Neutral)
            }
            Some(previous) => {
                q.selected = Some(note);
                vec![
                    HighlightedNote {
                        note: previous,
                        state: Highlight::Neutral,
                    },
                    HighlightedNote {
                        note,
                        state: Highlight::Selected,
                    },
                ]
            }
            None => {
                q.selected = Some(note);
                highlight(&[note], Highlight::Selected)
            }
        }
    }

    fn submit(&mut self, points_per_correct: u32) -> Submission {
        let Some(q) = self.question.as_mut() else {
            return Submission::NothingToSubmit;
        };
        let Some(selected) = q.selected.filter(|_| !q.answered) else {
            return Submission::NothingToSubmit;
        };
        q.answered = true;

        let correct = selected.is_enharmonic(&q.missing);
        let feedback = if correct {
            Feedback {
                highlights: highlight(&q.complete, Highlight::Correct),
                sound: q.complete.to_vec(),
            }
        } else {
            Feedback {
                highlights: highlight(&[selected], Highlight::Incorrect),
                sound: Vec::new(),
            }
        };

        Submission::Scored(AnswerResult {
            correct,
            score_delta: score(correct, points_per_correct),
            user_answer: selected.display_name(q.spec.quality),
            correct_answer: q.missing.display_name(q.spec.quality),
            feedback,
        })
    }

    fn replay(&self) -> Vec<Note> {
        self.question
            .as_ref()
            .map(|q| q.shown.clone())
            .unwrap_or_default()
    }

    fn hint(&self) -> Option<Hint> {
        let q = self.question.as_ref()?;
        Some(Hint {
            text: format!(
                "{} intervals: {}",
                q.spec.label(),
                q.spec.quality.interval_description()
            ),
            highlights: Vec::new(),
            sound: Vec::new(),
        })
    }

    fn reveal(&self) -> Option<String> {
        let q = self.question.as_ref()?;
        Some(format!(
            "The missing note is: {}",
            q.missing.display_name(q.spec.quality)
        ))
    }

    fn correct_feedback(&self) -> Feedback {
        match &self.question {
            Some(q) => Feedback {
                highlights: highlight(&q.complete, Highlight::Correct),
                sound: q.complete.to_vec(),
            },
            None => Feedback::default(),
        }
    }

    fn clear(&mut self) {
        self.question = None;
    }
}

#[derive(Debug, Clone)]
struct ConstructionQuestion {
    spec: ChordSpec,
    target: [Note; 3],
    selected: Vec<Note>,
    answered: bool,
}

/// Build a named chord key by key
#[derive(Debug, Clone, Default)]
pub struct Construction {
    question: Option<ConstructionQuestion>,
}

impl QuestionMode for Construction {
    fn kind(&self) -> QuizKind {
        QuizKind::Construction
    }

    fn start_question<R: Rng + ?Sized>(
        &mut self,
        profile: &DifficultyProfile,
        rng: &mut R,
    ) -> QuestionDescriptor {
        let spec = profile.random_chord(rng);
        let target = spec.chord().notes();
        debug!("Construction question: {}", spec);

        self.question = Some(ConstructionQuestion {
            spec,
            target,
            selected: Vec::new(),
            answered: false,
        });

        QuestionDescriptor {
            kind: self.kind(),
            prompt: format!("Build: {}", spec.label()),
            choices: Vec::new(),
            highlights: Vec::new(),
            sound: Vec::new(),
        }
    }

    fn handle_input(&mut self, input: Input) -> Vec<HighlightedNote> {
        let (Some(q), Input::Note(note)) = (self.question.as_mut(), input) else {
            return Vec::new();
        };
        if q.answered {
            return Vec::new();
        }

        match q.selected.iter().position(|n| n.is_enharmonic(&note)) {
            Some(index) => {
                let removed = q.selected.remove(index);
                highlight(&[removed], Highlight::Neutral)
            }
            None => {
                q.selected.push(note);
                highlight(&[note], Highlight::Selected)
            }
        }
    }

    fn submit(&mut self, points_per_correct: u32) -> Submission {
        let Some(q) = self.question.as_mut() else {
            return Submission::NothingToSubmit;
        };
        if q.answered || q.selected.is_empty() {
            return Submission::NothingToSubmit;
        }
        q.answered = true;

        let correct = same_chord_tones(&q.selected, &q.target);
        let feedback = if correct {
            Feedback {
                highlights: highlight(&q.target, Highlight::Correct),
                sound: q.target.to_vec(),
            }
        } else {
            Feedback {
                highlights: highlight(&q.selected, Highlight::Incorrect),
                sound: Vec::new(),
            }
        };

        Submission::Scored(AnswerResult {
            correct,
            score_delta: score(correct, points_per_correct),
            user_answer: sorted_display_names(&q.selected, &q.spec),
            correct_answer: q.spec.label(),
            feedback,
        })
    }

    /// The learner's chord so far
    fn replay(&self) -> Vec<Note> {
        self.question
            .as_ref()
            .map(|q| q.selected.clone())
            .unwrap_or_default()
    }

    fn hint(&self) -> Option<Hint> {
        let q = self.question.as_ref()?;
        Some(Hint {
            text: format!(
                "Listen to the target chord! {} intervals: {}",
                q.spec.label(),
                q.spec.quality.interval_description()
            ),
            highlights: Vec::new(),
            sound: q.target.to_vec(),
        })
    }

    fn reveal(&self) -> Option<String> {
        let q = self.question.as_ref()?;
        Some(format!(
            "Correct notes: {}",
            sorted_display_names(&q.target, &q.spec)
        ))
    }

    fn correct_feedback(&self) -> Feedback {
        match &self.question {
            Some(q) => Feedback {
                highlights: highlight(&q.target, Highlight::Correct),
                sound: q.target.to_vec(),
            },
            None => Feedback::default(),
        }
    }

    fn clear(&mut self) {
        self.question = None;
    }
}

/// The active mode, selected by [`QuizKind`]
#[derive(Debug, Clone)]
pub enum Mode {
    Identification(Identification),
    MissingNote(MissingNote),
    Construction(Construction),
}

impl Mode {
    pub fn new(kind: QuizKind) -> Self {
        match kind {
            QuizKind::Identification => Mode::Identification(Identification::default()),
            QuizKind::MissingNote => Mode::MissingNote(MissingNote::default()),
            QuizKind::Construction => Mode::Construction(Construction::default()),
        }
    }
}

macro_rules! dispatch {
    ($self:expr, $mode:ident => $call:expr) => {
        match $self {
            Mode::Identification($mode) => $call,
            Mode::MissingNote($mode) => $call,
            Mode::Construction($mode) => $call,
        }
    };
}

impl QuestionMode for Mode {
    fn kind(&self) -> QuizKind {
        dispatch!(self, m => m.kind())
    }

    fn start_question<R: Rng + ?Sized>(
        &mut self,
        profile: &DifficultyProfile,
        rng: &mut R,
    ) -> QuestionDescriptor {
        dispatch!(self, m => m.start_question(profile, rng))
    }

    fn handle_input(&mut self, input: Input) -> Vec<HighlightedNote> {
        dispatch!(self, m => m.handle_input(input))
    }

    fn submit(&mut self, points_per_correct: u32) -> Submission {
        dispatch!(self, m => m.submit(points_per_correct))
    }

    fn replay(&self) -> Vec<Note> {
        dispatch!(self, m => m.replay())
    }

    fn hint(&self) -> Option<Hint> {
        dispatch!(self, m => m.hint())
    }

    fn reveal(&self) -> Option<String> {
        dispatch!(self, m => m.reveal())
    }

    fn correct_feedback(&self) -> Feedback {
        dispatch!(self, m => m.correct_feedback())
    }

    fn clear(&mut self) {
        dispatch!(self, m => m.clear())
    }
}
