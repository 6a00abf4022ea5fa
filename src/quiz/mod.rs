//! # Quiz Module
//!
//! Ear-training quiz sessions built on the chord composer and the
//! difficulty table.
//!
//! ## Sub-modules
//! - `types` - question descriptors, input, answer results, highlight states
//! - `modes` - the three quiz modes behind one [`QuestionMode`] contract
//! - `session` - session state machine, counters and summary
//!
//! ## Modes
//! | Mode           | Question                                  | Correct when                          |
//! |----------------|-------------------------------------------|---------------------------------------|
//! | identification | chord highlighted and sounded, choices    | picked label equals the chord label   |
//! | missing-note   | two of three chord tones shown            | clicked note is enharmonic to the gap |
//! | construction   | chord named                               | clicked set matches, spelling ignored |
//!
//! ## Timing
//! The engine never waits. Delayed steps (the correct-answer feedback after
//! a wrong answer, staggered cues) are separate calls the host schedules.
//!
//! ## Example
//! ```rust
//! use chordsmith::quiz::{Progress, QuizKind, Session};
//! use chordsmith::Level;
//!
//! let mut session = Session::seeded(QuizKind::Identification, Level::Easy, 42);
//! let question = match session.next_question() {
//!     Progress::Question(q) => q,
//!     other => panic!("unexpected {:?}", other),
//! };
//! assert_eq!(question.choices.len(), 4);
//!
//! session.select_choice(&question.choices[0]);
//! let result = session.submit();
//! assert!(result.result().is_some());
//! assert_eq!(session.progress_label().as_deref(), Some("Question 1/5"));
//! ```

mod modes;
mod session;
mod types;


pub use modes::{same_chord_tones, Construction, Identification, MissingNote, Mode, QuestionMode};
pub use session::{Progress, Session, SessionState, SessionSummary, NO_QUESTIONS_NOTICE};
pub use types::{
    AnswerResult, Cue, Feedback, Highlight, HighlightedNote, Hint, Input, QuestionDescriptor,
    QuizKind, Submission,
};
