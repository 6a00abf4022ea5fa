//! Quiz session state machine
//!
//! `Idle -> Active(question 1..N) -> Complete -> Idle`. The session owns the
//! counters and the random source; the active [`Mode`] owns the question.

use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use super::modes::{Mode, QuestionMode};
use super::types::{
    AnswerResult, Feedback, HighlightedNote, Hint, Input, QuestionDescriptor, QuizKind,
    Submission,
};
use crate::difficulty::{self, DifficultyProfile, Level};
use crate::note::Note;

/// Shown when a session is started with zero configured questions
pub const NO_QUESTIONS_NOTICE: &str = "No questions were configured for this session.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    /// Question `question` of the session is on screen (1-based)
    Active { question: usize },
    Complete,
}

/// End-of-session totals
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SessionSummary {
    pub score: u32,
    pub correct: usize,
    pub total: usize,
    /// `100 * correct / total`, 0 when there were no questions
    pub percentage: f64,
}

impl SessionSummary {
    pub fn new(score: u32, correct: usize, total: usize) -> Self {
        let percentage = if total == 0 {
            0.0
        } else {
            100.0 * correct as f64 / total as f64
        };
        Self {
            score,
            correct,
            total,
            percentage,
        }
    }

    /// Two-line report, e.g. `Score: 30 points` / `Correct: 3/5 (60.0%)`
    pub fn report(&self) -> String {
        format!(
            "Score: {} points\nCorrect: {}/{} ({:.1}%)",
            self.score, self.correct, self.total, self.percentage
        )
    }
}

/// What happens after asking for the next question
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    Question(QuestionDescriptor),
    Complete(SessionSummary),
    /// Nothing to play; the session is back to idle
    Aborted {
        notice: String,
        summary: SessionSummary,
    },
}

/// One quiz run in one mode
#[derive(Debug)]
pub struct Session<R: Rng = StdRng> {
    mode: Mode,
    profile: DifficultyProfile,
    rng: R,
    state: SessionState,
    question_count: usize,
    score: u32,
    correct_count: usize,
}

impl Session<StdRng> {
    /// Session on a built-in level
    pub fn new(kind: QuizKind, level: Level) -> Self {
        Session::with_rng(
            kind,
            difficulty::profile(level).clone(),
            StdRng::from_entropy(),
        )
    }

    /// Reproducible session on a built-in level
    pub fn seeded(kind: QuizKind, level: Level, seed: u64) -> Self {
        Session::with_rng(
            kind,
            difficulty::profile(level).clone(),
            StdRng::seed_from_u64(seed),
        )
    }
}

impl<R: Rng> Session<R> {
    pub fn with_rng(kind: QuizKind, profile: DifficultyProfile, rng: R) -> Self {
        Self {
            mode: Mode::new(kind),
            profile,
            rng,
            state: SessionState::Idle,
            question_count: 0,
            score: 0,
            correct_count: 0,
        }
    }

    pub fn kind(&self) -> QuizKind {
        self.mode.kind()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active { .. })
    }

    pub fn profile(&self) -> &DifficultyProfile {
        &self.profile
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    pub fn question_count(&self) -> usize {
        self.question_count
    }

    pub fn total_questions(&self) -> usize {
        self.profile.questions_per_session
    }

    /// Reset the counters and present question 1
    pub fn start(&mut self) -> Progress {
        self.reset();
        info!(
            "Starting {} session: {} questions",
            self.kind(),
            self.total_questions()
        );
        self.advance()
    }

    /// Move on to the next question, finishing the session after the last
    /// one. Starts a new session when none is active.
    pub fn next_question(&mut self) -> Progress {
        if !self.is_active() {
            return self.start();
        }
        self.advance()
    }

    fn advance(&mut self) -> Progress {
        self.mode.clear();
        self.question_count += 1;
        if self.question_count > self.profile.questions_per_session {
            return self.finish();
        }
        self.state = SessionState::Active {
            question: self.question_count,
        };
        let question = self.mode.start_question(&self.profile, &mut self.rng);
        Progress::Question(question)
    }

    fn finish(&mut self) -> Progress {
        self.mode.clear();
        let total = self.profile.questions_per_session;
        let summary = SessionSummary::new(self.score, self.correct_count, total);

        if total == 0 {
            warn!("{} session aborted: {}", self.kind(), NO_QUESTIONS_NOTICE);
            self.state = SessionState::Idle;
            return Progress::Aborted {
                notice: NO_QUESTIONS_NOTICE.to_string(),
                summary,
            };
        }

        info!(
            "{} session complete: {} points, {}/{}",
            self.kind(),
            summary.score,
            summary.correct,
            summary.total
        );
        self.state = SessionState::Complete;
        Progress::Complete(summary)
    }

    /// Forward learner input to the active question
    pub fn handle_input(&mut self, input: Input) -> Vec<HighlightedNote> {
        if !self.is_active() {
            return Vec::new();
        }
        self.mode.handle_input(input)
    }

    pub fn select_choice(&mut self, choice: &str) -> Vec<HighlightedNote> {
        self.handle_input(Input::Choice(choice.to_string()))
    }

    pub fn toggle_note(&mut self, note: Note) -> Vec<HighlightedNote> {
        self.handle_input(Input::Note(note))
    }

    /// Score the current answer and update the totals
    pub fn submit(&mut self) -> Submission {
        if !self.is_active() {
            return Submission::NothingToSubmit;
        }
        let submission = self.mode.submit(self.profile.points_per_correct);
        if let Submission::Scored(result) = &submission {
            self.score = self.score.saturating_add(result.score_delta);
            if result.correct {
                self.correct_count += 1;
            }
        }
        submission
    }

    /// `"Correct! (+10 points) | Score: 10 | Correct: 1/1"`
    pub fn status_line(&self, result: &AnswerResult) -> String {
        format!(
            "{} | Score: {} | Correct: {}/{}",
            result.message(),
            self.score,
            self.correct_count,
            self.question_count
        )
    }

    /// `"Question 2/5"` while active
    pub fn progress_label(&self) -> Option<String> {
        match self.state {
            SessionState::Active { question } => {
                Some(format!("Question {}/{}", question, self.total_questions()))
            }
            _ => None,
        }
    }

    pub fn replay(&self) -> Vec<Note> {
        self.mode.replay()
    }

    pub fn hint(&self) -> Option<Hint> {
        self.mode.hint()
    }

    pub fn reveal(&self) -> Option<String> {
        self.mode.reveal()
    }

    /// Follow-up step after a wrong answer, triggered by the host's timer
    pub fn show_correct_feedback(&self) -> Feedback {
        self.mode.correct_feedback()
    }

    /// Switch quiz. An active session is reset.
    pub fn set_mode(&mut self, kind: QuizKind) {
        if kind == self.kind() {
            return;
        }
        if self.is_active() {
            info!("Switching from {} to {}, session reset", self.kind(), kind);
        }
        self.reset();
        self.mode = Mode::new(kind);
    }

    /// Drop the question and counters. Safe to call in any state.
    pub fn reset(&mut self) {
        self.mode.clear();
        self.state = SessionState::Idle;
        self.question_count = 0;
        self.score = 0;
        self.correct_count = 0;
    }

    /// Leave mid-session
    pub fn abandon(&mut self) {
        if self.is_active() {
            info!(
                "{} session abandoned at question {}",
                self.kind(),
                self.question_count
            );
        }
        self.reset();
    }
}
