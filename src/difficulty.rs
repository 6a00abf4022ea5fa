//! # Difficulty Configuration
//!
//! Per-level quiz parameters: which roots and qualities questions draw
//! from, how many questions a session has, how many answer choices are
//! offered and how many points a correct answer earns.
//!
//! ## Built-in Levels
//! | Level  | Roots                | Qualities                   | Questions | Choices | Points |
//! |--------|----------------------|-----------------------------|-----------|---------|--------|
//! | easy   | C F G A D E          | major, minor                | 5         | 4       | 10     |
//! | medium | all twelve           | major, minor, diminished    | 8         | 4       | 15     |
//!
//! Unrecognised level names fall back to `easy`.
//!
//! ## YAML Overrides
//! A table can be loaded from YAML; levels left out keep their built-in
//! profile.
//! ```rust
//! use chordsmith::{DifficultyTable, Level};
//!
//! let table = DifficultyTable::from_yaml(r#"
//! easy:
//!   root-notes: ["C", "G"]
//!   qualities: [major]
//!   questions-per-session: 3
//!   answer-choices: 2
//!   points-per-correct: 5
//! "#)?;
//! assert_eq!(table.profile(Level::Easy).questions_per_session, 3);
//! assert_eq!(table.profile(Level::Medium).questions_per_session, 8);
//! # Ok::<(), chordsmith::ChordError>(())
//! ```

use std::fmt;
use std::str::FromStr;

use log::warn;
use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::chord::{ChordSpec, Quality};
use crate::error::ChordError;
use crate::note::{Note, PitchClass};

/// Difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    Easy,
    Medium,
}

impl Level {
    pub const ALL: [Level; 2] = [Level::Easy, Level::Medium];

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Easy => "easy",
            Level::Medium => "medium",
        }
    }

    /// Lenient lookup used by hosts: unknown names mean `Easy`
    pub fn from_name(name: &str) -> Level {
        name.parse().unwrap_or_else(|e| {
            warn!("{}, using easy", e);
            Level::Easy
        })
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ChordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Level::Easy),
            "medium" => Ok(Level::Medium),
            _ => Err(ChordError::InvalidLevel(s.to_string())),
        }
    }
}

/// Quiz parameters for one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DifficultyProfile {
    pub root_notes: Vec<PitchClass>,
    pub qualities: Vec<Quality>,
    pub questions_per_session: usize,
    pub answer_choices: usize,
    pub points_per_correct: u32,
}

impl DifficultyProfile {
    pub fn easy() -> Self {
        Self {
            root_notes: vec![
                PitchClass::C,
                PitchClass::F,
                PitchClass::G,
                PitchClass::A,
                PitchClass::D,
                PitchClass::E,
            ],
            qualities: vec![Quality::Major, Quality::Minor],
            questions_per_session: 5,
            answer_choices: 4,
            points_per_correct: 10,
        }
    }

    pub fn medium() -> Self {
        Self {
            root_notes: PitchClass::ALL.to_vec(),
            qualities: Quality::ALL.to_vec(),
            questions_per_session: 8,
            answer_choices: 4,
            points_per_correct: 15,
        }
    }

    /// Draw a root and a quality independently and uniformly. Diminished
    /// roots come back flat-spelled; roots carry no octave.
    pub fn random_chord<R: Rng + ?Sized>(&self, rng: &mut R) -> ChordSpec {
        let root = self.root_notes.choose(rng).copied().unwrap_or(PitchClass::C);
        let quality = self.qualities.choose(rng).copied().unwrap_or(Quality::Major);
        ChordSpec::new(Note::pitch_class(root), quality)
    }

    /// Every distinct answer label this profile can produce
    pub fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = Vec::new();
        for &root in &self.root_notes {
            for &quality in &self.qualities {
                let label = ChordSpec::new(Note::pitch_class(root), quality).label();
                if !labels.contains(&label) {
                    labels.push(label);
                }
            }
        }
        labels
    }

    /// Multiple-choice answers: the correct label once, plus distinct wrong
    /// labels drawn at random, in shuffled order.
    ///
    /// Asks for `answer_choices` entries but settles for fewer when the
    /// profile cannot produce that many distinct labels.
    pub fn answer_choices<R: Rng + ?Sized>(&self, correct: &ChordSpec, rng: &mut R) -> Vec<String> {
        let correct_label = correct.label();
        let available = self.labels().iter().filter(|l| **l != correct_label).count() + 1;
        let wanted = self.answer_choices.clamp(1, available);

        let mut choices = vec![correct_label];
        while choices.len() < wanted {
            let wrong = self.random_chord(rng).label();
            if !choices.contains(&wrong) {
                choices.push(wrong);
            }
        }

        choices.shuffle(rng);
        choices
    }

    /// Check a profile loaded from configuration. Zero questions is allowed
    /// (the session reports it and aborts).
    pub fn validate(&self, level: Level) -> Result<(), ChordError> {
        let fail = |message: String| Err(ChordError::ConfigError(format!("{}: {}", level, message)));

        if self.root_notes.is_empty() {
            return fail("root-notes must not be empty".to_string());
        }
        if self.qualities.is_empty() {
            return fail("qualities must not be empty".to_string());
        }
        if self.answer_choices == 0 {
            return fail("answer-choices must be at least 1".to_string());
        }
        let distinct = self.labels().len();
        if self.answer_choices > distinct {
            return fail(format!(
                "answer-choices is {} but only {} distinct chords are available",
                self.answer_choices, distinct
            ));
        }
        Ok(())
    }
}

/// Profiles for every level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DifficultyTable {
    #[serde(default = "DifficultyProfile::easy")]
    pub easy: DifficultyProfile,
    #[serde(default = "DifficultyProfile::medium")]
    pub medium: DifficultyProfile,
}

impl Default for DifficultyTable {
    fn default() -> Self {
        Self {
            easy: DifficultyProfile::easy(),
            medium: DifficultyProfile::medium(),
        }
    }
}

static BUILTIN: Lazy<DifficultyTable> = Lazy::new(DifficultyTable::default);

impl DifficultyTable {
    pub fn builtin() -> &'static DifficultyTable {
        &BUILTIN
    }

    /// Parse and validate a YAML table
    pub fn from_yaml(text: &str) -> Result<Self, ChordError> {
        let table: DifficultyTable =
            serde_yaml::from_str(text).map_err(|e| ChordError::ConfigError(e.to_string()))?;
        for level in Level::ALL {
            table.profile(level).validate(level)?;
        }
        Ok(table)
    }

    pub fn profile(&self, level: Level) -> &DifficultyProfile {
        match level {
            Level::Easy => &self.easy,
            Level::Medium => &self.medium,
        }
    }

    /// Profile for a level name, `easy` when the name is unknown
    pub fn profile_named(&self, name: &str) -> &DifficultyProfile {
        self.profile(Level::from_name(name))
    }
}

/// Built-in profile for a level
pub fn profile(level: Level) -> &'static DifficultyProfile {
    DifficultyTable::builtin().profile(level)
}

/// Random question chord for a built-in level
pub fn random_chord<R: Rng + ?Sized>(level: Level, rng: &mut R) -> ChordSpec {
    profile(level).random_chord(rng)
}

/// Answer choices for a built-in level
pub fn answer_choices<R: Rng + ?Sized>(correct: &ChordSpec, level: Level, rng: &mut R) -> Vec<String> {
    profile(level).answer_choices(correct, rng)
}
