//! # Error Types
//!
//! This module defines all error types for the chord engine.
//!
//! Errors only arise where text enters the engine: note names, chord
//! qualities, scale-degree symbols, difficulty level names and YAML
//! difficulty tables. Composition, progression and quiz operations never
//! fail; they fall back to a safe default instead (see `chord` and
//! `difficulty`).
//!
//! ## Usage
//! ```rust
//! use chordsmith::{ChordError, Note};
//!
//! match "H4".parse::<Note>() {
//!     Ok(note) => println!("parsed {}", note),
//!     Err(ChordError::InvalidNote(text)) => eprintln!("not a note: {}", text),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChordError {
    /// Note text that is not a letter A-G with an optional `#`/`b` and octave.
    ///
    /// # Example
    /// ```
    /// # use chordsmith::ChordError;
    /// let err = ChordError::InvalidNote("E#4".to_string());
    /// assert_eq!(err.to_string(), "Invalid note: E#4");
    /// ```
    #[error("Invalid note: {0}")]
    InvalidNote(String),

    /// Chord quality other than major, minor or diminished.
    #[error("Unknown chord quality: {0}")]
    InvalidQuality(String),

    /// Roman numeral outside I, ii, iii, IV, V, vi, vii.
    #[error("Unknown scale degree: {0}")]
    InvalidDegree(String),

    /// Difficulty level name that is not recognised (strict parsing only).
    #[error("Unknown difficulty level: {0}")]
    InvalidLevel(String),

    /// Quiz name other than identification, missing-note or construction.
    #[error("Unknown quiz mode: {0}")]
    InvalidMode(String),

    /// Invalid YAML difficulty table.
    ///
    /// # Example
    /// ```
    /// # use chordsmith::ChordError;
    /// let err = ChordError::ConfigError("easy: answer-choices must be at least 1".to_string());
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Invalid difficulty configuration: easy: answer-choices must be at least 1"
    /// );
    /// ```
    #[error("Invalid difficulty configuration: {0}")]
    ConfigError(String),
}
