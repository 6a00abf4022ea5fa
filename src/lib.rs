pub mod chord;
pub mod difficulty;
pub mod error;
pub mod note;
pub mod progression;
pub mod quiz;

pub use chord::{compose_chord, compose_chord_str, Chord, ChordSpec, ComposedChord, Quality};
pub use difficulty::{DifficultyProfile, DifficultyTable, Level};
pub use error::*;
pub use note::{octave_name, Note, OctaveShift, PitchClass, Spelling};
pub use progression::{
    format_progression, parse_pattern, preset, progression, Degree, PlayedChord, Preset,
    ProgressionPlayer, PRESETS,
};

/// Resolve a pattern or preset name against a tonic given as text.
/// This is the main entry point for hosts that take user-typed input.
///
/// ```
/// let chords = chordsmith::progression_from_str("G4", "I-V-vi-IV")?;
/// assert_eq!(
///     chordsmith::format_progression(&chords),
///     "G major → D major → E minor → C major"
/// );
/// # Ok::<(), chordsmith::ChordError>(())
/// ```
pub fn progression_from_str(tonic: &str, pattern: &str) -> Result<Vec<ChordSpec>, ChordError> {
    let tonic: Note = tonic.parse()?;
    let degrees = match preset(pattern) {
        Some(p) => p.degrees.to_vec(),
        None => parse_pattern(pattern)?,
    };
    Ok(progression(&tonic, &degrees))
}
