//! # Chord Composer
//!
//! Builds triads from a root and a quality.
//!
//! ## Lookup Table
//! Roots are located in a chromatic table that runs from C4 up to C6 (two
//! full octaves plus the closing C). Chord tones are found by adding the
//! quality's intervals to the root's position; positions past the end of
//! the table keep climbing (C6 major is C6 E6 G6), they never wrap back to
//! C4.
//!
//! A root the table cannot place (C3, D6, ...) falls back to C4 with a
//! warning instead of failing.
//!
//! ## Spelling
//! - `notes()` is always sharp-spelled: these are the keys to light up and play
//! - `name()` uses flats for diminished chords: C diminished reads "C Eb Gb"
//!   while its notes stay C4 D#4 F#4
//!
//! ## Example
//! ```rust
//! use chordsmith::{compose_chord, Note, Quality};
//!
//! let root: Note = "C4".parse()?;
//! let chord = compose_chord(&root, Quality::Major);
//! assert_eq!(chord.name, "C E G");
//! assert_eq!(chord.notes.map(|n| n.to_string()), ["C4", "E4", "G4"]);
//! # Ok::<(), chordsmith::ChordError>(())
//! ```

use std::fmt;
use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::ChordError;
use crate::note::{Note, PitchClass};

/// Triad quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Major,
    Minor,
    Diminished,
}

impl Quality {
    pub const ALL: [Quality; 3] = [Quality::Major, Quality::Minor, Quality::Diminished];

    /// Semitones from the root to the third and to the fifth
    pub fn intervals(self) -> [u8; 2] {
        match self {
            Quality::Major => [4, 7],
            Quality::Minor => [3, 7],
            Quality::Diminished => [3, 6],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Quality::Major => "major",
            Quality::Minor => "minor",
            Quality::Diminished => "diminished",
        }
    }

    /// Interval recipe shown as a hint
    pub fn interval_description(self) -> &'static str {
        match self {
            Quality::Major => "Root + Major 3rd (4 semitones) + Perfect 5th (7 semitones)",
            Quality::Minor => "Root + Minor 3rd (3 semitones) + Perfect 5th (7 semitones)",
            Quality::Diminished => {
                "Root + Minor 3rd (3 semitones) + Diminished 5th (6 semitones)"
            }
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quality {
    type Err = ChordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "major" | "maj" => Ok(Quality::Major),
            "minor" | "min" => Ok(Quality::Minor),
            "diminished" | "dim" => Ok(Quality::Diminished),
            _ => Err(ChordError::InvalidQuality(s.to_string())),
        }
    }
}

/// Octave of the first table entry
pub const TABLE_BASE_OCTAVE: i8 = 4;

/// C4 through C6 inclusive
pub const TABLE_LEN: usize = 25;

/// Root used when the requested one is outside the table
pub fn default_root() -> Note {
    Note::new(PitchClass::C, TABLE_BASE_OCTAVE)
}

/// Table position of a note. Notes without an octave are read in the
/// table's first octave.
fn table_index(note: &Note) -> Option<usize> {
    let octave = i32::from(note.octave().unwrap_or(TABLE_BASE_OCTAVE));
    let index = (octave - i32::from(TABLE_BASE_OCTAVE)) * 12 + i32::from(note.pitch().semitone());
    usize::try_from(index).ok().filter(|&i| i < TABLE_LEN)
}

/// Sharp-spelled note at a table position. Positions past the end
/// continue upward through the following octaves.
fn note_at(index: usize) -> Note {
    let octave = TABLE_BASE_OCTAVE + (index / 12) as i8;
    Note::new(PitchClass::from_semitone((index % 12) as u8), octave)
}

/// A triad, identified by its root and quality. The chord tones are
/// derived on demand and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Chord {
    root_index: usize,
    quality: Quality,
}

impl Chord {
    /// Place `root` in the lookup table, falling back to C4 when it lies
    /// outside. Flat roots are accepted and stored sharp.
    pub fn new(root: &Note, quality: Quality) -> Self {
        let root_index = table_index(root).unwrap_or_else(|| {
            warn!(
                "Root {} is outside the chord table, using {} instead",
                root,
                default_root()
            );
            0
        });
        Self {
            root_index,
            quality,
        }
    }

    /// Sharp-spelled root with octave
    pub fn root(&self) -> Note {
        note_at(self.root_index)
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    /// Root, third and fifth, sharp-spelled for lookup and playback
    pub fn notes(&self) -> [Note; 3] {
        let [third, fifth] = self.quality.intervals();
        [
            note_at(self.root_index),
            note_at(self.root_index + usize::from(third)),
            note_at(self.root_index + usize::from(fifth)),
        ]
    }

    /// Chord tones as they should be read: flat for diminished chords
    pub fn display_notes(&self) -> [Note; 3] {
        let notes = self.notes();
        if self.quality == Quality::Diminished {
            notes.map(Note::to_flat)
        } else {
            notes
        }
    }

    /// Chord tones without octaves, e.g. "C E G" or "C Eb Gb"
    pub fn name(&self) -> String {
        self.display_notes()
            .iter()
            .map(|n| n.name())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Root and quality as a display-ready pair
    pub fn spec(&self) -> ChordSpec {
        ChordSpec::new(self.root(), self.quality)
    }
}

/// Result of composing a chord: display name plus sharp-spelled notes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComposedChord {
    pub name: String,
    pub notes: [Note; 3],
}

/// Compose the triad on `root`.
///
/// Never fails: a root outside C4..=C6 is replaced by C4.
pub fn compose_chord(root: &Note, quality: Quality) -> ComposedChord {
    let chord = Chord::new(root, quality);
    ComposedChord {
        name: chord.name(),
        notes: chord.notes(),
    }
}

/// Like [`compose_chord`], for roots given as text. Unreadable roots fall
/// back to C4.
pub fn compose_chord_str(root: &str, quality: Quality) -> ComposedChord {
    let root = root.parse::<Note>().unwrap_or_else(|e| {
        warn!("{}, using {} instead", e, default_root());
        default_root()
    });
    compose_chord(&root, quality)
}

/// A (root, quality) pair as produced by progressions and the quiz
/// generator. Diminished roots are spelled flat so the pair can be shown
/// as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChordSpec {
    pub root: Note,
    pub quality: Quality,
}

impl ChordSpec {
    pub fn new(root: Note, quality: Quality) -> Self {
        let root = if quality == Quality::Diminished {
            root.to_flat()
        } else {
            root
        };
        Self { root, quality }
    }

    /// Answer text: root without octave and the quality, e.g. "Db diminished"
    pub fn label(&self) -> String {
        format!("{} {}", self.root.without_octave(), self.quality)
    }

    /// The chord this pair names. Roots without an octave are voiced from
    /// octave 4.
    pub fn chord(&self) -> Chord {
        Chord::new(&self.root, self.quality)
    }
}

impl fmt::Display for ChordSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(text: &str) -> Note {
        text.parse().unwrap()
    }

    fn names(notes: &[Note]) -> Vec<String> {
        notes.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_c_major() {
        let chord = compose_chord(&note("C4"), Quality::Major);
        assert_eq!(chord.name, "C E G");
        assert_eq!(chord.notes, [note("C4"), note("E4"), note("G4")]);
    }

    #[test]
    fn test_minor_and_flat_root() {
        let chord = compose_chord(&note("A4"), Quality::Minor);
        assert_eq!(chord.name, "A C E");
        assert_eq!(names(&chord.notes), ["A4", "C5", "E5"]);

        // Flat input is looked up by its sharp twin
        let chord = compose_chord(&note("Db4"), Quality::Minor);
        assert_eq!(chord.name, "C# E G#");
        assert_eq!(names(&chord.notes), ["C#4", "E4", "G#4"]);
    }

    #[test]
    fn test_diminished_display_spelling() {
        let chord = compose_chord(&note("C4"), Quality::Diminished);
        assert_eq!(chord.name, "C Eb Gb");
        // Lookup notes stay sharp for playback
        assert_eq!(names(&chord.notes), ["C4", "D#4", "F#4"]);

        let chord = compose_chord(&note("C#4"), Quality::Diminished);
        assert_eq!(chord.name, "Db E G");
        assert_eq!(names(&chord.notes), ["C#4", "E4", "G4"]);
    }

    #[test]
    fn test_top_of_range_roots_climb_into_next_octave() {
        let chord = compose_chord(&note("C6"), Quality::Major);
        assert_eq!(names(&chord.notes), ["C6", "E6", "G6"]);

        let chord = compose_chord(&note("B5"), Quality::Major);
        assert_eq!(names(&chord.notes), ["B5", "D#6", "F#6"]);

        let chord = compose_chord(&note("A#5"), Quality::Diminished);
        assert_eq!(names(&chord.notes), ["A#5", "C#6", "E6"]);
        assert_eq!(chord.name, "Bb Db E");

        let chord = compose_chord(&note("B4"), Quality::Minor);
        assert_eq!(names(&chord.notes), ["B4", "D5", "F#5"]);
    }

    #[test]
    fn test_composition_is_deterministic() {
        for pitch in PitchClass::ALL {
            for octave in [4, 5] {
                for quality in Quality::ALL {
                    let root = Note::new(pitch, octave);
                    assert_eq!(compose_chord(&root, quality), compose_chord(&root, quality));
                    assert_eq!(Chord::new(&root, quality).notes(), Chord::new(&root, quality).notes());
                }
            }
        }
    }

    #[test]
    fn test_root_without_octave_uses_octave_four() {
        let chord = compose_chord(&note("G"), Quality::Major);
        assert_eq!(names(&chord.notes), ["G4", "B4", "D5"]);
    }

    #[test]
    fn test_out_of_table_root_falls_back() {
        for root in ["C3", "B3", "C#6", "D7"] {
            let chord = compose_chord(&note(root), Quality::Major);
            assert_eq!(names(&chord.notes), ["C4", "E4", "G4"], "root {}", root);
        }
        let chord = compose_chord_str("not a note", Quality::Minor);
        assert_eq!(chord.name, "C D# G");
        assert_eq!(compose_chord_str("E4", Quality::Minor).name, "E G B");
    }

    #[test]
    fn test_quality_parsing() {
        assert_eq!("major".parse::<Quality>(), Ok(Quality::Major));
        assert_eq!(" Dim ".parse::<Quality>(), Ok(Quality::Diminished));
        assert_eq!("min".parse::<Quality>(), Ok(Quality::Minor));
        assert_eq!(
            "augmented".parse::<Quality>(),
            Err(ChordError::InvalidQuality("augmented".to_string()))
        );
        assert_eq!(Quality::Minor.to_string(), "minor");
    }

    #[test]
    fn test_spec_label() {
        let spec = ChordSpec::new(note("C#"), Quality::Diminished);
        assert_eq!(spec.label(), "Db diminished");
        let spec = ChordSpec::new(note("F#4"), Quality::Major);
        assert_eq!(spec.label(), "F# major");
        assert_eq!(spec.chord().root(), note("F#4"));
        assert_eq!(Chord::new(&note("Bb4"), Quality::Diminished).spec().label(), "Bb diminished");
    }
}
