//! # Note Model and Notation Converter
//!
//! Notes are stored as a pitch class (one of the 12 chromatic steps, named by
//! its sharp spelling), an optional octave and the spelling used to show
//! them. All internal computation uses the sharp pitch class; flat spelling
//! is a presentation choice layered on top (diminished chords are shown
//! flat).
//!
//! ## Text Form
//! - Letter `A`-`G`, optional `#` or `b`, optional octave: `C`, `C#4`, `Db4`, `B-1`
//! - Only the five black-key sharps (`C# D# F# G# A#`) and flats
//!   (`Db Eb Gb Ab Bb`) are accepted; `E#`, `Cb` and friends are rejected
//!
//! ## Same Pitch
//! Two notes are the same pitch when their sharp spellings match, octave
//! included. `Eb4` and `D#4` are enharmonic, `Eb4` and `Eb5` are not, and
//! neither is `Eb` (no octave) with `Eb4`. Strip the octave first with
//! [`Note::without_octave`] for a pitch-class-only comparison.
//!
//! ## Example
//! ```rust
//! use chordsmith::Note;
//!
//! let sharp: Note = "C#4".parse()?;
//! let flat = sharp.to_flat();
//! assert_eq!(flat.to_string(), "Db4");
//! assert!(flat.is_enharmonic(&sharp));
//! assert_eq!(flat.shift(1).to_string(), "Db5");
//! # Ok::<(), chordsmith::ChordError>(())
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::chord::Quality;
use crate::error::ChordError;

/// Chromatic pitch classes, named by their sharp spelling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PitchClass {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl PitchClass {
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::D,
        PitchClass::DSharp,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::G,
        PitchClass::GSharp,
        PitchClass::A,
        PitchClass::ASharp,
        PitchClass::B,
    ];

    /// Semitones above C (C=0, B=11)
    pub fn semitone(self) -> u8 {
        match self {
            PitchClass::C => 0,
            PitchClass::CSharp => 1,
            PitchClass::D => 2,
            PitchClass::DSharp => 3,
            PitchClass::E => 4,
            PitchClass::F => 5,
            PitchClass::FSharp => 6,
            PitchClass::G => 7,
            PitchClass::GSharp => 8,
            PitchClass::A => 9,
            PitchClass::ASharp => 10,
            PitchClass::B => 11,
        }
    }

    /// Pitch class for a semitone count, wrapping every octave
    pub fn from_semitone(semitone: u8) -> Self {
        Self::ALL[(semitone % 12) as usize]
    }

    /// Black keys: the only classes whose sharp and flat names differ
    pub fn is_accidental(self) -> bool {
        matches!(
            self,
            PitchClass::CSharp
                | PitchClass::DSharp
                | PitchClass::FSharp
                | PitchClass::GSharp
                | PitchClass::ASharp
        )
    }

    pub fn sharp_name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::CSharp => "C#",
            PitchClass::D => "D",
            PitchClass::DSharp => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::FSharp => "F#",
            PitchClass::G => "G",
            PitchClass::GSharp => "G#",
            PitchClass::A => "A",
            PitchClass::ASharp => "A#",
            PitchClass::B => "B",
        }
    }

    pub fn flat_name(self) -> &'static str {
        match self {
            PitchClass::CSharp => "Db",
            PitchClass::DSharp => "Eb",
            PitchClass::FSharp => "Gb",
            PitchClass::GSharp => "Ab",
            PitchClass::ASharp => "Bb",
            natural => natural.sharp_name(),
        }
    }

    /// Look up a name in either spelling, reporting which one matched.
    /// Naturals always report `Spelling::Sharp`.
    pub fn from_name(name: &str) -> Option<(PitchClass, Spelling)> {
        Self::ALL
            .iter()
            .find(|p| p.sharp_name() == name)
            .map(|&p| (p, Spelling::Sharp))
            .or_else(|| {
                Self::ALL
                    .iter()
                    .find(|p| p.flat_name() == name)
                    .map(|&p| (p, Spelling::Flat))
            })
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sharp_name())
    }
}

impl Serialize for PitchClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.sharp_name())
    }
}

impl<'de> Deserialize<'de> for PitchClass {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        PitchClass::from_name(name.trim())
            .map(|(pitch, _)| pitch)
            .ok_or_else(|| serde::de::Error::custom(ChordError::InvalidNote(name)))
    }
}

/// How an accidental is written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Spelling {
    #[default]
    Sharp,
    Flat,
}

/// A pitch class with an optional octave and a display spelling.
///
/// Equality (`==`) compares the written form, so `Db4 != C#4`; use
/// [`Note::is_enharmonic`] to compare pitches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Note {
    pitch: PitchClass,
    octave: Option<i8>,
    spelling: Spelling,
}

impl Note {
    /// Sharp-spelled note in a given octave
    pub fn new(pitch: PitchClass, octave: i8) -> Self {
        Self {
            pitch,
            octave: Some(octave),
            spelling: Spelling::Sharp,
        }
    }

    /// Sharp-spelled note without an octave
    pub fn pitch_class(pitch: PitchClass) -> Self {
        Self {
            pitch,
            octave: None,
            spelling: Spelling::Sharp,
        }
    }

    pub fn pitch(&self) -> PitchClass {
        self.pitch
    }

    pub fn octave(&self) -> Option<i8> {
        self.octave
    }

    pub fn spelling(&self) -> Spelling {
        self.spelling
    }

    /// Respell the note. Naturals have a single spelling and stay sharp.
    pub fn with_spelling(self, spelling: Spelling) -> Self {
        let spelling = if self.pitch.is_accidental() {
            spelling
        } else {
            Spelling::Sharp
        };
        Self { spelling, ..self }
    }

    pub fn with_octave(self, octave: i8) -> Self {
        Self {
            octave: Some(octave),
            ..self
        }
    }

    pub fn without_octave(self) -> Self {
        Self {
            octave: None,
            ..self
        }
    }

    /// `C#4` -> `Db4`; naturals and flats are returned unchanged
    pub fn to_flat(self) -> Self {
        self.with_spelling(Spelling::Flat)
    }

    /// `Db4` -> `C#4`; naturals and sharps are returned unchanged
    pub fn to_sharp(self) -> Self {
        self.with_spelling(Spelling::Sharp)
    }

    /// Same pitch regardless of spelling. The octave takes part in the
    /// comparison exactly as given.
    pub fn is_enharmonic(&self, other: &Note) -> bool {
        self.to_sharp() == other.to_sharp()
    }

    /// Written name without octave (`"Db"`, `"C#"`, `"E"`)
    pub fn name(&self) -> &'static str {
        match self.spelling {
            Spelling::Sharp => self.pitch.sharp_name(),
            Spelling::Flat => self.pitch.flat_name(),
        }
    }

    /// Name shown next to a chord: octave stripped, flat for diminished
    /// chords, otherwise spelled as given.
    pub fn display_name(&self, quality: Quality) -> String {
        let note = if quality == Quality::Diminished {
            self.to_flat()
        } else {
            *self
        };
        note.name().to_string()
    }

    /// Move by whole octaves. Notes without an octave are unchanged.
    pub fn shift(self, octaves: i8) -> Self {
        match self.octave {
            Some(octave) => self.with_octave(octave.saturating_add(octaves)),
            None => self,
        }
    }

    /// Give a note typed without an octave the octave that puts it
    /// closest to `anchors`. Notes with an octave, or no anchors with one,
    /// leave the note unchanged.
    pub fn nearest_to(self, anchors: &[Note]) -> Self {
        if self.octave.is_some() {
            return self;
        }
        let targets: Vec<i32> = anchors.iter().filter_map(|a| a.midi()).map(i32::from).collect();

        anchors
            .iter()
            .filter_map(|a| a.octave())
            .flat_map(|o| [o.saturating_sub(1), o, o.saturating_add(1)])
            .filter_map(|o| {
                let candidate = self.with_octave(o);
                candidate.midi().map(|midi| (candidate, i32::from(midi)))
            })
            .min_by_key(|&(_, midi)| targets.iter().map(|t| (midi - t).abs()).sum::<i32>())
            .map(|(candidate, _)| candidate)
            .unwrap_or(self)
    }

    /// MIDI note number (C4 = 60), clamped to 0..=127.
    /// Notes without an octave have no MIDI number.
    pub fn midi(&self) -> Option<u8> {
        let octave = i32::from(self.octave?);
        let midi = (octave + 1) * 12 + i32::from(self.pitch.semitone());
        Some(midi.clamp(0, 127) as u8)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.octave {
            Some(octave) => write!(f, "{}{}", self.name(), octave),
            None => f.write_str(self.name()),
        }
    }
}

impl FromStr for Note {
    type Err = ChordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let invalid = || ChordError::InvalidNote(s.to_string());

        let letter = text.chars().next().ok_or_else(invalid)?;
        if !matches!(letter, 'A'..='G') {
            return Err(invalid());
        }

        // Letter is ASCII, so byte 1 is a char boundary
        let rest = &text[1..];
        let (name_len, octave_text) = match rest.chars().next() {
            Some('#') | Some('b') => (2, &rest[1..]),
            _ => (1, rest),
        };

        let (pitch, spelling) = PitchClass::from_name(&text[..name_len]).ok_or_else(invalid)?;

        let octave = if octave_text.is_empty() {
            None
        } else {
            Some(octave_text.parse::<i8>().map_err(|_| invalid())?)
        };

        Ok(Note {
            pitch,
            octave,
            spelling,
        })
    }
}

impl Serialize for Note {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Note {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Traditional octave names, 0 (Sub-contra) through 9 (Six-lined)
pub fn octave_name(octave: i8) -> Option<&'static str> {
    match octave {
        0 => Some("Sub-contra"),
        1 => Some("Contra"),
        2 => Some("Great"),
        3 => Some("Small"),
        4 => Some("One-lined"),
        5 => Some("Two-lined"),
        6 => Some("Three-lined"),
        7 => Some("Four-lined"),
        8 => Some("Five-lined"),
        9 => Some("Six-lined"),
        _ => None,
    }
}

/// Keyboard octave shift chosen by the player, bounded to ±5 octaves.
///
/// Hosts keep one of these and apply it wherever a note is shown or
/// played, instead of rewriting note names at each call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OctaveShift(i8);

impl OctaveShift {
    pub const LIMIT: i8 = 5;

    pub fn new(octaves: i8) -> Self {
        Self(octaves.clamp(-Self::LIMIT, Self::LIMIT))
    }

    pub fn value(self) -> i8 {
        self.0
    }

    /// Returns false when already at the upper bound
    pub fn increase(&mut self) -> bool {
        if self.0 < Self::LIMIT {
            self.0 += 1;
            true
        } else {
            false
        }
    }

    /// Returns false when already at the lower bound
    pub fn decrease(&mut self) -> bool {
        if self.0 > -Self::LIMIT {
            self.0 -= 1;
            true
        } else {
            false
        }
    }

    pub fn apply(self, note: Note) -> Note {
        note.shift(self.0)
    }

    pub fn apply_all(self, notes: &[Note]) -> Vec<Note> {
        notes.iter().map(|&n| self.apply(n)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(text: &str) -> Note {
        text.parse().unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(note("C4"), Note::new(PitchClass::C, 4));
        assert_eq!(note("C#4").to_string(), "C#4");
        assert_eq!(note("Db4").to_string(), "Db4");
        assert_eq!(note("Bb").to_string(), "Bb");
        assert_eq!(note("B-1").octave(), Some(-1));
        assert_eq!(note(" G5 ").to_string(), "G5");
        assert_eq!(note("Db4").pitch(), PitchClass::CSharp);
        assert_eq!(note("Db4").spelling(), Spelling::Flat);
    }

    #[test]
    fn test_rejects_unknown_spellings() {
        for text in ["", "H4", "E#4", "Cb", "Fb3", "B#", "c4", "C##4", "C4x", "Cx"] {
            assert_eq!(
                text.parse::<Note>(),
                Err(ChordError::InvalidNote(text.to_string())),
                "{:?} should not parse",
                text
            );
        }
    }

    #[test]
    fn test_to_flat_preserves_octave() {
        assert_eq!(note("C#4").to_flat().to_string(), "Db4");
        assert_eq!(note("A#5").to_flat().to_string(), "Bb5");
        assert_eq!(note("F#").to_flat().to_string(), "Gb");
        // Naturals and flats come back unchanged
        assert_eq!(note("E4").to_flat(), note("E4"));
        assert_eq!(note("Ab4").to_flat(), note("Ab4"));
    }

    #[test]
    fn test_to_sharp_inverse() {
        assert_eq!(note("Db4").to_sharp().to_string(), "C#4");
        assert_eq!(note("Gb").to_sharp().to_string(), "F#");
        assert_eq!(note("G4").to_sharp(), note("G4"));
        assert_eq!(note("D#4").to_sharp(), note("D#4"));
    }

    #[test]
    fn test_flat_round_trip_keeps_pitch() {
        for pitch in PitchClass::ALL {
            for n in [Note::pitch_class(pitch), Note::new(pitch, 4), Note::new(pitch, 5).to_flat()] {
                assert_eq!(n.to_flat().to_sharp(), n.to_sharp());
                assert_eq!(n.to_flat().pitch(), n.pitch());
            }
        }
    }

    #[test]
    fn test_enharmonic_reflexive_and_symmetric() {
        let notes: Vec<Note> = ["C4", "C#4", "Db4", "Eb", "D#", "D#5", "G4", "Gb4"]
            .iter()
            .map(|t| note(t))
            .collect();
        for a in &notes {
            assert!(a.is_enharmonic(a));
            for b in &notes {
                assert_eq!(a.is_enharmonic(b), b.is_enharmonic(a));
            }
        }
        assert!(note("Eb4").is_enharmonic(&note("D#4")));
        assert!(!note("Eb4").is_enharmonic(&note("D#5")));
        assert!(!note("Eb4").is_enharmonic(&note("Eb")));
        assert!(note("Eb4").without_octave().is_enharmonic(&note("D#")));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(note("C#4").display_name(Quality::Diminished), "Db");
        assert_eq!(note("C#4").display_name(Quality::Major), "C#");
        assert_eq!(note("Db4").display_name(Quality::Minor), "Db");
        assert_eq!(note("E5").display_name(Quality::Diminished), "E");
    }

    #[test]
    fn test_shift() {
        assert_eq!(note("C4").shift(1), note("C5"));
        assert_eq!(note("Bb4").shift(-2), note("Bb2"));
        assert_eq!(note("G").shift(3), note("G"));
        assert_eq!(note("C4").shift(0), note("C4"));
    }

    #[test]
    fn test_nearest_to_fills_missing_octave() {
        assert_eq!(note("E").nearest_to(&[note("C4"), note("G4")]), note("E4"));
        assert_eq!(note("C").nearest_to(&[note("D#4"), note("F#4")]), note("C4"));
        assert_eq!(note("C").nearest_to(&[note("E4"), note("G4")]), note("C4"));
        assert_eq!(note("D#").nearest_to(&[note("B4"), note("F#5")]), note("D#5"));
        assert_eq!(note("Gb").nearest_to(&[note("C4"), note("Eb4")]), note("Gb4"));

        assert_eq!(note("E5").nearest_to(&[note("C4"), note("G4")]), note("E5"));
        assert_eq!(note("E").nearest_to(&[]), note("E"));
        assert_eq!(note("E").nearest_to(&[note("C")]), note("E"));
    }

    #[test]
    fn test_midi() {
        assert_eq!(note("C4").midi(), Some(60));
        assert_eq!(note("A4").midi(), Some(69));
        assert_eq!(note("Db4").midi(), note("C#4").midi());
        assert_eq!(note("C-1").midi(), Some(0));
        assert_eq!(note("C-2").midi(), Some(0));
        assert_eq!(note("G9").midi(), Some(127));
        assert_eq!(note("B9").midi(), Some(127));
        assert_eq!(note("C").midi(), None);
    }

    #[test]
    fn test_octave_shift_bounds() {
        let mut shift = OctaveShift::default();
        for _ in 0..5 {
            assert!(shift.increase());
        }
        assert!(!shift.increase());
        assert_eq!(shift.value(), 5);
        assert_eq!(OctaveShift::new(-9).value(), -5);

        let shift = OctaveShift::new(-1);
        assert_eq!(shift.apply_all(&[note("C4"), note("Eb4")]), vec![note("C3"), note("Eb3")]);
    }

    #[test]
    fn test_octave_names() {
        assert_eq!(octave_name(4), Some("One-lined"));
        assert_eq!(octave_name(0), Some("Sub-contra"));
        assert_eq!(octave_name(10), None);
    }
}
