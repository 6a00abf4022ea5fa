//! # Diatonic Progressions
//!
//! Resolves Roman-numeral patterns (`I-V-vi-IV`) against a tonic in a
//! major key.
//!
//! | Degree | Symbol | Semitones | Quality    |
//! |--------|--------|-----------|------------|
//! | 1      | `I`    | 0         | major      |
//! | 2      | `ii`   | 2         | minor      |
//! | 3      | `iii`  | 4         | minor      |
//! | 4      | `IV`   | 5         | major      |
//! | 5      | `V`    | 7         | major      |
//! | 6      | `vi`   | 9         | minor      |
//! | 7      | `vii`  | 11        | diminished |
//!
//! Chord roots that pass the top of the tonic's octave move into the next
//! one (B4 `V` is F#5). Roots of `vii` chords are spelled flat, like every
//! other diminished chord.
//!
//! ## Example
//! ```rust
//! use chordsmith::{parse_pattern, progression, Note, Quality};
//!
//! let tonic: Note = "C4".parse()?;
//! let chords = progression(&tonic, &parse_pattern("I-V-vi-IV")?);
//! let labels: Vec<String> = chords.iter().map(|c| c.root.to_string()).collect();
//! assert_eq!(labels, ["C4", "G4", "A4", "F4"]);
//! assert_eq!(chords[2].quality, Quality::Minor);
//! # Ok::<(), chordsmith::ChordError>(())
//! ```

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::chord::{compose_chord, ChordSpec, ComposedChord, Quality, TABLE_BASE_OCTAVE};
use crate::error::ChordError;
use crate::note::{Note, OctaveShift, PitchClass};

/// Scale degree of the major scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Degree {
    Tonic,
    Supertonic,
    Mediant,
    Subdominant,
    Dominant,
    Submediant,
    LeadingTone,
}

impl Degree {
    pub const ALL: [Degree; 7] = [
        Degree::Tonic,
        Degree::Supertonic,
        Degree::Mediant,
        Degree::Subdominant,
        Degree::Dominant,
        Degree::Submediant,
        Degree::LeadingTone,
    ];

    /// Roman numeral, upper case for major chords
    pub fn symbol(self) -> &'static str {
        match self {
            Degree::Tonic => "I",
            Degree::Supertonic => "ii",
            Degree::Mediant => "iii",
            Degree::Subdominant => "IV",
            Degree::Dominant => "V",
            Degree::Submediant => "vi",
            Degree::LeadingTone => "vii",
        }
    }

    /// Semitones above the tonic
    pub fn offset(self) -> u8 {
        match self {
            Degree::Tonic => 0,
            Degree::Supertonic => 2,
            Degree::Mediant => 4,
            Degree::Subdominant => 5,
            Degree::Dominant => 7,
            Degree::Submediant => 9,
            Degree::LeadingTone => 11,
        }
    }

    pub fn quality(self) -> Quality {
        match self {
            Degree::Tonic | Degree::Subdominant | Degree::Dominant => Quality::Major,
            Degree::Supertonic | Degree::Mediant | Degree::Submediant => Quality::Minor,
            Degree::LeadingTone => Quality::Diminished,
        }
    }
}

impl fmt::Display for Degree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Degree {
    type Err = ChordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Degree::ALL
            .iter()
            .copied()
            .find(|d| d.symbol() == s.trim())
            .ok_or_else(|| ChordError::InvalidDegree(s.to_string()))
    }
}

/// Parse a pattern such as `"I-V-vi-IV"`. Symbols may be separated by
/// dashes, commas or whitespace.
pub fn parse_pattern(text: &str) -> Result<Vec<Degree>, ChordError> {
    let degrees = text
        .split(|c: char| c == '-' || c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect::<Result<Vec<Degree>, _>>()?;
    if degrees.is_empty() {
        return Err(ChordError::InvalidDegree(text.to_string()));
    }
    Ok(degrees)
}

/// A named progression offered to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub degrees: &'static [Degree],
}

pub const PRESETS: &[Preset] = &[
    Preset {
        name: "I-V-vi-IV",
        degrees: &[Degree::Tonic, Degree::Dominant, Degree::Submediant, Degree::Subdominant],
    },
    Preset {
        name: "I-IV-V-V",
        degrees: &[Degree::Tonic, Degree::Subdominant, Degree::Dominant, Degree::Dominant],
    },
    Preset {
        name: "ii-V-I-vi",
        degrees: &[Degree::Supertonic, Degree::Dominant, Degree::Tonic, Degree::Submediant],
    },
    Preset {
        name: "I-vi-IV-V",
        degrees: &[Degree::Tonic, Degree::Submediant, Degree::Subdominant, Degree::Dominant],
    },
    Preset {
        name: "I-iii-vi-IV",
        degrees: &[Degree::Tonic, Degree::Mediant, Degree::Submediant, Degree::Subdominant],
    },
    Preset {
        name: "I-V-vi-iii-IV-I-IV-V",
        degrees: &[
            Degree::Tonic,
            Degree::Dominant,
            Degree::Submediant,
            Degree::Mediant,
            Degree::Subdominant,
            Degree::Tonic,
            Degree::Subdominant,
            Degree::Dominant,
        ],
    },
];

pub fn preset(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.name == name.trim())
}

/// Resolve `pattern` against `tonic`, one (root, quality) pair per degree
/// in pattern order. A tonic without an octave is read in octave 4.
pub fn progression(tonic: &Note, pattern: &[Degree]) -> Vec<ChordSpec> {
    let octave = tonic.octave().unwrap_or(TABLE_BASE_OCTAVE);
    let tonic_semitone = tonic.pitch().semitone();

    pattern
        .iter()
        .map(|degree| {
            let steps = tonic_semitone + degree.offset();
            let root = Note::new(
                PitchClass::from_semitone(steps % 12),
                octave.saturating_add((steps / 12) as i8),
            );
            ChordSpec::new(root, degree.quality())
        })
        .collect()
}

/// One line summary: "C major → G major → A minor → F major"
pub fn format_progression(chords: &[ChordSpec]) -> String {
    chords
        .iter()
        .map(ChordSpec::label)
        .collect::<Vec<_>>()
        .join(" → ")
}

/// Compose the chord at its root's own octave. Roots are voiced in the
/// table's first octave and moved, so progressions outside C4..=C6 keep
/// their pitch.
fn voice(spec: &ChordSpec) -> ComposedChord {
    let octave = spec.root.octave().unwrap_or(TABLE_BASE_OCTAVE);
    let mut chord = compose_chord(&spec.root.with_octave(TABLE_BASE_OCTAVE), spec.quality);
    let delta = octave.saturating_sub(TABLE_BASE_OCTAVE);
    chord.notes = chord.notes.map(|n| n.shift(delta));
    chord
}

/// A chord handed out by [`ProgressionPlayer::next_chord`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayedChord {
    /// 1-based position in the progression
    pub position: usize,
    pub total: usize,
    pub spec: ChordSpec,
    pub chord: ComposedChord,
    /// Chord notes with the octave shift applied, to sound together
    pub notes: Vec<Note>,
    pub status: String,
}

/// Steps through a progression one chord at a time.
///
/// The host decides when to step (e.g. every 1.5 seconds); the player only
/// tracks position and looping.
#[derive(Debug, Clone, Default)]
pub struct ProgressionPlayer {
    chords: Vec<ChordSpec>,
    position: usize,
    looping: bool,
    playing: bool,
}

impl ProgressionPlayer {
    pub fn new(chords: Vec<ChordSpec>) -> Self {
        Self {
            chords,
            ..Self::default()
        }
    }

    pub fn chords(&self) -> &[ChordSpec] {
        &self.chords
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Rewind to the first chord and begin playing
    pub fn start(&mut self, looping: bool) {
        self.position = 0;
        self.looping = looping;
        self.playing = !self.chords.is_empty();
    }

    /// Next chord to sound, or `None` once the progression has ended (the
    /// player stops itself) or when it is not playing.
    pub fn next_chord(&mut self, shift: OctaveShift) -> Option<PlayedChord> {
        if !self.playing {
            return None;
        }
        if self.position >= self.chords.len() {
            if self.looping {
                self.position = 0;
            } else {
                self.stop();
                return None;
            }
        }

        let spec = *self.chords.get(self.position)?;
        self.position += 1;

        let chord = voice(&spec);
        let notes = shift.apply_all(&chord.notes);
        let mut status = format!(
            "Playing: {} {} ({}/{})",
            shift.apply(spec.root),
            spec.quality,
            self.position,
            self.chords.len()
        );
        if self.looping {
            status.push_str(" (Looping)");
        }

        Some(PlayedChord {
            position: self.position,
            total: self.chords.len(),
            spec,
            chord,
            notes,
            status,
        })
    }

    pub fn stop(&mut self) {
        self.playing = false;
        self.looping = false;
        self.position = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(text: &str) -> Note {
        text.parse().unwrap()
    }

    fn roots(chords: &[ChordSpec]) -> Vec<String> {
        chords.iter().map(|c| c.root.to_string()).collect()
    }

    #[test]
    fn test_pop_progression_in_c() {
        let chords = progression(&note("C4"), &parse_pattern("I-V-vi-IV").unwrap());
        assert_eq!(roots(&chords), ["C4", "G4", "A4", "F4"]);
        let qualities: Vec<Quality> = chords.iter().map(|c| c.quality).collect();
        assert_eq!(
            qualities,
            [Quality::Major, Quality::Major, Quality::Minor, Quality::Major]
        );
    }

    #[test]
    fn test_roots_cross_into_next_octave() {
        let chords = progression(&note("A4"), &parse_pattern("I IV V vi").unwrap());
        assert_eq!(roots(&chords), ["A4", "D5", "E5", "F#5"]);

        let chords = progression(&note("G5"), &[Degree::Dominant]);
        assert_eq!(roots(&chords), ["D6"]);
    }

    #[test]
    fn test_leading_tone_is_flat_diminished() {
        let chords = progression(&note("D4"), &[Degree::LeadingTone]);
        assert_eq!(chords[0].quality, Quality::Diminished);
        assert_eq!(chords[0].root.to_string(), "Db5");
        assert_eq!(chords[0].label(), "Db diminished");
    }

    #[test]
    fn test_flat_tonic_and_missing_octave() {
        let chords = progression(&note("Bb"), &parse_pattern("I,ii,iii").unwrap());
        assert_eq!(roots(&chords), ["A#4", "C5", "D5"]);
    }

    #[test]
    fn test_repeats_keep_order() {
        let preset = preset("I-V-vi-iii-IV-I-IV-V").unwrap();
        let chords = progression(&note("C4"), preset.degrees);
        assert_eq!(chords.len(), 8);
        assert_eq!(chords[0], chords[5]);
        assert_eq!(chords[4], chords[6]);
    }

    #[test]
    fn test_parse_pattern_errors() {
        assert_eq!(
            parse_pattern("I-VIII"),
            Err(ChordError::InvalidDegree("VIII".to_string()))
        );
        assert_eq!(parse_pattern("  "), Err(ChordError::InvalidDegree("  ".to_string())));
        // Degree symbols are case sensitive
        assert!(parse_pattern("i-v").is_err());
    }

    #[test]
    fn test_presets_match_their_names() {
        for preset in PRESETS {
            assert_eq!(parse_pattern(preset.name).unwrap(), preset.degrees);
        }
    }

    #[test]
    fn test_format_progression() {
        let chords = progression(&note("C4"), &parse_pattern("I-V-vi-IV").unwrap());
        assert_eq!(
            format_progression(&chords),
            "C major → G major → A minor → F major"
        );
    }

    #[test]
    fn test_player_stops_after_last_chord() {
        let chords = progression(&note("C4"), &parse_pattern("I-IV").unwrap());
        let mut player = ProgressionPlayer::new(chords);
        assert!(player.next_chord(OctaveShift::default()).is_none());

        player.start(false);
        let first = player.next_chord(OctaveShift::default()).unwrap();
        assert_eq!(first.position, 1);
        assert_eq!(first.chord.name, "C E G");
        assert_eq!(first.status, "Playing: C4 major (1/2)");
        let second = player.next_chord(OctaveShift::default()).unwrap();
        assert_eq!(second.chord.name, "F A C");
        assert!(player.next_chord(OctaveShift::default()).is_none());
        assert!(!player.is_playing());
    }

    #[test]
    fn test_player_loops_with_octave_shift() {
        let chords = progression(&note("C4"), &parse_pattern("I-V").unwrap());
        let mut player = ProgressionPlayer::new(chords);
        player.start(true);
        let shift = OctaveShift::new(1);
        let names: Vec<String> = (0..5)
            .map(|_| player.next_chord(shift).unwrap().chord.name)
            .collect();
        assert_eq!(names, ["C E G", "G B D", "C E G", "G B D", "C E G"]);

        let played = player.next_chord(shift).unwrap();
        assert_eq!(played.status, "Playing: G5 major (2/2) (Looping)");
        assert_eq!(played.notes, vec![note("G5"), note("B5"), note("D6")]);

        player.stop();
        assert!(player.next_chord(shift).is_none());
    }

    #[test]
    fn test_player_keeps_high_tonic_octave() {
        let chords = progression(&note("A5"), &parse_pattern("I-IV-V-vi").unwrap());
        let mut player = ProgressionPlayer::new(chords);
        player.start(false);
        let shift = OctaveShift::new(-1);

        let mut names = Vec::new();
        while let Some(played) = player.next_chord(shift) {
            assert!(played.notes[0].is_enharmonic(&shift.apply(played.spec.root)));
            assert!(played.chord.notes[0].is_enharmonic(&played.spec.root));
            names.push(played.chord.name);
        }
        assert_eq!(names, ["A C# E", "D F# A", "E G# B", "F# A C#"]);

        let chords = progression(&note("A5"), &parse_pattern("IV").unwrap());
        let mut player = ProgressionPlayer::new(chords);
        player.start(false);
        let played = player.next_chord(OctaveShift::default()).unwrap();
        assert_eq!(played.status, "Playing: D6 major (1/1)");
        assert_eq!(played.notes, vec![note("D6"), note("F#6"), note("A6")]);
    }

    #[test]
    fn test_empty_player_never_plays() {
        let mut player = ProgressionPlayer::new(Vec::new());
        player.start(true);
        assert!(!player.is_playing());
        assert!(player.next_chord(OctaveShift::default()).is_none());
    }
}
