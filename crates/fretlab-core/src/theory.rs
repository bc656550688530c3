//! Scale and chord interval catalog offered by the lesson UI

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Scales and modes selectable in the overlay picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScaleKind {
    Major,
    NaturalMinor,
    HarmonicMinor,
    MelodicMinor,
    MajorPentatonic,
    MinorPentatonic,
    Blues,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Locrian,
    Chromatic,
}

impl ScaleKind {
    /// Semitone offsets from the root
    pub fn intervals(&self) -> &'static [u8] {
        match self {
            Self::Major => &[0, 2, 4, 5, 7, 9, 11],
            Self::NaturalMinor => &[0, 2, 3, 5, 7, 8, 10],
            Self::HarmonicMinor => &[0, 2, 3, 5, 7, 8, 11],
            Self::MelodicMinor => &[0, 2, 3, 5, 7, 9, 11],
            Self::MajorPentatonic => &[0, 2, 4, 7, 9],
            Self::MinorPentatonic => &[0, 3, 5, 7, 10],
            Self::Blues => &[0, 3, 5, 6, 7, 10],
            Self::Dorian => &[0, 2, 3, 5, 7, 9, 10],
            Self::Phrygian => &[0, 1, 3, 5, 7, 8, 10],
            Self::Lydian => &[0, 2, 4, 6, 7, 9, 11],
            Self::Mixolydian => &[0, 2, 4, 5, 7, 9, 10],
            Self::Locrian => &[0, 1, 3, 5, 6, 8, 10],
            Self::Chromatic => &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Major => "Major",
            Self::NaturalMinor => "Minor",
            Self::HarmonicMinor => "Harmonic Minor",
            Self::MelodicMinor => "Melodic Minor",
            Self::MajorPentatonic => "Major Pentatonic",
            Self::MinorPentatonic => "Minor Pentatonic",
            Self::Blues => "Blues",
            Self::Dorian => "Dorian",
            Self::Phrygian => "Phrygian",
            Self::Lydian => "Lydian",
            Self::Mixolydian => "Mixolydian",
            Self::Locrian => "Locrian",
            Self::Chromatic => "Chromatic",
        }
    }

    /// Parse a picker value, case-insensitive
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "major" | "ionian" => Ok(Self::Major),
            "minor" | "natural minor" | "aeolian" => Ok(Self::NaturalMinor),
            "harmonic minor" => Ok(Self::HarmonicMinor),
            "melodic minor" => Ok(Self::MelodicMinor),
            "major pentatonic" => Ok(Self::MajorPentatonic),
            "minor pentatonic" => Ok(Self::MinorPentatonic),
            "blues" => Ok(Self::Blues),
            "dorian" => Ok(Self::Dorian),
            "phrygian" => Ok(Self::Phrygian),
            "lydian" => Ok(Self::Lydian),
            "mixolydian" => Ok(Self::Mixolydian),
            "locrian" => Ok(Self::Locrian),
            "chromatic" => Ok(Self::Chromatic),
            _ => Err(CoreError::UnknownScale(name.to_string())),
        }
    }
}

/// Chord qualities selectable in the overlay picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
    Augmented,
    Major7,
    Minor7,
    Dominant7,
    Sus2,
    Sus4,
}

impl ChordQuality {
    /// Semitone offsets from the root
    pub fn intervals(&self) -> &'static [u8] {
        match self {
            Self::Major => &[0, 4, 7],
            Self::Minor => &[0, 3, 7],
            Self::Diminished => &[0, 3, 6],
            Self::Augmented => &[0, 4, 8],
            Self::Major7 => &[0, 4, 7, 11],
            Self::Minor7 => &[0, 3, 7, 10],
            Self::Dominant7 => &[0, 4, 7, 10],
            Self::Sus2 => &[0, 2, 7],
            Self::Sus4 => &[0, 5, 7],
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Major => "Major",
            Self::Minor => "Minor",
            Self::Diminished => "Dim",
            Self::Augmented => "Aug",
            Self::Major7 => "Maj7",
            Self::Minor7 => "Min7",
            Self::Dominant7 => "7",
            Self::Sus2 => "Sus2",
            Self::Sus4 => "Sus4",
        }
    }

    /// Parse a picker value or short symbol ("m", "maj7", "sus4")
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "major" | "maj" | "" => Ok(Self::Major),
            "minor" | "min" | "m" => Ok(Self::Minor),
            "diminished" | "dim" => Ok(Self::Diminished),
            "augmented" | "aug" => Ok(Self::Augmented),
            "major7" | "maj7" => Ok(Self::Major7),
            "minor7" | "min7" | "m7" => Ok(Self::Minor7),
            "dominant7" | "dom7" | "7" => Ok(Self::Dominant7),
            "sus2" => Ok(Self::Sus2),
            "sus4" | "sus" => Ok(Self::Sus4),
            _ => Err(CoreError::UnknownChord(name.to_string())),
        }
    }
}

/// Membership mask over the twelve pitch classes for an interval set
/// rooted at `root`
pub fn pitch_class_mask(root: u8, intervals: &[u8]) -> [bool; 12] {
    let mut mask = [false; 12];
    for &interval in intervals {
        mask[((root as usize) + (interval as usize)) % 12] = true;
    }
    mask
}
