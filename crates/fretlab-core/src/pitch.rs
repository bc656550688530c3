//! Pitch names, keyboard layout, and frequency conversion

use crate::error::CoreError;

/// Pitch-class names (sharp spelling), index = semitones above C
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Which pitch classes are black keys on a piano keyboard
pub const IS_BLACK_KEY: [bool; 12] = [
    false, true, false, true, false, false, true, false, true, false, true, false,
];

/// Pitch class (0-11, 0 = C) of a MIDI note
pub fn pitch_class(midi: u8) -> u8 {
    midi % 12
}

/// Octave-stripped name, e.g. "C#"
pub fn pitch_class_name(pc: u8) -> &'static str {
    NOTE_NAMES[(pc % 12) as usize]
}

/// Full note name with octave, e.g. "C#3" (MIDI 60 = "C4")
pub fn note_name(midi: u8) -> String {
    format!("{}{}", pitch_class_name(pitch_class(midi)), midi as i16 / 12 - 1)
}

/// Parse a pitch-class name into 0-11. Accepts sharp and flat spellings
/// ("C#", "Db") in either case.
pub fn parse_pitch_class(name: &str) -> Result<u8, CoreError> {
    let trimmed = name.trim();
    let mut chars = trimmed.chars();
    let base: i8 = match chars.next().map(|c| c.to_ascii_uppercase()) {
        Some('C') => 0,
        Some('D') => 2,
        Some('E') => 4,
        Some('F') => 5,
        Some('G') => 7,
        Some('A') => 9,
        Some('B') => 11,
        _ => return Err(CoreError::UnknownPitch(name.to_string())),
    };
    let accidental: i8 = match chars.next() {
        None => 0,
        Some('#') => 1,
        Some('b') => -1,
        Some(_) => return Err(CoreError::UnknownPitch(name.to_string())),
    };
    if chars.next().is_some() {
        return Err(CoreError::UnknownPitch(name.to_string()));
    }
    Ok((base + accidental).rem_euclid(12) as u8)
}

/// Equal-tempered frequency, A4 = MIDI 69 = 440 Hz
pub fn midi_to_hz(midi: u8) -> f64 {
    440.0 * 2.0_f64.powf((midi as f64 - 69.0) / 12.0)
}

/// Fractional MIDI note number for a frequency
pub fn hz_to_midi(hz: f64) -> f64 {
    69.0 + 12.0 * (hz / 440.0).log2()
}
