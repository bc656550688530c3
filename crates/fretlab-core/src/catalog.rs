//! Board geometry and the string/fret -> pitch catalog

use serde::{Deserialize, Serialize};

use crate::pitch::{midi_to_hz, note_name, pitch_class, IS_BLACK_KEY};

/// Fret index of the open string
pub const OPEN_FRET: i8 = -1;
/// Highest playable fret
pub const MAX_FRET: i8 = 23;
/// Slots per string: open plus frets 0..=23
pub const FRET_SLOTS: usize = 25;

/// A single fretboard position, the canonical key for every selection set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FretPosition {
    /// String index, 0 = lowest-pitched string
    pub string: u8,
    /// Fret index, -1 = open string
    pub fret: i8,
}

impl FretPosition {
    pub fn new(string: u8, fret: i8) -> Self {
        Self { string, fret }
    }

    pub fn open(string: u8) -> Self {
        Self { string, fret: OPEN_FRET }
    }

    /// Index into a per-string slot vector (open string = slot 0)
    pub fn fret_slot(&self) -> usize {
        (self.fret + 1) as usize
    }
}

/// Instrument geometry: display name plus open-string tuning.
/// Injected wherever a board is built; never a module-level table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentSpec {
    pub name: String,
    /// Open-string MIDI notes, index 0 = lowest-pitched string
    pub open_midi: Vec<u8>,
}

impl InstrumentSpec {
    /// Six-string guitar in standard tuning (E2 A2 D3 G3 B3 E4)
    pub fn guitar() -> Self {
        Self {
            name: "guitar".to_string(),
            open_midi: vec![40, 45, 50, 55, 59, 64],
        }
    }

    /// Four-string bass in standard tuning (E1 A1 D2 G2)
    pub fn bass() -> Self {
        Self {
            name: "bass".to_string(),
            open_midi: vec![28, 33, 38, 43],
        }
    }

    pub fn string_count(&self) -> usize {
        self.open_midi.len()
    }
}

/// A catalogued note at one fretboard position, as handed to melody and
/// export consumers (the position doubles as the disambiguation key when
/// the same pitch exists on several strings)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrettedNote {
    pub position: FretPosition,
    pub midi: u8,
    /// e.g. "F#3"
    pub name: String,
    /// Equal-tempered, A4 = 440 Hz
    pub frequency_hz: f64,
    /// Black key on a piano keyboard (sharp/flat pitch class)
    pub is_black: bool,
}

/// String/fret -> pitch lookup for one instrument
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteCatalog {
    spec: InstrumentSpec,
}

impl NoteCatalog {
    pub fn new(spec: InstrumentSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &InstrumentSpec {
        &self.spec
    }

    pub fn string_count(&self) -> usize {
        self.spec.open_midi.len()
    }

    /// Every position on this board in board order (string-major, open first)
    pub fn positions(&self) -> impl Iterator<Item = FretPosition> {
        let strings = self.string_count() as u8;
        (0..strings).flat_map(|s| (OPEN_FRET..=MAX_FRET).map(move |f| FretPosition::new(s, f)))
    }

    /// Pitch at a position, `None` outside the board
    pub fn lookup(&self, string: u8, fret: i8) -> Option<FrettedNote> {
        let open = *self.spec.open_midi.get(string as usize)?;
        if !(OPEN_FRET..=MAX_FRET).contains(&fret) {
            return None;
        }
        let midi = open as i16 + fret as i16 + 1;
        if !(0..=127).contains(&midi) {
            return None;
        }
        let midi = midi as u8;
        Some(FrettedNote {
            position: FretPosition::new(string, fret),
            midi,
            name: note_name(midi),
            frequency_hz: midi_to_hz(midi),
            is_black: IS_BLACK_KEY[pitch_class(midi) as usize],
        })
    }

    /// Pitch class at a position without building the full note.
    /// Absent exactly where `lookup` is.
    pub fn pitch_class_at(&self, string: u8, fret: i8) -> Option<u8> {
        let open = *self.spec.open_midi.get(string as usize)?;
        if !(OPEN_FRET..=MAX_FRET).contains(&fret) {
            return None;
        }
        let midi = open as i16 + fret as i16 + 1;
        if !(0..=127).contains(&midi) {
            return None;
        }
        Some((midi % 12) as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guitar_open_strings() {
        let catalog = NoteCatalog::new(InstrumentSpec::guitar());
        let names: Vec<String> = (0..6)
            .map(|s| catalog.lookup(s, OPEN_FRET).unwrap().name)
            .collect();
        assert_eq!(names, ["E2", "A2", "D3", "G3", "B3", "E4"]);
    }

    #[test]
    fn bass_board_is_four_by_twenty_five() {
        let catalog = NoteCatalog::new(InstrumentSpec::bass());
        assert_eq!(catalog.positions().count(), 4 * FRET_SLOTS);
        assert!(catalog.lookup(3, MAX_FRET).is_some());
        assert!(catalog.lookup(4, 0).is_none());
    }

    #[test]
    fn fret_zero_is_one_semitone_above_open() {
        let catalog = NoteCatalog::new(InstrumentSpec::guitar());
        let open = catalog.lookup(0, OPEN_FRET).unwrap();
        let first = catalog.lookup(0, 0).unwrap();
        assert_eq!(open.midi, 40);
        assert_eq!(first.midi, 41);
        assert_eq!(first.name, "F2");
    }

    #[test]
    fn out_of_range_lookups_are_absent() {
        let catalog = NoteCatalog::new(InstrumentSpec::guitar());
        assert!(catalog.lookup(0, -2).is_none());
        assert!(catalog.lookup(0, 24).is_none());
        assert!(catalog.lookup(9, 0).is_none());
    }

    #[test]
    fn high_e_string_top_fret() {
        let catalog = NoteCatalog::new(InstrumentSpec::guitar());
        let note = catalog.lookup(5, MAX_FRET).unwrap();
        assert_eq!(note.midi, 88);
        assert_eq!(note.name, "E6");
        assert!(!note.is_black);
    }
}
