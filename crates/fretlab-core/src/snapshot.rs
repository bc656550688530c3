//! By-value capture and restore of a selection surface

use serde::{Deserialize, Serialize};

use crate::catalog::{FretPosition, FRET_SLOTS, MAX_FRET, OPEN_FRET};
use crate::error::CoreError;
use crate::selection::{AppliedChord, AppliedScale, FretboardSelection};

/// Everything needed to rebuild a selection surface on another board.
/// Serialized into assignment records, so the field layout is the wire
/// format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionSnapshot {
    pub instrument: String,
    /// Open-string tuning the capture was taken under. Restore compares
    /// it, not just the name: overlays are regenerated on the target
    /// board, and the same positions sound different pitches on a
    /// retuned instrument.
    pub open_midi: Vec<u8>,
    /// Full visible set in board order
    pub positions: Vec<FretPosition>,
    pub manual: Vec<FretPosition>,
    pub string_enabled: Vec<bool>,
    pub fret_enabled: Vec<bool>,
    pub scale: Option<AppliedScale>,
    pub chord: Option<AppliedChord>,
}

impl SelectionSnapshot {
    pub fn capture(board: &FretboardSelection) -> Self {
        Self {
            instrument: board.catalog().spec().name.clone(),
            open_midi: board.catalog().spec().open_midi.clone(),
            positions: board.visible_positions(),
            manual: board.manual_positions(),
            string_enabled: board.string_flags().to_vec(),
            fret_enabled: board.fret_flags().to_vec(),
            scale: board.applied_scale().copied(),
            chord: board.applied_chord().copied(),
        }
    }

    /// Rebuild `board` from this snapshot. Fails when the snapshot was
    /// taken on an instrument the target board cannot represent (name,
    /// string count, or tuning differs), or when a hand-edited record
    /// carries positions off the board.
    pub fn restore(&self, board: &mut FretboardSelection) -> Result<(), CoreError> {
        let spec = board.catalog().spec();
        if self.instrument != spec.name
            || self.open_midi != spec.open_midi
            || self.string_enabled.len() != spec.string_count()
            || self.fret_enabled.len() != FRET_SLOTS
        {
            return Err(CoreError::SnapshotMismatch {
                snapshot: self.instrument.clone(),
                instrument: spec.name.clone(),
            });
        }
        if let Some(bad) = self.manual.iter().chain(&self.positions).find(|pos| {
            (pos.string as usize) >= spec.string_count()
                || !(OPEN_FRET..=MAX_FRET).contains(&pos.fret)
        }) {
            return Err(CoreError::InvalidPosition {
                string: bad.string,
                fret: bad.fret,
            });
        }

        board.clear_all();
        if let Some(scale) = self.scale {
            match scale.window {
                Some(window) => board.apply_scale_box(scale.root, scale.kind, window),
                None => board.apply_scale(scale.root, scale.kind),
            }
        }
        if let Some(chord) = self.chord {
            match chord.window {
                Some(window) => board.apply_chord_shape(chord.root, chord.quality, window),
                None => board.apply_chord(chord.root, chord.quality),
            }
        }
        board.load_layers(
            self.manual.iter().copied(),
            self.string_enabled.clone(),
            self.fret_enabled.clone(),
        );
        Ok(())
    }
}
