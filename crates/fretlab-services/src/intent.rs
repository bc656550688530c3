//! UI-facing selection intents

use serde::{Deserialize, Serialize};

/// One user gesture on a fretboard surface, carrying raw UI values.
/// Roots and scale/chord kinds arrive as picker strings; indexes and
/// fret windows arrive unchecked. The session validates everything
/// before it touches the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelectionIntent {
    ToggleNote { string: u8, fret: i8 },
    ToggleString { string: u8 },
    ToggleFretRow { fret: i8 },
    ApplyScale { root: String, kind: String },
    ApplyScaleBox { root: String, kind: String, low_fret: i8, high_fret: i8 },
    ApplyChord { root: String, quality: String },
    ApplyChordShape { root: String, quality: String, low_fret: i8, high_fret: i8 },
    ClearScale,
    ClearChord,
    ClearAll,
}
