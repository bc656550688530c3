//! fretlab-core: Fretboard selection model for the fretlab practice app

mod catalog;
mod error;
pub mod generator;
pub mod melody;
pub mod pitch;
pub mod practice;
mod selection;
mod snapshot;
pub mod theory;

pub use catalog::{
    FretPosition, FrettedNote, InstrumentSpec, NoteCatalog, FRET_SLOTS, MAX_FRET, OPEN_FRET,
};
pub use error::{CoreError, Result};
pub use generator::{chord_positions, positions_for, scale_positions, FretWindow};
pub use melody::{generate_melody, MelodyContour, MelodyNote, MelodyParams};
pub use practice::{nearest_note, Feedback, PracticeRun, PracticeSummary, Verdict};
pub use selection::{AppliedChord, AppliedScale, ClickEffect, FretboardSelection, NoteBadge};
pub use snapshot::SelectionSnapshot;
pub use theory::{pitch_class_mask, ChordQuality, ScaleKind};
