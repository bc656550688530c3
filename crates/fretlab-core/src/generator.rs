//! Overlay position generation: project an interval set onto a fret window

use serde::{Deserialize, Serialize};

use crate::catalog::{FretPosition, NoteCatalog, MAX_FRET, OPEN_FRET};
use crate::error::CoreError;
use crate::theory::{pitch_class_mask, ChordQuality, ScaleKind};

/// Inclusive fret range an overlay is generated over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FretWindow {
    pub low: i8,
    pub high: i8,
}

impl FretWindow {
    pub fn new(low: i8, high: i8) -> Result<Self, CoreError> {
        if low > high || low < OPEN_FRET || high > MAX_FRET {
            return Err(CoreError::InvalidWindow { low, high });
        }
        Ok(Self { low, high })
    }

    /// Whole neck, open strings included
    pub fn full() -> Self {
        Self { low: OPEN_FRET, high: MAX_FRET }
    }

    pub fn contains(&self, fret: i8) -> bool {
        (self.low..=self.high).contains(&fret)
    }
}

impl Default for FretWindow {
    fn default() -> Self {
        Self::full()
    }
}

/// Every position inside `window` whose pitch class belongs to the interval
/// set rooted at `root`, in board order
pub fn positions_for(
    catalog: &NoteCatalog,
    root: u8,
    intervals: &[u8],
    window: FretWindow,
) -> Vec<FretPosition> {
    let mask = pitch_class_mask(root, intervals);
    catalog
        .positions()
        .filter(|pos| window.contains(pos.fret))
        .filter(|pos| {
            catalog
                .pitch_class_at(pos.string, pos.fret)
                .is_some_and(|pc| mask[pc as usize])
        })
        .collect()
}

pub fn scale_positions(
    catalog: &NoteCatalog,
    root: u8,
    kind: ScaleKind,
    window: FretWindow,
) -> Vec<FretPosition> {
    positions_for(catalog, root, kind.intervals(), window)
}

pub fn chord_positions(
    catalog: &NoteCatalog,
    root: u8,
    quality: ChordQuality,
    window: FretWindow,
) -> Vec<FretPosition> {
    positions_for(catalog, root, quality.intervals(), window)
}
