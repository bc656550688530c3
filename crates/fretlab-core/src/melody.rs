//! Deterministic step melodies drawn from a resolved note list

use serde::{Deserialize, Serialize};

use crate::catalog::FrettedNote;

/// Overall direction of the generated line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MelodyContour {
    /// Bounded random walk around the middle of the range
    #[default]
    Walk,
    /// Climbs from the lowest note, wrapping at the top
    Rising,
    /// Descends from the highest note, wrapping at the bottom
    Falling,
}

/// Generation settings; the seed fully determines the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MelodyParams {
    /// Grid length in steps
    pub steps: usize,
    /// How many of those steps sound a note
    pub onsets: usize,
    pub seed: u64,
    pub contour: MelodyContour,
    /// Largest pitch-pool jump between consecutive onsets
    pub max_leap: usize,
}

impl Default for MelodyParams {
    fn default() -> Self {
        Self {
            steps: 16,
            onsets: 8,
            seed: 1,
            contour: MelodyContour::Walk,
            max_leap: 3,
        }
    }
}

/// One scheduled note on the step grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MelodyNote {
    pub step: usize,
    pub note: FrettedNote,
}

struct Walker {
    rng_state: u64,
}

impl Walker {
    fn next_random(&mut self) -> usize {
        // Simple LCG for deterministic randomness
        self.rng_state = self.rng_state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.rng_state >> 33) as usize
    }
}

/// Spread `params.onsets` notes evenly across a `params.steps` grid and
/// pick a pitch for each from `notes`. Same notes, same params, same
/// melody.
pub fn generate_melody(notes: &[FrettedNote], params: MelodyParams) -> Vec<MelodyNote> {
    if notes.is_empty() || params.steps == 0 || params.onsets == 0 {
        return Vec::new();
    }

    // Pitch-sorted pool; when a pitch is reachable on several strings the
    // lowest position stands in for it
    let mut pool: Vec<FrettedNote> = notes.to_vec();
    pool.sort_by_key(|note| (note.midi, note.position));
    pool.dedup_by_key(|note| note.midi);

    let onsets = params.onsets.min(params.steps);
    let top = pool.len() - 1;
    let leap = params.max_leap.clamp(1, pool.len());
    let mut walker = Walker { rng_state: params.seed };
    let mut index = match params.contour {
        MelodyContour::Walk => pool.len() / 2,
        MelodyContour::Rising => 0,
        MelodyContour::Falling => top,
    };

    let mut melody = Vec::with_capacity(onsets);
    for step in 0..params.steps {
        // Bresenham spread: exactly `onsets` hits, evenly spaced
        if (step * onsets) % params.steps >= onsets {
            continue;
        }
        if !melody.is_empty() {
            index = match params.contour {
                MelodyContour::Walk => {
                    let jump = walker.next_random() % (2 * leap + 1);
                    (index as i64 + jump as i64 - leap as i64).clamp(0, top as i64) as usize
                }
                MelodyContour::Rising => {
                    let jump = 1 + walker.next_random() % leap;
                    (index + jump) % pool.len()
                }
                MelodyContour::Falling => {
                    let jump = 1 + walker.next_random() % leap;
                    (index + pool.len() - jump) % pool.len()
                }
            };
        }
        melody.push(MelodyNote {
            step,
            note: pool[index].clone(),
        });
    }
    melody
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{InstrumentSpec, NoteCatalog};
    use crate::selection::FretboardSelection;
    use crate::theory::ScaleKind;

    fn scale_notes() -> Vec<FrettedNote> {
        let mut board = FretboardSelection::new(NoteCatalog::new(InstrumentSpec::guitar()));
        board.apply_scale(0, ScaleKind::MajorPentatonic);
        board.resolve_notes()
    }

    #[test]
    fn same_seed_reproduces_the_melody() {
        let notes = scale_notes();
        let params = MelodyParams { seed: 42, ..Default::default() };
        assert_eq!(generate_melody(&notes, params), generate_melody(&notes, params));
    }

    #[test]
    fn onset_count_and_grid_are_exact() {
        let notes = scale_notes();
        let params = MelodyParams { steps: 16, onsets: 5, ..Default::default() };
        let melody = generate_melody(&notes, params);
        assert_eq!(melody.len(), 5);
        assert!(melody.windows(2).all(|pair| pair[0].step < pair[1].step));
        assert!(melody.iter().all(|note| note.step < 16));
    }

    #[test]
    fn every_pitch_comes_from_the_input() {
        let notes = scale_notes();
        let melody = generate_melody(&notes, MelodyParams::default());
        for scheduled in &melody {
            assert!(notes.iter().any(|note| note.midi == scheduled.note.midi));
        }
    }

    #[test]
    fn contours_start_at_their_end_of_the_range() {
        let notes = scale_notes();
        let lowest = notes.iter().map(|n| n.midi).min().unwrap();
        let highest = notes.iter().map(|n| n.midi).max().unwrap();

        let rising = generate_melody(
            &notes,
            MelodyParams { contour: MelodyContour::Rising, ..Default::default() },
        );
        assert_eq!(rising[0].note.midi, lowest);

        let falling = generate_melody(
            &notes,
            MelodyParams { contour: MelodyContour::Falling, ..Default::default() },
        );
        assert_eq!(falling[0].note.midi, highest);
    }

    #[test]
    fn empty_input_means_empty_melody() {
        assert!(generate_melody(&[], MelodyParams::default()).is_empty());
        let notes = scale_notes();
        let silent = MelodyParams { onsets: 0, ..Default::default() };
        assert!(generate_melody(&notes, silent).is_empty());
    }
}
