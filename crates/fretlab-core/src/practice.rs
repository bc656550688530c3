//! Grading detected pitches against an expected note line

use serde::{Deserialize, Serialize};

use crate::catalog::FrettedNote;
use crate::pitch::{hz_to_midi, note_name};

/// Detected pitch within this many cents of the target counts as in tune
pub const HIT_CENTS: f64 = 25.0;
/// Beyond `HIT_CENTS` but within this many cents is close
pub const NEAR_CENTS: f64 = 75.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Hit,
    Near,
    Miss,
}

/// Nearest equal-tempered note to a frequency, with the leftover offset
/// in cents. `None` for frequencies no MIDI note covers.
pub fn nearest_note(hz: f64) -> Option<(u8, f64)> {
    if hz <= 0.0 {
        return None;
    }
    let exact = hz_to_midi(hz);
    let nearest = exact.round();
    if !(0.0..=127.0).contains(&nearest) {
        return None;
    }
    Some((nearest as u8, (exact - nearest) * 100.0))
}

/// How one heard frequency compared to the expected note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub expected_midi: u8,
    pub heard_midi: u8,
    pub heard_name: String,
    /// Offset of the heard frequency from the expected note, in cents
    pub cents_off: f64,
    pub verdict: Verdict,
}

/// Cursor over an expected note line; only a `Hit` advances it
#[derive(Debug, Clone)]
pub struct PracticeRun {
    expected: Vec<FrettedNote>,
    cursor: usize,
    hits: u32,
    nears: u32,
    misses: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeSummary {
    pub hits: u32,
    pub nears: u32,
    pub misses: u32,
    pub completed: usize,
    pub total: usize,
}

impl PracticeRun {
    pub fn new(expected: Vec<FrettedNote>) -> Self {
        Self {
            expected,
            cursor: 0,
            hits: 0,
            nears: 0,
            misses: 0,
        }
    }

    /// Note the player should sound next
    pub fn expected_note(&self) -> Option<&FrettedNote> {
        self.expected.get(self.cursor)
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.expected.len()
    }

    /// Grade one detected frequency against the current expected note.
    /// `None` once the line is finished, or when the frequency resolves
    /// to no note at all (detector noise is not a miss).
    pub fn hear(&mut self, hz: f64) -> Option<Feedback> {
        let expected_midi = self.expected.get(self.cursor)?.midi;
        let (heard_midi, _) = nearest_note(hz)?;
        let cents_off = (hz_to_midi(hz) - expected_midi as f64) * 100.0;
        let verdict = if cents_off.abs() <= HIT_CENTS {
            Verdict::Hit
        } else if cents_off.abs() <= NEAR_CENTS {
            Verdict::Near
        } else {
            Verdict::Miss
        };
        match verdict {
            Verdict::Hit => {
                self.hits += 1;
                self.cursor += 1;
            }
            Verdict::Near => self.nears += 1,
            Verdict::Miss => self.misses += 1,
        }
        Some(Feedback {
            expected_midi,
            heard_midi,
            heard_name: note_name(heard_midi),
            cents_off,
            verdict,
        })
    }

    pub fn summary(&self) -> PracticeSummary {
        PracticeSummary {
            hits: self.hits,
            nears: self.nears,
            misses: self.misses,
            completed: self.cursor,
            total: self.expected.len(),
        }
    }
}
