//! Session wiring: one selection model per instrument surface

use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use fretlab_core::pitch::{parse_pitch_class, pitch_class_name};
use fretlab_core::{
    ChordQuality, CoreError, FretPosition, FretWindow, FretboardSelection, FrettedNote,
    InstrumentSpec, NoteCatalog, ScaleKind, SelectionSnapshot, MAX_FRET, OPEN_FRET,
};
use thiserror::Error;
use tracing::{debug, info};

use crate::intent::SelectionIntent;

/// Resolved visible notes, shared with every subscriber
pub type NoteBatch = Arc<Vec<FrettedNote>>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Selection error: {0}")]
    Core(#[from] CoreError),
    #[error("String {string} outside the {strings}-string instrument")]
    StringOutOfRange { string: u8, strings: usize },
    #[error("Fret {fret} off the neck")]
    FretOutOfRange { fret: i8 },
    #[error("Malformed assignment record: {0}")]
    Record(#[from] serde_json::Error),
}

/// Owns one fretboard surface: applies intents from the host UI,
/// validates them, and pushes resolved note batches to subscribers.
///
/// Single-threaded and cooperative like the UI that drives it: intents
/// are applied inline and a batch is pushed at most once per apply call,
/// only when the board actually changed.
pub struct InstrumentSession {
    board: FretboardSelection,
    subscribers: Vec<Sender<NoteBatch>>,
    /// Board revision the subscribers last saw; revision 0 is the empty
    /// board every subscriber receives up front
    last_pushed: u64,
}

impl InstrumentSession {
    pub fn new(spec: InstrumentSpec) -> Self {
        info!(
            instrument = %spec.name,
            strings = spec.string_count(),
            "Session opened"
        );
        Self {
            board: FretboardSelection::new(NoteCatalog::new(spec)),
            subscribers: Vec::new(),
            last_pushed: 0,
        }
    }

    /// Read access for rendering queries
    pub fn board(&self) -> &FretboardSelection {
        &self.board
    }

    /// Register a listener for resolved-note batches. The current state
    /// is delivered immediately so a late subscriber starts in sync.
    ///
    /// Delivery is lossy under backpressure: a subscriber that stops
    /// draining misses batches once its queue fills, and sees the
    /// current state again on the first board change after it catches
    /// up. Each batch is the full visible set, so a dropped one is
    /// superseded, never required.
    pub fn subscribe(&mut self) -> Receiver<NoteBatch> {
        let (tx, rx) = bounded::<NoteBatch>(16);
        let _ = tx.try_send(self.current_batch());
        self.subscribers.push(tx);
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Apply one intent and push the result
    pub fn apply(&mut self, intent: SelectionIntent) -> Result<(), SessionError> {
        self.dispatch(intent)?;
        self.flush();
        Ok(())
    }

    /// Apply a batch of intents, pushing at most one update. On a failed
    /// intent the batch stops, but whatever already took effect is still
    /// pushed before the error is returned.
    pub fn apply_all(
        &mut self,
        intents: impl IntoIterator<Item = SelectionIntent>,
    ) -> Result<(), SessionError> {
        let mut outcome = Ok(());
        for intent in intents {
            if let Err(err) = self.dispatch(intent) {
                outcome = Err(err);
                break;
            }
        }
        self.flush();
        outcome
    }

    /// Capture the surface for sharing
    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot::capture(&self.board)
    }

    /// Load a shared snapshot onto this surface and push the result
    pub fn restore(&mut self, snapshot: &SelectionSnapshot) -> Result<(), SessionError> {
        snapshot.restore(&mut self.board)?;
        info!(instrument = %snapshot.instrument, "Snapshot restored");
        self.flush();
        Ok(())
    }

    fn dispatch(&mut self, intent: SelectionIntent) -> Result<(), SessionError> {
        debug!(?intent, "Applying selection intent");
        match intent {
            SelectionIntent::ToggleNote { string, fret } => {
                self.check_string(string)?;
                self.check_fret(fret)?;
                self.board.toggle_note(FretPosition::new(string, fret));
            }
            SelectionIntent::ToggleString { string } => {
                self.check_string(string)?;
                self.board.toggle_string(string);
            }
            SelectionIntent::ToggleFretRow { fret } => {
                self.check_fret(fret)?;
                self.board.toggle_fret_row(fret);
            }
            SelectionIntent::ApplyScale { root, kind } => {
                let root = parse_pitch_class(&root)?;
                let kind = ScaleKind::from_name(&kind)?;
                self.board.apply_scale(root, kind);
                info!(
                    root = pitch_class_name(root),
                    kind = kind.display_name(),
                    "Scale applied"
                );
            }
            SelectionIntent::ApplyScaleBox { root, kind, low_fret, high_fret } => {
                let root = parse_pitch_class(&root)?;
                let kind = ScaleKind::from_name(&kind)?;
                let window = FretWindow::new(low_fret, high_fret)?;
                self.board.apply_scale_box(root, kind, window);
                info!(
                    root = pitch_class_name(root),
                    kind = kind.display_name(),
                    low = window.low,
                    high = window.high,
                    "Scale box applied"
                );
            }
            SelectionIntent::ApplyChord { root, quality } => {
                let root = parse_pitch_class(&root)?;
                let quality = ChordQuality::from_name(&quality)?;
                self.board.apply_chord(root, quality);
                info!(
                    root = pitch_class_name(root),
                    quality = quality.display_name(),
                    "Chord applied"
                );
            }
            SelectionIntent::ApplyChordShape { root, quality, low_fret, high_fret } => {
                let root = parse_pitch_class(&root)?;
                let quality = ChordQuality::from_name(&quality)?;
                let window = FretWindow::new(low_fret, high_fret)?;
                self.board.apply_chord_shape(root, quality, window);
                info!(
                    root = pitch_class_name(root),
                    quality = quality.display_name(),
                    low = window.low,
                    high = window.high,
                    "Chord shape applied"
                );
            }
            SelectionIntent::ClearScale => {
                self.board.clear_scale();
                info!("Scale cleared");
            }
            SelectionIntent::ClearChord => {
                self.board.clear_chord();
                info!("Chord cleared");
            }
            SelectionIntent::ClearAll => {
                self.board.clear_all();
                info!("Board cleared");
            }
        }
        Ok(())
    }

    /// Push the resolved notes to every subscriber, at most once per
    /// board revision. A subscriber with a full queue keeps its backlog
    /// and misses this batch; a disconnected one is dropped.
    pub fn flush(&mut self) {
        let revision = self.board.revision();
        if self.last_pushed == revision {
            return;
        }
        let batch = self.current_batch();
        self.subscribers.retain(|tx| match tx.try_send(batch.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => true,
            Err(TrySendError::Disconnected(_)) => false,
        });
        self.last_pushed = revision;
        debug!(revision, notes = batch.len(), "Pushed note batch");
    }

    fn current_batch(&self) -> NoteBatch {
        Arc::new(self.board.resolve_notes())
    }

    fn check_string(&self, string: u8) -> Result<(), SessionError> {
        let strings = self.board.catalog().string_count();
        if (string as usize) < strings {
            Ok(())
        } else {
            Err(SessionError::StringOutOfRange { string, strings })
        }
    }

    fn check_fret(&self, fret: i8) -> Result<(), SessionError> {
        if (OPEN_FRET..=MAX_FRET).contains(&fret) {
            Ok(())
        } else {
            Err(SessionError::FretOutOfRange { fret })
        }
    }
}
