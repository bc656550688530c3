//! Layered note selection for one fretboard surface

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{FretPosition, FrettedNote, NoteCatalog, FRET_SLOTS, MAX_FRET, OPEN_FRET};
use crate::generator::{positions_for, FretWindow};
use crate::pitch::pitch_class_name;
use crate::theory::{ChordQuality, ScaleKind};

/// Scale overlay currently applied, kept for root tagging and snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedScale {
    pub root: u8,
    pub kind: ScaleKind,
    pub window: Option<FretWindow>,
}

impl AppliedScale {
    pub fn display_name(&self) -> String {
        format!("{} {}", pitch_class_name(self.root), self.kind.display_name())
    }
}

/// Chord overlay currently applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedChord {
    pub root: u8,
    pub quality: ChordQuality,
    pub window: Option<FretWindow>,
}

impl AppliedChord {
    pub fn display_name(&self) -> String {
        format!("{} {}", pitch_class_name(self.root), self.quality.display_name())
    }
}

/// Which layers cover a position, for the renderer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteBadge {
    pub manual: bool,
    pub broadcast: bool,
    pub scale: bool,
    pub scale_root: bool,
    pub chord: bool,
    pub chord_root: bool,
}

impl NoteBadge {
    pub fn any(&self) -> bool {
        self.manual || self.broadcast || self.scale || self.chord
    }
}

/// What a click on a position would do, for hover affordances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClickEffect {
    /// Not visible: a click adds a manual note
    Select,
    /// Visible through the manual set alone: a click removes it
    Deselect,
    /// Covered by a checkbox: a click narrows it to all-but-this
    NarrowBroadcast,
    /// Visible only through an overlay: a click pins it as manual
    Pin,
    /// Manual entry on top of an overlay: a click strips the manual
    /// part and the overlay keeps the note visible
    Unpin,
}

/// Selection state machine over an instrument catalog.
///
/// A position is visible when any layer covers it: the manual set, a
/// whole-string or whole-fret checkbox, the scale overlay, or the chord
/// overlay. Layers are kept separate so each one clears without
/// disturbing the others.
#[derive(Debug, Clone)]
pub struct FretboardSelection {
    catalog: NoteCatalog,
    manual: HashSet<FretPosition>,
    string_enabled: Vec<bool>,
    fret_enabled: Vec<bool>,
    scale: HashSet<FretPosition>,
    applied_scale: Option<AppliedScale>,
    chord: HashSet<FretPosition>,
    applied_chord: Option<AppliedChord>,
    revision: u64,
}

impl FretboardSelection {
    pub fn new(catalog: NoteCatalog) -> Self {
        let strings = catalog.string_count();
        Self {
            catalog,
            manual: HashSet::new(),
            string_enabled: vec![false; strings],
            fret_enabled: vec![false; FRET_SLOTS],
            scale: HashSet::new(),
            applied_scale: None,
            chord: HashSet::new(),
            applied_chord: None,
            revision: 0,
        }
    }

    pub fn catalog(&self) -> &NoteCatalog {
        &self.catalog
    }

    /// Bumped on every mutation that can change what is visible
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn applied_scale(&self) -> Option<&AppliedScale> {
        self.applied_scale.as_ref()
    }

    pub fn applied_chord(&self) -> Option<&AppliedChord> {
        self.applied_chord.as_ref()
    }

    pub fn string_flags(&self) -> &[bool] {
        &self.string_enabled
    }

    pub fn fret_flags(&self) -> &[bool] {
        &self.fret_enabled
    }

    /// Manual layer, sorted in board order
    pub fn manual_positions(&self) -> Vec<FretPosition> {
        let mut positions: Vec<_> = self.manual.iter().copied().collect();
        positions.sort();
        positions
    }

    pub fn is_empty(&self) -> bool {
        self.manual.is_empty()
            && self.scale.is_empty()
            && self.chord.is_empty()
            && self.applied_scale.is_none()
            && self.applied_chord.is_none()
            && !self.string_enabled.iter().any(|&on| on)
            && !self.fret_enabled.iter().any(|&on| on)
    }

    /// Flip the whole-string checkbox
    pub fn toggle_string(&mut self, string: u8) {
        let idx = string as usize;
        assert!(idx < self.string_enabled.len(), "string {string} off the board");
        self.string_enabled[idx] = !self.string_enabled[idx];
        self.revision += 1;
    }

    /// Flip the whole-fret checkbox (`OPEN_FRET` selects the open row)
    pub fn toggle_fret_row(&mut self, fret: i8) {
        assert!((OPEN_FRET..=MAX_FRET).contains(&fret), "fret {fret} off the board");
        let slot = (fret + 1) as usize;
        self.fret_enabled[slot] = !self.fret_enabled[slot];
        self.revision += 1;
    }

    /// Toggle a single position.
    ///
    /// Turning a note off that is covered by a string or fret checkbox
    /// first decomposes the checkbox: the flag is cleared and every other
    /// position it covered is re-added as a manual note, so only the
    /// clicked note disappears. Scale and chord layers are never modified
    /// here; a note covered only by an overlay gains a manual entry
    /// instead, and loses it again on the next toggle.
    pub fn toggle_note(&mut self, pos: FretPosition) {
        self.assert_on_board(pos);
        let via_manual = self.manual.contains(&pos)
            || self.string_enabled[pos.string as usize]
            || self.fret_enabled[pos.fret_slot()];

        if via_manual {
            if self.string_enabled[pos.string as usize] {
                self.decompose_string(pos);
            }
            if self.fret_enabled[pos.fret_slot()] {
                self.decompose_fret_row(pos);
            }
            self.manual.remove(&pos);
        } else {
            self.manual.insert(pos);
        }
        self.revision += 1;
    }

    fn decompose_string(&mut self, except: FretPosition) {
        self.string_enabled[except.string as usize] = false;
        for fret in OPEN_FRET..=MAX_FRET {
            if fret != except.fret {
                self.manual.insert(FretPosition::new(except.string, fret));
            }
        }
    }

    fn decompose_fret_row(&mut self, except: FretPosition) {
        self.fret_enabled[except.fret_slot()] = false;
        for string in 0..self.catalog.string_count() as u8 {
            if string != except.string {
                self.manual.insert(FretPosition::new(string, except.fret));
            }
        }
    }

    /// Replace the scale overlay across the whole neck
    pub fn apply_scale(&mut self, root: u8, kind: ScaleKind) {
        self.install_scale(root, kind, None);
    }

    /// Replace the scale overlay within a fret window. Box application
    /// also clears both checkbox vectors.
    pub fn apply_scale_box(&mut self, root: u8, kind: ScaleKind, window: FretWindow) {
        self.install_scale(root, kind, Some(window));
        self.clear_broadcast_flags();
    }

    fn install_scale(&mut self, root: u8, kind: ScaleKind, window: Option<FretWindow>) {
        assert!(root < 12, "pitch class {root} out of range");
        self.scale = positions_for(
            &self.catalog,
            root,
            kind.intervals(),
            window.unwrap_or_default(),
        )
        .into_iter()
        .collect();
        self.applied_scale = Some(AppliedScale { root, kind, window });
        self.revision += 1;
    }

    /// Replace the chord overlay across the whole neck
    pub fn apply_chord(&mut self, root: u8, quality: ChordQuality) {
        self.install_chord(root, quality, None);
    }

    /// Replace the chord overlay within a fret window, clearing both
    /// checkbox vectors
    pub fn apply_chord_shape(&mut self, root: u8, quality: ChordQuality, window: FretWindow) {
        self.install_chord(root, quality, Some(window));
        self.clear_broadcast_flags();
    }

    fn install_chord(&mut self, root: u8, quality: ChordQuality, window: Option<FretWindow>) {
        assert!(root < 12, "pitch class {root} out of range");
        self.chord = positions_for(
            &self.catalog,
            root,
            quality.intervals(),
            window.unwrap_or_default(),
        )
        .into_iter()
        .collect();
        self.applied_chord = Some(AppliedChord { root, quality, window });
        self.revision += 1;
    }

    fn clear_broadcast_flags(&mut self) {
        self.string_enabled.fill(false);
        self.fret_enabled.fill(false);
    }

    pub fn clear_scale(&mut self) {
        if self.scale.is_empty() && self.applied_scale.is_none() {
            return;
        }
        self.scale.clear();
        self.applied_scale = None;
        self.revision += 1;
    }

    pub fn clear_chord(&mut self) {
        if self.chord.is_empty() && self.applied_chord.is_none() {
            return;
        }
        self.chord.clear();
        self.applied_chord = None;
        self.revision += 1;
    }

    /// Empty every layer and both checkbox vectors
    pub fn clear_all(&mut self) {
        if self.is_empty() {
            return;
        }
        self.manual.clear();
        self.scale.clear();
        self.chord.clear();
        self.applied_scale = None;
        self.applied_chord = None;
        self.clear_broadcast_flags();
        self.revision += 1;
    }

    pub fn is_visible(&self, pos: FretPosition) -> bool {
        self.assert_on_board(pos);
        self.manual.contains(&pos)
            || self.string_enabled[pos.string as usize]
            || self.fret_enabled[pos.fret_slot()]
            || self.scale.contains(&pos)
            || self.chord.contains(&pos)
    }

    /// True when the position sounds the root of the applied scale or chord
    pub fn is_root(&self, pos: FretPosition) -> bool {
        let badge = self.classify(pos);
        badge.scale_root || badge.chord_root
    }

    /// Mirrors the branches of [`toggle_note`](Self::toggle_note) without mutating
    pub fn preview_click(&self, pos: FretPosition) -> ClickEffect {
        self.assert_on_board(pos);
        let broadcast =
            self.string_enabled[pos.string as usize] || self.fret_enabled[pos.fret_slot()];
        let in_overlay = self.scale.contains(&pos) || self.chord.contains(&pos);
        if broadcast {
            ClickEffect::NarrowBroadcast
        } else if self.manual.contains(&pos) {
            if in_overlay {
                ClickEffect::Unpin
            } else {
                ClickEffect::Deselect
            }
        } else if in_overlay {
            ClickEffect::Pin
        } else {
            ClickEffect::Select
        }
    }

    pub fn classify(&self, pos: FretPosition) -> NoteBadge {
        self.assert_on_board(pos);
        let pc = self.catalog.pitch_class_at(pos.string, pos.fret);
        let in_scale = self.scale.contains(&pos);
        let in_chord = self.chord.contains(&pos);
        NoteBadge {
            manual: self.manual.contains(&pos),
            broadcast: self.string_enabled[pos.string as usize]
                || self.fret_enabled[pos.fret_slot()],
            scale: in_scale,
            scale_root: in_scale
                && pc.is_some_and(|pc| self.applied_scale.is_some_and(|s| s.root == pc)),
            chord: in_chord,
            chord_root: in_chord
                && pc.is_some_and(|pc| self.applied_chord.is_some_and(|c| c.root == pc)),
        }
    }

    /// Every visible position in board order
    pub fn visible_positions(&self) -> Vec<FretPosition> {
        self.catalog
            .positions()
            .filter(|pos| self.is_visible(*pos))
            .collect()
    }

    /// Resolve the visible set to concrete notes, in board order.
    /// Positions the catalog cannot name are skipped.
    pub fn resolve_notes(&self) -> Vec<FrettedNote> {
        self.catalog
            .positions()
            .filter(|pos| self.is_visible(*pos))
            .filter_map(|pos| self.catalog.lookup(pos.string, pos.fret))
            .collect()
    }

    /// Reinstate manual and checkbox layers from a snapshot. Entries the
    /// current overlays already cover stay overlay-only, so a later toggle
    /// strips just the manual part.
    pub(crate) fn load_layers(
        &mut self,
        manual: impl IntoIterator<Item = FretPosition>,
        string_enabled: Vec<bool>,
        fret_enabled: Vec<bool>,
    ) {
        let kept: HashSet<FretPosition> = manual
            .into_iter()
            .filter(|pos| !self.scale.contains(pos) && !self.chord.contains(pos))
            .collect();
        self.manual = kept;
        self.string_enabled = string_enabled;
        self.fret_enabled = fret_enabled;
        self.revision += 1;
    }

    fn assert_on_board(&self, pos: FretPosition) {
        assert!(
            (pos.string as usize) < self.catalog.string_count(),
            "string {} off the board",
            pos.string
        );
        assert!(
            (OPEN_FRET..=MAX_FRET).contains(&pos.fret),
            "fret {} off the board",
            pos.fret
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InstrumentSpec;

    fn guitar_board() -> FretboardSelection {
        FretboardSelection::new(NoteCatalog::new(InstrumentSpec::guitar()))
    }

    #[test]
    fn new_board_is_empty() {
        let board = guitar_board();
        assert!(board.is_empty());
        assert!(board.resolve_notes().is_empty());
        assert_eq!(board.revision(), 0);
    }

    #[test]
    fn toggle_inverts_visibility() {
        let mut board = guitar_board();
        let pos = FretPosition::new(2, 3);
        board.toggle_note(pos);
        assert!(board.is_visible(pos));
        board.toggle_note(pos);
        assert!(!board.is_visible(pos));
        assert!(!board.classify(pos).any());
        assert_eq!(board.revision(), 2);
    }

    #[test]
    fn string_checkbox_covers_the_whole_string() {
        let mut board = guitar_board();
        board.toggle_string(1);
        for fret in OPEN_FRET..=MAX_FRET {
            assert!(board.is_visible(FretPosition::new(1, fret)));
        }
        assert!(!board.is_visible(FretPosition::new(0, 0)));
    }

    #[test]
    fn checkbox_decomposes_to_all_but_the_clicked_note() {
        let mut board = guitar_board();
        board.toggle_string(0);
        board.toggle_note(FretPosition::new(0, 4));

        assert!(!board.string_flags()[0]);
        assert!(!board.is_visible(FretPosition::new(0, 4)));
        for fret in OPEN_FRET..=MAX_FRET {
            if fret != 4 {
                let pos = FretPosition::new(0, fret);
                assert!(board.is_visible(pos));
                assert!(board.classify(pos).manual);
            }
        }
    }

    #[test]
    fn both_checkboxes_decompose_in_one_toggle() {
        let mut board = guitar_board();
        board.toggle_string(2);
        board.toggle_fret_row(5);
        board.toggle_note(FretPosition::new(2, 5));

        assert!(!board.string_flags()[2]);
        assert!(!board.fret_flags()[6]);
        assert!(!board.is_visible(FretPosition::new(2, 5)));
        assert!(board.is_visible(FretPosition::new(2, 0)));
        assert!(board.is_visible(FretPosition::new(4, 5)));
    }

    #[test]
    fn toggled_off_note_comes_back_as_manual() {
        let mut board = guitar_board();
        board.toggle_string(0);
        let pos = FretPosition::new(0, 4);
        board.toggle_note(pos);
        board.toggle_note(pos);
        assert!(board.is_visible(pos));
        assert!(board.classify(pos).manual);
    }

    #[test]
    fn preview_tells_the_click_apart_by_layer() {
        let mut board = guitar_board();
        let pos = FretPosition::new(2, 3);
        assert_eq!(board.preview_click(pos), ClickEffect::Select);

        board.toggle_note(pos);
        assert_eq!(board.preview_click(pos), ClickEffect::Deselect);
        board.toggle_note(pos);

        board.toggle_string(2);
        assert_eq!(board.preview_click(pos), ClickEffect::NarrowBroadcast);
        board.toggle_note(pos);
        assert!(!board.is_visible(pos));

        board.apply_scale(0, ScaleKind::Major);
        let root = FretPosition::new(1, 2); // C3
        assert_eq!(board.preview_click(root), ClickEffect::Pin);
        board.toggle_note(root);
        assert!(board.classify(root).manual);

        assert_eq!(board.preview_click(root), ClickEffect::Unpin);
        board.toggle_note(root);
        assert!(!board.classify(root).manual);
        assert!(board.is_visible(root), "the scale keeps an unpinned note visible");
    }

    #[test]
    fn scale_reapply_replaces_the_previous_scale() {
        let mut board = guitar_board();
        // open low E string, fret 0 sounds F2
        let f_note = FretPosition::new(0, 0);
        board.apply_scale(0, ScaleKind::Major);
        assert!(board.is_visible(f_note));

        board.apply_scale(2, ScaleKind::Major);
        assert!(!board.is_visible(f_note), "F is not diatonic to D major");
    }

    #[test]
    fn overlay_toggle_adds_then_strips_a_manual_entry() {
        let mut board = guitar_board();
        board.apply_scale(0, ScaleKind::Major);
        let root = FretPosition::new(1, 2); // C3

        board.toggle_note(root);
        let badge = board.classify(root);
        assert!(badge.manual && badge.scale && badge.scale_root);

        board.toggle_note(root);
        let badge = board.classify(root);
        assert!(!badge.manual);
        assert!(badge.scale, "overlay layer survives the toggle");
        assert!(board.is_visible(root));
    }

    #[test]
    fn box_apply_resets_checkbox_vectors() {
        let mut board = guitar_board();
        board.toggle_string(0);
        board.toggle_fret_row(OPEN_FRET);
        let window = FretWindow::new(0, 4).unwrap();
        board.apply_scale_box(9, ScaleKind::MinorPentatonic, window);

        assert!(board.string_flags().iter().all(|&on| !on));
        assert!(board.fret_flags().iter().all(|&on| !on));
        for pos in board.visible_positions() {
            assert!((0..=4).contains(&pos.fret));
        }
    }

    #[test]
    fn chord_root_is_tagged() {
        let mut board = guitar_board();
        board.apply_chord(9, ChordQuality::Minor);
        let a_note = FretPosition::new(0, 4); // A2
        assert!(board.is_root(a_note));
        let c_note = FretPosition::new(1, 2); // C3, chord tone but not root
        assert!(board.is_visible(c_note));
        assert!(!board.is_root(c_note));
    }

    #[test]
    fn clear_all_empties_every_layer() {
        let mut board = guitar_board();
        board.toggle_note(FretPosition::open(3));
        board.toggle_string(1);
        board.apply_scale(0, ScaleKind::Major);
        board.apply_chord(7, ChordQuality::Dominant7);

        board.clear_all();
        assert!(board.is_empty());
        assert!(board.resolve_notes().is_empty());
        assert!(board.applied_scale().is_none());
        assert!(board.applied_chord().is_none());
    }

    #[test]
    fn clearing_an_empty_layer_keeps_the_revision() {
        let mut board = guitar_board();
        let before = board.revision();
        board.clear_scale();
        board.clear_chord();
        board.clear_all();
        assert_eq!(board.revision(), before);
    }

    #[test]
    fn resolve_is_idempotent_and_board_ordered() {
        let mut board = guitar_board();
        board.apply_scale(4, ScaleKind::MinorPentatonic);
        board.toggle_fret_row(3);
        board.toggle_note(FretPosition::new(5, 10));

        let first = board.resolve_notes();
        let second = board.resolve_notes();
        assert_eq!(first, second);

        let positions: Vec<_> = first.iter().map(|note| note.position).collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn resolved_notes_carry_names_and_frequencies() {
        let mut board = guitar_board();
        board.toggle_note(FretPosition::open(0));
        let notes = board.resolve_notes();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].name, "E2");
        assert_eq!(notes[0].midi, 40);
        assert!((notes[0].frequency_hz - 82.4).abs() < 0.1);
    }

    #[test]
    #[should_panic(expected = "off the board")]
    fn toggling_past_the_last_string_panics() {
        let mut board = guitar_board();
        board.toggle_note(FretPosition::new(6, 0));
    }

    #[test]
    #[should_panic(expected = "off the board")]
    fn fret_row_past_the_neck_panics() {
        let mut board = guitar_board();
        board.toggle_fret_row(24);
    }
}
