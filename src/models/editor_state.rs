//! Editor state management
//!
//! `EditorState` is the single owner of a song being edited: the structural
//! document, the caret, the autocomplete controller, the catalogue snapshot
//! and the song-local chord overrides. The API layer holds one instance and
//! forwards host events to it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::autocomplete::candidates::{list_candidates, Candidate, CandidateList};
use crate::autocomplete::session::{AutocompleteController, Commit, KeyEvent, KeyOutcome};
use crate::catalog::{find_chord, CatalogSnapshot, ChordDiagram, ChordQuery, EmbeddedChord, LookupContext};
use crate::models::config::EditorConfig;
use crate::models::document::{DocumentNode, StructuralDocument};
use crate::models::errors::EditorResult;
use crate::models::marker::{BlockKind, ChordMarker};
use crate::models::pitch::SpellingPreference;
use crate::parse::annotated::{canonicalize, parse};
use crate::renderers::above::{render_sheet_above, LineLayout};
use crate::text::edit::{self, DeleteDirection, EditOutcome, PendingEdit};
use crate::text::normalize::{normalize_input, RawNode};

/// Complete editor state (WASM-owned source of truth)
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct EditorState {
    /// The song being edited
    pub document: StructuralDocument,

    /// Caret as a flat offset, always at a caret stop
    pub caret: usize,

    pub config: EditorConfig,

    pub autocomplete: AutocompleteController,

    /// Catalogue snapshot, once the host has fetched it
    pub catalog: Option<CatalogSnapshot>,

    /// Song-local chord definitions (custom chords)
    pub embedded: Vec<EmbeddedChord>,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorState {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            document: StructuralDocument::new(),
            caret: 0,
            autocomplete: AutocompleteController::new(config.trigger_key),
            config,
            catalog: None,
            embedded: Vec::new(),
        }
    }

    // ==================== Document ====================

    /// Replace the song with flat annotated text; markers are canonicalized first
    pub fn load_text(&mut self, text: &str) {
        let canonical = canonicalize(text);
        self.document = StructuralDocument::from_text(&canonical, &self.config.display);
        self.caret = 0;
        self.autocomplete.cancel();
        log::info!(
            "📄 Loaded song: {} nodes, {} chars",
            self.document.len(),
            self.document.total_len()
        );
    }

    /// Flat annotated text of the current document
    pub fn text(&self) -> String {
        self.document.to_text()
    }

    pub fn nodes(&self) -> &[DocumentNode] {
        &self.document.nodes
    }

    /// Move the caret; returns the snapped offset actually used
    pub fn set_caret(&mut self, offset: usize) -> usize {
        self.caret = self.document.snap_offset(offset);
        self.caret
    }

    // ==================== Edits ====================

    pub fn insert_chord(&mut self, offset: usize, marker: ChordMarker) -> EditOutcome {
        self.apply(PendingEdit::chord(offset, marker))
    }

    pub fn insert_block(&mut self, offset: usize, kind: BlockKind) -> EditOutcome {
        self.apply(PendingEdit::block(offset, kind))
    }

    /// Run phase two of a deferred edit
    pub fn apply(&mut self, pending: PendingEdit) -> EditOutcome {
        let outcome = pending.apply(&mut self.document, &self.config.display);
        self.caret = outcome.caret;
        outcome
    }

    pub fn set_block_text(&mut self, node_index: usize, text: &str) -> EditorResult<EditOutcome> {
        let outcome = edit::set_block_text(&mut self.document, node_index, text)?;
        self.caret = outcome.caret;
        Ok(outcome)
    }

    /// Delete a whole widget at the offset; `None` leaves the document unchanged
    pub fn delete_atomic(&mut self, offset: usize, direction: DeleteDirection) -> Option<EditOutcome> {
        let outcome = edit::delete_atomic_at(&mut self.document, offset, direction)?;
        self.caret = outcome.caret;
        Some(outcome)
    }

    /// Rebuild the document from the host surface after a raw edit
    pub fn apply_raw_input(&mut self, raw: &[RawNode], caret: usize) -> usize {
        self.document = normalize_input(raw, &self.config.display);
        self.set_caret(caret)
    }

    // ==================== Autocomplete ====================

    pub fn lookup_context(&self) -> LookupContext<'_> {
        LookupContext {
            snapshot: self.catalog.as_ref(),
            embedded: &self.embedded,
            suppress_fallback: self.config.suppress_position_fallback,
        }
    }

    /// Candidates for the open session's query (all candidates when closed)
    pub fn candidates(&self) -> CandidateList {
        let query = self.autocomplete.query().unwrap_or("");
        candidate_list(query, &self.document, self.lookup_context(), &self.config)
    }

    /// The full selection menu for the open session's query
    pub fn menu(&self) -> Vec<Candidate> {
        let query = self.autocomplete.query().unwrap_or("");
        self.candidates().menu(query)
    }

    /// Feed a key to autocomplete. Chord and block commits are applied here;
    /// a custom-chord commit is returned to the host, which collects the
    /// diagram and calls `insert_custom_chord` with the captured offset.
    pub fn handle_key(&mut self, event: &KeyEvent) -> KeyOutcome {
        let outcome = {
            let document = &self.document;
            let config = &self.config;
            let lookup = LookupContext {
                snapshot: self.catalog.as_ref(),
                embedded: &self.embedded,
                suppress_fallback: config.suppress_position_fallback,
            };
            let menu = |query: &str| candidate_list(query, document, lookup, config).menu(query);
            self.autocomplete.handle_key(event, self.caret, menu)
        };

        if let KeyOutcome::Committed {
            commit: Commit::Insert { edit },
        } = &outcome
        {
            self.apply(edit.clone());
        }
        outcome
    }

    /// Define a song-local chord and insert it at `offset` as `[Name::id]`
    pub fn insert_custom_chord(&mut self, name: &str, offset: usize, diagram: ChordDiagram) -> EditOutcome {
        let id = self.new_chord_id();
        self.embedded.push(EmbeddedChord {
            id: Some(id.clone()),
            name: name.to_string(),
            position: crate::models::marker::DEFAULT_POSITION,
            diagram,
        });
        log::info!("✨ Created custom chord '{}' ({})", name, id);
        self.insert_chord(offset, ChordMarker::new(name).with_id(id))
    }

    #[cfg(feature = "uuid")]
    fn new_chord_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }

    #[cfg(not(feature = "uuid"))]
    fn new_chord_id(&self) -> String {
        format!("custom-{}", self.embedded.len() + 1)
    }

    // ==================== Catalogue ====================

    pub fn set_catalog(&mut self, catalog: CatalogSnapshot) {
        log::info!("📚 Catalogue loaded: {} entries", catalog.entries.len());
        self.catalog = Some(catalog);
    }

    /// Diagram for a chord marker; `None` renders as "no diagram available"
    pub fn chord_diagram(&self, marker: &ChordMarker) -> Option<ChordDiagram> {
        let tuning = self.config.tuning_key();
        find_chord(
            ChordQuery {
                name: &marker.name,
                instrument: &self.config.instrument,
                tuning: &tuning,
                position: marker.position,
                id: marker.id.as_deref(),
            },
            self.lookup_context(),
        )
    }

    /// Distinct chord markers in song order
    pub fn used_chords(&self) -> Vec<ChordMarker> {
        let mut seen = HashSet::new();
        self.document
            .chord_markers()
            .filter(|marker| seen.insert((*marker).clone()))
            .cloned()
            .collect()
    }

    // ==================== Song-wide ====================

    /// Transpose every chord; returns how many widgets changed.
    ///
    /// Chord widths change, so the caret is carried across as a locator.
    pub fn transpose(&mut self, semitones: i32, preference: SpellingPreference) -> usize {
        let anchor = self.document.offset_to_locator(self.caret);
        let changed = crate::transposition::transpose_document(
            &mut self.document,
            semitones,
            preference,
            &self.config.display,
        );
        self.caret = self.document.locator_to_offset(anchor);
        changed
    }

    /// Chords-above layout of the whole song
    pub fn render_above(&self) -> Vec<LineLayout> {
        render_sheet_above(&parse(&self.text()))
    }
}

fn candidate_list(
    query: &str,
    document: &StructuralDocument,
    lookup: LookupContext<'_>,
    config: &EditorConfig,
) -> CandidateList {
    list_candidates(query, document.chord_markers(), lookup, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor(text: &str) -> EditorState {
        let mut state = EditorState::default();
        state.load_text(text);
        state
    }

    fn key(state: &mut EditorState, key: &str) -> KeyOutcome {
        state.handle_key(&KeyEvent::new(key))
    }

    #[test]
    fn test_load_canonicalizes() {
        let state = editor("[C:1]Amazing [ G ]grace\r\n");
        assert_eq!(state.text(), "[C]Amazing [G]grace\n");
        assert_eq!(state.caret, 0);
    }

    #[test]
    fn test_set_caret_snaps() {
        let mut state = editor("Amazing [C]grace");
        assert_eq!(state.set_caret(9), 11);
        assert_eq!(state.set_caret(100), 16);
    }

    #[test]
    fn test_autocomplete_commit_inserts_at_captured_offset() {
        let mut state = editor("Amazing grace [Am]");
        state.set_caret(8);
        assert_eq!(key(&mut state, "/"), KeyOutcome::Opened { offset: 8 });
        // Caret moves after the trigger; the captured offset wins
        state.set_caret(0);
        key(&mut state, "A");
        let outcome = key(&mut state, "Enter");
        assert!(matches!(outcome, KeyOutcome::Committed { .. }));
        assert_eq!(state.text(), "Amazing [Am]grace [Am]");
        assert_eq!(state.caret, 12);
    }

    #[test]
    fn test_block_command_commit() {
        let mut state = editor("la");
        state.set_caret(0);
        key(&mut state, "/");
        key(&mut state, "h");
        key(&mut state, "e");
        let menu = state.menu();
        let block_index = menu
            .iter()
            .position(|c| matches!(c, Candidate::Block { .. }))
            .unwrap();
        for _ in 0..block_index {
            key(&mut state, "ArrowDown");
        }
        key(&mut state, "Enter");
        assert_eq!(state.text(), "{heading:}\nla");
    }

    #[test]
    fn test_custom_chord_flow() {
        let mut state = editor("la la");
        state.set_caret(3);
        key(&mut state, "/");
        key(&mut state, "z");
        let outcome = key(&mut state, "Enter");
        let KeyOutcome::Committed {
            commit: Commit::CreateCustom { name, offset },
        } = outcome
        else {
            panic!("expected custom chord commit, got {:?}", outcome);
        };
        assert_eq!(state.text(), "la la");

        let diagram = ChordDiagram {
            frets: vec![Some(0); 6],
            base_fret: 1,
        };
        state.insert_custom_chord(&name, offset, diagram.clone());
        let marker = state.used_chords().remove(0);
        assert_eq!(marker.name, "z");
        assert!(marker.id.is_some());
        assert!(state.text().starts_with("la [z::"));
        assert_eq!(state.chord_diagram(&marker), Some(diagram));
    }

    #[test]
    fn test_used_chords_distinct() {
        let state = editor("[C]a [G]b [C]c [C:2]d");
        let names: Vec<String> = state.used_chords().iter().map(|m| m.serialize()).collect();
        assert_eq!(names, vec!["[C]", "[G]", "[C:2]"]);
    }

    #[test]
    fn test_delete_and_transpose() {
        let mut state = editor("Amazing [C]grace [G]how");
        let outcome = state.delete_atomic(11, DeleteDirection::Backward).unwrap();
        assert_eq!(outcome.caret, 8);
        assert_eq!(state.transpose(2, SpellingPreference::AsWritten), 1);
        assert_eq!(state.text(), "Amazing grace [A]how");
    }

    #[test]
    fn test_transpose_keeps_caret_at_same_stop() {
        // After a widget that grows
        let mut state = editor("[A]x");
        state.set_caret(4);
        state.transpose(1, SpellingPreference::AsWritten);
        assert_eq!(state.text(), "[A#]x");
        assert_eq!(state.caret, 5);

        // At the end of a song that shrinks
        let mut state = editor("[A#]xy");
        state.set_caret(6);
        state.transpose(-1, SpellingPreference::AsWritten);
        assert_eq!(state.text(), "[A]xy");
        assert_eq!(state.caret, 5);
        assert_eq!(state.caret, state.document.total_len());

        // Right after a widget that grows: never left inside it
        let mut state = editor("[A]xy");
        state.set_caret(3);
        state.transpose(1, SpellingPreference::AsWritten);
        assert_eq!(state.caret, 4);
        assert!(!state.document.is_inside_atomic(state.caret));

        // Trigger after transposing captures the moved caret
        assert_eq!(key(&mut state, "/"), KeyOutcome::Opened { offset: 4 });
    }

    #[test]
    fn test_render_above() {
        let state = editor("{heading:Verse 1}\n[C]Amazing [G]grace");
        let layout = state.render_above();
        assert_eq!(layout.len(), 2);
        assert_eq!(layout[1].chord_row().trim_end(), "C       G");
    }
}
