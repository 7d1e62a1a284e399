//! WASM API for chord autocomplete and the catalogue
//!
//! Key events arrive here one by one. Chord and block commits are applied to
//! the live document at the offset captured when the trigger key was pressed.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::api::core::{with_editor, EditResult};
use crate::api::helpers::{deserialize, editor_error, serialize};
use crate::autocomplete::candidates::{Candidate, CandidateList};
use crate::autocomplete::session::{AutocompleteSession, KeyEvent, KeyOutcome};
use crate::catalog::{CatalogSnapshot, ChordDiagram};
use crate::models::marker::ChordMarker;
use crate::{wasm_info, wasm_log};

/// Everything the host needs to draw the autocomplete popup
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct KeyResult {
    pub outcome: KeyOutcome,
    pub text: String,
    pub caret: usize,
    pub session: Option<AutocompleteSession>,
    pub menu: Vec<Candidate>,
}

/// Feed one key press to autocomplete
///
/// # Parameters
/// - `event_js`: `{ key, ctrl?, meta?, alt? }` with `key` as in `KeyboardEvent.key`
///
/// # Returns
/// `KeyResult`; when `outcome.type` is `ignored` the host handles the key normally
#[wasm_bindgen(js_name = handleKey)]
pub fn handle_key(event_js: JsValue) -> Result<JsValue, JsValue> {
    let event: KeyEvent = deserialize(event_js, "Key event deserialization error")?;

    with_editor(|editor| {
        let outcome = editor.handle_key(&event);
        if outcome != KeyOutcome::Ignored {
            wasm_log!("handleKey '{}' -> {:?}", event.key, outcome);
        }
        let result = KeyResult {
            outcome,
            text: editor.text(),
            caret: editor.caret,
            session: editor.autocomplete.session().cloned(),
            menu: if editor.autocomplete.is_open() {
                editor.menu()
            } else {
                Vec::new()
            },
        };
        serialize(&result, "Key result serialization error")
    })
}

/// Used and library matches for the open session's query
#[wasm_bindgen(js_name = getCandidates)]
pub fn get_candidates() -> Result<JsValue, JsValue> {
    with_editor(|editor| {
        let list: CandidateList = editor.candidates();
        wasm_log!(
            "getCandidates: {} used, {} library",
            list.used_matches.len(),
            list.library_matches.len()
        );
        serialize(&list, "Candidate serialization error")
    })
}

/// Close the autocomplete popup without inserting (click outside)
#[wasm_bindgen(js_name = cancelAutocomplete)]
pub fn cancel_autocomplete() -> Result<(), JsValue> {
    with_editor(|editor| {
        editor.autocomplete.cancel();
        Ok(())
    })
}

/// Define a song-local chord and insert it at the captured offset
#[wasm_bindgen(js_name = insertCustomChord)]
pub fn insert_custom_chord(name: &str, offset: usize, diagram_js: JsValue) -> Result<JsValue, JsValue> {
    wasm_info!("insertCustomChord called: name={}, offset={}", name, offset);
    let diagram: ChordDiagram = deserialize(diagram_js, "Chord diagram deserialization error")?;

    with_editor(|editor| {
        let outcome = editor.insert_custom_chord(name, offset, diagram);
        serialize(&EditResult::from_outcome(editor, outcome), "Edit result serialization error")
    })
}

/// Install the catalogue snapshot once the host has fetched it
///
/// # Parameters
/// - `catalog_json`: `{ "entries": [...] }`
#[wasm_bindgen(js_name = setCatalog)]
pub fn set_catalog(catalog_json: &str) -> Result<usize, JsValue> {
    let snapshot = CatalogSnapshot::from_json(catalog_json).map_err(editor_error)?;
    let count = snapshot.entries.len();
    with_editor(|editor| {
        editor.set_catalog(snapshot);
        Ok(count)
    })
}

/// Diagram for a chord marker, or `null` when none is available
#[wasm_bindgen(js_name = getChordDiagram)]
pub fn get_chord_diagram(marker_js: JsValue) -> Result<JsValue, JsValue> {
    let marker: ChordMarker = deserialize(marker_js, "Chord marker deserialization error")?;
    with_editor(|editor| match editor.chord_diagram(&marker) {
        Some(diagram) => serialize(&diagram, "Diagram serialization error"),
        None => Ok(JsValue::NULL),
    })
}
