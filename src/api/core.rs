//! WASM API for the live editor instance
//!
//! One editor instance lives in WASM memory. The host creates it, loads a
//! song, and forwards caret moves, edits and raw input; every call returns the
//! resulting text and caret so the host surface can re-render.

use std::sync::{Mutex, MutexGuard};

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::api::helpers::{
    deserialize, editor_error, parse_block_kind, parse_direction, serialize, validation_error,
};
use crate::models::config::EditorConfig;
use crate::models::errors::EditorError;
use crate::models::marker::ChordMarker;
use crate::models::pitch::SpellingPreference;
use crate::models::EditorState;
use crate::text::cursor::TextPos;
use crate::text::edit::{BlockCaret, EditOutcome};
use crate::text::normalize::RawNode;
use crate::text::offsets::Locator;
use crate::{wasm_info, wasm_log, wasm_warn};

// WASM-owned editor storage (canonical source of truth)
lazy_static! {
    static ref EDITOR: Mutex<Option<EditorState>> = Mutex::new(None);
}

// ============================================================================
// Result structures for edit operations
// ============================================================================

/// Result of an edit: the new flat text and where the caret landed
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct EditResult {
    pub text: String,
    pub caret: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_caret: Option<BlockCaret>,
}

impl EditResult {
    pub(crate) fn from_outcome(editor: &EditorState, outcome: EditOutcome) -> Self {
        Self {
            text: editor.text(),
            caret: outcome.caret,
            block_caret: outcome.block,
        }
    }
}

// ============================================================================
// Instance access
// ============================================================================

fn lock_editor() -> Result<MutexGuard<'static, Option<EditorState>>, JsValue> {
    EDITOR
        .lock()
        .map_err(|e| validation_error(format!("Editor lock poisoned: {}", e)))
}

/// Run a closure against the live editor
pub(crate) fn with_editor<T>(f: impl FnOnce(&mut EditorState) -> Result<T, JsValue>) -> Result<T, JsValue> {
    let mut guard = lock_editor()?;
    match guard.as_mut() {
        Some(editor) => f(editor),
        None => {
            wasm_warn!("No editor instance");
            Err(editor_error(EditorError::NoEditor))
        }
    }
}

// ============================================================================
// Lifecycle
// ============================================================================

/// Create the editor instance, replacing any existing one
///
/// # Parameters
/// - `config_js`: optional config object (camelCase keys, every field optional)
#[wasm_bindgen(js_name = createEditor)]
pub fn create_editor(config_js: JsValue) -> Result<(), JsValue> {
    wasm_info!("createEditor called");

    let config: EditorConfig = if config_js.is_undefined() || config_js.is_null() {
        EditorConfig::default()
    } else {
        deserialize(config_js, "Config deserialization error")?
    };
    wasm_log!(
        "  instrument={}, strings={}, trigger='{}'",
        config.instrument,
        config.string_count(),
        config.trigger_key
    );

    *lock_editor()? = Some(EditorState::new(config));
    wasm_info!("createEditor completed successfully");
    Ok(())
}

/// Load flat annotated text; markers are canonicalized
#[wasm_bindgen(js_name = loadText)]
pub fn load_text(text: &str) -> Result<String, JsValue> {
    wasm_info!("loadText called: {} chars", text.chars().count());
    with_editor(|editor| {
        editor.load_text(text);
        Ok(editor.text())
    })
}

#[wasm_bindgen(js_name = getText)]
pub fn get_text() -> Result<String, JsValue> {
    with_editor(|editor| Ok(editor.text()))
}

/// Structural nodes for the host to render
#[wasm_bindgen(js_name = getNodes)]
pub fn get_nodes() -> Result<JsValue, JsValue> {
    with_editor(|editor| serialize(&editor.nodes(), "Node serialization error"))
}

// ============================================================================
// Offsets and caret
// ============================================================================

#[wasm_bindgen(js_name = offsetToLocator)]
pub fn offset_to_locator(offset: usize) -> Result<JsValue, JsValue> {
    with_editor(|editor| {
        let locator = editor.document.offset_to_locator(offset);
        serialize(&locator, "Locator serialization error")
    })
}

#[wasm_bindgen(js_name = locatorToOffset)]
pub fn locator_to_offset(locator_js: JsValue) -> Result<usize, JsValue> {
    let locator: Locator = deserialize(locator_js, "Locator deserialization error")?;
    with_editor(|editor| Ok(editor.document.locator_to_offset(locator)))
}

/// Flat offset to a `{ line, col }` position (line-oriented hosts)
#[wasm_bindgen(js_name = offsetToPosition)]
pub fn offset_to_position(offset: usize) -> Result<JsValue, JsValue> {
    with_editor(|editor| {
        let pos = editor.document.offset_to_pos(offset);
        serialize(&pos, "Position serialization error")
    })
}

#[wasm_bindgen(js_name = positionToOffset)]
pub fn position_to_offset(pos_js: JsValue) -> Result<usize, JsValue> {
    let pos: TextPos = deserialize(pos_js, "Position deserialization error")?;
    with_editor(|editor| Ok(editor.document.pos_to_offset(pos)))
}

/// Move the caret; returns the snapped offset
#[wasm_bindgen(js_name = setCaret)]
pub fn set_caret(offset: usize) -> Result<usize, JsValue> {
    with_editor(|editor| {
        let snapped = editor.set_caret(offset);
        if snapped != offset {
            wasm_log!("setCaret: {} snapped to {}", offset, snapped);
        }
        Ok(snapped)
    })
}

// ============================================================================
// Edits
// ============================================================================

/// Insert a chord marker at a flat offset
///
/// # Parameters
/// - `offset`: flat offset (snapped out of widgets, clamped to the text)
/// - `marker_js`: `{ name, position?, id? }`
#[wasm_bindgen(js_name = insertChord)]
pub fn insert_chord(offset: usize, marker_js: JsValue) -> Result<JsValue, JsValue> {
    let marker: ChordMarker = deserialize(marker_js, "Chord marker deserialization error")?;
    wasm_info!("insertChord called: offset={}, marker={}", offset, marker.serialize());

    if marker.name.trim().is_empty() {
        return Err(validation_error("Chord name must not be empty"));
    }

    with_editor(|editor| {
        let outcome = editor.insert_chord(offset, marker);
        serialize(&EditResult::from_outcome(editor, outcome), "Edit result serialization error")
    })
}

/// Insert an empty heading or instruction block on its own line
#[wasm_bindgen(js_name = insertBlock)]
pub fn insert_block(offset: usize, kind: &str) -> Result<JsValue, JsValue> {
    wasm_info!("insertBlock called: offset={}, kind={}", offset, kind);
    let kind = parse_block_kind(kind).map_err(validation_error)?;

    with_editor(|editor| {
        let outcome = editor.insert_block(offset, kind);
        serialize(&EditResult::from_outcome(editor, outcome), "Edit result serialization error")
    })
}

#[wasm_bindgen(js_name = setBlockText)]
pub fn set_block_text(node_index: usize, text: &str) -> Result<JsValue, JsValue> {
    wasm_info!("setBlockText called: node={}, text='{}'", node_index, text);

    with_editor(|editor| {
        let outcome = editor.set_block_text(node_index, text).map_err(editor_error)?;
        serialize(&EditResult::from_outcome(editor, outcome), "Edit result serialization error")
    })
}

/// Delete a whole widget at a boundary
///
/// # Returns
/// The edit result, or `null` when nothing atomic sits at that boundary and the
/// host should perform its native single-char deletion
#[wasm_bindgen(js_name = deleteAtomic)]
pub fn delete_atomic(offset: usize, direction: &str) -> Result<JsValue, JsValue> {
    wasm_info!("deleteAtomic called: offset={}, direction={}", offset, direction);
    let direction = parse_direction(direction).map_err(validation_error)?;

    with_editor(|editor| match editor.delete_atomic(offset, direction) {
        Some(outcome) => {
            serialize(&EditResult::from_outcome(editor, outcome), "Edit result serialization error")
        }
        None => {
            wasm_log!("  No widget at offset {}, native deletion", offset);
            Ok(JsValue::NULL)
        }
    })
}

/// Rebuild the document from the host surface after an uncontrolled edit
///
/// # Parameters
/// - `raw_js`: array of raw nodes as the host reports them
/// - `caret`: the host caret as a flat offset
#[wasm_bindgen(js_name = applyRawInput)]
pub fn apply_raw_input(raw_js: JsValue, caret: usize) -> Result<JsValue, JsValue> {
    let raw: Vec<RawNode> = deserialize(raw_js, "Raw input deserialization error")?;
    wasm_info!("applyRawInput called: {} raw nodes, caret={}", raw.len(), caret);

    with_editor(|editor| {
        let caret = editor.apply_raw_input(&raw, caret);
        serialize(
            &EditResult {
                text: editor.text(),
                caret,
                block_caret: None,
            },
            "Edit result serialization error",
        )
    })
}

// ============================================================================
// Song-wide operations
// ============================================================================

/// Transpose every chord in the song
///
/// # Parameters
/// - `semitones`: signed shift
/// - `preference`: `"asWritten"`, `"flats"` or `"sharps"`
#[wasm_bindgen(js_name = transposeSong)]
pub fn transpose_song(semitones: i32, preference: JsValue) -> Result<String, JsValue> {
    wasm_info!("transposeSong called: {} semitones", semitones);
    let preference: SpellingPreference = if preference.is_undefined() || preference.is_null() {
        SpellingPreference::default()
    } else {
        deserialize(preference, "Spelling preference deserialization error")?
    };

    with_editor(|editor| {
        let changed = editor.transpose(semitones, preference);
        wasm_log!("  {} chords rewritten", changed);
        Ok(editor.text())
    })
}

/// Chords-above layout of the live song
#[wasm_bindgen(js_name = getAboveLayout)]
pub fn get_above_layout() -> Result<JsValue, JsValue> {
    with_editor(|editor| serialize(&editor.render_above(), "Layout serialization error"))
}

/// Distinct chords used in the song, in order
#[wasm_bindgen(js_name = getUsedChords)]
pub fn get_used_chords() -> Result<JsValue, JsValue> {
    with_editor(|editor| {
        let used = editor.used_chords();
        if used.is_empty() {
            wasm_log!("  Song has no chords");
        }
        serialize(&used, "Chord list serialization error")
    })
}
