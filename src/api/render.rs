//! Stateless WASM functions: parsing, rendering and query normalization
//!
//! These work on plain strings and need no editor instance.

use wasm_bindgen::prelude::*;

use crate::api::helpers::{deserialize, serialize};
use crate::parse::annotated::{canonicalize, parse, ChordPlacement};
use crate::renderers::above::render_above as layout_above;
use crate::renderers::chord_name::{display_name, DisplayOptions};
use crate::renderers::inline::render_inline_text;
use crate::wasm_log;

/// Split annotated text into clean lyrics and chord placements
#[wasm_bindgen(js_name = parseAnnotated)]
pub fn parse_annotated(text: &str) -> Result<JsValue, JsValue> {
    let sheet = parse(text);
    wasm_log!(
        "parseAnnotated: {} placements over {} chars",
        sheet.placements.len(),
        sheet.clean_lyrics.chars().count()
    );
    serialize(&sheet, "Parse result serialization error")
}

/// Reinsert chord markers into clean lyrics
#[wasm_bindgen(js_name = renderInline)]
pub fn render_inline(clean_lyrics: &str, placements_js: JsValue) -> Result<String, JsValue> {
    let placements: Vec<ChordPlacement> = deserialize(placements_js, "Placement deserialization error")?;
    Ok(render_inline_text(clean_lyrics, &placements))
}

/// Chords-above layout: one chord row per lyric line
#[wasm_bindgen(js_name = renderAbove)]
pub fn render_above(clean_lyrics: &str, placements_js: JsValue) -> Result<JsValue, JsValue> {
    let placements: Vec<ChordPlacement> = deserialize(placements_js, "Placement deserialization error")?;
    serialize(&layout_above(clean_lyrics, &placements), "Layout serialization error")
}

#[wasm_bindgen(js_name = canonicalizeText)]
pub fn canonicalize_text(text: &str) -> String {
    canonicalize(text)
}

#[wasm_bindgen(js_name = normalizeQuery)]
pub fn normalize_query(query: &str) -> String {
    crate::autocomplete::query::normalize_query(query)
}

/// Display form of a chord name
#[wasm_bindgen(js_name = displayChordName)]
pub fn display_chord_name(name: &str, options_js: JsValue) -> Result<String, JsValue> {
    let options: DisplayOptions = if options_js.is_undefined() || options_js.is_null() {
        DisplayOptions::default()
    } else {
        deserialize(options_js, "Display options deserialization error")?
    };
    Ok(display_name(name, &options))
}
