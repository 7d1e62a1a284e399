//! Chord Sheet Editor WASM Module
//!
//! Editor model for lyrics annotated with inline chord markers (`[Am]`) and
//! heading/instruction lines (`{heading:Chorus}`). The flat annotated string,
//! the structural node list and the host caret share one offset space.

pub mod models;
pub mod parse;
pub mod text;
pub mod renderers;
pub mod autocomplete;
pub mod catalog;
pub mod transposition;
pub mod api;

// Re-export commonly used types
pub use models::document::{DocumentNode, StructuralDocument};
pub use models::marker::{BlockKind, ChordMarker};
pub use models::{EditorConfig, EditorError, EditorState};
pub use text::offsets::Locator;

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    if console_log::init_with_level(log::Level::Debug).is_err() {
        wasm_warn!("Logger already initialized");
    }

    log::info!("Chord sheet editor WASM module initialized");
}
