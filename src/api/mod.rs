//! Chord sheet editor WASM API
//!
//! The JavaScript-facing surface. Shared serialization, validation and
//! logging helpers live in `helpers`; the exported functions are grouped by
//! what they touch.
//!
//! # Module Structure
//!
//! - `helpers`: console logging macros, serde-wasm-bindgen conversion, argument validation
//! - `core`: the live editor instance (lifecycle, offsets, edits, song-wide operations)
//! - `autocomplete`: key handling, candidates, custom chords, catalogue
//! - `render`: stateless parsing, rendering and query normalization

pub mod helpers;
pub mod core;
pub mod autocomplete;
pub mod render;

// Re-export all public functions to keep a flat public API
pub use self::core::*;
pub use self::autocomplete::*;
pub use self::render::*;
