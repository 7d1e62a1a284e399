//! Models module for the chord sheet editor
//!
//! This module contains the data models shared by parsing, rendering and
//! editing: markers, chord roots, the structural document, configuration,
//! errors and the live editor state.

pub mod marker;
pub mod pitch;
pub mod document;
pub mod errors;
pub mod config;
pub mod editor_state;

// Re-export commonly used types
pub use marker::{BlockKind, BlockMarker, ChordMarker, DEFAULT_POSITION};
pub use pitch::{Accidental, ChordName, NoteName, SpellingPreference};
pub use document::{DocumentNode, StructuralDocument, ZERO_WIDTH_PLACEHOLDER};
pub use errors::{EditorError, EditorResult};
pub use config::EditorConfig;
pub use editor_state::EditorState;
