//! Parsing module for the chord sheet editor
//!
//! - `marker`: the marker grammar (chord and block marker syntax)
//! - `annotated`: flat annotated text to clean lyrics + chord placements

pub mod marker;
pub mod annotated;

// Re-export commonly used types
pub use marker::{parse_chord_marker, block_line, chord_spans, ChordSpan};
pub use annotated::{
    parse, extract_blocks, canonicalize, normalize_line_endings, BlockLine, ChordPlacement,
    ParsedSheet,
};
