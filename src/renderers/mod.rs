//! Renderers module for the chord sheet editor
//!
//! This module contains the layout logic that turns clean lyrics and chord
//! placements back into display structures.

pub mod inline;
pub mod above;
pub mod chord_name;

// Re-export commonly used types
pub use inline::{render_inline, render_inline_text};
pub use above::{render_above, render_sheet_above, ChordSegment, LineLayout, SegmentKind};
pub use chord_name::{display_name, DisplayOptions};
