//! Line/column positions in the flat annotated string
//!
//! Hosts with a line-oriented cursor (textareas, terminal views) address the
//! text by (line, col); the core addresses it by flat char offset. Columns
//! count chars of the flat line, markers included.

use serde::{Deserialize, Serialize};

use crate::models::document::StructuralDocument;

/// A position in text (line, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TextPos {
    pub line: usize,
    pub col: usize,
}

impl TextPos {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }

    /// Create a position at (0, 0)
    pub fn zero() -> Self {
        Self { line: 0, col: 0 }
    }
}

impl StructuralDocument {
    /// Flat offset to (line, col); offsets past the end clamp
    pub fn offset_to_pos(&self, offset: usize) -> TextPos {
        let mut pos = TextPos::zero();
        for (i, c) in self.to_text().chars().enumerate() {
            if i == offset {
                break;
            }
            if c == '\n' {
                pos.line += 1;
                pos.col = 0;
            } else {
                pos.col += 1;
            }
        }
        pos
    }

    /// (line, col) to flat offset; columns past the line end clamp to it
    pub fn pos_to_offset(&self, pos: TextPos) -> usize {
        let text = self.to_text();
        let mut offset = 0;
        for (line_index, line) in text.split('\n').enumerate() {
            let len = line.chars().count();
            if line_index == pos.line {
                return offset + pos.col.min(len);
            }
            offset += len + 1;
        }
        text.chars().count()
    }
}
