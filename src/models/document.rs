//! Structural document model
//!
//! The live editing surface is an ordered list of nodes: text runs, hard line
//! breaks, chord widgets and block widgets. Every node has a fixed width in
//! the flat annotated-text offset space, and concatenating the canonical
//! serialization of every node reproduces the flat text exactly.
//!
//! Widgets carry their canonical marker separately from the display text;
//! width is always derived from the canonical form.

use serde::{Deserialize, Serialize};

use super::marker::{BlockKind, BlockMarker, ChordMarker};
use crate::parse::annotated::normalize_line_endings;
use crate::parse::marker::{block_line, chord_spans, parse_chord_marker};
use crate::renderers::chord_name::{display_name, DisplayOptions};

/// Zero-width placeholder the host surface may put in text nodes for caret placement
pub const ZERO_WIDTH_PLACEHOLDER: char = '\u{200B}';

/// One node of the structural document
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DocumentNode {
    TextRun {
        content: String,
    },
    LineBreak,
    ChordWidget {
        marker: ChordMarker,
        #[serde(rename = "displayName")]
        display_name: String,
    },
    BlockWidget {
        kind: BlockKind,
        text: String,
    },
}

impl DocumentNode {
    pub fn text(content: impl Into<String>) -> Self {
        DocumentNode::TextRun {
            content: content.into(),
        }
    }

    pub fn chord(marker: ChordMarker, options: &DisplayOptions) -> Self {
        let display_name = display_name(&marker.name, options);
        DocumentNode::ChordWidget {
            marker,
            display_name,
        }
    }

    pub fn block(kind: BlockKind, text: impl Into<String>) -> Self {
        DocumentNode::BlockWidget {
            kind,
            text: text.into(),
        }
    }

    /// Width in the flat offset space
    pub fn width(&self) -> usize {
        match self {
            DocumentNode::TextRun { content } => content
                .chars()
                .filter(|&c| c != ZERO_WIDTH_PLACEHOLDER)
                .count(),
            DocumentNode::LineBreak => 1,
            DocumentNode::ChordWidget { marker, .. } => marker.width(),
            DocumentNode::BlockWidget { kind, text } => kind.prefix_width() + text.chars().count() + 1,
        }
    }

    /// Canonical flat-text form of this node
    pub fn serialize(&self) -> String {
        match self {
            DocumentNode::TextRun { content } => content
                .chars()
                .filter(|&c| c != ZERO_WIDTH_PLACEHOLDER)
                .collect(),
            DocumentNode::LineBreak => "\n".to_string(),
            DocumentNode::ChordWidget { marker, .. } => marker.serialize(),
            DocumentNode::BlockWidget { kind, text } => BlockMarker::new(*kind, text.clone()).serialize(),
        }
    }

    /// Atomic nodes are single caret stops; the caret never enters them
    pub fn is_atomic(&self) -> bool {
        !matches!(self, DocumentNode::TextRun { .. })
    }

    /// Widgets are the atomic nodes deleted as a unit
    pub fn is_widget(&self) -> bool {
        matches!(
            self,
            DocumentNode::ChordWidget { .. } | DocumentNode::BlockWidget { .. }
        )
    }
}

/// Ordered node sequence owned by one editor instance
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct StructuralDocument {
    pub nodes: Vec<DocumentNode>,
}

impl StructuralDocument {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn from_nodes(nodes: Vec<DocumentNode>) -> Self {
        let mut doc = Self { nodes };
        doc.merge_text_runs();
        doc
    }

    /// Build from flat annotated text.
    ///
    /// Chord spans whose canonical serialization differs from the raw span
    /// (e.g. `[C:1]`, `[ G ]`, `[]`) stay literal text so that serializing the
    /// model reproduces the input exactly.
    pub fn from_text(text: &str, options: &DisplayOptions) -> Self {
        let text = normalize_line_endings(text);
        let mut nodes = Vec::new();

        for (line_index, line) in text.split('\n').enumerate() {
            if line_index > 0 {
                nodes.push(DocumentNode::LineBreak);
            }
            if let Some(block) = block_line(line) {
                nodes.push(DocumentNode::block(block.kind, block.text));
                continue;
            }
            tokenize_inline(line, options, &mut nodes);
        }

        Self::from_nodes(nodes)
    }

    /// Serialize back to flat annotated text
    pub fn to_text(&self) -> String {
        self.nodes.iter().map(DocumentNode::serialize).collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DocumentNode> {
        self.nodes.get(index)
    }

    /// Drop empty text runs and merge adjacent ones
    pub fn merge_text_runs(&mut self) {
        let mut merged: Vec<DocumentNode> = Vec::with_capacity(self.nodes.len());
        for node in self.nodes.drain(..) {
            match node {
                DocumentNode::TextRun { content } if content.is_empty() => {}
                DocumentNode::TextRun { content } => {
                    if let Some(DocumentNode::TextRun { content: prev }) = merged.last_mut() {
                        prev.push_str(&content);
                    } else {
                        merged.push(DocumentNode::TextRun { content });
                    }
                }
                other => merged.push(other),
            }
        }
        self.nodes = merged;
    }

    /// Chord markers in document order
    pub fn chord_markers(&self) -> impl Iterator<Item = &ChordMarker> {
        self.nodes.iter().filter_map(|node| match node {
            DocumentNode::ChordWidget { marker, .. } => Some(marker),
            _ => None,
        })
    }

    /// Recompute every widget display name, e.g. after a display option change
    pub fn refresh_display_names(&mut self, options: &DisplayOptions) {
        for node in &mut self.nodes {
            if let DocumentNode::ChordWidget {
                marker,
                display_name: shown,
            } = node
            {
                *shown = display_name(&marker.name, options);
            }
        }
    }
}

/// Split one non-block line into text runs and chord widgets
pub(crate) fn tokenize_inline(line: &str, options: &DisplayOptions, nodes: &mut Vec<DocumentNode>) {
    let mut cursor = 0;
    for span in chord_spans(line) {
        if span.start > cursor {
            nodes.push(DocumentNode::text(&line[cursor..span.start]));
        }
        let raw = &line[span.start..span.end];
        let marker = parse_chord_marker(span.inner);
        if !marker.name.is_empty() && marker.serialize() == raw {
            nodes.push(DocumentNode::chord(marker, options));
        } else {
            log::debug!("Keeping non-canonical marker '{}' as literal text", raw);
            nodes.push(DocumentNode::text(raw));
        }
        cursor = span.end;
    }
    if cursor < line.len() {
        nodes.push(DocumentNode::text(&line[cursor..]));
    }
}
