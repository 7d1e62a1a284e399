//! Normalization of raw host input
//!
//! After every raw edit the host surface reports its structure, which may
//! contain things the document model does not allow: generic containers left
//! behind by paste, blocks the user emptied, zero-width placeholders, literal
//! newlines inside text. `normalize_input` folds all of it back into the four
//! canonical node types.

use serde::{Deserialize, Serialize};

use crate::models::document::{tokenize_inline, DocumentNode, StructuralDocument, ZERO_WIDTH_PLACEHOLDER};
use crate::models::marker::{BlockKind, ChordMarker};
use crate::parse::annotated::normalize_line_endings;
use crate::renderers::chord_name::DisplayOptions;

/// A node as the host surface reports it
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RawNode {
    Text { content: String },
    Break,
    Chord { marker: ChordMarker },
    Block { kind: BlockKind, text: String },
    Container { children: Vec<RawNode> },
}

/// Fold raw host nodes into a canonical structural document.
///
/// - an empty block degrades to a plain line break
/// - a non-empty block is forced onto its own line
/// - a container is unwrapped into its content plus a line break
/// - text loses placeholders, newlines become breaks, typed `[X]` becomes a chord
pub fn normalize_input(raw: &[RawNode], options: &DisplayOptions) -> StructuralDocument {
    let mut builder = Builder {
        nodes: Vec::new(),
        options,
        pending_break: false,
    };
    builder.push_all(raw);
    StructuralDocument::from_nodes(builder.nodes)
}

struct Builder<'a> {
    nodes: Vec<DocumentNode>,
    options: &'a DisplayOptions,
    /// A block-level element ended; the next content starts a new line
    pending_break: bool,
}

impl Builder<'_> {
    fn push_all(&mut self, raw: &[RawNode]) {
        for node in raw {
            self.push(node);
        }
    }

    fn push(&mut self, node: &RawNode) {
        match node {
            RawNode::Text { content } => {
                let cleaned: String = normalize_line_endings(content)
                    .chars()
                    .filter(|&c| c != ZERO_WIDTH_PLACEHOLDER)
                    .collect();
                if cleaned.is_empty() {
                    return;
                }
                self.flush_break();
                for (i, line) in cleaned.split('\n').enumerate() {
                    if i > 0 {
                        self.nodes.push(DocumentNode::LineBreak);
                    }
                    tokenize_inline(line, self.options, &mut self.nodes);
                }
            }
            RawNode::Break => {
                self.pending_break = false;
                self.nodes.push(DocumentNode::LineBreak);
            }
            RawNode::Chord { marker } => {
                self.flush_break();
                self.nodes.push(DocumentNode::chord(marker.clone(), self.options));
            }
            RawNode::Block { text, .. } if text.trim_matches(ZERO_WIDTH_PLACEHOLDER).is_empty() => {
                log::debug!("Empty block degraded to a line break");
                self.pending_break = false;
                self.nodes.push(DocumentNode::LineBreak);
            }
            RawNode::Block { kind, text } => {
                self.flush_break();
                if !self.at_line_start() {
                    self.nodes.push(DocumentNode::LineBreak);
                }
                let text: String = text
                    .chars()
                    .filter(|&c| c != ZERO_WIDTH_PLACEHOLDER)
                    .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
                    .collect();
                self.nodes.push(DocumentNode::block(*kind, text));
                self.pending_break = true;
            }
            RawNode::Container { children } => {
                log::debug!("Unwrapping container with {} children", children.len());
                self.flush_break();
                if !self.at_line_start() {
                    self.nodes.push(DocumentNode::LineBreak);
                }
                self.push_all(children);
                self.pending_break = true;
            }
        }
    }

    fn at_line_start(&self) -> bool {
        matches!(self.nodes.last(), None | Some(DocumentNode::LineBreak))
    }

    fn flush_break(&mut self) {
        if self.pending_break {
            self.nodes.push(DocumentNode::LineBreak);
            self.pending_break = false;
        }
    }
}
