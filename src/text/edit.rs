//! Edit operations on the structural document
//!
//! All edits take a flat offset, snap it to a caret stop, and splice whole
//! nodes in or out. A widget is always inserted and removed as one unit.
//!
//! At a line start or right after another widget, a chord inserted before a
//! word gets no trailing space, so `[C]Amazing` keeps its canonical form.

use serde::{Deserialize, Serialize};

use crate::models::document::{DocumentNode, StructuralDocument};
use crate::models::errors::{EditorError, EditorResult};
use crate::models::marker::{BlockKind, ChordMarker};
use crate::renderers::chord_name::DisplayOptions;
use crate::text::offsets::NodeSpan;

/// Caret inside the editable text of a heading/instruction block
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BlockCaret {
    pub node_index: usize,
    pub char_index: usize,
}

/// Where the caret lands after an edit
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EditOutcome {
    /// Flat offset of the caret
    pub caret: usize,

    /// Set when the caret sits inside a block's text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<BlockCaret>,
}

impl EditOutcome {
    pub fn at(caret: usize) -> Self {
        Self { caret, block: None }
    }
}

/// Which side of the caret a deletion consumes
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeleteDirection {
    Backward,
    Forward,
}

/// What sits on one side of an insertion point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Neighbor {
    Word,
    Space,
    Punctuation,
    /// Document edge, line break or widget
    Boundary,
}

impl Neighbor {
    fn classify(c: char) -> Self {
        if c.is_alphanumeric() {
            Neighbor::Word
        } else if c.is_whitespace() {
            Neighbor::Space
        } else {
            Neighbor::Punctuation
        }
    }

    fn before(doc: &StructuralDocument, offset: usize) -> Self {
        match offset.checked_sub(1) {
            Some(prev) => Self::in_text_run(doc, prev),
            None => Neighbor::Boundary,
        }
    }

    fn after(doc: &StructuralDocument, offset: usize) -> Self {
        Self::in_text_run(doc, offset)
    }

    /// Classify the char at an offset; widgets and breaks count as boundaries
    fn in_text_run(doc: &StructuralDocument, offset: usize) -> Self {
        match doc.node_at(offset) {
            Some(span) if !span.node.is_atomic() => span
                .node
                .serialize()
                .chars()
                .nth(offset - span.start)
                .map(Self::classify)
                .unwrap_or(Neighbor::Boundary),
            _ => Neighbor::Boundary,
        }
    }
}

/// Spaces added around an inserted chord
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Spacing {
    leading: bool,
    trailing: bool,
}

impl Spacing {
    /// Inside a word: nothing, so a chord can sit mid-word.
    /// Right after a word with no space following: a leading space.
    /// Between punctuation and a word: a trailing space.
    fn between(before: Neighbor, after: Neighbor) -> Self {
        match (before, after) {
            (Neighbor::Word, Neighbor::Word | Neighbor::Space) => Spacing::default(),
            (Neighbor::Word, _) => Spacing {
                leading: true,
                trailing: false,
            },
            (Neighbor::Punctuation, Neighbor::Word) => Spacing {
                leading: false,
                trailing: true,
            },
            _ => Spacing::default(),
        }
    }
}

/// Insert a chord widget at a flat offset.
///
/// Returns the caret just after the inserted marker and any spaces added.
pub fn insert_chord(
    doc: &mut StructuralDocument,
    offset: usize,
    marker: ChordMarker,
    options: &DisplayOptions,
) -> EditOutcome {
    let offset = doc.snap_offset(offset);
    let spacing = Spacing::between(Neighbor::before(doc, offset), Neighbor::after(doc, offset));
    let width = marker.width();

    // A block owns its whole line; a chord next to one goes on its own line
    let is_block = |span: Option<NodeSpan<'_>>| {
        matches!(span.map(|s| s.node), Some(DocumentNode::BlockWidget { .. }))
    };
    let break_before = is_block(doc.node_ending_at(offset));
    let break_after = is_block(doc.node_starting_at(offset));

    let (index, offset) = doc.split_at(offset);
    let mut inserted = Vec::with_capacity(3);
    if break_before {
        inserted.push(DocumentNode::LineBreak);
    }
    if spacing.leading {
        inserted.push(DocumentNode::text(" "));
    }
    inserted.push(DocumentNode::chord(marker, options));
    if spacing.trailing {
        inserted.push(DocumentNode::text(" "));
    }
    if break_after {
        inserted.push(DocumentNode::LineBreak);
    }
    doc.nodes.splice(index..index, inserted);
    doc.merge_text_runs();

    let caret = offset
        + usize::from(break_before)
        + usize::from(spacing.leading)
        + width
        + usize::from(spacing.trailing);
    log::debug!("Inserted chord at {} ({:?}), caret {}", offset, spacing, caret);
    EditOutcome::at(caret)
}

/// Insert an empty heading/instruction block on its own line.
///
/// A line break is added before the block unless the offset is at a line
/// start, and after it unless the offset is at a line end. The caret lands
/// inside the block's (empty) text.
pub fn insert_block(doc: &mut StructuralDocument, offset: usize, kind: BlockKind) -> EditOutcome {
    let offset = doc.snap_offset(offset);
    let break_before = !matches!(doc.char_before(offset), None | Some('\n'));
    let break_after = !matches!(doc.char_at(offset), None | Some('\n'));

    let (index, offset) = doc.split_at(offset);
    let mut inserted = Vec::with_capacity(3);
    if break_before {
        inserted.push(DocumentNode::LineBreak);
    }
    inserted.push(DocumentNode::block(kind, ""));
    if break_after {
        inserted.push(DocumentNode::LineBreak);
    }
    doc.nodes.splice(index..index, inserted);

    let block_index = index + usize::from(break_before);
    let block_start = offset + usize::from(break_before);
    EditOutcome {
        caret: block_start + kind.prefix_width(),
        block: Some(BlockCaret {
            node_index: block_index,
            char_index: 0,
        }),
    }
}

/// Replace the text of a block widget (the user typing into a heading).
///
/// Newlines are flattened to spaces; a block always occupies exactly one line.
pub fn set_block_text(
    doc: &mut StructuralDocument,
    node_index: usize,
    text: &str,
) -> EditorResult<EditOutcome> {
    let len = doc.len();
    let start = doc
        .spans()
        .nth(node_index)
        .map(|span| span.start)
        .ok_or(EditorError::NodeOutOfRange {
            index: node_index,
            len,
        })?;

    match doc.nodes.get_mut(node_index) {
        Some(DocumentNode::BlockWidget { kind, text: current }) => {
            *current = text.replace(|c: char| c == '\r' || c == '\n', " ");
            let char_index = current.chars().count();
            Ok(EditOutcome {
                caret: start + kind.prefix_width() + char_index,
                block: Some(BlockCaret {
                    node_index,
                    char_index,
                }),
            })
        }
        _ => Err(EditorError::NotABlock(node_index)),
    }
}

/// Delete a whole widget when the offset sits exactly on its boundary.
///
/// Backward removes the widget ending at the offset, forward the one starting
/// there. Returns `None` (no-op) when there is no widget at that boundary, so
/// the host's native single-char deletion applies.
pub fn delete_atomic_at(
    doc: &mut StructuralDocument,
    offset: usize,
    direction: DeleteDirection,
) -> Option<EditOutcome> {
    let span = match direction {
        DeleteDirection::Backward => doc.node_ending_at(offset),
        DeleteDirection::Forward => doc.node_starting_at(offset),
    }?;
    if !span.node.is_widget() {
        return None;
    }

    let (index, start) = (span.index, span.start);
    let removed = doc.nodes.remove(index);
    doc.merge_text_runs();
    log::debug!("Deleted widget '{}' at {}", removed.serialize(), start);
    Some(EditOutcome::at(start))
}

/// What a deferred edit inserts
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PendingInsert {
    Chord { marker: ChordMarker },
    Block { kind: BlockKind },
}

/// Phase one of an edit: everything needed to apply it, captured up front.
///
/// The offset is latched when the edit is requested. Applying the edit later
/// reads only this snapshot, never the live caret.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PendingEdit {
    pub offset: usize,
    pub insert: PendingInsert,
}

impl PendingEdit {
    pub fn chord(offset: usize, marker: ChordMarker) -> Self {
        Self {
            offset,
            insert: PendingInsert::Chord { marker },
        }
    }

    pub fn block(offset: usize, kind: BlockKind) -> Self {
        Self {
            offset,
            insert: PendingInsert::Block { kind },
        }
    }

    /// Phase two: apply against the document
    pub fn apply(self, doc: &mut StructuralDocument, options: &DisplayOptions) -> EditOutcome {
        match self.insert {
            PendingInsert::Chord { marker } => insert_chord(doc, self.offset, marker, options),
            PendingInsert::Block { kind } => insert_block(doc, self.offset, kind),
        }
    }
}
