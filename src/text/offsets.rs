//! Offset translation between the flat annotated string and the node list
//!
//! Every conversion here is derived from one traversal, `spans`, which pairs
//! each node with its start offset and width. Offset-to-locator,
//! locator-to-offset and flattening all reuse it.
//!
//! Snapping rule: an offset strictly inside an atomic node resolves to the end
//! of that node. An offset exactly at an atomic node's start resolves to the
//! end of the preceding node when there is one, so the only locator that
//! points before an atomic node is the very first node of the document.

use serde::{Deserialize, Serialize};

use crate::models::document::{DocumentNode, StructuralDocument};

/// One node with its place in the flat offset space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeSpan<'a> {
    pub index: usize,
    pub start: usize,
    pub width: usize,
    pub node: &'a DocumentNode,
}

impl NodeSpan<'_> {
    pub fn end(&self) -> usize {
        self.start + self.width
    }
}

/// A caret position inside the structural document.
///
/// For a text run `inner_offset` is a char index into its content (placeholders
/// excluded). For an atomic node it is either 0 (before) or the node width (after).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Locator {
    pub node_index: usize,
    pub inner_offset: usize,
}

impl Locator {
    pub fn new(node_index: usize, inner_offset: usize) -> Self {
        Self {
            node_index,
            inner_offset,
        }
    }
}

impl StructuralDocument {
    /// The single traversal every offset computation is built on
    pub fn spans(&self) -> impl Iterator<Item = NodeSpan<'_>> + '_ {
        let mut start = 0;
        self.nodes.iter().enumerate().map(move |(index, node)| {
            let width = node.width();
            let span = NodeSpan {
                index,
                start,
                width,
                node,
            };
            start += width;
            span
        })
    }

    /// Length of the flat annotated string in chars
    pub fn total_len(&self) -> usize {
        self.spans().last().map(|span| span.end()).unwrap_or(0)
    }

    /// Flat offset to a caret locator. Out-of-range offsets clamp to the end.
    pub fn offset_to_locator(&self, offset: usize) -> Locator {
        let total = self.total_len();
        let offset = if offset > total {
            log::debug!("Offset {} past end {}, clamping", offset, total);
            total
        } else {
            offset
        };

        for span in self.spans() {
            if offset > span.end() {
                continue;
            }
            if !span.node.is_atomic() {
                return Locator::new(span.index, offset - span.start);
            }
            if offset == span.start {
                return Locator::new(span.index, 0);
            }
            if offset < span.end() {
                log::warn!(
                    "⚠️ Offset {} inside atomic node {} ({}..{}), snapping to end",
                    offset,
                    span.index,
                    span.start,
                    span.end()
                );
            }
            return Locator::new(span.index, span.width);
        }

        // Empty document
        Locator::new(0, 0)
    }

    /// Caret locator back to a flat offset. Locators past the last node map to the end.
    pub fn locator_to_offset(&self, locator: Locator) -> usize {
        match self.spans().nth(locator.node_index) {
            Some(span) if span.node.is_atomic() => {
                if locator.inner_offset == 0 {
                    span.start
                } else {
                    span.end()
                }
            }
            Some(span) => span.start + locator.inner_offset.min(span.width),
            None => self.total_len(),
        }
    }

    /// Resolve an offset to the nearest caret stop (clamped, snapped out of widgets)
    pub fn snap_offset(&self, offset: usize) -> usize {
        self.locator_to_offset(self.offset_to_locator(offset))
    }

    /// True when the offset falls strictly inside an atomic node
    pub fn is_inside_atomic(&self, offset: usize) -> bool {
        self.spans()
            .any(|span| span.node.is_atomic() && span.start < offset && offset < span.end())
    }

    /// Node index at which to insert new nodes so that everything before it
    /// ends exactly at `offset`. Splits a text run when the offset falls inside
    /// one. The offset is snapped first; returns the insertion index and the
    /// snapped offset.
    pub fn split_at(&mut self, offset: usize) -> (usize, usize) {
        let offset = self.snap_offset(offset);

        let mut target = None;
        for span in self.spans() {
            if span.end() < offset {
                continue;
            }
            if span.start == offset {
                target = Some((span.index, None));
            } else if span.end() == offset {
                target = Some((span.index + 1, None));
            } else {
                target = Some((span.index, Some(offset - span.start)));
            }
            break;
        }

        match target {
            None => (self.nodes.len(), offset),
            Some((index, None)) => (index, offset),
            Some((index, Some(inner))) => {
                if let DocumentNode::TextRun { content } = &mut self.nodes[index] {
                    let byte = byte_index_skipping_placeholders(content, inner);
                    let tail = content.split_off(byte);
                    self.nodes.insert(index + 1, DocumentNode::TextRun { content: tail });
                }
                (index + 1, offset)
            }
        }
    }

    /// Flat char immediately before an offset, if any
    pub fn char_before(&self, offset: usize) -> Option<char> {
        if offset == 0 {
            return None;
        }
        self.char_at(offset - 1)
    }

    /// Flat char at an offset, if any
    pub fn char_at(&self, offset: usize) -> Option<char> {
        let span = self.node_at(offset)?;
        span.node.serialize().chars().nth(offset - span.start)
    }

    /// Node covering the char at an offset
    pub fn node_at(&self, offset: usize) -> Option<NodeSpan<'_>> {
        self.spans()
            .find(|span| span.start <= offset && offset < span.end())
    }

    /// Node ending exactly at an offset
    pub fn node_ending_at(&self, offset: usize) -> Option<NodeSpan<'_>> {
        self.spans()
            .filter(|span| span.width > 0 && span.end() == offset)
            .last()
    }

    /// Node starting at an offset
    pub fn node_starting_at(&self, offset: usize) -> Option<NodeSpan<'_>> {
        self.spans().find(|span| span.width > 0 && span.start == offset)
    }
}

/// Byte index of the `chars`-th visible char, placeholders skipped
fn byte_index_skipping_placeholders(content: &str, chars: usize) -> usize {
    use crate::models::document::ZERO_WIDTH_PLACEHOLDER;

    let mut seen = 0;
    for (byte, c) in content.char_indices() {
        if c == ZERO_WIDTH_PLACEHOLDER {
            continue;
        }
        if seen == chars {
            return byte;
        }
        seen += 1;
    }
    content.len()
}
