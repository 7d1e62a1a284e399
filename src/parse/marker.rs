//! Marker grammar
//!
//! Inner text of a chord marker follows one of four shapes:
//! - `Name`
//! - `Name:Position`
//! - `Name::Id`
//! - `Name:Position:Id`
//!
//! Parsing never fails. An unparseable position falls back to 1. Chord names
//! that themselves contain `:` are outside the grammar and are not supported.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::marker::{BlockKind, BlockMarker, ChordMarker, DEFAULT_POSITION};

/// `name:pos:id` where pos may be empty and id is the greedy remainder
static ID_FORM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.+?):([^:]*):(.+)$").unwrap());

/// `name:digits`
static POSITION_FORM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.+?):(\d+)$").unwrap());

/// A chord marker span, non-nesting, ending at the next `]`
static CHORD_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]*)\]").unwrap());

/// A block marker filling an entire line
static BLOCK_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\{(heading|instruction):(.*)\}$").unwrap());

/// Parse the text between `[` and `]`
pub fn parse_chord_marker(inner: &str) -> ChordMarker {
    let inner = inner.trim();

    if let Some(caps) = ID_FORM.captures(inner) {
        return ChordMarker {
            name: caps[1].trim().to_string(),
            position: parse_position(&caps[2]),
            id: Some(caps[3].trim().to_string()).filter(|id| !id.is_empty()),
        };
    }

    if let Some(caps) = POSITION_FORM.captures(inner) {
        return ChordMarker {
            name: caps[1].trim().to_string(),
            position: parse_position(&caps[2]),
            id: None,
        };
    }

    ChordMarker::new(inner)
}

/// Position text to a voicing index, falling back to the default
fn parse_position(text: &str) -> u32 {
    let text = text.trim();
    if text.is_empty() {
        return DEFAULT_POSITION;
    }
    match text.parse::<u32>() {
        Ok(position) if position >= DEFAULT_POSITION => position,
        _ => {
            log::debug!("Malformed chord position '{}', using {}", text, DEFAULT_POSITION);
            DEFAULT_POSITION
        }
    }
}

/// Byte range of one `[...]` span inside a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordSpan<'a> {
    /// Byte offset of `[`
    pub start: usize,
    /// Byte offset just past `]`
    pub end: usize,
    /// Text between the brackets
    pub inner: &'a str,
}

/// All chord spans of a line, left to right. An unmatched `[` is not a span.
pub fn chord_spans(line: &str) -> impl Iterator<Item = ChordSpan<'_>> {
    CHORD_SPAN.captures_iter(line).filter_map(|caps| {
        let whole = caps.get(0)?;
        let inner = caps.get(1)?;
        Some(ChordSpan {
            start: whole.start(),
            end: whole.end(),
            inner: inner.as_str(),
        })
    })
}

/// Parse a line that consists entirely of a block marker; text is kept verbatim
pub fn block_line(line: &str) -> Option<BlockMarker> {
    let caps = BLOCK_LINE.captures(line)?;
    let kind = BlockKind::from_keyword(&caps[1])?;
    Some(BlockMarker::new(kind, &caps[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_name() {
        assert_eq!(parse_chord_marker("Am7"), ChordMarker::new("Am7"));
        assert_eq!(parse_chord_marker("  G  "), ChordMarker::new("G"));
    }

    #[test]
    fn test_parse_position() {
        assert_eq!(parse_chord_marker("G:3"), ChordMarker::with_position("G", 3));
    }

    #[test]
    fn test_parse_id_without_position() {
        assert_eq!(parse_chord_marker("D::abc"), ChordMarker::new("D").with_id("abc"));
    }

    #[test]
    fn test_parse_id_with_position() {
        assert_eq!(
            parse_chord_marker("E:2:abc"),
            ChordMarker::with_position("E", 2).with_id("abc")
        );
    }

    #[test]
    fn test_id_is_greedy_remainder() {
        let marker = parse_chord_marker("E:2:abc:def");
        assert_eq!(marker.name, "E");
        assert_eq!(marker.position, 2);
        assert_eq!(marker.id.as_deref(), Some("abc:def"));
    }

    #[test]
    fn test_malformed_position_falls_back() {
        let marker = parse_chord_marker("C:x:id1");
        assert_eq!(marker.position, 1);
        assert_eq!(marker.id.as_deref(), Some("id1"));

        assert_eq!(parse_chord_marker("C:0").position, 1);
        // Non-numeric single segment is part of the name
        assert_eq!(parse_chord_marker("C:abc").name, "C:abc");
    }

    #[test]
    fn test_canonical_round_trip() {
        for text in ["C", "G:3", "D::abc", "E:2:abc", "F#m7/C#"] {
            let marker = parse_chord_marker(text);
            assert_eq!(marker.serialize(), format!("[{}]", text));
        }
    }

    #[test]
    fn test_chord_spans() {
        let spans: Vec<_> = chord_spans("[C]a [G:2]b [unclosed").collect();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].inner, "C");
        assert_eq!((spans[1].start, spans[1].end), (5, 10));
    }

    #[test]
    fn test_block_line() {
        assert_eq!(
            block_line("{heading:Chorus}"),
            Some(BlockMarker::new(BlockKind::Heading, "Chorus"))
        );
        assert_eq!(
            block_line("{instruction:}"),
            Some(BlockMarker::new(BlockKind::Instruction, ""))
        );
        assert_eq!(block_line("text {heading:Chorus}"), None);
        assert_eq!(block_line("{comment:x}"), None);
    }
}
