//! Annotated-text parser
//!
//! Walks flat annotated text once and separates it into chord-free lyric text
//! plus a line-indexed list of chord placements. Placement offsets are measured
//! against the cleaned line: each match's raw offset minus everything already
//! removed from that line.
//!
//! Block marker lines (`{heading:...}`, `{instruction:...}`) stay in the clean
//! lyrics untouched and are reported separately by `extract_blocks`.

use serde::{Deserialize, Serialize};

use crate::models::marker::{BlockKind, ChordMarker};
use crate::parse::marker::{block_line, chord_spans, parse_chord_marker};

/// A chord placed at a char offset within a cleaned lyric line
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct ChordPlacement {
    pub line_index: usize,

    /// Char offset in the chord-free line
    pub char_offset: usize,

    pub marker: ChordMarker,
}

/// Result of parsing annotated text
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ParsedSheet {
    /// Lyrics with every chord marker removed, lines joined with `\n`
    pub clean_lyrics: String,

    /// Placements ordered by line, then offset
    pub placements: Vec<ChordPlacement>,
}

/// A line that consists entirely of a block marker
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BlockLine {
    pub line_index: usize,
    pub kind: BlockKind,
    /// Trimmed block text
    pub text: String,
}

/// Convert `\r\n` and lone `\r` into `\n`
pub fn normalize_line_endings(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Split annotated text into clean lyrics and chord placements.
///
/// An unmatched `[` is left as literal text. Empty markers (`[]`, `[ ]`) are
/// removed from the lyrics and produce no placement.
pub fn parse(text: &str) -> ParsedSheet {
    let text = normalize_line_endings(text);
    let mut clean_lines = Vec::new();
    let mut placements = Vec::new();

    for (line_index, line) in text.split('\n').enumerate() {
        if block_line(line).is_some() {
            clean_lines.push(line.to_string());
            continue;
        }

        let mut clean = String::with_capacity(line.len());
        let mut clean_chars = 0;
        let mut cursor = 0;

        for span in chord_spans(line) {
            let before = &line[cursor..span.start];
            clean.push_str(before);
            clean_chars += before.chars().count();
            cursor = span.end;

            let marker = parse_chord_marker(span.inner);
            if marker.name.is_empty() {
                log::debug!("Dropping empty chord marker on line {}", line_index);
                continue;
            }
            placements.push(ChordPlacement {
                line_index,
                char_offset: clean_chars,
                marker,
            });
        }
        clean.push_str(&line[cursor..]);
        clean_lines.push(clean);
    }

    ParsedSheet {
        clean_lyrics: clean_lines.join("\n"),
        placements,
    }
}

/// Every whole-line block marker with its line index
pub fn extract_blocks(text: &str) -> Vec<BlockLine> {
    normalize_line_endings(text)
        .split('\n')
        .enumerate()
        .filter_map(|(line_index, line)| {
            block_line(line).map(|block| BlockLine {
                line_index,
                kind: block.kind,
                text: block.text.trim().to_string(),
            })
        })
        .collect()
}

/// Rewrite every parseable chord marker into its canonical form.
///
/// `[C:1]` becomes `[C]`, `[ G ]` becomes `[G]`. Empty markers, unmatched
/// brackets and block lines are left alone.
pub fn canonicalize(text: &str) -> String {
    let text = normalize_line_endings(text);
    let lines: Vec<String> = text
        .split('\n')
        .map(|line| {
            if block_line(line).is_some() {
                return line.to_string();
            }
            let mut out = String::with_capacity(line.len());
            let mut cursor = 0;
            for span in chord_spans(line) {
                out.push_str(&line[cursor..span.start]);
                let marker = parse_chord_marker(span.inner);
                if marker.name.is_empty() {
                    out.push_str(&line[span.start..span.end]);
                } else {
                    out.push_str(&marker.serialize());
                }
                cursor = span.end;
            }
            out.push_str(&line[cursor..]);
            out
        })
        .collect();
    lines.join("\n")
}
