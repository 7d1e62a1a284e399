//! Chords-above-lyrics layout
//!
//! Produces a two-row layout per lyric line: a chord row whose chord names
//! start at the column of their placement, and the lyric row below it.
//! Leading whitespace is trimmed and whitespace runs collapse to one char,
//! with placements remapped through both steps so they keep their column.
//!
//! When two chords overlap in the chord row the later offset overwrites the
//! earlier one. This is accepted behavior, not an error.

use serde::{Deserialize, Serialize};

use crate::parse::annotated::{ChordPlacement, ParsedSheet};
use crate::parse::marker::block_line;
use crate::models::marker::BlockKind;

/// Kind of a chord-row segment
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Space,
    Chord,
}

/// A run of either spaces or chord glyphs in the chord row
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ChordSegment {
    #[serde(rename = "type")]
    pub kind: SegmentKind,
    pub content: String,
}

/// Layout of one source line
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LineLayout {
    Heading {
        text: String,
    },
    Instruction {
        text: String,
    },
    Line {
        #[serde(rename = "chordSegments")]
        chord_segments: Vec<ChordSegment>,
        #[serde(rename = "lyricLine")]
        lyric_line: String,
    },
}

impl LineLayout {
    /// The chord row as one string; empty for block lines and chordless lines
    pub fn chord_row(&self) -> String {
        match self {
            LineLayout::Line { chord_segments, .. } => chord_segments
                .iter()
                .map(|segment| segment.content.as_str())
                .collect(),
            _ => String::new(),
        }
    }
}

/// Render every line of a parsed sheet in chords-above mode
pub fn render_above(clean_lyrics: &str, placements: &[ChordPlacement]) -> Vec<LineLayout> {
    clean_lyrics
        .split('\n')
        .enumerate()
        .map(|(line_index, line)| {
            if let Some(block) = block_line(line) {
                let text = block.text.trim().to_string();
                return match block.kind {
                    BlockKind::Heading => LineLayout::Heading { text },
                    BlockKind::Instruction => LineLayout::Instruction { text },
                };
            }
            let mut on_line: Vec<&ChordPlacement> = placements
                .iter()
                .filter(|p| p.line_index == line_index)
                .collect();
            on_line.sort_by_key(|p| p.char_offset);
            layout_line(line, &on_line)
        })
        .collect()
}

/// Convenience wrapper over a `ParsedSheet`
pub fn render_sheet_above(sheet: &ParsedSheet) -> Vec<LineLayout> {
    render_above(&sheet.clean_lyrics, &sheet.placements)
}

fn layout_line(line: &str, placements: &[&ChordPlacement]) -> LineLayout {
    let chars: Vec<char> = line.chars().collect();

    // Trim leading whitespace, shifting offsets with it
    let lead = chars.iter().take_while(|c| c.is_whitespace()).count();
    let trimmed = &chars[lead..];

    let (lyric, remap) = collapse_whitespace(trimmed);

    let positioned: Vec<(usize, &str)> = placements
        .iter()
        .map(|p| {
            let offset = p.char_offset.saturating_sub(lead).min(trimmed.len());
            (remap[offset], p.marker.name.as_str())
        })
        .collect();

    if positioned.is_empty() {
        return LineLayout::Line {
            chord_segments: Vec::new(),
            lyric_line: lyric.into_iter().collect(),
        };
    }

    let chord_end = positioned
        .iter()
        .map(|(offset, name)| offset + name.chars().count())
        .max()
        .unwrap_or(0);
    let width = lyric.len().max(chord_end);

    let mut row = vec![' '; width];
    for (offset, name) in &positioned {
        for (i, c) in name.chars().enumerate() {
            row[offset + i] = c;
        }
    }

    let mut lyric_line: String = lyric.into_iter().collect();
    let lyric_len = lyric_line.chars().count();
    lyric_line.extend(std::iter::repeat(' ').take(width - lyric_len));

    LineLayout::Line {
        chord_segments: segment_row(&row),
        lyric_line,
    }
}

/// Collapse runs of two or more whitespace chars into their first char.
///
/// Returns the collapsed chars and a table mapping every insertion point of
/// the input (`0..=len`) to the matching insertion point of the output. An
/// insertion point strictly inside a run maps onto the kept char, so a chord
/// there stays above the surviving space.
fn collapse_whitespace(chars: &[char]) -> (Vec<char>, Vec<usize>) {
    let mut out = Vec::with_capacity(chars.len());
    let mut remap = Vec::with_capacity(chars.len() + 1);
    let mut removed = 0;

    for (i, &c) in chars.iter().enumerate() {
        let in_run = c.is_whitespace() && i > 0 && chars[i - 1].is_whitespace();
        if in_run {
            remap.push(i - removed - 1);
            removed += 1;
        } else {
            remap.push(i - removed);
            out.push(c);
        }
    }
    remap.push(chars.len() - removed);

    (out, remap)
}

/// Run-length encode a chord row into space/chord segments
fn segment_row(row: &[char]) -> Vec<ChordSegment> {
    let mut segments: Vec<ChordSegment> = Vec::new();
    for &c in row {
        let kind = if c == ' ' {
            SegmentKind::Space
        } else {
            SegmentKind::Chord
        };
        match segments.last_mut() {
            Some(last) if last.kind == kind => last.content.push(c),
            _ => segments.push(ChordSegment {
                kind,
                content: c.to_string(),
            }),
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::marker::ChordMarker;

    fn place(char_offset: usize, name: &str) -> ChordPlacement {
        ChordPlacement {
            line_index: 0,
            char_offset,
            marker: ChordMarker::new(name),
        }
    }

    #[test]
    fn test_collapse_remap() {
        let chars: Vec<char> = "a  b".chars().collect();
        let (out, remap) = collapse_whitespace(&chars);
        assert_eq!(out.iter().collect::<String>(), "a b");
        assert_eq!(remap, vec![0, 1, 1, 2, 3]);

        // Every point inside a longer run lands on the kept space
        let chars: Vec<char> = "a    b".chars().collect();
        let (out, remap) = collapse_whitespace(&chars);
        assert_eq!(out.iter().collect::<String>(), "a b");
        assert_eq!(remap, vec![0, 1, 1, 1, 1, 2, 3]);

        // A single space is left alone
        let chars: Vec<char> = "a b".chars().collect();
        assert_eq!(collapse_whitespace(&chars).1, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_segments() {
        let layout = render_above("Amazing grace", &[place(0, "C"), place(8, "G")]);
        match &layout[0] {
            LineLayout::Line {
                chord_segments,
                lyric_line,
            } => {
                assert_eq!(lyric_line, "Amazing grace");
                assert_eq!(chord_segments.len(), 4);
                assert_eq!(chord_segments[0].kind, SegmentKind::Chord);
                assert_eq!(chord_segments[1].content, "       ");
            }
            other => panic!("unexpected layout {:?}", other),
        }
    }

    #[test]
    fn test_leading_whitespace_trimmed() {
        let layout = render_above("   la la", &[place(3, "D"), place(6, "E")]);
        assert_eq!(layout[0].chord_row(), "D  E ");
        if let LineLayout::Line { lyric_line, .. } = &layout[0] {
            assert_eq!(lyric_line, "la la");
        }

        // A chord inside the trimmed prefix moves to column 0
        let layout = render_above("  la", &[place(1, "A")]);
        assert_eq!(layout[0].chord_row(), "A ");

        // Trimmed prefix and a collapsed run on the same line
        let layout = render_above("   la   la", &[place(1, "A"), place(6, "B"), place(8, "C")]);
        assert_eq!(layout[0].chord_row(), "A BC ");
        if let LineLayout::Line { lyric_line, .. } = &layout[0] {
            assert_eq!(lyric_line, "la la");
        }
    }

    #[test]
    fn test_chord_longer_than_lyric_pads_lyric() {
        let layout = render_above("la", &[place(2, "Cmaj7")]);
        assert_eq!(layout[0].chord_row(), "  Cmaj7");
        if let LineLayout::Line { lyric_line, .. } = &layout[0] {
            assert_eq!(lyric_line, "la     ");
        }
    }

    #[test]
    fn test_overlap_last_write_wins() {
        let layout = render_above("abcdef", &[place(0, "Cmaj7"), place(2, "G")]);
        assert_eq!(layout[0].chord_row(), "CmGj7 ");
    }

    #[test]
    fn test_block_lines() {
        let layout = render_above("{heading: Verse }\n{instruction:x2}", &[]);
        assert_eq!(
            layout[0],
            LineLayout::Heading {
                text: "Verse".to_string()
            }
        );
        assert_eq!(
            layout[1],
            LineLayout::Instruction {
                text: "x2".to_string()
            }
        );
    }

    #[test]
    fn test_chordless_line() {
        let layout = render_above("just words", &[]);
        assert_eq!(
            layout[0],
            LineLayout::Line {
                chord_segments: vec![],
                lyric_line: "just words".to_string()
            }
        );
    }
}
