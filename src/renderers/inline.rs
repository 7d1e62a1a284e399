//! Inline rendering: re-interleave chord markers into clean lyric lines
//!
//! Exact structural inverse of `parse::annotated::parse`.

use crate::parse::annotated::ChordPlacement;

/// One string per clean lyric line with every placement's canonical marker
/// inserted at its offset. Offsets past the end of a line land at the end.
pub fn render_inline(clean_lyrics: &str, placements: &[ChordPlacement]) -> Vec<String> {
    clean_lyrics
        .split('\n')
        .enumerate()
        .map(|(line_index, line)| {
            let mut on_line: Vec<&ChordPlacement> = placements
                .iter()
                .filter(|p| p.line_index == line_index)
                .collect();
            // Stable: equal offsets keep their input order
            on_line.sort_by_key(|p| p.char_offset);
            render_line(line, &on_line)
        })
        .collect()
}

/// `render_inline` joined back into one flat string
pub fn render_inline_text(clean_lyrics: &str, placements: &[ChordPlacement]) -> String {
    render_inline(clean_lyrics, placements).join("\n")
}

fn render_line(line: &str, placements: &[&ChordPlacement]) -> String {
    if placements.is_empty() {
        return line.to_string();
    }

    let chars: Vec<char> = line.chars().collect();
    let mut out = String::with_capacity(line.len() + placements.len() * 4);
    let mut consumed = 0;

    for placement in placements {
        let offset = placement.char_offset.min(chars.len());
        if offset > consumed {
            out.extend(&chars[consumed..offset]);
            consumed = offset;
        }
        out.push_str(&placement.marker.serialize());
    }
    out.extend(&chars[consumed..]);
    out
}
