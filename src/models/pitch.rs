//! Chord root parsing and pitch-class arithmetic
//!
//! Chord names start with a root (letter + optional accidental) followed by a
//! quality suffix, optionally ending in a slash bass (`F#m7/C#`). This module
//! only understands the root and bass; the quality is opaque text.

use serde::{Deserialize, Serialize};

/// Accidental attached to a note letter
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Accidental {
    Natural,
    Sharp,
    Flat,
}

impl Accidental {
    pub fn semitone_offset(&self) -> i32 {
        match self {
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::Flat => -1,
        }
    }

    /// ASCII symbol used in stored chord names
    pub fn symbol(&self) -> &'static str {
        match self {
            Accidental::Natural => "",
            Accidental::Sharp => "#",
            Accidental::Flat => "b",
        }
    }

    /// Typographic glyph used for display
    pub fn glyph(&self) -> &'static str {
        match self {
            Accidental::Natural => "",
            Accidental::Sharp => "♯",
            Accidental::Flat => "♭",
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            '#' | '♯' => Some(Accidental::Sharp),
            'b' | '♭' => Some(Accidental::Flat),
            _ => None,
        }
    }
}

/// Which accidental to prefer when spelling a pitch class
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SpellingPreference {
    /// Keep the spelling the name already has
    #[default]
    AsWritten,
    Flats,
    Sharps,
}

/// A note letter with its accidental
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NoteName {
    /// Upper-case letter A-G
    pub letter: char,
    pub accidental: Accidental,
}

impl NoteName {
    pub fn new(letter: char, accidental: Accidental) -> Self {
        Self {
            letter: letter.to_ascii_uppercase(),
            accidental,
        }
    }

    /// Pitch class 0-11 with C = 0
    pub fn pitch_class(&self) -> u8 {
        let base = match self.letter {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            _ => 11,
        };
        (base + self.accidental.semitone_offset()).rem_euclid(12) as u8
    }

    /// Spell a pitch class, choosing sharps or flats for the black keys
    pub fn from_pitch_class(pitch_class: u8, prefer_flats: bool) -> Self {
        const SHARPS: [(char, Accidental); 12] = [
            ('C', Accidental::Natural),
            ('C', Accidental::Sharp),
            ('D', Accidental::Natural),
            ('D', Accidental::Sharp),
            ('E', Accidental::Natural),
            ('F', Accidental::Natural),
            ('F', Accidental::Sharp),
            ('G', Accidental::Natural),
            ('G', Accidental::Sharp),
            ('A', Accidental::Natural),
            ('A', Accidental::Sharp),
            ('B', Accidental::Natural),
        ];
        const FLATS: [(char, Accidental); 12] = [
            ('C', Accidental::Natural),
            ('D', Accidental::Flat),
            ('D', Accidental::Natural),
            ('E', Accidental::Flat),
            ('E', Accidental::Natural),
            ('F', Accidental::Natural),
            ('G', Accidental::Flat),
            ('G', Accidental::Natural),
            ('A', Accidental::Flat),
            ('A', Accidental::Natural),
            ('B', Accidental::Flat),
            ('B', Accidental::Natural),
        ];
        let table = if prefer_flats { &FLATS } else { &SHARPS };
        let (letter, accidental) = table[(pitch_class % 12) as usize];
        Self { letter, accidental }
    }

    /// Respell according to a preference; naturals are never respelled
    pub fn respell(&self, preference: SpellingPreference) -> Self {
        match (preference, self.accidental) {
            (SpellingPreference::AsWritten, _) | (_, Accidental::Natural) => *self,
            (SpellingPreference::Flats, _) => Self::from_pitch_class(self.pitch_class(), true),
            (SpellingPreference::Sharps, _) => Self::from_pitch_class(self.pitch_class(), false),
        }
    }

    pub fn is_enharmonic(&self, other: &NoteName) -> bool {
        self.pitch_class() == other.pitch_class()
    }

    pub fn to_ascii(&self) -> String {
        format!("{}{}", self.letter, self.accidental.symbol())
    }

    pub fn to_glyphs(&self) -> String {
        format!("{}{}", self.letter, self.accidental.glyph())
    }
}

/// Split a leading note name off a string.
///
/// The letter is accepted in either case. A lower-case `b` right after the
/// letter is read as a flat, so `"Bb"` is B-flat and `"bbm"` is B-flat minor.
/// Returns the note and the remainder of the string.
pub fn split_note(s: &str) -> Option<(NoteName, &str)> {
    let mut chars = s.char_indices();
    let (_, letter) = chars.next()?;
    let letter = letter.to_ascii_uppercase();
    if !('A'..='G').contains(&letter) {
        return None;
    }

    let rest_start = letter.len_utf8();
    match chars.next() {
        Some((idx, c)) => match Accidental::from_char(c) {
            Some(accidental) => Some((
                NoteName::new(letter, accidental),
                &s[idx + c.len_utf8()..],
            )),
            None => Some((NoteName::new(letter, Accidental::Natural), &s[rest_start..])),
        },
        None => Some((NoteName::new(letter, Accidental::Natural), "")),
    }
}

/// A chord name broken into root, quality and optional slash bass
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChordName<'a> {
    pub root: NoteName,
    pub quality: &'a str,
    pub bass: Option<NoteName>,
}

impl<'a> ChordName<'a> {
    /// Parse a chord name; `None` when it does not start with a note letter
    pub fn parse(name: &'a str) -> Option<Self> {
        let (root, rest) = split_note(name)?;
        if let Some(slash) = rest.rfind('/') {
            if let Some((bass, tail)) = split_note(&rest[slash + 1..]) {
                if tail.is_empty() {
                    return Some(Self {
                        root,
                        quality: &rest[..slash],
                        bass: Some(bass),
                    });
                }
            }
        }
        Some(Self {
            root,
            quality: rest,
            bass: None,
        })
    }

    /// Rebuild the name using a spelling function for root and bass
    pub fn render(&self, spell: impl Fn(&NoteName) -> String) -> String {
        let mut out = spell(&self.root);
        out.push_str(self.quality);
        if let Some(bass) = &self.bass {
            out.push('/');
            out.push_str(&spell(bass));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_note() {
        let (note, rest) = split_note("Abm7").unwrap();
        assert_eq!(note, NoteName::new('A', Accidental::Flat));
        assert_eq!(rest, "m7");

        let (note, rest) = split_note("am").unwrap();
        assert_eq!(note, NoteName::new('A', Accidental::Natural));
        assert_eq!(rest, "m");

        assert!(split_note("sus4").is_none());
        assert!(split_note("").is_none());
    }

    #[test]
    fn test_enharmonic_equivalence() {
        let f_sharp = NoteName::new('F', Accidental::Sharp);
        let g_flat = NoteName::new('G', Accidental::Flat);
        assert!(f_sharp.is_enharmonic(&g_flat));
        assert_eq!(NoteName::new('C', Accidental::Flat).pitch_class(), 11);
    }

    #[test]
    fn test_respell() {
        let a_sharp = NoteName::new('A', Accidental::Sharp);
        assert_eq!(a_sharp.respell(SpellingPreference::Flats).to_ascii(), "Bb");
        assert_eq!(a_sharp.respell(SpellingPreference::AsWritten).to_ascii(), "A#");
        let e = NoteName::new('E', Accidental::Natural);
        assert_eq!(e.respell(SpellingPreference::Flats).to_ascii(), "E");
    }

    #[test]
    fn test_chord_name_with_bass() {
        let chord = ChordName::parse("F#m7/C#").unwrap();
        assert_eq!(chord.root.to_ascii(), "F#");
        assert_eq!(chord.quality, "m7");
        assert_eq!(chord.bass.unwrap().to_ascii(), "C#");
        assert_eq!(chord.render(|n| n.to_glyphs()), "F♯m7/C♯");
    }

    #[test]
    fn test_chord_name_without_valid_bass() {
        let chord = ChordName::parse("C6/9").unwrap();
        assert_eq!(chord.quality, "6/9");
        assert!(chord.bass.is_none());
    }
}
