//! Query normalization and chord-name matching
//!
//! Users type loose shorthand ("af", "a flat", "Csh"). Before matching, a
//! trailing accidental word is folded into a real accidental on the root. Root
//! matching is accidental-exact: a bare letter never matches a sharpened or
//! flattened root, and enharmonic equivalence only kicks in when the query
//! itself names an accidental.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::catalog::ChordDiagram;
use crate::models::pitch::{split_note, Accidental};

static FLAT_SHORTHAND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^([a-g])\s*(f|fl|fla|flat)$").unwrap());

static SHARP_SHORTHAND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^([a-g])\s*(sh|sha|shar|sharp)$").unwrap());

/// Fold accidental shorthand into the root.
///
/// `"a f"` → `"Ab"`, `"Csh"` → `"C#"`. Anything else is returned trimmed but
/// otherwise untouched, so `"Cs"` stays `"Cs"` and can still reach `Csus`.
pub fn normalize_query(query: &str) -> String {
    let query = query.trim();

    if let Some(caps) = FLAT_SHORTHAND.captures(query) {
        return format!("{}b", caps[1].to_ascii_uppercase());
    }
    if let Some(caps) = SHARP_SHORTHAND.captures(query) {
        return format!("{}#", caps[1].to_ascii_uppercase());
    }
    query.to_string()
}

/// Does a chord name match a (normalized) query?
///
/// The root letter must match. A query without an accidental only matches
/// natural roots; a query with one matches the same or an enharmonic root.
/// The rest of the query must be a prefix of the chord's quality. Queries that
/// do not start with a note letter fall back to a case-insensitive substring match.
pub fn matches_query(chord_name: &str, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }

    let Some((query_root, query_rest)) = split_note(query) else {
        return chord_name.to_lowercase().contains(&query.to_lowercase());
    };
    let Some((chord_root, chord_rest)) = split_note(chord_name) else {
        return false;
    };

    let root_matches = if query_root.accidental == Accidental::Natural {
        chord_root == query_root
    } else {
        chord_root.is_enharmonic(&query_root) && chord_root.accidental != Accidental::Natural
    };

    root_matches && chord_rest.starts_with(query_rest)
}

/// A fret-pattern search term
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FretPattern {
    /// One digit or `x` per string, matched exactly
    Exact(Vec<Option<u8>>),
    /// Comma-separated frets from the lowest string, matched as a prefix
    Prefix(Vec<Option<u8>>),
}

impl FretPattern {
    /// Interpret a query as a fret pattern for an instrument with `string_count` strings
    pub fn parse(query: &str, string_count: usize) -> Option<Self> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        if query.contains(',') {
            let frets = query
                .split(',')
                .map(|part| parse_fret(part.trim()))
                .collect::<Option<Vec<_>>>()?;
            if frets.len() < 2 || frets.len() > string_count {
                return None;
            }
            return Some(FretPattern::Prefix(frets));
        }

        if query.chars().count() != string_count {
            return None;
        }
        query
            .chars()
            .map(|c| match c {
                'x' | 'X' => Some(None),
                d => d.to_digit(10).map(|d| Some(d as u8)),
            })
            .collect::<Option<Vec<_>>>()
            .map(FretPattern::Exact)
    }

    pub fn matches(&self, diagram: &ChordDiagram) -> bool {
        match self {
            FretPattern::Exact(frets) => diagram.frets == *frets,
            FretPattern::Prefix(frets) => diagram.frets.starts_with(frets),
        }
    }
}

fn parse_fret(s: &str) -> Option<Option<u8>> {
    match s {
        "x" | "X" => Some(None),
        _ => s.parse::<u8>().ok().map(Some),
    }
}
