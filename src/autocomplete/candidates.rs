//! Candidate listing for chord autocomplete
//!
//! Chords already used in the song come first, then catalogue chords for the
//! configured instrument, then block commands, then a trailing "create custom"
//! entry.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::autocomplete::query::{matches_query, normalize_query, FretPattern};
use crate::catalog::{find_chord, ChordQuery, LookupContext};
use crate::models::config::EditorConfig;
use crate::models::marker::{BlockKind, ChordMarker};
use crate::models::pitch::split_note;

/// Minimum query length before block commands are offered
const BLOCK_COMMAND_MIN_QUERY: usize = 2;

/// One chord candidate
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CandidateEntry {
    pub name: String,
    pub position: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl CandidateEntry {
    pub fn from_marker(marker: &ChordMarker) -> Self {
        Self {
            name: marker.name.clone(),
            position: marker.position,
            id: marker.id.clone(),
        }
    }

    pub fn to_marker(&self) -> ChordMarker {
        let marker = ChordMarker::with_position(self.name.clone(), self.position);
        match &self.id {
            Some(id) => marker.with_id(id.clone()),
            None => marker,
        }
    }

    fn key(&self) -> (String, u32) {
        (self.name.clone(), self.position)
    }
}

/// Matches split by origin
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CandidateList {
    pub used_matches: Vec<CandidateEntry>,
    pub library_matches: Vec<CandidateEntry>,
}

/// One row of the autocomplete menu, in selection order
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Candidate {
    Chord { entry: CandidateEntry },
    Block { kind: BlockKind },
    CreateCustom { name: String },
}

/// Match a query against chords used in the song and the catalogue.
///
/// Never fails: without a catalogue only used chords are returned.
pub fn list_candidates<'a>(
    query: &str,
    used: impl IntoIterator<Item = &'a ChordMarker>,
    lookup: LookupContext<'_>,
    config: &EditorConfig,
) -> CandidateList {
    let query = normalize_query(query);
    let tuning = config.tuning_key();
    let fret_pattern = FretPattern::parse(&query, config.string_count());

    let mut seen = HashSet::new();
    let mut used_matches = Vec::new();
    for marker in used {
        let matched = match &fret_pattern {
            Some(pattern) => find_chord(
                ChordQuery {
                    name: &marker.name,
                    instrument: &config.instrument,
                    tuning: &tuning,
                    position: marker.position,
                    id: marker.id.as_deref(),
                },
                lookup,
            )
            .map(|diagram| pattern.matches(&diagram))
            .unwrap_or(false),
            None => matches_query(&marker.name, &query),
        };
        let entry = CandidateEntry::from_marker(marker);
        if matched && seen.insert(entry.key()) {
            used_matches.push(entry);
        }
    }

    let mut library_matches = Vec::new();
    match lookup.snapshot {
        Some(snapshot) => {
            let mut entries: Vec<_> = snapshot
                .for_instrument(&config.instrument, &tuning)
                .collect();
            // Personal library first, original order otherwise
            entries.sort_by_key(|e| e.source);

            for entry in entries {
                if library_matches.len() >= config.max_library_candidates {
                    break;
                }
                let matched = match &fret_pattern {
                    Some(pattern) => pattern.matches(&entry.diagram),
                    None => matches_query(&entry.name, &query),
                };
                let candidate = CandidateEntry {
                    name: entry.name.clone(),
                    position: entry.position,
                    id: entry.id.clone(),
                };
                if matched && seen.insert(candidate.key()) {
                    library_matches.push(candidate);
                }
            }
        }
        None => log::debug!("No chord catalogue loaded, offering used chords only"),
    }

    CandidateList {
        used_matches,
        library_matches,
    }
}

impl CandidateList {
    /// The flat menu for a query: used, library, block commands, create custom
    pub fn menu(&self, query: &str) -> Vec<Candidate> {
        let query = normalize_query(query);
        let mut menu: Vec<Candidate> = self
            .used_matches
            .iter()
            .chain(&self.library_matches)
            .cloned()
            .map(|entry| Candidate::Chord { entry })
            .collect();

        menu.extend(block_commands(&query).map(|kind| Candidate::Block { kind }));

        if let Some(name) = custom_chord_name(&query) {
            let listed = menu
                .iter()
                .any(|c| matches!(c, Candidate::Chord { entry } if entry.name == name));
            if !listed {
                menu.push(Candidate::CreateCustom { name });
            }
        }
        menu
    }
}

/// Block kinds whose keyword starts with the query
pub fn block_commands(query: &str) -> impl Iterator<Item = BlockKind> {
    let query = query.to_lowercase();
    [BlockKind::Heading, BlockKind::Instruction]
        .into_iter()
        .filter(move |kind| {
            query.chars().count() >= BLOCK_COMMAND_MIN_QUERY && kind.keyword().starts_with(&query)
        })
}

/// Name for a new custom chord built from the query, root capitalized.
/// `None` for an empty query or one that is a fret pattern.
pub fn custom_chord_name(query: &str) -> Option<String> {
    let query = query.trim();
    if query.is_empty() || query.chars().all(|c| c.is_ascii_digit() || matches!(c, 'x' | 'X' | ',')) {
        return None;
    }
    Some(match split_note(query) {
        Some((root, rest)) => format!("{}{}", root.to_ascii(), rest),
        None => query.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogEntry, CatalogSnapshot, ChordDiagram, LibrarySource};

    fn entry(name: &str, source: LibrarySource, frets: [Option<u8>; 6]) -> CatalogEntry {
        CatalogEntry {
            id: None,
            name: name.to_string(),
            instrument: "guitar".to_string(),
            tuning: "EADGBE".to_string(),
            position: 1,
            source,
            diagram: ChordDiagram {
                frets: frets.to_vec(),
                base_fret: 1,
            },
        }
    }

    fn snapshot() -> CatalogSnapshot {
        CatalogSnapshot {
            entries: vec![
                entry("A", LibrarySource::Main, [None, Some(0), Some(2), Some(2), Some(2), Some(0)]),
                entry("Am", LibrarySource::Main, [None, Some(0), Some(2), Some(2), Some(1), Some(0)]),
                entry("Ab", LibrarySource::Main, [Some(4), Some(6), Some(6), Some(5), Some(4), Some(4)]),
                entry("A7", LibrarySource::Personal, [None, Some(0), Some(2), Some(0), Some(2), Some(0)]),
                entry("C", LibrarySource::Main, [None, Some(3), Some(2), Some(0), Some(1), Some(0)]),
            ],
        }
    }

    fn names(entries: &[CandidateEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_used_first_and_deduplicated() {
        let snap = snapshot();
        let used = vec![ChordMarker::new("Am"), ChordMarker::new("Am"), ChordMarker::new("G")];
        let list = list_candidates(
            "A",
            &used,
            LookupContext {
                snapshot: Some(&snap),
                ..Default::default()
            },
            &EditorConfig::default(),
        );
        assert_eq!(names(&list.used_matches), vec!["Am"]);
        // Personal before main, Am not repeated, Ab excluded by root exactness
        assert_eq!(names(&list.library_matches), vec!["A7", "A"]);
    }

    #[test]
    fn test_without_catalogue() {
        let used = vec![ChordMarker::new("Ab"), ChordMarker::new("A")];
        let list = list_candidates("a f", &used, LookupContext::default(), &EditorConfig::default());
        assert_eq!(names(&list.used_matches), vec!["Ab"]);
        assert!(list.library_matches.is_empty());
    }

    #[test]
    fn test_library_cap() {
        let snap = snapshot();
        let config = EditorConfig {
            max_library_candidates: 1,
            ..Default::default()
        };
        let ctx = LookupContext {
            snapshot: Some(&snap),
            ..Default::default()
        };
        let list = list_candidates("", Vec::<&ChordMarker>::new(), ctx, &config);
        assert_eq!(list.library_matches.len(), 1);
    }

    #[test]
    fn test_fret_pattern_search() {
        let snap = snapshot();
        let used = vec![ChordMarker::new("C")];
        let ctx = LookupContext {
            snapshot: Some(&snap),
            ..Default::default()
        };
        let list = list_candidates("x32010", &used, ctx, &EditorConfig::default());
        assert_eq!(names(&list.used_matches), vec!["C"]);
        assert!(list.library_matches.is_empty());

        let list = list_candidates("x,0,2,2", Vec::<&ChordMarker>::new(), ctx, &EditorConfig::default());
        assert_eq!(names(&list.library_matches), vec!["A", "Am"]);
    }

    #[test]
    fn test_menu_order() {
        let list = CandidateList {
            used_matches: vec![CandidateEntry::from_marker(&ChordMarker::new("Hm"))],
            library_matches: vec![],
        };
        let menu = list.menu("he");
        assert_eq!(menu.len(), 3);
        assert!(matches!(menu[0], Candidate::Chord { .. }));
        assert_eq!(menu[1], Candidate::Block { kind: BlockKind::Heading });
        assert_eq!(menu[2], Candidate::CreateCustom { name: "he".to_string() });
    }

    #[test]
    fn test_menu_skips_custom_entry_for_listed_name() {
        let list = CandidateList {
            used_matches: vec![CandidateEntry::from_marker(&ChordMarker::new("Ab"))],
            library_matches: vec![CandidateEntry::from_marker(&ChordMarker::new("Abm"))],
        };
        let menu = list.menu("af");
        assert_eq!(menu.len(), 2);
        assert!(menu.iter().all(|c| matches!(c, Candidate::Chord { .. })));

        // A query that only prefixes listed names still offers a custom chord
        let menu = list.menu("ab7");
        assert_eq!(menu.last(), Some(&Candidate::CreateCustom { name: "Ab7".to_string() }));
    }

    #[test]
    fn test_block_commands() {
        assert_eq!(block_commands("in").collect::<Vec<_>>(), vec![BlockKind::Instruction]);
        assert_eq!(block_commands("HEAD").collect::<Vec<_>>(), vec![BlockKind::Heading]);
        assert_eq!(block_commands("h").count(), 0);
        assert_eq!(block_commands("hx").count(), 0);
    }

    #[test]
    fn test_custom_chord_name() {
        assert_eq!(custom_chord_name("am7"), Some("Am7".to_string()));
        assert_eq!(custom_chord_name("ab"), Some("Ab".to_string()));
        assert_eq!(custom_chord_name("x32010"), None);
        assert_eq!(custom_chord_name(""), None);
    }
}
