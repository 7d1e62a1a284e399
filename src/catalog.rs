//! Chord catalogue lookup
//!
//! The catalogue itself (static seed data, personal and main libraries) lives
//! outside the editor and arrives as a read-only snapshot. This module resolves
//! a chord reference against that snapshot plus song-local overrides.
//!
//! Lookup precedence:
//! 1. exact id match (when the marker carries an id)
//! 2. song-local embedded override at the exact position
//! 3. personal library entry at the exact position
//! 4. main library entry at the exact position
//! 5. position 1 of the same name, unless fallback is suppressed

use serde::{Deserialize, Serialize};

use crate::models::errors::{EditorError, EditorResult};
use crate::models::marker::DEFAULT_POSITION;

/// Fret diagram data. `None` marks a muted string.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChordDiagram {
    pub frets: Vec<Option<u8>>,
    #[serde(default = "default_base_fret")]
    pub base_fret: u8,
}

fn default_base_fret() -> u8 {
    1
}

/// Which library an entry belongs to; personal sorts first
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
#[serde(rename_all = "lowercase")]
pub enum LibrarySource {
    Personal,
    #[default]
    Main,
}

/// One voicing of a named chord for an instrument/tuning
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub instrument: String,
    pub tuning: String,
    #[serde(default = "default_position")]
    pub position: u32,
    #[serde(default)]
    pub source: LibrarySource,
    pub diagram: ChordDiagram,
}

fn default_position() -> u32 {
    DEFAULT_POSITION
}

/// A chord defined inside the song itself (custom chords)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedChord {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default = "default_position")]
    pub position: u32,
    pub diagram: ChordDiagram,
}

/// Read-only catalogue snapshot delivered by the host
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct CatalogSnapshot {
    pub entries: Vec<CatalogEntry>,
}

impl CatalogSnapshot {
    pub fn from_json(json: &str) -> EditorResult<Self> {
        serde_json::from_str(json).map_err(EditorError::InvalidCatalog)
    }

    /// Entries for one instrument and tuning
    pub fn for_instrument<'a>(
        &'a self,
        instrument: &'a str,
        tuning: &'a str,
    ) -> impl Iterator<Item = &'a CatalogEntry> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.instrument == instrument && e.tuning == tuning)
    }
}

/// A chord reference to resolve
#[derive(Debug, Clone, Copy)]
pub struct ChordQuery<'a> {
    pub name: &'a str,
    pub instrument: &'a str,
    pub tuning: &'a str,
    pub position: u32,
    pub id: Option<&'a str>,
}

/// Data sources and flags for a lookup
#[derive(Debug, Clone, Copy, Default)]
pub struct LookupContext<'a> {
    pub snapshot: Option<&'a CatalogSnapshot>,
    pub embedded: &'a [EmbeddedChord],
    pub suppress_fallback: bool,
}

/// Resolve a chord reference to diagram data. `None` means "no diagram available".
pub fn find_chord(query: ChordQuery<'_>, ctx: LookupContext<'_>) -> Option<ChordDiagram> {
    if let Some(id) = query.id {
        if let Some(found) = ctx.embedded.iter().find(|c| c.id.as_deref() == Some(id)) {
            return Some(found.diagram.clone());
        }
        if let Some(found) = ctx
            .snapshot
            .and_then(|s| s.entries.iter().find(|e| e.id.as_deref() == Some(id)))
        {
            return Some(found.diagram.clone());
        }
    }

    if let Some(found) = ctx
        .embedded
        .iter()
        .find(|c| c.name == query.name && c.position == query.position)
    {
        return Some(found.diagram.clone());
    }

    if let Some(snapshot) = ctx.snapshot {
        for source in [LibrarySource::Personal, LibrarySource::Main] {
            let found = snapshot
                .for_instrument(query.instrument, query.tuning)
                .find(|e| e.source == source && e.name == query.name && e.position == query.position);
            if let Some(found) = found {
                return Some(found.diagram.clone());
            }
        }
    }

    if query.position != DEFAULT_POSITION && !ctx.suppress_fallback {
        log::debug!(
            "No '{}' at position {}, falling back to position {}",
            query.name,
            query.position,
            DEFAULT_POSITION
        );
        return find_chord(
            ChordQuery {
                position: DEFAULT_POSITION,
                id: None,
                ..query
            },
            ctx,
        );
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagram(frets: &[i8]) -> ChordDiagram {
        ChordDiagram {
            frets: frets
                .iter()
                .map(|&f| if f < 0 { None } else { Some(f as u8) })
                .collect(),
            base_fret: 1,
        }
    }

    fn entry(name: &str, position: u32, source: LibrarySource, frets: &[i8]) -> CatalogEntry {
        CatalogEntry {
            id: None,
            name: name.to_string(),
            instrument: "guitar".to_string(),
            tuning: "EADGBE".to_string(),
            position,
            source,
            diagram: diagram(frets),
        }
    }

    fn query<'a>(name: &'a str, position: u32, id: Option<&'a str>) -> ChordQuery<'a> {
        ChordQuery {
            name,
            instrument: "guitar",
            tuning: "EADGBE",
            position,
            id,
        }
    }

    fn snapshot() -> CatalogSnapshot {
        let mut personal_c = entry("C", 1, LibrarySource::Personal, &[-1, 3, 2, 0, 1, 3]);
        personal_c.id = Some("p1".to_string());
        CatalogSnapshot {
            entries: vec![
                entry("C", 1, LibrarySource::Main, &[-1, 3, 2, 0, 1, 0]),
                personal_c,
                entry("C", 2, LibrarySource::Main, &[-1, 3, 5, 5, 5, 3]),
                entry("G", 1, LibrarySource::Main, &[3, 2, 0, 0, 0, 3]),
            ],
        }
    }

    #[test]
    fn test_personal_beats_main() {
        let snap = snapshot();
        let ctx = LookupContext {
            snapshot: Some(&snap),
            ..Default::default()
        };
        let found = find_chord(query("C", 1, None), ctx).unwrap();
        assert_eq!(found.frets[5], Some(3));
    }

    #[test]
    fn test_id_match_first() {
        let snap = snapshot();
        let ctx = LookupContext {
            snapshot: Some(&snap),
            ..Default::default()
        };
        let found = find_chord(query("C", 2, Some("p1")), ctx).unwrap();
        assert_eq!(found, diagram(&[-1, 3, 2, 0, 1, 3]));
    }

    #[test]
    fn test_embedded_override() {
        let snap = snapshot();
        let embedded = vec![EmbeddedChord {
            id: None,
            name: "G".to_string(),
            position: 1,
            diagram: diagram(&[3, 2, 0, 0, 3, 3]),
        }];
        let ctx = LookupContext {
            snapshot: Some(&snap),
            embedded: &embedded,
            suppress_fallback: false,
        };
        assert_eq!(find_chord(query("G", 1, None), ctx), Some(diagram(&[3, 2, 0, 0, 3, 3])));
    }

    #[test]
    fn test_position_fallback() {
        let snap = snapshot();
        let ctx = LookupContext {
            snapshot: Some(&snap),
            ..Default::default()
        };
        assert_eq!(find_chord(query("G", 4, None), ctx), Some(diagram(&[3, 2, 0, 0, 0, 3])));

        let strict = LookupContext {
            suppress_fallback: true,
            ..ctx
        };
        assert_eq!(find_chord(query("G", 4, None), strict), None);
    }

    #[test]
    fn test_missing_snapshot_is_not_an_error() {
        assert_eq!(find_chord(query("C", 1, None), LookupContext::default()), None);
    }

    #[test]
    fn test_snapshot_from_json() {
        let json = r#"{"entries":[{"name":"Am","instrument":"guitar","tuning":"EADGBE",
            "diagram":{"frets":[null,0,2,2,1,0]}}]}"#;
        let snap = CatalogSnapshot::from_json(json).unwrap();
        assert_eq!(snap.entries[0].position, 1);
        assert_eq!(snap.entries[0].source, LibrarySource::Main);
        assert_eq!(snap.entries[0].diagram.base_fret, 1);
        assert!(CatalogSnapshot::from_json("{").is_err());
    }
}
