//! Semitone transposition of chord names and whole songs
//!
//! Only the root and the slash bass move; the quality text is carried over
//! untouched. Names without a recognizable root (e.g. `N.C.`) are left alone.
//!
//! Spelling: `Flats`/`Sharps` force the accidental family. `AsWritten` keeps
//! the family of the original root (`Eb` + 3 is `Gb`, `A` + 1 is `A#`).

use crate::models::document::{DocumentNode, StructuralDocument};
use crate::models::pitch::{Accidental, ChordName, NoteName, SpellingPreference};
use crate::renderers::chord_name::DisplayOptions;

/// Transpose a stored chord name by `semitones` (may be negative)
pub fn transpose_name(name: &str, semitones: i32, preference: SpellingPreference) -> String {
    let Some(chord) = ChordName::parse(name) else {
        log::debug!("'{}' has no root, not transposed", name);
        return name.to_string();
    };

    let prefer_flats = match preference {
        SpellingPreference::Flats => true,
        SpellingPreference::Sharps => false,
        SpellingPreference::AsWritten => chord.root.accidental == Accidental::Flat,
    };

    chord.render(|note| shift(note, semitones, prefer_flats).to_ascii())
}

fn shift(note: &NoteName, semitones: i32, prefer_flats: bool) -> NoteName {
    let pitch_class = (note.pitch_class() as i32 + semitones).rem_euclid(12) as u8;
    NoteName::from_pitch_class(pitch_class, prefer_flats)
}

/// Transpose every chord widget in a document.
///
/// Catalogue ids are dropped since they referenced the old chord; voicing
/// positions are kept. Display names are recomputed. Returns the number of
/// widgets rewritten.
pub fn transpose_document(
    doc: &mut StructuralDocument,
    semitones: i32,
    preference: SpellingPreference,
    options: &DisplayOptions,
) -> usize {
    if semitones.rem_euclid(12) == 0 && preference == SpellingPreference::AsWritten {
        return 0;
    }

    let mut rewritten = 0;
    for node in &mut doc.nodes {
        if let DocumentNode::ChordWidget { marker, .. } = node {
            let name = transpose_name(&marker.name, semitones, preference);
            if name != marker.name || marker.id.is_some() {
                marker.name = name;
                marker.id = None;
                rewritten += 1;
            }
        }
    }
    doc.refresh_display_names(options);
    log::info!("🎵 Transposed {} chords by {} semitones", rewritten, semitones);
    rewritten
}
