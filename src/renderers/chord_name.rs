//! Cosmetic chord-name formatting
//!
//! Display names may differ from stored names (respelled roots, accidental
//! glyphs) and may have a different char count. Nothing in the offset space
//! ever depends on them.

use serde::{Deserialize, Serialize};

use crate::models::pitch::{ChordName, NoteName, SpellingPreference};

/// How chord names are shown to the user
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct DisplayOptions {
    /// Show `♯`/`♭` instead of `#`/`b`
    pub unicode_accidentals: bool,

    /// Enharmonic respelling of roots and slash basses
    pub preference: SpellingPreference,
}

/// Display form of a stored chord name. Names without a recognizable root are returned as-is.
pub fn display_name(name: &str, options: &DisplayOptions) -> String {
    let Some(chord) = ChordName::parse(name) else {
        return name.to_string();
    };

    let spell = |note: &NoteName| {
        let note = note.respell(options.preference);
        if options.unicode_accidentals {
            note.to_glyphs()
        } else {
            note.to_ascii()
        }
    };
    chord.render(spell)
}
