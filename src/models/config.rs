//! Editor configuration
//!
//! Every field has a default, so hosts only send what they override.

use serde::{Deserialize, Serialize};

use crate::models::errors::{EditorError, EditorResult};
use crate::renderers::chord_name::DisplayOptions;

pub const DEFAULT_TRIGGER_KEY: char = '/';
pub const DEFAULT_MAX_LIBRARY_CANDIDATES: usize = 40;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Key that opens chord autocomplete
    pub trigger_key: char,

    /// Instrument used for catalogue lookups
    pub instrument: String,

    /// String names, lowest first; the count drives fret-pattern search
    pub tuning: Vec<String>,

    /// Chord name display
    pub display: DisplayOptions,

    /// Cap on library candidates per query
    pub max_library_candidates: usize,

    /// Don't fall back to position 1 when a requested voicing is missing
    pub suppress_position_fallback: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            trigger_key: DEFAULT_TRIGGER_KEY,
            instrument: "guitar".to_string(),
            tuning: ["E", "A", "D", "G", "B", "E"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            display: DisplayOptions::default(),
            max_library_candidates: DEFAULT_MAX_LIBRARY_CANDIDATES,
            suppress_position_fallback: false,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> EditorResult<Self> {
        serde_json::from_str(json).map_err(EditorError::InvalidConfig)
    }

    /// Number of strings on the configured instrument
    pub fn string_count(&self) -> usize {
        self.tuning.len()
    }

    /// Tuning as catalogue entries spell it (`"EADGBE"`)
    pub fn tuning_key(&self) -> String {
        self.tuning.concat()
    }
}
