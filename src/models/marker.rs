//! Marker types and canonical serialization
//!
//! A marker is a bracket/brace annotation embedded in lyric text. Chord markers
//! sit inline (`[Am]`, `[G:3]`, `[D::abc]`, `[E:2:abc]`), block markers occupy a
//! whole line (`{heading:Verse 1}`, `{instruction:Repeat x2}`).
//!
//! Serialization is canonical: parsing the output of `serialize` yields the
//! same marker back. Parsing lives in `crate::parse::marker`.

use serde::{Deserialize, Serialize};

/// Default voicing position of a chord
pub const DEFAULT_POSITION: u32 = 1;

/// A chord annotation: which chord, which voicing, optionally which catalogue entry
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChordMarker {
    /// Chord name as stored (e.g. "Am7", "F#/C#")
    pub name: String,

    /// Voicing index, 1 = default fingering
    #[serde(default = "default_position")]
    pub position: u32,

    /// Opaque catalogue id (personal or custom chord)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

fn default_position() -> u32 {
    DEFAULT_POSITION
}

impl ChordMarker {
    /// Create a marker for the default voicing of a chord
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: DEFAULT_POSITION,
            id: None,
        }
    }

    /// Create a marker for a specific voicing
    pub fn with_position(name: impl Into<String>, position: u32) -> Self {
        Self {
            name: name.into(),
            position: position.max(DEFAULT_POSITION),
            id: None,
        }
    }

    /// Attach a catalogue id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Canonical serialized form, brackets included
    pub fn serialize(&self) -> String {
        match (&self.id, self.position) {
            (None, p) if p <= DEFAULT_POSITION => format!("[{}]", self.name),
            (None, p) => format!("[{}:{}]", self.name, p),
            (Some(id), p) if p <= DEFAULT_POSITION => format!("[{}::{}]", self.name, id),
            (Some(id), p) => format!("[{}:{}:{}]", self.name, p, id),
        }
    }

    /// Width of the canonical form in the flat offset space
    pub fn width(&self) -> usize {
        self.serialize().chars().count()
    }
}

/// The two kinds of whole-line block markers
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Heading,
    Instruction,
}

impl BlockKind {
    /// Keyword used inside the braces
    pub fn keyword(&self) -> &'static str {
        match self {
            BlockKind::Heading => "heading",
            BlockKind::Instruction => "instruction",
        }
    }

    /// Parse the keyword used inside the braces
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "heading" => Some(BlockKind::Heading),
            "instruction" => Some(BlockKind::Instruction),
            _ => None,
        }
    }

    /// Number of chars between the opening brace and the block text (`{heading:`)
    pub fn prefix_width(&self) -> usize {
        self.keyword().len() + 2
    }
}

/// A heading or instruction line
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct BlockMarker {
    pub kind: BlockKind,

    /// Literal block text, may be empty
    pub text: String,
}

impl BlockMarker {
    pub fn new(kind: BlockKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Canonical serialized form, braces included
    pub fn serialize(&self) -> String {
        format!("{{{}:{}}}", self.kind.keyword(), self.text)
    }

    pub fn width(&self) -> usize {
        self.serialize().chars().count()
    }
}
