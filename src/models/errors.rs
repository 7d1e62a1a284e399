//! Error types for the chord sheet editor
//!
//! Parsing, rendering and offset translation never fail; they clamp, snap or
//! fall back instead. The errors here cover the remaining surfaces: host input
//! that cannot be deserialized and structural edits addressed to the wrong node.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    /// Configuration JSON did not deserialize
    #[error("Invalid editor config: {0}")]
    InvalidConfig(#[source] serde_json::Error),

    /// Catalogue snapshot JSON did not deserialize
    #[error("Invalid chord catalogue: {0}")]
    InvalidCatalog(#[source] serde_json::Error),

    /// Node index outside the document
    #[error("Node index {index} out of bounds (document has {len} nodes)")]
    NodeOutOfRange { index: usize, len: usize },

    /// A block-text edit addressed a node that is not a block widget
    #[error("Node {0} is not a heading or instruction block")]
    NotABlock(usize),

    /// API call made before `createEditor`
    #[error("No editor instance; call createEditor first")]
    NoEditor,
}

pub type EditorResult<T> = Result<T, EditorError>;
