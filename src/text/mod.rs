//! Text editing core
//!
//! Everything that keeps the flat annotated string and the structural
//! document in one consistent offset space.
//!
//! ## Modules
//!
//! - `offsets`: offset <-> locator translation, built on a single node traversal
//! - `cursor`: line/column positions and offset ranges
//! - `edit`: chord/block insertion, atomic deletion, deferred edits
//! - `normalize`: folding raw host input back into canonical nodes

pub mod offsets;
pub mod cursor;
pub mod edit;
pub mod normalize;

// Re-exports for convenience
pub use offsets::{Locator, NodeSpan};
pub use cursor::TextPos;
pub use edit::{
    delete_atomic_at, insert_block, insert_chord, set_block_text, BlockCaret, DeleteDirection,
    EditOutcome, PendingEdit, PendingInsert,
};
pub use normalize::{normalize_input, RawNode};
