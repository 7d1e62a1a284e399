//! Chord autocomplete
//!
//! - `query`: shorthand normalization, root/accidental matching, fret patterns
//! - `candidates`: used-in-song and catalogue matches, the selection menu
//! - `session`: the trigger/query/commit state machine

pub mod query;
pub mod candidates;
pub mod session;

pub use query::{matches_query, normalize_query, FretPattern};
pub use candidates::{list_candidates, Candidate, CandidateEntry, CandidateList};
pub use session::{AutocompleteController, AutocompleteSession, Commit, Key, KeyEvent, KeyOutcome};
