//! Chord autocomplete state machine
//!
//! `Closed → Open(query="") → Open(query=…) → {Committed, Cancelled} → Closed`
//!
//! The caret offset is captured the moment the trigger key arrives, before
//! anything else changes, and every commit inserts at that captured offset.

use serde::{Deserialize, Serialize};

use crate::autocomplete::candidates::Candidate;
use crate::text::edit::PendingEdit;

/// A key press as the host reports it (`KeyboardEvent.key` plus modifiers)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyEvent {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    fn has_modifier(&self) -> bool {
        self.ctrl || self.meta || self.alt
    }
}

/// Keys the session distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Space,
    Backspace,
    ArrowUp,
    ArrowDown,
    Escape,
    Enter,
    Tab,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Self {
        match key {
            " " | "Spacebar" => Key::Space,
            "Backspace" => Key::Backspace,
            "ArrowUp" | "Up" => Key::ArrowUp,
            "ArrowDown" | "Down" => Key::ArrowDown,
            "Escape" | "Esc" => Key::Escape,
            "Enter" => Key::Enter,
            "Tab" => Key::Tab,
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => Key::Other,
                }
            }
        }
    }
}

/// An open autocomplete session
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AutocompleteSession {
    pub is_open: bool,
    pub captured_insert_offset: usize,
    pub query: String,
    pub selected_index: usize,
}

impl AutocompleteSession {
    fn open(offset: usize) -> Self {
        Self {
            is_open: true,
            captured_insert_offset: offset,
            query: String::new(),
            selected_index: 0,
        }
    }
}

/// What a committed candidate asks the editor to do
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Commit {
    /// Insert a chord or block at the captured offset
    Insert { edit: PendingEdit },
    /// Define a new song-local chord, then insert it at the captured offset
    CreateCustom { name: String, offset: usize },
}

/// Result of feeding one key to the controller
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum KeyOutcome {
    /// Not for the session; the host handles the key normally
    Ignored,
    /// Swallowed by the session (query edit, selection move)
    Consumed,
    Opened { offset: usize },
    Committed { commit: Commit },
    Cancelled,
}

/// Owns the (at most one) autocomplete session
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AutocompleteController {
    trigger_key: char,
    session: Option<AutocompleteSession>,
}

impl AutocompleteController {
    pub fn new(trigger_key: char) -> Self {
        Self {
            trigger_key,
            session: None,
        }
    }

    pub fn session(&self) -> Option<&AutocompleteSession> {
        self.session.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn query(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.query.as_str())
    }

    /// Click-outside and similar: discard the session
    pub fn cancel(&mut self) {
        if self.session.take().is_some() {
            log::debug!("Autocomplete cancelled");
        }
    }

    /// Feed one key.
    ///
    /// `caret` is the live caret offset; it is only read when the trigger
    /// opens a session. `menu` produces the candidate menu for a query and is
    /// consulted for selection clamping and commits.
    pub fn handle_key<F>(&mut self, event: &KeyEvent, caret: usize, menu: F) -> KeyOutcome
    where
        F: Fn(&str) -> Vec<Candidate>,
    {
        let key = Key::from_dom(&event.key);

        if self.session.is_none() {
            if key == Key::Char(self.trigger_key) && !event.has_modifier() {
                // Capture before anything else can move the caret
                self.session = Some(AutocompleteSession::open(caret));
                log::debug!("Autocomplete opened at offset {}", caret);
                return KeyOutcome::Opened { offset: caret };
            }
            return KeyOutcome::Ignored;
        }
        let Some(session) = self.session.as_mut() else {
            return KeyOutcome::Ignored;
        };

        match key {
            Key::Char(c) if is_query_char(c) => {
                session.query.push(c);
                session.selected_index = 0;
                KeyOutcome::Consumed
            }
            Key::Backspace => {
                if session.query.pop().is_none() {
                    self.cancel();
                    return KeyOutcome::Cancelled;
                }
                session.selected_index = 0;
                KeyOutcome::Consumed
            }
            Key::ArrowUp => {
                session.selected_index = session.selected_index.saturating_sub(1);
                KeyOutcome::Consumed
            }
            Key::ArrowDown => {
                let count = menu(&session.query).len();
                session.selected_index = (session.selected_index + 1).min(count.saturating_sub(1));
                KeyOutcome::Consumed
            }
            Key::Escape => {
                self.cancel();
                KeyOutcome::Cancelled
            }
            Key::Enter | Key::Space | Key::Tab => {
                let candidates = menu(&session.query);
                let offset = session.captured_insert_offset;
                let index = session.selected_index.min(candidates.len().saturating_sub(1));
                let Some(candidate) = candidates.into_iter().nth(index) else {
                    log::debug!("Nothing to commit for query '{}'", session.query);
                    self.cancel();
                    return KeyOutcome::Cancelled;
                };
                self.session = None;
                KeyOutcome::Committed {
                    commit: commit_for(candidate, offset),
                }
            }
            Key::Char(_) | Key::Other => KeyOutcome::Consumed,
        }
    }
}

fn is_query_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '#' || c == ','
}

fn commit_for(candidate: Candidate, offset: usize) -> Commit {
    match candidate {
        Candidate::Chord { entry } => Commit::Insert {
            edit: PendingEdit::chord(offset, entry.to_marker()),
        },
        Candidate::Block { kind } => Commit::Insert {
            edit: PendingEdit::block(offset, kind),
        },
        Candidate::CreateCustom { name } => Commit::CreateCustom { name, offset },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autocomplete::candidates::CandidateEntry;
    use crate::models::marker::{BlockKind, ChordMarker};

    fn menu(query: &str) -> Vec<Candidate> {
        ["Am", "A7", "C"]
            .iter()
            .filter(|name| query.is_empty() || name.starts_with(query))
            .map(|name| Candidate::Chord {
                entry: CandidateEntry::from_marker(&ChordMarker::new(*name)),
            })
            .collect()
    }

    fn press(ctl: &mut AutocompleteController, key: &str, caret: usize) -> KeyOutcome {
        ctl.handle_key(&KeyEvent::new(key), caret, menu)
    }

    #[test]
    fn test_trigger_captures_caret() {
        let mut ctl = AutocompleteController::new('/');
        assert_eq!(press(&mut ctl, "/", 7), KeyOutcome::Opened { offset: 7 });
        // Later caret values are ignored
        press(&mut ctl, "A", 99);
        let outcome = press(&mut ctl, "Enter", 42);
        assert_eq!(
            outcome,
            KeyOutcome::Committed {
                commit: Commit::Insert {
                    edit: PendingEdit::chord(7, ChordMarker::new("Am"))
                }
            }
        );
        assert!(!ctl.is_open());
    }

    #[test]
    fn test_modified_trigger_ignored() {
        let mut ctl = AutocompleteController::new('/');
        let event = KeyEvent {
            key: "/".to_string(),
            ctrl: true,
            ..Default::default()
        };
        assert_eq!(ctl.handle_key(&event, 0, menu), KeyOutcome::Ignored);
        assert_eq!(press(&mut ctl, "a", 0), KeyOutcome::Ignored);
    }

    #[test]
    fn test_query_editing() {
        let mut ctl = AutocompleteController::new('/');
        press(&mut ctl, "/", 0);
        assert_eq!(press(&mut ctl, "A", 0), KeyOutcome::Consumed);
        assert_eq!(press(&mut ctl, "#", 0), KeyOutcome::Consumed);
        assert_eq!(ctl.query(), Some("A#"));
        // Not a query char: swallowed, query unchanged
        assert_eq!(press(&mut ctl, ".", 0), KeyOutcome::Consumed);
        assert_eq!(ctl.query(), Some("A#"));
        press(&mut ctl, "Backspace", 0);
        press(&mut ctl, "Backspace", 0);
        assert_eq!(ctl.query(), Some(""));
        assert_eq!(press(&mut ctl, "Backspace", 0), KeyOutcome::Cancelled);
        assert!(!ctl.is_open());
    }

    #[test]
    fn test_selection_clamped() {
        let mut ctl = AutocompleteController::new('/');
        press(&mut ctl, "/", 3);
        press(&mut ctl, "A", 3);
        for _ in 0..5 {
            press(&mut ctl, "ArrowDown", 3);
        }
        assert_eq!(ctl.session().unwrap().selected_index, 1);
        press(&mut ctl, "ArrowUp", 3);
        press(&mut ctl, "ArrowUp", 3);
        assert_eq!(ctl.session().unwrap().selected_index, 0);
        press(&mut ctl, "ArrowDown", 3);
        let outcome = press(&mut ctl, " ", 3);
        assert_eq!(
            outcome,
            KeyOutcome::Committed {
                commit: Commit::Insert {
                    edit: PendingEdit::chord(3, ChordMarker::new("A7"))
                }
            }
        );
    }

    #[test]
    fn test_escape_cancels() {
        let mut ctl = AutocompleteController::new('/');
        press(&mut ctl, "/", 0);
        press(&mut ctl, "C", 0);
        assert_eq!(press(&mut ctl, "Escape", 0), KeyOutcome::Cancelled);
        assert!(ctl.session().is_none());
    }

    #[test]
    fn test_empty_menu_cancels_on_commit() {
        let mut ctl = AutocompleteController::new('/');
        press(&mut ctl, "/", 0);
        press(&mut ctl, "Z", 0);
        assert_eq!(press(&mut ctl, "Tab", 0), KeyOutcome::Cancelled);
    }

    #[test]
    fn test_block_and_custom_commits() {
        assert_eq!(
            commit_for(Candidate::Block { kind: BlockKind::Heading }, 5),
            Commit::Insert {
                edit: PendingEdit::block(5, BlockKind::Heading)
            }
        );
        assert_eq!(
            commit_for(Candidate::CreateCustom { name: "Cadd9".to_string() }, 5),
            Commit::CreateCustom {
                name: "Cadd9".to_string(),
                offset: 5
            }
        );
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(Key::from_dom(" "), Key::Space);
        assert_eq!(Key::from_dom("a"), Key::Char('a'));
        assert_eq!(Key::from_dom("Shift"), Key::Other);
    }
}
