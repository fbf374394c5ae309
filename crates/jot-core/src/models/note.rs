//! Note model

use serde::{Deserialize, Serialize};

/// Sentinel id carried by a note that has not been persisted yet.
///
/// The record store assigns the real id on first insert.
pub const UNSAVED_ID: i64 = 0;

/// A note in the system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier, assigned by the record store (`UNSAVED_ID` until then)
    pub id: i64,
    /// Note title, may be empty
    pub title: String,
    /// Note body, may be empty
    pub description: String,
    /// Last modification timestamp (Unix ms); the sole conflict-resolution input
    pub last_modified: i64,
}

impl Note {
    /// Create a new, not-yet-persisted note stamped with the current time
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: UNSAVED_ID,
            title: title.into(),
            description: description.into(),
            last_modified: now_millis(),
        }
    }

    /// Whether the record store has assigned this note an id
    #[must_use]
    pub const fn is_persisted(&self) -> bool {
        self.id != UNSAVED_ID
    }

    /// Advance the modification timestamp.
    ///
    /// Always strictly greater than the previous value, even within the
    /// same millisecond.
    pub fn touch(&mut self) {
        self.last_modified = now_millis().max(self.last_modified + 1);
    }
}

/// Current Unix timestamp in milliseconds.
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_note_is_unsaved() {
        let note = Note::new("Groceries", "milk, eggs");
        assert_eq!(note.id, UNSAVED_ID);
        assert!(!note.is_persisted());
        assert_eq!(note.title, "Groceries");
        assert_eq!(note.description, "milk, eggs");
        assert!(note.last_modified > 0);
    }

    #[test]
    fn test_persisted_after_id_assignment() {
        let mut note = Note::new("", "");
        note.id = 7;
        assert!(note.is_persisted());
    }

    #[test]
    fn test_touch_strictly_advances() {
        let mut note = Note::new("a", "b");
        let before = note.last_modified;
        note.touch();
        assert!(note.last_modified > before);

        // Even when called back-to-back within one millisecond
        let again = note.last_modified;
        note.touch();
        assert!(note.last_modified > again);
    }

    #[test]
    fn test_empty_fields_allowed() {
        let note = Note::new("", "");
        assert!(note.title.is_empty());
        assert!(note.description.is_empty());
    }
}
