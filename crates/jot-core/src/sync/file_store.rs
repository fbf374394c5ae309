//! One-file-per-note JSON mirror of the record store

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::models::Note;

const NOTE_FILE_PREFIX: &str = "note_";
const NOTE_FILE_SUFFIX: &str = ".json";

/// On-disk shape of a mirrored note.
///
/// Every field is optional on read: absent text fields default to empty,
/// an absent date to the current time, an absent id to the unsaved
/// sentinel (the record store then assigns a fresh id on import).
#[derive(Debug, Serialize, Deserialize)]
struct NoteFile {
    #[serde(rename = "noteId", default)]
    note_id: i64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default = "crate::models::now_millis")]
    date: i64,
}

impl From<&Note> for NoteFile {
    fn from(note: &Note) -> Self {
        Self {
            note_id: note.id,
            title: note.title.clone(),
            description: note.description.clone(),
            date: note.last_modified,
        }
    }
}

impl From<NoteFile> for Note {
    fn from(file: NoteFile) -> Self {
        Self {
            id: file.note_id,
            title: file.title,
            description: file.description,
            last_modified: file.date,
        }
    }
}

/// File-per-note mirror store rooted at a notes directory.
///
/// The file name is a pure function of the note id (`note_<id>.json`), so
/// existence checks and overwrites are idempotent. Every operation converts
/// I/O faults into a boolean outcome; a single failing file never aborts a
/// batch and no fault escapes this boundary.
#[derive(Debug, Clone)]
pub struct FileMirrorStore {
    notes_dir: PathBuf,
}

impl FileMirrorStore {
    /// Create a store rooted at the given directory (created lazily on write)
    pub fn new(notes_dir: impl Into<PathBuf>) -> Self {
        Self {
            notes_dir: notes_dir.into(),
        }
    }

    /// Path of the mirror file for a note id
    #[must_use]
    pub fn note_path(&self, id: i64) -> PathBuf {
        self.notes_dir
            .join(format!("{NOTE_FILE_PREFIX}{id}{NOTE_FILE_SUFFIX}"))
    }

    /// Serialize a note to its mirror file, overwriting any previous version
    pub fn write(&self, note: &Note) -> bool {
        match self.try_write(note) {
            Ok(path) => {
                tracing::debug!("Note saved to file: {}", path.display());
                true
            }
            Err(error) => {
                tracing::error!("Error saving note {} to file: {error}", note.id);
                false
            }
        }
    }

    fn try_write(&self, note: &Note) -> std::io::Result<PathBuf> {
        fs::create_dir_all(&self.notes_dir)?;
        let path = self.note_path(note.id);
        let payload = serde_json::to_vec(&NoteFile::from(note))?;
        fs::write(&path, payload)?;
        Ok(path)
    }

    /// Read every mirrored note.
    ///
    /// A corrupt or unparsable file is skipped and logged, never fatal to
    /// the batch. Order is unspecified; callers look up by id.
    pub fn read_all(&self) -> Vec<Note> {
        let mut notes = Vec::new();

        let entries = match fs::read_dir(&self.notes_dir) {
            Ok(entries) => entries,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                tracing::debug!("Notes directory does not exist");
                return notes;
            }
            Err(error) => {
                tracing::error!("Error reading notes directory: {error}");
                return notes;
            }
        };

        for entry in entries {
            let Ok(entry) = entry else { continue };
            let path = entry.path();
            if !is_note_file(&path) {
                continue;
            }
            match read_note(&path) {
                Ok(note) => {
                    tracing::debug!("Read note from file: {}", path.display());
                    notes.push(note);
                }
                Err(error) => {
                    tracing::error!("Error reading note from file {}: {error}", path.display());
                }
            }
        }

        notes
    }

    /// Delete the mirror file for an id; a missing file is a successful no-op
    pub fn delete(&self, id: i64) -> bool {
        let path = self.note_path(id);
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!("Deleted note file: {}", path.display());
                true
            }
            Err(error) if error.kind() == ErrorKind::NotFound => true,
            Err(error) => {
                tracing::error!("Error deleting note file {}: {error}", path.display());
                false
            }
        }
    }

    /// Delete every mirror file.
    ///
    /// Attempts all deletions regardless of individual failures and reports
    /// overall success only if each one succeeded.
    pub fn delete_all(&self) -> bool {
        let entries = match fs::read_dir(&self.notes_dir) {
            Ok(entries) => entries,
            Err(error) if error.kind() == ErrorKind::NotFound => return true,
            Err(error) => {
                tracing::error!("Error listing note files: {error}");
                return false;
            }
        };

        let mut success = true;
        for entry in entries {
            let Ok(entry) = entry else {
                success = false;
                continue;
            };
            let path = entry.path();
            if !is_note_file(&path) {
                continue;
            }
            if let Err(error) = fs::remove_file(&path) {
                success = false;
                tracing::error!("Failed to delete file {}: {error}", path.display());
            }
        }

        success
    }
}

fn is_note_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(NOTE_FILE_PREFIX) && name.ends_with(NOTE_FILE_SUFFIX))
}

fn read_note(path: &Path) -> crate::error::Result<Note> {
    let raw = fs::read_to_string(path)?;
    let file: NoteFile = serde_json::from_str(&raw)?;
    Ok(file.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn note(id: i64, title: &str, date: i64) -> Note {
        Note {
            id,
            title: title.to_string(),
            description: String::new(),
            last_modified: date,
        }
    }

    #[test]
    fn test_write_creates_named_file_with_flat_json() {
        let tmp = tempdir().unwrap();
        let store = FileMirrorStore::new(tmp.path());

        assert!(store.write(&note(7, "A", 100)));

        let raw = fs::read_to_string(tmp.path().join("note_7.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["noteId"], 7);
        assert_eq!(value["title"], "A");
        assert_eq!(value["description"], "");
        assert_eq!(value["date"], 100);
    }

    #[test]
    fn test_write_overwrites_existing_file() {
        let tmp = tempdir().unwrap();
        let store = FileMirrorStore::new(tmp.path());

        store.write(&note(1, "first", 100));
        store.write(&note(1, "second", 200));

        let notes = store.read_all();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "second");
        assert_eq!(notes[0].last_modified, 200);
    }

    #[test]
    fn test_write_fails_without_directory() {
        let tmp = tempdir().unwrap();
        let blocker = tmp.path().join("not_a_dir");
        fs::write(&blocker, b"occupied").unwrap();

        let store = FileMirrorStore::new(&blocker);
        assert!(!store.write(&note(1, "a", 100)));
    }

    #[test]
    fn test_read_all_missing_directory_is_empty() {
        let store = FileMirrorStore::new("/nonexistent/jot-notes");
        assert!(store.read_all().is_empty());
    }

    #[test]
    fn test_read_all_skips_corrupt_and_foreign_files() {
        let tmp = tempdir().unwrap();
        let store = FileMirrorStore::new(tmp.path());

        store.write(&note(1, "good", 100));
        fs::write(tmp.path().join("note_2.json"), b"{ not json").unwrap();
        fs::write(tmp.path().join("readme.txt"), b"ignore me").unwrap();
        fs::write(tmp.path().join("draft.json"), b"{}").unwrap();

        let notes = store.read_all();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "good");
    }

    #[test]
    fn test_read_defaults_missing_fields() {
        let tmp = tempdir().unwrap();
        let store = FileMirrorStore::new(tmp.path());

        fs::write(tmp.path().join("note_5.json"), b"{\"noteId\": 5}").unwrap();

        let notes = store.read_all();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, 5);
        assert_eq!(notes[0].title, "");
        assert_eq!(notes[0].description, "");
        assert!(notes[0].last_modified > 0);
    }

    #[test]
    fn test_read_defaults_missing_id_to_unsaved() {
        let tmp = tempdir().unwrap();
        let store = FileMirrorStore::new(tmp.path());

        fs::write(
            tmp.path().join("note_export.json"),
            b"{\"title\": \"loose\", \"date\": 50}",
        )
        .unwrap();

        let notes = store.read_all();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, crate::models::UNSAVED_ID);
        assert_eq!(notes[0].title, "loose");
        assert_eq!(notes[0].last_modified, 50);
    }

    #[test]
    fn test_delete_missing_file_is_success() {
        let tmp = tempdir().unwrap();
        let store = FileMirrorStore::new(tmp.path());
        assert!(store.delete(99));
    }

    #[test]
    fn test_delete_removes_file() {
        let tmp = tempdir().unwrap();
        let store = FileMirrorStore::new(tmp.path());

        store.write(&note(3, "bye", 100));
        assert!(store.delete(3));
        assert!(!tmp.path().join("note_3.json").exists());
    }

    #[test]
    fn test_delete_all_leaves_foreign_files() {
        let tmp = tempdir().unwrap();
        let store = FileMirrorStore::new(tmp.path());

        store.write(&note(1, "a", 100));
        store.write(&note(2, "b", 100));
        fs::write(tmp.path().join("keep.txt"), b"keep").unwrap();

        assert!(store.delete_all());
        assert!(store.read_all().is_empty());
        assert!(tmp.path().join("keep.txt").exists());
    }

    #[test]
    fn test_delete_all_on_missing_directory_is_success() {
        let store = FileMirrorStore::new("/nonexistent/jot-notes");
        assert!(store.delete_all());
    }
}
