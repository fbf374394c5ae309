//! Note repository implementation

use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::watch;

use crate::error::{Error, Result};
use crate::models::Note;

use super::connection::Database;
use super::feed::NoteFeed;

/// Trait for note storage operations (the record-store contract)
pub trait NoteRepository: Send + Sync {
    /// Insert a note.
    ///
    /// An unsaved note (id 0) gets its id assigned here; a nonzero id is
    /// preserved as-is, and a colliding id is silently ignored. Returns the
    /// note as stored.
    fn insert(&self, note: &Note) -> Result<Note>;

    /// Update a note's title, description, and timestamp by id
    fn update(&self, note: &Note) -> Result<()>;

    /// Get a note by id
    fn get(&self, id: i64) -> Result<Option<Note>>;

    /// All notes, newest first (bulk synchronous read)
    fn all_notes(&self) -> Result<Vec<Note>>;

    /// Delete a note by id; deleting a missing note is a no-op
    fn delete(&self, id: i64) -> Result<()>;

    /// Delete every note
    fn delete_all(&self) -> Result<()>;

    /// Subscribe to live full-snapshot updates (presentation layer only)
    fn subscribe(&self) -> watch::Receiver<Vec<Note>>;
}

/// `SQLite` implementation of `NoteRepository`
pub struct SqliteNoteRepository {
    db: Database,
    feed: NoteFeed,
}

impl SqliteNoteRepository {
    /// Create a repository over the given database handle
    pub fn new(db: Database) -> Result<Self> {
        let initial = db.with_conn(query_all)?;
        Ok(Self {
            db,
            feed: NoteFeed::new(initial),
        })
    }

    /// Refresh the live snapshot after a mutation.
    ///
    /// A feed refresh failure must never fail the mutation that caused it.
    fn refresh_feed(&self) {
        match self.db.with_conn(query_all) {
            Ok(notes) => self.feed.publish(notes),
            Err(error) => tracing::warn!("Failed to refresh note feed: {error}"),
        }
    }
}

impl NoteRepository for SqliteNoteRepository {
    fn insert(&self, note: &Note) -> Result<Note> {
        let stored = self.db.with_conn(|conn| {
            let mut stored = note.clone();
            if note.is_persisted() {
                conn.execute(
                    "INSERT OR IGNORE INTO notes (id, title, description, last_modified)
                     VALUES (?, ?, ?, ?)",
                    params![note.id, note.title, note.description, note.last_modified],
                )?;
            } else {
                conn.execute(
                    "INSERT INTO notes (title, description, last_modified) VALUES (?, ?, ?)",
                    params![note.title, note.description, note.last_modified],
                )?;
                stored.id = conn.last_insert_rowid();
            }
            Ok(stored)
        })?;

        self.refresh_feed();
        Ok(stored)
    }

    fn update(&self, note: &Note) -> Result<()> {
        let rows = self.db.with_conn(|conn| {
            Ok(conn.execute(
                "UPDATE notes SET title = ?, description = ?, last_modified = ? WHERE id = ?",
                params![note.title, note.description, note.last_modified, note.id],
            )?)
        })?;

        if rows == 0 {
            return Err(Error::NotFound(note.id));
        }

        self.refresh_feed();
        Ok(())
    }

    fn get(&self, id: i64) -> Result<Option<Note>> {
        self.db.with_conn(|conn| {
            Ok(conn
                .query_row(
                    "SELECT id, title, description, last_modified FROM notes WHERE id = ?",
                    params![id],
                    parse_note,
                )
                .optional()?)
        })
    }

    fn all_notes(&self) -> Result<Vec<Note>> {
        self.db.with_conn(query_all)
    }

    fn delete(&self, id: i64) -> Result<()> {
        self.db.with_conn(|conn| {
            conn.execute("DELETE FROM notes WHERE id = ?", params![id])?;
            Ok(())
        })?;

        self.refresh_feed();
        Ok(())
    }

    fn delete_all(&self) -> Result<()> {
        self.db.with_conn(|conn| {
            conn.execute("DELETE FROM notes", [])?;
            Ok(())
        })?;

        self.refresh_feed();
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Vec<Note>> {
        self.feed.subscribe()
    }
}

/// Parse a note from a database row
fn parse_note(row: &rusqlite::Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        last_modified: row.get(3)?,
    })
}

fn query_all(conn: &Connection) -> Result<Vec<Note>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, description, last_modified FROM notes ORDER BY last_modified DESC",
    )?;

    let notes = stmt
        .query_map([], parse_note)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(notes)
}
