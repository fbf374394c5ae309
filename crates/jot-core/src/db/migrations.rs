//! Database migrations

use rusqlite::Connection;

use crate::error::Result;

/// Current schema version
const CURRENT_VERSION: i32 = 1;

/// Run all pending migrations
pub(crate) fn run(conn: &Connection) -> Result<()> {
    let version = get_version(conn)?;

    if version < 1 {
        migrate_v1(conn)?;
    }

    Ok(())
}

/// Get the current schema version
pub(crate) fn get_version(conn: &Connection) -> Result<i32> {
    let exists = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get::<_, i32>(0),
    )? != 0;

    if !exists {
        return Ok(0);
    }

    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;

    Ok(version)
}

/// Migration to version 1: Initial schema
fn migrate_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "BEGIN;
         CREATE TABLE IF NOT EXISTS schema_version (
             version INTEGER PRIMARY KEY
         );
         CREATE TABLE IF NOT EXISTS notes (
             id INTEGER PRIMARY KEY AUTOINCREMENT,
             title TEXT NOT NULL DEFAULT '',
             description TEXT NOT NULL DEFAULT '',
             last_modified INTEGER NOT NULL
         );
         CREATE INDEX IF NOT EXISTS idx_notes_last_modified ON notes(last_modified DESC);
         INSERT INTO schema_version (version) VALUES (1);
         COMMIT;",
    )?;

    tracing::info!("Migrated database to version {CURRENT_VERSION}");
    Ok(())
}

/// Starter notes shown on a first launch.
///
/// Inserted only when the database file is brand new, never on reopen.
pub(crate) fn seed_welcome_notes(conn: &Connection) -> Result<()> {
    const TIPS: [(&str, &str); 4] = [
        ("Note Tip #4", "Enjoy your new notes app"),
        (
            "Note Tip #3",
            "Done with a note? Delete it from the list.\n\nYou get a few seconds to undo.",
        ),
        (
            "Note Tip #2",
            "Open the menu to switch theme or delete all notes",
        ),
        (
            "Note Tip #1",
            "Jot lets you quickly capture what's on your mind.\n\nTo start a new note, use the plus button below.",
        ),
    ];

    let now = crate::models::now_millis();
    for (title, description) in TIPS {
        conn.execute(
            "INSERT INTO notes (title, description, last_modified) VALUES (?, ?, ?)",
            rusqlite::params![title, description, now],
        )?;
    }

    tracing::info!("Seeded welcome notes");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> Connection {
        Connection::open_in_memory().unwrap()
    }

    #[test]
    fn test_migrations() {
        let conn = setup();
        run(&conn).unwrap();

        let version = get_version(&conn).unwrap();
        assert_eq!(version, CURRENT_VERSION);
    }

    #[test]
    fn test_migrations_idempotent() {
        let conn = setup();
        run(&conn).unwrap();
        run(&conn).unwrap(); // Should not fail

        let version = get_version(&conn).unwrap();
        assert_eq!(version, CURRENT_VERSION);
    }

    #[test]
    fn test_migration_v1_creates_notes_table() {
        let conn = setup();
        run(&conn).unwrap();

        let exists = conn
            .query_row(
                "SELECT EXISTS(
                    SELECT 1 FROM sqlite_master
                    WHERE type = 'table' AND name = 'notes'
                )",
                [],
                |row| row.get::<_, i32>(0),
            )
            .unwrap()
            != 0;

        assert!(exists);
    }

    #[test]
    fn test_seed_welcome_notes() {
        let conn = setup();
        run(&conn).unwrap();
        seed_welcome_notes(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 4);
    }
}
