//! Reconciliation between the record store and the file mirror.
//!
//! The record store is the authority for ids and for the outcome of every
//! user mutation; the file mirror is best-effort. Passes and dual-writes are
//! dispatched as independent blocking tasks and are idempotent, so callers
//! may repeat them freely. There is no cross-pass lock: last write wins per
//! file path, and writes are always full-record rewrites.

use std::collections::HashMap;
use std::sync::Arc;

use crate::db::NoteRepository;
use crate::error::{Error, Result};
use crate::models::Note;

use super::file_store::FileMirrorStore;
use super::medium::StorageMedium;

/// Counts from a reconciliation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Notes present only in the file mirror, inserted into the record store
    pub imported: usize,
    /// Notes whose file version was strictly newer, rewritten in the record store
    pub updated: usize,
    /// Notes whose individual reconciliation step failed and was skipped
    pub failed: usize,
}

/// Orchestrates dual-write/dual-delete and the reconciliation passes
pub struct SyncEngine {
    repo: Arc<dyn NoteRepository>,
    files: Arc<FileMirrorStore>,
    medium: Arc<dyn StorageMedium>,
}

impl SyncEngine {
    /// Build an engine over injected stores
    pub fn new(
        repo: Arc<dyn NoteRepository>,
        files: FileMirrorStore,
        medium: Arc<dyn StorageMedium>,
    ) -> Self {
        Self {
            repo,
            files: Arc::new(files),
            medium,
        }
    }

    /// Save a note to the record store, then mirror it to a file.
    ///
    /// An unsaved note is inserted and gets its authoritative id before the
    /// mirror file is written. Mirroring is skipped when the medium is not
    /// writable, and a failed file write is logged and swallowed; only a
    /// record-store failure fails the save.
    pub async fn save_note(&self, note: Note) -> Result<Note> {
        let repo = Arc::clone(&self.repo);
        let files = Arc::clone(&self.files);
        let medium = Arc::clone(&self.medium);

        run_blocking(move || {
            let saved = if note.is_persisted() {
                repo.update(&note)?;
                note
            } else {
                repo.insert(&note)?
            };

            if medium.is_writable() {
                if files.write(&saved) {
                    tracing::debug!("Note {} saved to database and file", saved.id);
                } else {
                    tracing::warn!("Note {} saved to database only (file write failed)", saved.id);
                }
            } else {
                tracing::debug!(
                    "Note {} saved to database only (storage not writable)",
                    saved.id
                );
            }

            Ok(saved)
        })
        .await
    }

    /// Delete a note from the record store, then remove its mirror file.
    ///
    /// File removal is attempted only when the medium is writable and its
    /// failure is swallowed; the record store decides the outcome.
    pub async fn delete_note(&self, note: Note) -> Result<()> {
        let repo = Arc::clone(&self.repo);
        let files = Arc::clone(&self.files);
        let medium = Arc::clone(&self.medium);

        run_blocking(move || {
            repo.delete(note.id)?;

            if medium.is_writable() {
                if !files.delete(note.id) {
                    tracing::warn!(
                        "Note {} deleted from database only (file delete failed)",
                        note.id
                    );
                }
            } else {
                tracing::debug!(
                    "Note {} deleted from database only (storage not writable)",
                    note.id
                );
            }

            Ok(())
        })
        .await
    }

    /// Delete every note from the record store, then every mirror file
    pub async fn delete_all_notes(&self) -> Result<()> {
        let repo = Arc::clone(&self.repo);
        let files = Arc::clone(&self.files);
        let medium = Arc::clone(&self.medium);

        run_blocking(move || {
            repo.delete_all()?;

            if medium.is_writable() {
                if !files.delete_all() {
                    tracing::warn!("Some note files could not be deleted");
                }
            } else {
                tracing::debug!("All notes deleted from database only (storage not writable)");
            }

            Ok(())
        })
        .await
    }

    /// Pull pass: reconcile mirrored files into the record store.
    ///
    /// A note present only in a file is inserted verbatim, keeping the file's
    /// id (the one path where the file is the id authority). When a note
    /// exists on both sides the file wins only with a strictly newer
    /// timestamp, so a freshly round-tripped note never triggers a spurious
    /// update; the file itself is never rewritten here. One bad note skips,
    /// it does not abort the pass.
    pub async fn sync_from_files(&self) -> Result<SyncReport> {
        if !self.medium.is_readable() {
            tracing::debug!("Storage not readable, skipping sync from files");
            return Ok(SyncReport::default());
        }

        let repo = Arc::clone(&self.repo);
        let files = Arc::clone(&self.files);

        run_blocking(move || {
            let file_notes = files.read_all();
            if file_notes.is_empty() {
                tracing::debug!("No note files to sync");
                return Ok(SyncReport::default());
            }

            let db_notes: HashMap<i64, Note> = repo
                .all_notes()?
                .into_iter()
                .map(|note| (note.id, note))
                .collect();

            let mut report = SyncReport::default();
            for file_note in file_notes {
                match db_notes.get(&file_note.id) {
                    None => match repo.insert(&file_note) {
                        Ok(imported) => {
                            report.imported += 1;
                            tracing::debug!("Imported note {} from file", imported.id);
                        }
                        Err(error) => {
                            report.failed += 1;
                            tracing::warn!(
                                "Failed to import note {} from file: {error}",
                                file_note.id
                            );
                        }
                    },
                    Some(existing) if file_note.last_modified > existing.last_modified => {
                        let merged = Note {
                            id: existing.id,
                            ..file_note
                        };
                        match repo.update(&merged) {
                            Ok(()) => {
                                report.updated += 1;
                                tracing::debug!("Updated note {} from file", merged.id);
                            }
                            Err(error) => {
                                report.failed += 1;
                                tracing::warn!(
                                    "Failed to update note {} from file: {error}",
                                    merged.id
                                );
                            }
                        }
                    }
                    // Database is at least as fresh; ties favor the existing row
                    Some(_) => {}
                }
            }

            tracing::info!(
                "Completed sync from files: imported {}, updated {}",
                report.imported,
                report.updated
            );
            Ok(report)
        })
        .await
    }

    /// Push pass: mirror every record-store note to a file.
    ///
    /// No timestamp comparison; the database is authoritative in this
    /// direction. Returns the number of notes written; one failed write
    /// never aborts the rest.
    pub async fn sync_to_files(&self) -> Result<usize> {
        if !self.medium.is_writable() {
            tracing::debug!("Storage not writable, skipping sync to files");
            return Ok(0);
        }

        let repo = Arc::clone(&self.repo);
        let files = Arc::clone(&self.files);

        run_blocking(move || {
            let notes = repo.all_notes()?;
            let total = notes.len();
            let written = notes.iter().filter(|note| files.write(note)).count();

            tracing::info!("Synced {written}/{total} notes to files");
            Ok(written)
        })
        .await
    }
}

/// Dispatch store work onto the blocking worker pool
async fn run_blocking<T: Send + 'static>(
    work: impl FnOnce() -> Result<T> + Send + 'static,
) -> Result<T> {
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|error| Error::Task(error.to_string()))?
}
