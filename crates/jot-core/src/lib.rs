//! jot-core - Core library for Jot
//!
//! This crate contains the note model, the `SQLite` record store, and the
//! file-mirror sync engine shared by all Jot interfaces.
//!
//! The record store is the authority for note ids and for the outcome of
//! every user mutation; the file mirror is a best-effort, human-inspectable
//! copy of each note, reconciled with the store on demand by the sync
//! engine.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod sync;

pub use config::StorageLayout;
pub use db::{Database, NoteRepository, SqliteNoteRepository};
pub use error::{Error, Result};
pub use models::Note;
pub use sync::{FileMirrorStore, SyncEngine, SyncReport, SyncScheduler, SyncTrigger};
