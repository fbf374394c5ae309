//! Database layer for Jot

mod connection;
mod feed;
mod migrations;
mod repository;

pub use connection::Database;
pub use feed::NoteFeed;
pub use repository::{NoteRepository, SqliteNoteRepository};
