//! Live-updating note snapshots for the presentation layer

use tokio::sync::watch;

use crate::models::Note;

/// Push-based stream of full note snapshots.
///
/// The repository republishes after every mutation. Only the presentation
/// layer consumes this; the sync engine always takes its own bulk read.
pub struct NoteFeed {
    tx: watch::Sender<Vec<Note>>,
}

impl NoteFeed {
    /// Create a feed holding the given initial snapshot
    #[must_use]
    pub fn new(initial: Vec<Note>) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Subscribe to snapshot updates
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Note>> {
        self.tx.subscribe()
    }

    /// Publish a new snapshot.
    ///
    /// Must succeed with zero subscribers; `send_replace` keeps the latest
    /// snapshot for receivers that attach later.
    pub fn publish(&self, notes: Vec<Note>) {
        self.tx.send_replace(notes);
    }
}
