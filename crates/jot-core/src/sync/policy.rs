//! Scheduling policy for reconciliation passes

use std::sync::Arc;

use crate::error::Result;

use super::engine::{SyncEngine, SyncReport};

/// Application events that schedule a reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncTrigger {
    /// Notes screen became visible
    AppOpen,
    /// App returned from the background
    AppResume,
    /// Explicit user refresh
    Manual,
}

/// Maps lifecycle events onto engine passes.
///
/// A thin policy, not an algorithm: no debouncing, and safe to invoke
/// arbitrarily often since the engine passes are idempotent. Reconciliation
/// never runs on construction; the platform shell drives it.
pub struct SyncScheduler {
    engine: Arc<SyncEngine>,
}

impl SyncScheduler {
    /// Create a scheduler driving the given engine
    #[must_use]
    pub fn new(engine: Arc<SyncEngine>) -> Self {
        Self { engine }
    }

    /// Run the pull pass for a trigger and wait for it to finish
    pub async fn run(&self, trigger: SyncTrigger) -> Result<SyncReport> {
        tracing::debug!("Running file sync for trigger {trigger:?}");
        self.engine.sync_from_files().await
    }

    /// Fire-and-forget variant for callers on a UI thread
    pub fn dispatch(&self, trigger: SyncTrigger) {
        let engine = Arc::clone(&self.engine);
        tokio::spawn(async move {
            if let Err(error) = engine.sync_from_files().await {
                tracing::error!("File sync for trigger {trigger:?} failed: {error}");
            }
        });
    }

    /// Explicitly push every record-store note out to the file mirror.
    ///
    /// The pull pass never writes files, so a note freshened in the database
    /// stays stale on disk until this is invoked.
    pub async fn flush_to_files(&self) -> Result<usize> {
        self.engine.sync_to_files().await
    }
}
