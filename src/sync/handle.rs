//! SyncHandle - external interface to a running controller
//!
//! The handle is what the display layer (or a test) uses to drive the
//! controller: send selection commands, read the current snapshot, or
//! wait for a condition on published snapshots. It can be cloned and
//! shared across tasks; all mutation still happens inside the
//! controller's own event loop.

use super::channels::{CommandSender, SnapshotReceiver};
use super::events::SyncCommand;
use super::snapshot::SyncSnapshot;
use crate::core::{Source, SyncError, SyncResult};

/// Handle for interacting with a running synchronization controller
#[derive(Clone)]
pub struct SyncHandle {
    command_tx: CommandSender,
    snapshot_rx: SnapshotReceiver,
}

impl SyncHandle {
    /// Create a handle; called by `SyncController::spawn`, not directly
    pub(crate) fn new(command_tx: CommandSender, snapshot_rx: SnapshotReceiver) -> Self {
        Self {
            command_tx,
            snapshot_rx,
        }
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Make the given source the active selection
    pub async fn select_source(&self, slug: impl Into<String>) -> SyncResult<()> {
        self.send(SyncCommand::SelectSource(slug.into())).await
    }

    /// Clear the active selection
    pub async fn deselect(&self) -> SyncResult<()> {
        self.send(SyncCommand::Deselect).await
    }

    /// Deliver an external change notification with the full current
    /// source list
    pub async fn sources_changed(&self, sources: Vec<Source>) -> SyncResult<()> {
        self.send(SyncCommand::SourcesChanged(sources)).await
    }

    /// Stop the controller task
    pub async fn shutdown(&self) -> SyncResult<()> {
        self.send(SyncCommand::Shutdown).await
    }

    async fn send(&self, command: SyncCommand) -> SyncResult<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| SyncError::ChannelClosed)
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    /// The most recently published snapshot
    pub fn snapshot(&self) -> SyncSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Subscribe to snapshot updates
    ///
    /// The receiver always observes the latest published snapshot;
    /// intermediate snapshots may be skipped under load.
    pub fn subscribe(&self) -> SnapshotReceiver {
        self.snapshot_rx.clone()
    }

    /// Wait until a published snapshot satisfies the predicate
    ///
    /// Checks the current snapshot first, so an already-satisfied
    /// condition returns immediately.
    pub async fn wait_until<F>(&self, predicate: F) -> SyncResult<SyncSnapshot>
    where
        F: FnMut(&SyncSnapshot) -> bool,
    {
        let mut rx = self.snapshot_rx.clone();
        let snapshot = rx
            .wait_for(predicate)
            .await
            .map_err(|_| SyncError::ChannelClosed)?;
        Ok(snapshot.clone())
    }

    /// Wait until both the policy and discovery paths are terminal
    pub async fn settled(&self) -> SyncResult<SyncSnapshot> {
        self.wait_until(|s| s.is_settled()).await
    }
}

impl std::fmt::Debug for SyncHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncHandle")
            .field("active_slug", &self.snapshot_rx.borrow().active_slug())
            .finish()
    }
}
