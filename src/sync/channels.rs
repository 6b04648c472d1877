//! Channel type definitions for controller communication
//!
//! The controller consumes two mpsc channels in one serialized event
//! loop: commands from handles, and completions from the async work it
//! spawns. The current view snapshot is published on a watch channel so
//! the display layer always sees the latest recompute.

use tokio::sync::{mpsc, watch};

use super::events::{Completion, SyncCommand};
use super::snapshot::SyncSnapshot;

/// Buffer size for the command channel
pub const COMMAND_CHANNEL_SIZE: usize = 32;

/// Buffer size for the internal completion channel
pub const COMPLETION_CHANNEL_SIZE: usize = 32;

/// Sender half of the command channel (used by `SyncHandle`)
pub type CommandSender = mpsc::Sender<SyncCommand>;

/// Receiver half of the command channel (used by the controller)
pub type CommandReceiver = mpsc::Receiver<SyncCommand>;

/// Sender half of the completion channel (cloned into spawned work)
pub(crate) type CompletionSender = mpsc::Sender<Completion>;

/// Receiver half of the completion channel (used by the controller)
pub(crate) type CompletionReceiver = mpsc::Receiver<Completion>;

/// Receiver for published view snapshots
pub type SnapshotReceiver = watch::Receiver<SyncSnapshot>;

/// Create the command channel pair
pub fn create_command_channel() -> (CommandSender, CommandReceiver) {
    mpsc::channel(COMMAND_CHANNEL_SIZE)
}

/// Create the internal completion channel pair
pub(crate) fn create_completion_channel() -> (CompletionSender, CompletionReceiver) {
    mpsc::channel(COMPLETION_CHANNEL_SIZE)
}
