//! Synchronization controller and its communication surface
//!
//! This module keeps permission resolution correct and current as
//! selections change, policy records change on disk, and capability
//! lists are (re)discovered, all under out-of-order async completion:
//!
//! - `SyncController` - the spawned task owning all mutable state
//! - `SyncHandle` - cloneable external interface
//! - `SyncCommand` - selection/notification commands
//! - `SyncSnapshot` - published view state (watch channel)
//!
//! The controller processes commands and completions one at a time, and
//! discards any completion whose request token has been superseded, so
//! the latest selection always wins regardless of completion order.

pub mod channels;
mod controller;
mod events;
mod handle;
mod snapshot;

pub use channels::{SnapshotReceiver, COMMAND_CHANNEL_SIZE, COMPLETION_CHANNEL_SIZE};
pub use controller::SyncController;
pub use events::SyncCommand;
pub use handle::SyncHandle;
pub use snapshot::SyncSnapshot;
