//! Command and completion types for the synchronization controller

use crate::core::{DiscoveryError, PolicyError, Source};
use crate::discovery::Capability;
use crate::policy::PermissionPolicy;

/// Commands sent to a running controller
#[derive(Debug)]
pub enum SyncCommand {
    /// Make the given source the active selection
    SelectSource(String),

    /// Clear the active selection
    Deselect,

    /// External change notification carrying the full current source list
    ///
    /// If the active source appears in the list, its record is refreshed
    /// and its policy reloaded; otherwise the notification is ignored.
    SourcesChanged(Vec<Source>),

    /// Stop the controller task
    Shutdown,
}

/// Completions of asynchronous work issued by the controller
///
/// Each carries the request token it was issued under; the controller
/// applies a completion only if the token still matches its current
/// generation, otherwise the result is stale and dropped.
#[derive(Debug)]
pub(crate) enum Completion {
    PolicyLoaded {
        token: u64,
        result: Result<PermissionPolicy, PolicyError>,
    },
    CapabilitiesLoaded {
        token: u64,
        result: Result<Vec<Capability>, DiscoveryError>,
    },
}
