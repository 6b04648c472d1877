//! Published view state

use crate::core::{DiscoveryPhase, PolicyPhase, Source};
use crate::resolve::{PermissionRow, ResolvedCapability};

/// The controller's view of the active selection, re-published on every
/// recompute
///
/// The policy and discovery paths carry independent phases so the
/// display layer can render partial failure: a permissions table from a
/// loaded policy next to a discovery error banner, or vice versa.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SyncSnapshot {
    /// The active source, if any
    pub source: Option<Source>,

    /// Request generation this snapshot was produced under
    pub generation: u64,

    /// State of the policy-loading path
    pub policy_phase: PolicyPhase,

    /// State of the capability-discovery path
    pub discovery_phase: DiscoveryPhase,

    /// Non-fatal policy problem, e.g. a malformed record that fell back
    /// to the empty policy
    pub policy_warning: Option<String>,

    /// Per-capability effective grades; populated once both phases are
    /// ready, recomputed from scratch on every change
    pub resolved: Vec<ResolvedCapability>,

    /// Display rows projected from the loaded policy
    pub rows: Vec<PermissionRow>,

    /// Whether the active source is disabled by workspace settings
    /// (stdio-transport MCP with local MCP turned off)
    pub source_disabled: bool,
}

impl SyncSnapshot {
    /// Whether a policy load is in flight
    pub fn policy_loading(&self) -> bool {
        self.policy_phase.is_loading()
    }

    /// The policy-path error message, if any
    pub fn policy_error(&self) -> Option<&str> {
        match &self.policy_phase {
            PolicyPhase::Error { message } => Some(message),
            _ => None,
        }
    }

    /// Whether a discovery call is in flight
    pub fn discovery_loading(&self) -> bool {
        self.discovery_phase.is_discovering()
    }

    /// The discovery-path error message, if any
    pub fn discovery_error(&self) -> Option<&str> {
        match &self.discovery_phase {
            DiscoveryPhase::Error { message } => Some(message),
            _ => None,
        }
    }

    /// Whether both paths have reached a terminal state
    ///
    /// An idle snapshot (nothing selected) is not settled.
    pub fn is_settled(&self) -> bool {
        self.policy_phase.is_terminal() && self.discovery_phase.is_terminal()
    }

    /// Slug of the active source, if any
    pub fn active_slug(&self) -> Option<&str> {
        self.source.as_ref().map(|s| s.slug.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PermissionPolicy;

    #[test]
    fn test_default_snapshot_is_idle() {
        let snapshot = SyncSnapshot::default();
        assert!(snapshot.source.is_none());
        assert!(!snapshot.is_settled());
        assert!(!snapshot.policy_loading());
        assert!(snapshot.policy_error().is_none());
    }

    #[test]
    fn test_flags() {
        let snapshot = SyncSnapshot {
            policy_phase: PolicyPhase::Loading,
            discovery_phase: DiscoveryPhase::error("timed out"),
            ..Default::default()
        };
        assert!(snapshot.policy_loading());
        assert_eq!(snapshot.discovery_error(), Some("timed out"));
        assert!(!snapshot.is_settled());

        let snapshot = SyncSnapshot {
            policy_phase: PolicyPhase::Ready(PermissionPolicy::empty()),
            discovery_phase: DiscoveryPhase::Ready(Vec::new()),
            ..Default::default()
        };
        assert!(snapshot.is_settled());
    }
}
