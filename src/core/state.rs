//! Per-source synchronization phase state machines
//!
//! Policy loading and capability discovery run as two independent state
//! machines that progress concurrently:
//!
//! ```text
//! policy:      Idle → Loading     → Ready | Error
//! discovery:   Idle → Discovering → Ready | Error
//! ```
//!
//! Row projection combines them only once both sides are terminal; an
//! unsupported discovery (non-live source) maps straight to `Ready` with
//! an empty capability list.

use crate::discovery::Capability;
use crate::policy::PermissionPolicy;

/// State of the policy-loading path for the active source
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PolicyPhase {
    /// No source selected, or selection just cleared
    #[default]
    Idle,

    /// A load is in flight
    Loading,

    /// Policy loaded (possibly the empty fallback)
    Ready(PermissionPolicy),

    /// Load failed in a way the engine cannot recover from
    Error {
        /// Human-readable cause
        message: String,
    },
}

impl PolicyPhase {
    /// Create an error phase
    pub fn error(message: impl Into<String>) -> Self {
        PolicyPhase::Error {
            message: message.into(),
        }
    }

    /// Whether the phase has reached a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, PolicyPhase::Ready(_) | PolicyPhase::Error { .. })
    }

    /// Whether a load is in flight
    pub fn is_loading(&self) -> bool {
        matches!(self, PolicyPhase::Loading)
    }

    /// The loaded policy, if ready
    pub fn policy(&self) -> Option<&PermissionPolicy> {
        match self {
            PolicyPhase::Ready(policy) => Some(policy),
            _ => None,
        }
    }
}

impl std::fmt::Display for PolicyPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyPhase::Idle => write!(f, "Idle"),
            PolicyPhase::Loading => write!(f, "Loading"),
            PolicyPhase::Ready(_) => write!(f, "Ready"),
            PolicyPhase::Error { message } => write!(f, "Error: {}", message),
        }
    }
}

/// State of the capability-discovery path for the active source
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DiscoveryPhase {
    /// No source selected, or selection just cleared
    #[default]
    Idle,

    /// A discovery call is in flight
    Discovering,

    /// Capability list discovered (empty for non-live sources)
    Ready(Vec<Capability>),

    /// Discovery failed; never blocks policy display
    Error {
        /// Human-readable cause
        message: String,
    },
}

impl DiscoveryPhase {
    /// Create an error phase
    pub fn error(message: impl Into<String>) -> Self {
        DiscoveryPhase::Error {
            message: message.into(),
        }
    }

    /// Whether the phase has reached a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, DiscoveryPhase::Ready(_) | DiscoveryPhase::Error { .. })
    }

    /// Whether a discovery call is in flight
    pub fn is_discovering(&self) -> bool {
        matches!(self, DiscoveryPhase::Discovering)
    }

    /// The discovered capabilities, if ready
    pub fn capabilities(&self) -> Option<&[Capability]> {
        match self {
            DiscoveryPhase::Ready(caps) => Some(caps),
            _ => None,
        }
    }
}

impl std::fmt::Display for DiscoveryPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscoveryPhase::Idle => write!(f, "Idle"),
            DiscoveryPhase::Discovering => write!(f, "Discovering"),
            DiscoveryPhase::Ready(caps) => write!(f, "Ready ({} capabilities)", caps.len()),
            DiscoveryPhase::Error { message } => write!(f, "Error: {}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_phase_checks() {
        assert!(!PolicyPhase::Idle.is_terminal());
        assert!(!PolicyPhase::Loading.is_terminal());
        assert!(PolicyPhase::Loading.is_loading());
        assert!(PolicyPhase::Ready(PermissionPolicy::empty()).is_terminal());
        assert!(PolicyPhase::error("io failure").is_terminal());

        let phase = PolicyPhase::Ready(PermissionPolicy::empty());
        assert!(phase.policy().is_some());
        assert!(PolicyPhase::Idle.policy().is_none());
    }

    #[test]
    fn test_discovery_phase_checks() {
        assert!(!DiscoveryPhase::Idle.is_terminal());
        assert!(DiscoveryPhase::Discovering.is_discovering());
        assert!(DiscoveryPhase::Ready(Vec::new()).is_terminal());
        assert!(DiscoveryPhase::error("timeout").is_terminal());
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(PolicyPhase::Idle.to_string(), "Idle");
        assert_eq!(PolicyPhase::error("oops").to_string(), "Error: oops");
        assert_eq!(
            DiscoveryPhase::Ready(Vec::new()).to_string(),
            "Ready (0 capabilities)"
        );
    }
}
