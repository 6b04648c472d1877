//! Permission resolution
//!
//! Pure functions combining a normalized policy with a discovered
//! capability list into per-capability effective grades. Block always
//! wins over allow; anything unmatched defaults to requiring explicit
//! confirmation, which is distinct from an explicit block and never
//! collapsed into it.

use serde::{Deserialize, Serialize};

use crate::discovery::Capability;
use crate::policy::PermissionPolicy;

/// Effective permission grade for a capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PermissionGrade {
    /// Matched an allow rule; invocable without confirmation
    Allowed,
    /// Matched a block rule; block wins over any allow match
    Blocked,
    /// Matched nothing; default-deny for invocation
    RequiresPermission,
}

impl std::fmt::Display for PermissionGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermissionGrade::Allowed => write!(f, "allowed"),
            PermissionGrade::Blocked => write!(f, "blocked"),
            PermissionGrade::RequiresPermission => write!(f, "requires-permission"),
        }
    }
}

/// A capability together with its resolved grade
///
/// Derived state: recomputed on every policy or capability-list change,
/// never cached across recomputations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedCapability {
    pub capability: Capability,
    pub grade: PermissionGrade,
}

/// Resolve every capability against the policy
///
/// Output order follows the capability list.
pub fn resolve(policy: &PermissionPolicy, capabilities: &[Capability]) -> Vec<ResolvedCapability> {
    capabilities
        .iter()
        .map(|capability| ResolvedCapability {
            capability: capability.clone(),
            grade: grade(policy, capability),
        })
        .collect()
}

/// Grade a single capability
pub fn grade(policy: &PermissionPolicy, capability: &Capability) -> PermissionGrade {
    match capability {
        Capability::Tool { name, .. } => {
            if policy.blocked_tools.iter().any(|r| r.matches(name)) {
                PermissionGrade::Blocked
            } else if policy.allowed_mcp_patterns.iter().any(|r| r.matches(name)) {
                PermissionGrade::Allowed
            } else {
                PermissionGrade::RequiresPermission
            }
        }
        // The persisted schema carries no block list for endpoints, so
        // only the allow check applies.
        Capability::Endpoint { method, path } => {
            if policy
                .allowed_api_endpoints
                .iter()
                .any(|r| r.matches(method, path))
            {
                PermissionGrade::Allowed
            } else {
                PermissionGrade::RequiresPermission
            }
        }
    }
}

/// Grade a shell command against the bash pattern rules
pub fn grade_bash(policy: &PermissionPolicy, command: &str) -> PermissionGrade {
    if policy
        .allowed_bash_patterns
        .iter()
        .any(|r| r.matches(command))
    {
        PermissionGrade::Allowed
    } else {
        PermissionGrade::RequiresPermission
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{ApiRule, Rule};

    fn policy_with(blocked: &[&str], allowed_mcp: &[&str]) -> PermissionPolicy {
        PermissionPolicy {
            blocked_tools: blocked.iter().map(|p| Rule::new(*p)).collect(),
            allowed_mcp_patterns: allowed_mcp.iter().map(|p| Rule::new(*p)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_block_over_allow() {
        // Matched by both lists: block wins
        let policy = policy_with(&["delete_*"], &["delete_*", "*"]);
        let cap = Capability::tool("delete_repo");
        assert_eq!(grade(&policy, &cap), PermissionGrade::Blocked);
    }

    #[test]
    fn test_allow_and_default() {
        let policy = policy_with(&[], &["A*"]);
        let resolved = resolve(
            &policy,
            &[
                Capability::tool("A"),
                Capability::tool("B"),
                Capability::tool("C"),
            ],
        );
        assert_eq!(resolved[0].grade, PermissionGrade::Allowed);
        assert_eq!(resolved[1].grade, PermissionGrade::RequiresPermission);
        assert_eq!(resolved[2].grade, PermissionGrade::RequiresPermission);
    }

    #[test]
    fn test_endpoint_resolution() {
        let policy = PermissionPolicy {
            allowed_api_endpoints: vec![ApiRule::new("GET", "/users")],
            ..Default::default()
        };

        assert_eq!(
            grade(&policy, &Capability::endpoint("GET", "/users")),
            PermissionGrade::Allowed
        );
        assert_eq!(
            grade(&policy, &Capability::endpoint("POST", "/users")),
            PermissionGrade::RequiresPermission
        );
        // Case-insensitive method
        assert_eq!(
            grade(&policy, &Capability::endpoint("get", "/users")),
            PermissionGrade::Allowed
        );
    }

    #[test]
    fn test_empty_policy_requires_permission() {
        let policy = PermissionPolicy::empty();
        assert_eq!(
            grade(&policy, &Capability::tool("anything")),
            PermissionGrade::RequiresPermission
        );
    }

    #[test]
    fn test_output_order_follows_capabilities() {
        let policy = policy_with(&[], &["*"]);
        let caps = vec![
            Capability::tool("z"),
            Capability::tool("a"),
            Capability::tool("m"),
        ];
        let resolved = resolve(&policy, &caps);
        let names: Vec<_> = resolved.iter().map(|r| r.capability.label()).collect();
        assert_eq!(names, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_grade_bash() {
        let policy = PermissionPolicy {
            allowed_bash_patterns: vec![Rule::new("git status*"), Rule::new("ls*")],
            ..Default::default()
        };
        assert_eq!(
            grade_bash(&policy, "git status --short"),
            PermissionGrade::Allowed
        );
        assert_eq!(
            grade_bash(&policy, "rm -rf /"),
            PermissionGrade::RequiresPermission
        );
    }

    #[test]
    fn test_grade_serialization() {
        let json = serde_json::to_string(&PermissionGrade::RequiresPermission).unwrap();
        assert_eq!(json, "\"requires-permission\"");
    }
}
