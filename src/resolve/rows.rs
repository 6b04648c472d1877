//! Display row projection
//!
//! Pure transforms from resolved state into flat, display-ready rows.
//! Rows are a projection of the policy rules, grouped by rule type, with
//! declaration order preserved; they are not independently mutable.

use serde::{Deserialize, Serialize};

use super::resolver::{PermissionGrade, ResolvedCapability};
use crate::core::SourceType;
use crate::discovery::Capability;
use crate::policy::PermissionPolicy;

/// Whether a row represents an allow or a block rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowAccess {
    Allowed,
    Blocked,
}

/// Which rule list a row came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowKind {
    Tool,
    Bash,
    Api,
    Mcp,
}

/// One display-ready permission row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRow {
    pub access: RowAccess,
    pub kind: RowKind,
    pub pattern: String,
    pub comment: Option<String>,
}

/// Rows for API and local sources
///
/// Groups blocked tools first, then bash patterns, then API endpoints,
/// preserving declaration order within each group.
pub fn api_rows(policy: &PermissionPolicy) -> Vec<PermissionRow> {
    let mut rows = Vec::new();

    for rule in &policy.blocked_tools {
        rows.push(PermissionRow {
            access: RowAccess::Blocked,
            kind: RowKind::Tool,
            pattern: rule.pattern.clone(),
            comment: rule.comment.clone(),
        });
    }

    for rule in &policy.allowed_bash_patterns {
        rows.push(PermissionRow {
            access: RowAccess::Allowed,
            kind: RowKind::Bash,
            pattern: rule.pattern.clone(),
            comment: rule.comment.clone(),
        });
    }

    for rule in &policy.allowed_api_endpoints {
        rows.push(PermissionRow {
            access: RowAccess::Allowed,
            kind: RowKind::Api,
            pattern: format!("{} {}", rule.method, rule.path),
            comment: rule.comment.clone(),
        });
    }

    rows
}

/// Rows for MCP sources
pub fn mcp_rows(policy: &PermissionPolicy) -> Vec<PermissionRow> {
    let mut rows = Vec::new();

    for rule in &policy.blocked_tools {
        rows.push(PermissionRow {
            access: RowAccess::Blocked,
            kind: RowKind::Mcp,
            pattern: rule.pattern.clone(),
            comment: rule.comment.clone(),
        });
    }

    for rule in &policy.allowed_mcp_patterns {
        rows.push(PermissionRow {
            access: RowAccess::Allowed,
            kind: RowKind::Mcp,
            pattern: rule.pattern.clone(),
            comment: rule.comment.clone(),
        });
    }

    rows
}

/// Rows appropriate to the source type
pub fn rows_for(source_type: SourceType, policy: &PermissionPolicy) -> Vec<PermissionRow> {
    match source_type {
        SourceType::Mcp => mcp_rows(policy),
        SourceType::Api | SourceType::Local => api_rows(policy),
    }
}

/// One display-ready tool row for a live source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolRow {
    pub name: String,
    pub description: String,
    pub grade: PermissionGrade,
}

/// Project resolved tool capabilities into display rows
///
/// Endpoint capabilities are not tools and are skipped.
pub fn tool_rows(resolved: &[ResolvedCapability]) -> Vec<ToolRow> {
    resolved
        .iter()
        .filter_map(|r| match &r.capability {
            Capability::Tool { name, description } => Some(ToolRow {
                name: name.clone(),
                description: description.clone().unwrap_or_default(),
                grade: r.grade,
            }),
            Capability::Endpoint { .. } => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{ApiRule, Rule};

    fn sample_policy() -> PermissionPolicy {
        PermissionPolicy {
            blocked_tools: vec![Rule::with_comment("delete_*", "destructive")],
            allowed_bash_patterns: vec![Rule::new("git status*")],
            allowed_api_endpoints: vec![ApiRule::new("GET", "/users")],
            allowed_mcp_patterns: vec![Rule::new("read_*"), Rule::new("list_*")],
        }
    }

    #[test]
    fn test_api_rows_grouping_and_order() {
        let rows = api_rows(&sample_policy());
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].access, RowAccess::Blocked);
        assert_eq!(rows[0].kind, RowKind::Tool);
        assert_eq!(rows[0].pattern, "delete_*");
        assert_eq!(rows[0].comment.as_deref(), Some("destructive"));

        assert_eq!(rows[1].kind, RowKind::Bash);
        assert_eq!(rows[1].access, RowAccess::Allowed);

        assert_eq!(rows[2].kind, RowKind::Api);
        assert_eq!(rows[2].pattern, "GET /users");
    }

    #[test]
    fn test_mcp_rows() {
        let rows = mcp_rows(&sample_policy());
        assert_eq!(rows.len(), 3);

        // Blocked tools first, then mcp patterns in declaration order
        assert_eq!(rows[0].access, RowAccess::Blocked);
        assert_eq!(rows[0].kind, RowKind::Mcp);
        assert_eq!(rows[1].pattern, "read_*");
        assert_eq!(rows[2].pattern, "list_*");
    }

    #[test]
    fn test_rows_for_dispatch() {
        let policy = sample_policy();
        assert_eq!(rows_for(SourceType::Mcp, &policy), mcp_rows(&policy));
        assert_eq!(rows_for(SourceType::Api, &policy), api_rows(&policy));
        assert_eq!(rows_for(SourceType::Local, &policy), api_rows(&policy));
    }

    #[test]
    fn test_empty_policy_yields_no_rows() {
        let policy = PermissionPolicy::empty();
        assert!(api_rows(&policy).is_empty());
        assert!(mcp_rows(&policy).is_empty());
    }

    #[test]
    fn test_tool_rows() {
        let resolved = vec![
            ResolvedCapability {
                capability: Capability::tool_with_description("read_file", "Read a file"),
                grade: PermissionGrade::Allowed,
            },
            ResolvedCapability {
                capability: Capability::tool("write_file"),
                grade: PermissionGrade::RequiresPermission,
            },
            ResolvedCapability {
                capability: Capability::endpoint("GET", "/users"),
                grade: PermissionGrade::Allowed,
            },
        ];

        let rows = tool_rows(&resolved);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "read_file");
        assert_eq!(rows[0].description, "Read a file");
        assert_eq!(rows[1].description, "");
        assert_eq!(rows[1].grade, PermissionGrade::RequiresPermission);
    }
}
