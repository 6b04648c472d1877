//! Policy records and rule normalization
//!
//! The file-backed policy record tolerates two rule shapes: a bare
//! pattern string, or a structured record carrying a pattern and an
//! optional comment. Both are normalized into [`Rule`] at the parsing
//! boundary; nothing downstream ever branches on the raw shape again.

use serde::{Deserialize, Serialize};

use super::pattern::glob_match;
use crate::core::PolicyError;

/// Raw rule as it appears on disk: either a bare pattern or a record
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawRule {
    /// `"github_*"`
    Pattern(String),
    /// `{"pattern": "github_*", "comment": "read-only tools"}`
    Detailed {
        pattern: String,
        #[serde(default)]
        comment: Option<String>,
    },
}

impl RawRule {
    /// Normalize into the uniform rule shape
    pub fn normalize(self) -> Rule {
        match self {
            RawRule::Pattern(pattern) => Rule {
                pattern,
                comment: None,
            },
            RawRule::Detailed { pattern, comment } => Rule { pattern, comment },
        }
    }
}

/// Normalized allow/block rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Glob pattern matched against capability names
    pub pattern: String,
    /// Optional human-readable comment; always present after
    /// normalization, possibly null
    pub comment: Option<String>,
}

impl Rule {
    /// Create a rule without a comment
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            comment: None,
        }
    }

    /// Create a rule with a comment
    pub fn with_comment(pattern: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            comment: Some(comment.into()),
        }
    }

    /// Whether this rule's pattern matches the given capability name
    pub fn matches(&self, name: &str) -> bool {
        glob_match(&self.pattern, name)
    }
}

/// Allow rule for a single API endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiRule {
    /// HTTP method, matched case-insensitively
    pub method: String,
    /// Endpoint path, matched by the same glob rule as tool patterns
    pub path: String,
    #[serde(default)]
    pub comment: Option<String>,
}

impl ApiRule {
    /// Create an endpoint rule
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            comment: None,
        }
    }

    /// Set the comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Whether this rule matches the given method and path
    pub fn matches(&self, method: &str, path: &str) -> bool {
        self.method.eq_ignore_ascii_case(method) && glob_match(&self.path, path)
    }
}

/// Policy record exactly as persisted, before normalization
///
/// Every rule array is optional on disk; missing fields are empty lists,
/// not errors.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPolicyRecord {
    #[serde(default)]
    pub blocked_tools: Vec<RawRule>,
    #[serde(default)]
    pub allowed_bash_patterns: Vec<RawRule>,
    #[serde(default)]
    pub allowed_api_endpoints: Vec<ApiRule>,
    #[serde(default)]
    pub allowed_mcp_patterns: Vec<RawRule>,
}

impl RawPolicyRecord {
    /// Normalize every rule, preserving declaration order
    pub fn normalize(self) -> PermissionPolicy {
        let normalize = |rules: Vec<RawRule>| rules.into_iter().map(RawRule::normalize).collect();
        PermissionPolicy {
            blocked_tools: normalize(self.blocked_tools),
            allowed_bash_patterns: normalize(self.allowed_bash_patterns),
            allowed_api_endpoints: self.allowed_api_endpoints,
            allowed_mcp_patterns: normalize(self.allowed_mcp_patterns),
        }
    }
}

/// Normalized permission policy for one source
///
/// One policy per source, loaded lazily, never shared across sources.
/// Serializing emits every rule in structured form, which reads back
/// equivalently.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionPolicy {
    pub blocked_tools: Vec<Rule>,
    pub allowed_bash_patterns: Vec<Rule>,
    pub allowed_api_endpoints: Vec<ApiRule>,
    pub allowed_mcp_patterns: Vec<Rule>,
}

impl PermissionPolicy {
    /// The all-empty policy used when a source has no record on disk
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the policy contains no rules at all
    pub fn is_empty(&self) -> bool {
        self.blocked_tools.is_empty()
            && self.allowed_bash_patterns.is_empty()
            && self.allowed_api_endpoints.is_empty()
            && self.allowed_mcp_patterns.is_empty()
    }

    /// Parse a raw policy record from JSON and normalize it
    pub fn parse(json: &str) -> Result<Self, PolicyError> {
        let raw: RawPolicyRecord =
            serde_json::from_str(json).map_err(|e| PolicyError::Parse(e.to_string()))?;
        Ok(raw.normalize())
    }
}
