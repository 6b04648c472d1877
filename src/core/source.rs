//! Source model types
//!
//! A `Source` is a configured external integration attached to a workspace:
//! a remote MCP tool server, an HTTP API, or a local filesystem tool. The
//! record is owned by the external source registry; this engine only reads
//! it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of external integration a source represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Live MCP tool server (capabilities are discoverable)
    Mcp,
    /// HTTP API described by endpoint rules
    Api,
    /// Local filesystem tool
    Local,
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceType::Mcp => write!(f, "mcp"),
            SourceType::Api => write!(f, "api"),
            SourceType::Local => write!(f, "local"),
        }
    }
}

/// Transport used by an MCP source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum McpTransport {
    /// Streamable HTTP transport
    Http,
    /// Locally spawned process; subject to the workspace `local_mcp_enabled`
    /// switch
    Stdio,
}

/// Connection endpoint of a source
///
/// The persisted shape tags which field the source config carries:
/// `url` for MCP servers, `baseUrl` for APIs, `path` for local tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceEndpoint {
    Url(String),
    BaseUrl(String),
    Path(String),
}

impl SourceEndpoint {
    /// The endpoint string regardless of variant
    pub fn as_str(&self) -> &str {
        match self {
            SourceEndpoint::Url(s) | SourceEndpoint::BaseUrl(s) | SourceEndpoint::Path(s) => s,
        }
    }
}

/// A configured external integration attached to a workspace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    /// Stable identifier within the workspace
    pub slug: String,

    /// Human-readable name
    pub name: String,

    /// Optional one-line description
    #[serde(default)]
    pub tagline: Option<String>,

    /// Kind of integration
    #[serde(rename = "type")]
    pub source_type: SourceType,

    /// Transport, only meaningful for MCP sources
    #[serde(default)]
    pub transport: Option<McpTransport>,

    /// Connection endpoint
    pub endpoint: SourceEndpoint,

    /// Last connection failure reported by the registry, if any
    #[serde(default)]
    pub connection_error: Option<String>,

    /// When the connection was last tested
    #[serde(default)]
    pub last_tested_at: Option<DateTime<Utc>>,
}

impl Source {
    /// Create an MCP source reachable over HTTP
    pub fn mcp(slug: impl Into<String>, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            tagline: None,
            source_type: SourceType::Mcp,
            transport: Some(McpTransport::Http),
            endpoint: SourceEndpoint::Url(url.into()),
            connection_error: None,
            last_tested_at: None,
        }
    }

    /// Create an API source
    pub fn api(
        slug: impl Into<String>,
        name: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            tagline: None,
            source_type: SourceType::Api,
            transport: None,
            endpoint: SourceEndpoint::BaseUrl(base_url.into()),
            connection_error: None,
            last_tested_at: None,
        }
    }

    /// Create a local filesystem source
    pub fn local(
        slug: impl Into<String>,
        name: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            tagline: None,
            source_type: SourceType::Local,
            transport: None,
            endpoint: SourceEndpoint::Path(path.into()),
            connection_error: None,
            last_tested_at: None,
        }
    }

    /// Set the transport
    pub fn with_transport(mut self, transport: McpTransport) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Set the tagline
    pub fn with_tagline(mut self, tagline: impl Into<String>) -> Self {
        self.tagline = Some(tagline.into());
        self
    }

    /// The endpoint string for display and connection
    pub fn display_url(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Whether this source exposes a live, discoverable capability list
    pub fn is_live(&self) -> bool {
        self.source_type == SourceType::Mcp
    }
}

/// Workspace-level settings consumed by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSettings {
    /// Whether locally spawned (stdio) MCP sources may run
    #[serde(default = "default_local_mcp_enabled")]
    pub local_mcp_enabled: bool,
}

fn default_local_mcp_enabled() -> bool {
    true
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            local_mcp_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_constructors() {
        let source = Source::mcp("github", "GitHub", "https://example.com/mcp");
        assert_eq!(source.source_type, SourceType::Mcp);
        assert_eq!(source.transport, Some(McpTransport::Http));
        assert_eq!(source.display_url(), "https://example.com/mcp");
        assert!(source.is_live());

        let source = Source::api("weather", "Weather API", "https://api.weather.example");
        assert_eq!(source.source_type, SourceType::Api);
        assert!(!source.is_live());

        let source = Source::local("scripts", "Scripts", "/opt/scripts");
        assert_eq!(source.display_url(), "/opt/scripts");
    }

    #[test]
    fn test_endpoint_serialization_shape() {
        let source = Source::api("weather", "Weather", "https://api.weather.example");
        let json = serde_json::to_value(&source).unwrap();
        assert_eq!(json["type"], "api");
        assert_eq!(json["endpoint"]["baseUrl"], "https://api.weather.example");

        let source = Source::mcp("github", "GitHub", "https://example.com/mcp");
        let json = serde_json::to_value(&source).unwrap();
        assert_eq!(json["endpoint"]["url"], "https://example.com/mcp");
    }

    #[test]
    fn test_source_roundtrip() {
        let source = Source::mcp("github", "GitHub", "https://example.com/mcp")
            .with_transport(McpTransport::Stdio)
            .with_tagline("Code hosting");
        let json = serde_json::to_string(&source).unwrap();
        let parsed: Source = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, source);
    }

    #[test]
    fn test_workspace_settings_defaults() {
        let settings = WorkspaceSettings::default();
        assert!(settings.local_mcp_enabled);

        // Missing field defaults to enabled
        let settings: WorkspaceSettings = serde_json::from_str("{}").unwrap();
        assert!(settings.local_mcp_enabled);
    }
}
