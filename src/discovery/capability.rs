//! Capability model and the discovery seam

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::{DiscoveryError, Source};

/// A concrete invocable unit exposed by a source
///
/// Discovered from live sources, never persisted by this engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Capability {
    /// A tool exposed by an MCP source
    Tool {
        name: String,
        #[serde(default)]
        description: Option<String>,
    },
    /// An endpoint exposed by an API source
    Endpoint { method: String, path: String },
}

impl Capability {
    /// Create a tool capability
    pub fn tool(name: impl Into<String>) -> Self {
        Capability::Tool {
            name: name.into(),
            description: None,
        }
    }

    /// Create a tool capability with a description
    pub fn tool_with_description(name: impl Into<String>, description: impl Into<String>) -> Self {
        Capability::Tool {
            name: name.into(),
            description: Some(description.into()),
        }
    }

    /// Create an endpoint capability
    pub fn endpoint(method: impl Into<String>, path: impl Into<String>) -> Self {
        Capability::Endpoint {
            method: method.into(),
            path: path.into(),
        }
    }

    /// Identifying label: the tool name, or `METHOD path` for endpoints
    pub fn label(&self) -> String {
        match self {
            Capability::Tool { name, .. } => name.clone(),
            Capability::Endpoint { method, path } => format!("{} {}", method, path),
        }
    }
}

/// Queries a live source for its current capability list
///
/// Asynchronous and fallible; calls may run concurrently across sources.
/// Implementations must return [`DiscoveryError::Unsupported`] for
/// non-live source types without attempting any connection, and enforce
/// a bounded wait surfaced as [`DiscoveryError::Timeout`].
#[async_trait]
pub trait CapabilityDiscoverer: Send + Sync {
    async fn discover(&self, source: &Source) -> Result<Vec<Capability>, DiscoveryError>;
}
