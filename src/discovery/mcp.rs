//! MCP-backed capability discovery
//!
//! Connects to live MCP sources over streamable HTTP and lists their
//! tools. Connections are established lazily and cached per slug so a
//! re-discovery of the same source reuses the session.

use anyhow::{anyhow, Result};
use rmcp::model::ListToolsResult;
use rmcp::service::RunningService;
use rmcp::transport::{
    streamable_http_client::StreamableHttpClientTransportConfig, StreamableHttpClientTransport,
};
use rmcp::{RoleClient, ServiceExt};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use super::capability::{Capability, CapabilityDiscoverer};
use crate::core::{DiscoveryError, Source};

/// The concrete transport type used for HTTP MCP connections
pub type HttpClientTransport = StreamableHttpClientTransport<reqwest::Client>;

/// Default bounded wait for a discovery call
pub const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Discovers capabilities from live MCP sources via rmcp
pub struct McpDiscoverer {
    /// Cached connections, one per source slug
    services: Arc<RwLock<HashMap<String, Arc<RunningService<RoleClient, ()>>>>>,

    /// Bounded wait applied to each discovery call
    timeout: Duration,
}

impl McpDiscoverer {
    /// Create a discoverer with the default timeout
    pub fn new() -> Self {
        Self {
            services: Arc::new(RwLock::new(HashMap::new())),
            timeout: DEFAULT_DISCOVERY_TIMEOUT,
        }
    }

    /// Set the discovery timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Drop the cached connection for a slug, if any
    ///
    /// The next discovery for that slug reconnects from scratch.
    pub async fn disconnect(&self, slug: &str) {
        if self.services.write().await.remove(slug).is_some() {
            tracing::info!("[McpDiscoverer] Dropped connection for '{}'", slug);
        }
    }

    /// Get or establish the connection for a source
    ///
    /// The write lock spans the whole check-or-connect, so concurrent
    /// discoveries of the same slug share one connection instead of
    /// opening duplicates.
    async fn service_for(&self, source: &Source) -> Result<Arc<RunningService<RoleClient, ()>>> {
        let mut services = self.services.write().await;
        if let Some(service) = services.get(&source.slug) {
            return Ok(service.clone());
        }

        let uri = source.display_url();
        tracing::info!("[McpDiscoverer] Connecting to '{}' at {}", source.slug, uri);

        let transport_config = StreamableHttpClientTransportConfig::with_uri(uri);
        let transport: HttpClientTransport = HttpClientTransport::from_config(transport_config);
        let service = ().serve(transport).await?;
        let service = Arc::new(service);

        services.insert(source.slug.clone(), service.clone());
        Ok(service)
    }

    /// Connect (if needed) and list tools from the source
    async fn list_tools(&self, source: &Source) -> Result<Vec<Capability>> {
        let service = self.service_for(source).await?;

        tracing::debug!("[McpDiscoverer] Listing tools from '{}'", source.slug);
        let result: ListToolsResult = service
            .list_tools(Default::default())
            .await
            .map_err(|e| anyhow!("tool listing failed for '{}': {}", source.slug, e))?;

        tracing::info!(
            "[McpDiscoverer] Got {} tools from '{}'",
            result.tools.len(),
            source.slug
        );

        Ok(result
            .tools
            .into_iter()
            .map(|tool| Capability::Tool {
                name: tool.name.to_string(),
                description: tool.description.as_ref().map(|d| d.to_string()),
            })
            .collect())
    }
}

impl Default for McpDiscoverer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl CapabilityDiscoverer for McpDiscoverer {
    async fn discover(&self, source: &Source) -> Result<Vec<Capability>, DiscoveryError> {
        if !source.is_live() {
            return Err(DiscoveryError::Unsupported(source.source_type));
        }

        match tokio::time::timeout(self.timeout, self.list_tools(source)).await {
            Ok(Ok(capabilities)) => Ok(capabilities),
            Ok(Err(e)) => {
                // A failed session is not worth keeping around
                self.disconnect(&source.slug).await;
                Err(DiscoveryError::Connection(e.to_string()))
            }
            Err(_) => {
                tracing::warn!(
                    "[McpDiscoverer] Discovery for '{}' timed out after {:?}",
                    source.slug,
                    self.timeout
                );
                self.disconnect(&source.slug).await;
                Err(DiscoveryError::Timeout(self.timeout))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_discover_rejects_non_live_sources() {
        let discoverer = McpDiscoverer::new();

        let api = Source::api("weather", "Weather", "https://api.weather.example");
        let err = discoverer.discover(&api).await.unwrap_err();
        assert!(matches!(err, DiscoveryError::Unsupported(t) if t == api.source_type));

        let local = Source::local("scripts", "Scripts", "/opt/scripts");
        let err = discoverer.discover(&local).await.unwrap_err();
        assert!(matches!(err, DiscoveryError::Unsupported(_)));
    }

    /// Bind a listener that accepts connections but never answers
    fn silent_endpoint() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let mut held = Vec::new();
            while let Ok((stream, _)) = listener.accept() {
                held.push(stream);
            }
        });
        format!("http://{}/mcp", addr)
    }

    #[tokio::test]
    async fn test_discover_timeout() {
        let discoverer = McpDiscoverer::new().with_timeout(Duration::from_millis(100));
        let source = Source::mcp("slow", "Slow", silent_endpoint());

        let err = discoverer.discover(&source).await.unwrap_err();
        assert!(matches!(err, DiscoveryError::Timeout(d) if d == Duration::from_millis(100)));
    }

    #[tokio::test]
    async fn test_concurrent_discovery_of_same_slug() {
        let discoverer = McpDiscoverer::new().with_timeout(Duration::from_millis(100));
        let source = Source::mcp("slow", "Slow", silent_endpoint());

        // The second call waits on the connection lock instead of
        // opening a duplicate connection; both time out cleanly.
        let (a, b) = tokio::join!(discoverer.discover(&source), discoverer.discover(&source));
        assert!(matches!(a.unwrap_err(), DiscoveryError::Timeout(_)));
        assert!(matches!(b.unwrap_err(), DiscoveryError::Timeout(_)));
    }

    #[tokio::test]
    #[ignore] // Requires a running MCP server
    async fn test_discover_live_source() {
        let discoverer = McpDiscoverer::new();
        let source = Source::mcp("test-server", "Test", "http://localhost:8005/mcp");

        let capabilities = discoverer.discover(&source).await.unwrap();
        assert!(!capabilities.is_empty());
    }
}
