//! In-memory capability discoverer for tests and demos

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use super::capability::{Capability, CapabilityDiscoverer};
use crate::core::{DiscoveryError, Source};

/// Serves fixed capability lists from memory
///
/// Per-slug delays simulate slow discoveries for stale-result tests;
/// per-slug error messages simulate connection failures.
#[derive(Default)]
pub struct StaticDiscoverer {
    capabilities: RwLock<HashMap<String, Vec<Capability>>>,
    delays: RwLock<HashMap<String, Duration>>,
    failures: RwLock<HashMap<String, String>>,
    timeouts: RwLock<HashMap<String, Duration>>,
}

impl StaticDiscoverer {
    /// Create an empty discoverer
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve the given capabilities for a slug
    pub fn with_capabilities(self, slug: impl Into<String>, caps: Vec<Capability>) -> Self {
        self.capabilities
            .write()
            .expect("capability map poisoned")
            .insert(slug.into(), caps);
        self
    }

    /// Delay discoveries for a slug
    pub fn with_delay(self, slug: impl Into<String>, delay: Duration) -> Self {
        self.delays
            .write()
            .expect("delay map poisoned")
            .insert(slug.into(), delay);
        self
    }

    /// Fail discoveries for a slug with a connection error
    pub fn with_failure(self, slug: impl Into<String>, message: impl Into<String>) -> Self {
        self.failures
            .write()
            .expect("failure map poisoned")
            .insert(slug.into(), message.into());
        self
    }

    /// Fail discoveries for a slug with a timeout after the given wait
    pub fn with_timeout_failure(self, slug: impl Into<String>, timeout: Duration) -> Self {
        self.timeouts
            .write()
            .expect("timeout map poisoned")
            .insert(slug.into(), timeout);
        self
    }
}

#[async_trait]
impl CapabilityDiscoverer for StaticDiscoverer {
    async fn discover(&self, source: &Source) -> Result<Vec<Capability>, DiscoveryError> {
        if !source.is_live() {
            return Err(DiscoveryError::Unsupported(source.source_type));
        }

        let delay = self
            .delays
            .read()
            .expect("delay map poisoned")
            .get(&source.slug)
            .copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let timeout = self
            .timeouts
            .read()
            .expect("timeout map poisoned")
            .get(&source.slug)
            .copied();
        if let Some(timeout) = timeout {
            tokio::time::sleep(timeout).await;
            return Err(DiscoveryError::Timeout(timeout));
        }

        let failure = self
            .failures
            .read()
            .expect("failure map poisoned")
            .get(&source.slug)
            .cloned();
        if let Some(message) = failure {
            return Err(DiscoveryError::Connection(message));
        }

        let caps = self
            .capabilities
            .read()
            .expect("capability map poisoned")
            .get(&source.slug)
            .cloned();
        caps.ok_or_else(|| {
            DiscoveryError::Connection(format!("no capabilities registered for '{}'", source.slug))
        })
    }
}
