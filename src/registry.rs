//! Source registry seam
//!
//! The source registry (CRUD, storage, connection testing) lives outside
//! this engine. The engine only reads from it: the full source list when
//! resolving a selection, and workspace settings once at startup.

use async_trait::async_trait;
use std::sync::RwLock;

use crate::core::{Source, WorkspaceSettings};

/// Read-only view of the external source registry
#[async_trait]
pub trait SourceRegistry: Send + Sync {
    /// All sources currently configured in the workspace
    async fn get_sources(&self) -> anyhow::Result<Vec<Source>>;

    /// Workspace-level settings
    async fn get_workspace_settings(&self) -> anyhow::Result<WorkspaceSettings>;
}

/// In-memory registry for tests and demos
pub struct StaticRegistry {
    sources: RwLock<Vec<Source>>,
    settings: WorkspaceSettings,
}

impl StaticRegistry {
    /// Create a registry serving the given sources
    pub fn new(sources: Vec<Source>) -> Self {
        Self {
            sources: RwLock::new(sources),
            settings: WorkspaceSettings::default(),
        }
    }

    /// Set the workspace settings
    pub fn with_settings(mut self, settings: WorkspaceSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Replace the source list
    pub fn set_sources(&self, sources: Vec<Source>) {
        *self.sources.write().expect("source list poisoned") = sources;
    }
}

#[async_trait]
impl SourceRegistry for StaticRegistry {
    async fn get_sources(&self) -> anyhow::Result<Vec<Source>> {
        Ok(self.sources.read().expect("source list poisoned").clone())
    }

    async fn get_workspace_settings(&self) -> anyhow::Result<WorkspaceSettings> {
        Ok(self.settings)
    }
}
