//! Synchronization controller
//!
//! Owns all mutable per-selection state exclusively and mutates it only
//! inside one serialized event loop: commands from handles and
//! completions of spawned work are processed one at a time in arrival
//! order, so no locks guard the state itself.
//!
//! Every piece of async work is tagged with the generation current when
//! it was issued. The generation is bumped on every selection change,
//! deselect, and active-source change notification; a completion whose
//! token no longer matches is stale and dropped without touching state.
//! In-flight calls are never force-cancelled, their results are simply
//! discarded, so the most recent selection always determines the final
//! displayed state regardless of completion order.

use std::sync::Arc;

use super::channels::{
    create_command_channel, create_completion_channel, CommandReceiver, CompletionReceiver,
    CompletionSender,
};
use super::events::{Completion, SyncCommand};
use super::handle::SyncHandle;
use super::snapshot::SyncSnapshot;
use crate::core::{
    DiscoveryError, DiscoveryPhase, McpTransport, PolicyError, PolicyPhase, Source,
    WorkspaceSettings,
};
use crate::discovery::CapabilityDiscoverer;
use crate::policy::{PermissionPolicy, PolicyLoader};
use crate::registry::SourceRegistry;
use crate::resolve;

/// Orchestrates policy loading, capability discovery, resolution, and
/// row projection for the active source selection
pub struct SyncController {
    registry: Arc<dyn SourceRegistry>,
    loader: Arc<dyn PolicyLoader>,
    discoverer: Arc<dyn CapabilityDiscoverer>,
    settings: WorkspaceSettings,

    /// Monotonically increasing request generation
    generation: u64,
    /// The active source, if any
    active: Option<Source>,
    policy_phase: PolicyPhase,
    discovery_phase: DiscoveryPhase,
    policy_warning: Option<String>,

    snapshot_tx: tokio::sync::watch::Sender<SyncSnapshot>,
    completion_tx: CompletionSender,
}

impl SyncController {
    /// Spawn a controller task, reading workspace settings from the
    /// registry first
    ///
    /// Settings that fail to load fall back to defaults; source
    /// selection must not be blocked by a settings problem.
    pub async fn spawn(
        registry: Arc<dyn SourceRegistry>,
        loader: Arc<dyn PolicyLoader>,
        discoverer: Arc<dyn CapabilityDiscoverer>,
    ) -> SyncHandle {
        let settings = match registry.get_workspace_settings().await {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(
                    "[SyncController] Failed to load workspace settings, using defaults: {}",
                    e
                );
                WorkspaceSettings::default()
            }
        };
        Self::spawn_with_settings(registry, loader, discoverer, settings)
    }

    /// Spawn a controller task with explicit workspace settings
    pub fn spawn_with_settings(
        registry: Arc<dyn SourceRegistry>,
        loader: Arc<dyn PolicyLoader>,
        discoverer: Arc<dyn CapabilityDiscoverer>,
        settings: WorkspaceSettings,
    ) -> SyncHandle {
        let (command_tx, command_rx) = create_command_channel();
        let (completion_tx, completion_rx) = create_completion_channel();
        let (snapshot_tx, snapshot_rx) = tokio::sync::watch::channel(SyncSnapshot::default());

        let controller = Self {
            registry,
            loader,
            discoverer,
            settings,
            generation: 0,
            active: None,
            policy_phase: PolicyPhase::Idle,
            discovery_phase: DiscoveryPhase::Idle,
            policy_warning: None,
            snapshot_tx,
            completion_tx,
        };

        tokio::spawn(controller.run(command_rx, completion_rx));

        SyncHandle::new(command_tx, snapshot_rx)
    }

    /// Serialized event loop; the single writer for all selection state
    async fn run(mut self, mut commands: CommandReceiver, mut completions: CompletionReceiver) {
        loop {
            tokio::select! {
                cmd = commands.recv() => match cmd {
                    Some(SyncCommand::Shutdown) | None => break,
                    Some(cmd) => self.handle_command(cmd).await,
                },
                Some(completion) = completions.recv() => self.apply_completion(completion),
            }
        }
        tracing::debug!("[SyncController] Event loop stopped");
    }

    async fn handle_command(&mut self, command: SyncCommand) {
        match command {
            SyncCommand::SelectSource(slug) => self.select_source(slug).await,
            SyncCommand::Deselect => self.deselect(),
            SyncCommand::SourcesChanged(sources) => self.sources_changed(sources),
            // Handled by the event loop before dispatch
            SyncCommand::Shutdown => {}
        }
    }

    async fn select_source(&mut self, slug: String) {
        // Invalidates anything in flight for the previous selection.
        self.generation += 1;
        let token = self.generation;
        tracing::info!(
            "[SyncController] Selecting source '{}' (token {})",
            slug,
            token
        );

        let lookup = self.registry.get_sources().await;
        let source = match lookup {
            Ok(sources) => sources.into_iter().find(|s| s.slug == slug),
            Err(e) => {
                tracing::warn!("[SyncController] Source lookup failed: {}", e);
                self.fail_selection(format!("Failed to load sources: {}", e));
                return;
            }
        };

        let Some(source) = source else {
            self.fail_selection(format!("Source not found: {}", slug));
            return;
        };

        self.start_sync(source, token, true);
    }

    /// Clear the selection into a policy error state
    fn fail_selection(&mut self, message: String) {
        self.active = None;
        self.policy_phase = PolicyPhase::Error { message };
        self.discovery_phase = DiscoveryPhase::Idle;
        self.policy_warning = None;
        self.publish();
    }

    fn deselect(&mut self) {
        // Outstanding calls may still complete; their tokens no longer
        // match and their results are dropped.
        self.generation += 1;
        tracing::info!("[SyncController] Deselecting (token {})", self.generation);

        self.active = None;
        self.policy_phase = PolicyPhase::Idle;
        self.discovery_phase = DiscoveryPhase::Idle;
        self.policy_warning = None;
        self.publish();
    }

    fn sources_changed(&mut self, sources: Vec<Source>) {
        let Some(active) = &self.active else {
            return;
        };

        // No background state is kept for non-active sources; a change
        // that does not name the active one is ignored entirely.
        let Some(updated) = sources.into_iter().find(|s| s.slug == active.slug) else {
            tracing::debug!(
                "[SyncController] Change notification does not name active source '{}'; ignoring",
                active.slug
            );
            return;
        };

        self.generation += 1;
        let token = self.generation;
        tracing::info!(
            "[SyncController] Active source '{}' changed externally, reloading policy (token {})",
            updated.slug,
            token
        );

        // Policy reloads under the new token. An already-discovered
        // capability list is kept as-is, but a discovery still in
        // flight was issued under the old token and its result will be
        // dropped, so it must be re-issued or the phase would stay
        // Discovering forever.
        let refresh_discovery = self.discovery_phase.is_discovering();
        self.start_sync(updated, token, refresh_discovery);
    }

    /// Begin (re)synchronizing a source under the given token
    fn start_sync(&mut self, source: Source, token: u64, refresh_discovery: bool) {
        self.policy_phase = PolicyPhase::Loading;
        self.policy_warning = None;

        let loader = self.loader.clone();
        let slug = source.slug.clone();
        let tx = self.completion_tx.clone();
        tokio::spawn(async move {
            let result = loader.load(&slug).await;
            let _ = tx.send(Completion::PolicyLoaded { token, result }).await;
        });

        if refresh_discovery {
            if !source.is_live() {
                // Unsupported discovery is immediately ready and empty.
                self.discovery_phase = DiscoveryPhase::Ready(Vec::new());
            } else if self.source_disabled(&source) {
                tracing::info!(
                    "[SyncController] Local MCP disabled; skipping discovery for '{}'",
                    source.slug
                );
                self.discovery_phase = DiscoveryPhase::Ready(Vec::new());
            } else {
                self.discovery_phase = DiscoveryPhase::Discovering;
                let discoverer = self.discoverer.clone();
                let src = source.clone();
                let tx = self.completion_tx.clone();
                tokio::spawn(async move {
                    let result = discoverer.discover(&src).await;
                    let _ = tx
                        .send(Completion::CapabilitiesLoaded { token, result })
                        .await;
                });
            }
        }

        self.active = Some(source);
        self.publish();
    }

    fn apply_completion(&mut self, completion: Completion) {
        match completion {
            Completion::PolicyLoaded { token, result } => {
                if token != self.generation {
                    tracing::debug!(
                        "[SyncController] Dropping stale policy result (token {}, current {})",
                        token,
                        self.generation
                    );
                    return;
                }

                self.policy_phase = match result {
                    Ok(policy) => PolicyPhase::Ready(policy),
                    // A source without a record simply has the empty policy.
                    Err(PolicyError::NotFound(_)) => PolicyPhase::Ready(PermissionPolicy::empty()),
                    Err(PolicyError::Parse(message)) => {
                        tracing::warn!(
                            "[SyncController] Malformed policy record, falling back to empty policy: {}",
                            message
                        );
                        self.policy_warning =
                            Some(format!("Policy record could not be parsed: {}", message));
                        PolicyPhase::Ready(PermissionPolicy::empty())
                    }
                    Err(e) => PolicyPhase::Error {
                        message: e.to_string(),
                    },
                };
                self.publish();
            }
            Completion::CapabilitiesLoaded { token, result } => {
                if token != self.generation {
                    tracing::debug!(
                        "[SyncController] Dropping stale capability result (token {}, current {})",
                        token,
                        self.generation
                    );
                    return;
                }

                self.discovery_phase = match result {
                    Ok(capabilities) => DiscoveryPhase::Ready(capabilities),
                    Err(DiscoveryError::Unsupported(_)) => DiscoveryPhase::Ready(Vec::new()),
                    Err(e) => {
                        tracing::warn!("[SyncController] Capability discovery failed: {}", e);
                        DiscoveryPhase::Error {
                            message: e.to_string(),
                        }
                    }
                };
                self.publish();
            }
        }
    }

    fn source_disabled(&self, source: &Source) -> bool {
        source.is_live()
            && source.transport == Some(McpTransport::Stdio)
            && !self.settings.local_mcp_enabled
    }

    /// Recompute projections and publish the current snapshot
    fn publish(&self) {
        let rows = match (&self.active, self.policy_phase.policy()) {
            (Some(source), Some(policy)) => resolve::rows_for(source.source_type, policy),
            _ => Vec::new(),
        };

        let resolved = match (self.policy_phase.policy(), self.discovery_phase.capabilities()) {
            (Some(policy), Some(capabilities)) => resolve::resolve(policy, capabilities),
            _ => Vec::new(),
        };

        let source_disabled = self
            .active
            .as_ref()
            .map(|s| self.source_disabled(s))
            .unwrap_or(false);

        self.snapshot_tx.send_replace(SyncSnapshot {
            source: self.active.clone(),
            generation: self.generation,
            policy_phase: self.policy_phase.clone(),
            discovery_phase: self.discovery_phase.clone(),
            policy_warning: self.policy_warning.clone(),
            resolved,
            rows,
            source_disabled,
        });
    }
}
