//! Core types for the synchronization engine
//!
//! This module provides the fundamental types used throughout the engine:
//! - `Source` - A configured external integration (read-only here)
//! - `PolicyPhase` / `DiscoveryPhase` - Per-source sub-state machines
//! - `PolicyError` / `DiscoveryError` / `SyncError` - Error taxonomy

pub mod error;
pub mod source;
pub mod state;

pub use error::{DiscoveryError, PolicyError, SyncError, SyncResult};
pub use source::{McpTransport, Source, SourceEndpoint, SourceType, WorkspaceSettings};
pub use state::{DiscoveryPhase, PolicyPhase};
