//! Capability permission resolution and live-synchronization engine
//!
//! Manages the permission side of workspace "sources" - configured
//! external integrations such as MCP tool servers, HTTP APIs, and local
//! tools. The engine normalizes heterogeneous policy-rule shapes into a
//! uniform model, computes the effective permission grade for every
//! capability a source exposes, and keeps that resolution current as
//! policy records change on disk, capability lists are rediscovered, and
//! the selection moves between sources - all under asynchronous,
//! potentially out-of-order completion.
//!
//! # Architecture
//!
//! ```text
//! SourceRegistry ─┐
//! PolicyLoader ───┼─▶ SyncController ─▶ resolve ─▶ SyncSnapshot (watch)
//! Discoverer ─────┘        ▲
//!                      SyncHandle
//! ```
//!
//! The controller owns all mutable state and processes events one at a
//! time; results of superseded requests are discarded by token
//! comparison rather than forced cancellation.

pub mod core;
pub mod policy;
pub mod resolve;

// Capability discovery from live sources
pub mod discovery;

// The synchronization controller and its handle
pub mod sync;

// Seam to the external source registry
pub mod registry;

// Optional tracing setup for embedding binaries
pub mod logging;
