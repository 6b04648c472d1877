//! Capability discovery
//!
//! A capability is a concrete invocable unit exposed by a source: a tool
//! from a live MCP server, or an endpoint of an HTTP API. Discovery only
//! applies to live (`mcp`) sources; for other types it is unsupported and
//! skipped, not attempted.
//!
//! - `Capability` - the discovered unit
//! - `CapabilityDiscoverer` - async discovery seam
//! - `McpDiscoverer` - rmcp-backed implementation over streamable HTTP,
//!   with a bounded wait per call
//! - `StaticDiscoverer` - in-memory implementation for tests and demos

mod capability;
mod fixed;
mod mcp;

pub use capability::{Capability, CapabilityDiscoverer};
pub use fixed::StaticDiscoverer;
pub use mcp::{HttpClientTransport, McpDiscoverer, DEFAULT_DISCOVERY_TIMEOUT};
