//! Engine error types

use std::time::Duration;
use thiserror::Error;

/// Errors from loading or parsing a policy record
#[derive(Error, Debug)]
pub enum PolicyError {
    /// No policy file exists for the given source slug
    #[error("No policy record for source: {0}")]
    NotFound(String),

    /// The policy record is malformed
    ///
    /// Callers must recover by falling back to an empty policy; the
    /// record is user-editable and transient corruption is expected.
    #[error("Malformed policy record: {0}")]
    Parse(String),

    /// IO error while reading the policy record
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from capability discovery
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// Discovery only applies to live (mcp) sources
    #[error("Capability discovery is not supported for {0} sources")]
    Unsupported(crate::core::SourceType),

    /// The source could not be reached or answered with a protocol error
    #[error("Connection error: {0}")]
    Connection(String),

    /// The source did not answer within the bounded wait
    #[error("Capability discovery timed out after {0:?}")]
    Timeout(Duration),
}

/// Errors from interacting with a running synchronization controller
#[derive(Error, Debug)]
pub enum SyncError {
    /// The controller task is no longer running
    #[error("Controller channel closed")]
    ChannelClosed,
}

/// Result type alias for controller interactions
pub type SyncResult<T> = Result<T, SyncError>;
