//! Policy loading
//!
//! `PolicyLoader` is the seam between the engine and wherever policy
//! records actually live. The file-backed implementation mirrors the
//! on-disk workspace layout: one folder per source, holding a
//! `permissions.json` record.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::Duration;

use super::rules::PermissionPolicy;
use crate::core::PolicyError;

/// Name of the policy record inside a source folder
pub const POLICY_FILE_NAME: &str = "permissions.json";

/// Loads the permission policy for a source by slug
#[async_trait]
pub trait PolicyLoader: Send + Sync {
    /// Load and normalize the policy record for `slug`
    ///
    /// Fails with [`PolicyError::NotFound`] when no record exists and
    /// [`PolicyError::Parse`] when the record is malformed. Callers are
    /// expected to recover from both by substituting an empty policy.
    async fn load(&self, slug: &str) -> Result<PermissionPolicy, PolicyError>;
}

/// File-backed policy loader
///
/// Reads `<root>/<slug>/permissions.json`.
pub struct FilePolicyLoader {
    root: PathBuf,
}

impl FilePolicyLoader {
    /// Create a loader rooted at the workspace sources directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the policy record for a slug
    pub fn policy_path(&self, slug: &str) -> PathBuf {
        self.root.join(slug).join(POLICY_FILE_NAME)
    }

    /// The root directory
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl PolicyLoader for FilePolicyLoader {
    async fn load(&self, slug: &str) -> Result<PermissionPolicy, PolicyError> {
        let path = self.policy_path(slug);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PolicyError::NotFound(slug.to_string()));
            }
            Err(e) => return Err(PolicyError::Io(e)),
        };

        tracing::debug!("[FilePolicyLoader] Loaded policy record for '{}'", slug);
        PermissionPolicy::parse(&content)
    }
}

/// In-memory policy loader for tests and demos
///
/// Records are stored as raw JSON so malformed input can be exercised.
/// Optional per-slug delays simulate slow loads for stale-result tests.
#[derive(Default)]
pub struct StaticPolicyLoader {
    records: RwLock<HashMap<String, String>>,
    delays: RwLock<HashMap<String, Duration>>,
}

impl StaticPolicyLoader {
    /// Create an empty loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a raw JSON record for a slug
    pub fn with_record(self, slug: impl Into<String>, json: impl Into<String>) -> Self {
        self.insert(slug, json);
        self
    }

    /// Delay loads for a slug by the given duration
    pub fn with_delay(self, slug: impl Into<String>, delay: Duration) -> Self {
        self.delays
            .write()
            .expect("delay map poisoned")
            .insert(slug.into(), delay);
        self
    }

    /// Replace the record for a slug
    ///
    /// Used to simulate an external edit between change notifications.
    pub fn insert(&self, slug: impl Into<String>, json: impl Into<String>) {
        self.records
            .write()
            .expect("record map poisoned")
            .insert(slug.into(), json.into());
    }
}

#[async_trait]
impl PolicyLoader for StaticPolicyLoader {
    async fn load(&self, slug: &str) -> Result<PermissionPolicy, PolicyError> {
        let delay = self
            .delays
            .read()
            .expect("delay map poisoned")
            .get(slug)
            .copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let record = self
            .records
            .read()
            .expect("record map poisoned")
            .get(slug)
            .cloned();
        match record {
            Some(json) => PermissionPolicy::parse(&json),
            None => Err(PolicyError::NotFound(slug.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_loader_reads_record() {
        let temp = TempDir::new().unwrap();
        let source_dir = temp.path().join("github");
        std::fs::create_dir_all(&source_dir).unwrap();
        std::fs::write(
            source_dir.join(POLICY_FILE_NAME),
            r#"{"allowedMcpPatterns": ["read_*"]}"#,
        )
        .unwrap();

        let loader = FilePolicyLoader::new(temp.path());
        let policy = loader.load("github").await.unwrap();
        assert_eq!(policy.allowed_mcp_patterns.len(), 1);
        assert_eq!(policy.allowed_mcp_patterns[0].pattern, "read_*");
    }

    #[tokio::test]
    async fn test_file_loader_not_found() {
        let temp = TempDir::new().unwrap();
        let loader = FilePolicyLoader::new(temp.path());

        let err = loader.load("missing").await.unwrap_err();
        assert!(matches!(err, PolicyError::NotFound(slug) if slug == "missing"));
    }

    #[tokio::test]
    async fn test_file_loader_malformed_record() {
        let temp = TempDir::new().unwrap();
        let source_dir = temp.path().join("broken");
        std::fs::create_dir_all(&source_dir).unwrap();
        std::fs::write(source_dir.join(POLICY_FILE_NAME), "{oops").unwrap();

        let loader = FilePolicyLoader::new(temp.path());
        let err = loader.load("broken").await.unwrap_err();
        assert!(matches!(err, PolicyError::Parse(_)));
    }

    #[tokio::test]
    async fn test_static_loader() {
        let loader = StaticPolicyLoader::new().with_record("a", r#"{"blockedTools": ["x"]}"#);

        let policy = loader.load("a").await.unwrap();
        assert_eq!(policy.blocked_tools.len(), 1);

        let err = loader.load("b").await.unwrap_err();
        assert!(matches!(err, PolicyError::NotFound(_)));

        loader.insert("a", "{}");
        let policy = loader.load("a").await.unwrap();
        assert!(policy.is_empty());
    }
}
