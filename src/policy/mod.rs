//! Policy records, normalization, and loading
//!
//! A permission policy is the set of allow/block rules governing which
//! capabilities a source may invoke without explicit confirmation. The
//! persisted record tolerates heterogeneous rule shapes (bare strings or
//! structured records); this module normalizes them at the parsing
//! boundary:
//!
//! - `RawPolicyRecord` / `RawRule` - the on-disk shapes
//! - `PermissionPolicy` / `Rule` / `ApiRule` - the normalized model
//! - `PolicyLoader` - async loading seam, with file-backed and in-memory
//!   implementations
//! - `pattern::glob_match` - the single-wildcard matcher rules use

mod loader;
pub mod pattern;
mod rules;

pub use loader::{FilePolicyLoader, PolicyLoader, StaticPolicyLoader, POLICY_FILE_NAME};
pub use pattern::glob_match;
pub use rules::{ApiRule, PermissionPolicy, RawPolicyRecord, RawRule, Rule};
