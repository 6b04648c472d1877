//! Permission resolution and row projection
//!
//! Pure, synchronous transforms: `resolver` combines a normalized policy
//! with a discovered capability list into per-capability grades;
//! `rows` flattens either side into display-ready rows. Neither holds
//! state; the synchronization controller recomputes both on every
//! policy or capability-list change.

pub mod resolver;
pub mod rows;

pub use resolver::{grade, grade_bash, resolve, PermissionGrade, ResolvedCapability};
pub use rows::{api_rows, mcp_rows, rows_for, tool_rows, PermissionRow, RowAccess, RowKind, ToolRow};
