//! DocFuse - cross-source API knowledge reconciliation engine
//!
//! This library extracts API-level facts from documentation text, static
//! code-analysis records, and issue-tracker data, detects disagreements
//! between the documentation and code views, and merges everything into
//! one authoritative record per API.

pub mod config;
pub mod conflict;
pub mod error;
pub mod extract;
pub mod input;
pub mod issues;
pub mod merge;
pub mod pipeline;

/// Re-export commonly used types
pub use config::ReconcileConfig;
pub use conflict::{Conflict, ConflictDetector, ConflictType, Severity};
pub use error::ReconcileError;
pub use extract::{ApiEntry, ApiIndex, ApiKind, DocApiExtractor, Parameter};
pub use input::{DocPage, FileAnalysis, GithubLayer, PageCollection};
pub use issues::{Issue, IssueState};
pub use merge::{MergeResult, MergeStatus, MergedApiRecord, SourceMerger};
pub use pipeline::{reconcile, ReconcileOutput};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "docfuse";
